//! BevyLogger — simulation logger → Bevy `tracing` (LogPlugin)

use argame_simulation::{LogLevel, LogPrinter};
use bevy::prelude::{debug, error, info, warn};

pub struct BevyLogger;

impl LogPrinter for BevyLogger {
    fn log(&self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Debug => debug!("{}", message),
            LogLevel::Info => info!("{}", message),
            LogLevel::Warning => warn!("{}", message),
            LogLevel::Error => error!("{}", message),
        }
    }
}
