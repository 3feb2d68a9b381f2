//! Collision categories
//!
//! Числа — контракт со сценой (scene asset авторился под них):
//! - Category 1 (0b01): динамические тела сцены (target blocks)
//! - Category 2 (0b10): статическая геометрия (floor)
//! - Projectile: category 3 (0b11), contact-test mask 1
//!
//! Rapier: `memberships` = category, `filters` = с кем физически коллайдит.
//! Contact-test mask отдельно: по ней фильтруются ProjectileContact события.

use bevy_rapier3d::prelude::{CollisionGroups, Group};

/// Category 1: dynamic scene bodies (blocks)
pub const SCENE_DYNAMIC_CATEGORY: u32 = 0b01; // 1

/// Category 2: static scene bodies (floor)
pub const SCENE_STATIC_CATEGORY: u32 = 0b10; // 2

/// Category снарядов
pub const PROJECTILE_CATEGORY: u32 = 3;

/// С какими категориями снаряд репортит контакт
pub const PROJECTILE_CONTACT_MASK: u32 = 1;

/// Снаряд: category 3, физически коллайдит со всем
pub fn projectile_groups() -> CollisionGroups {
    CollisionGroups::new(Group::from_bits_truncate(PROJECTILE_CATEGORY), Group::ALL)
}

pub fn static_scene_groups() -> CollisionGroups {
    CollisionGroups::new(Group::from_bits_truncate(SCENE_STATIC_CATEGORY), Group::ALL)
}

pub fn dynamic_scene_groups() -> CollisionGroups {
    CollisionGroups::new(Group::from_bits_truncate(SCENE_DYNAMIC_CATEGORY), Group::ALL)
}

/// Репортится ли контакт снаряда с телом данной категории
pub fn reports_contact(other_memberships: Group) -> bool {
    other_memberships.bits() & PROJECTILE_CONTACT_MASK != 0
}
