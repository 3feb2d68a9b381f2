//! Scene container — pre-authored сцена (floor, target blocks, light)
//!
//! Загружается один раз при активации, скрыта до commit'а.
//! При commit'е переносится в точку маркера и становится видимой (навсегда).
//! Физика сцены включается только после commit'а, когда container уже
//! стоит на своём месте.

use bevy::prelude::*;
use bevy_rapier3d::prelude::{Collider, RigidBody};
use serde::{Deserialize, Serialize};

use crate::placement::GameState;

pub mod collision;

/// Маркер: корень сцены
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct SceneContainer;

/// Видимость container'а (клиент синхронизирует в `Visibility`)
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
#[reflect(Component)]
pub enum ContainerVisibility {
    #[default]
    Hidden,
    Visible,
}

impl ContainerVisibility {
    /// Hidden → Visible. Возвращает true если видимость изменилась.
    pub fn reveal(&mut self) -> bool {
        let changed = *self == ContainerVisibility::Hidden;
        *self = ContainerVisibility::Visible;
        changed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum SceneBodyKind {
    /// Floor — не двигается
    Static,
    /// Target blocks — сбиваются снарядами
    Dynamic,
}

/// Физическое тело сцены (box)
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct SceneBody {
    pub kind: SceneBodyKind,
    pub half_extents: Vec3,
}

/// Directional light сцены
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct SceneLight {
    /// Та же шкала, что и ambient intensity estimate
    pub intensity: f32,
}

/// Handles на загруженную сцену (non-owning, владеет World)
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneHandles {
    pub container: Entity,
    pub light: Option<Entity>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloorDescription {
    pub size: [f32; 2],
    pub thickness: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockDescription {
    /// Центр блока относительно container'а
    pub position: [f32; 3],
    pub size: [f32; 3],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightDescription {
    /// Наклон вокруг X (радианы)
    pub pitch: f32,
    pub intensity: f32,
}

/// Описание сцены (аналог scene asset)
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneDescription {
    pub floor: FloorDescription,
    pub blocks: Vec<BlockDescription>,
    pub light: Option<LightDescription>,
}

impl Default for SceneDescription {
    fn default() -> Self {
        // Пирамида 4-3-2-1 из 10cm кубиков в 50cm перед центром
        const BLOCK: f32 = 0.1;
        let mut blocks = Vec::new();
        for row in 0..4 {
            let count = 4 - row;
            let y = BLOCK * 0.5 + row as f32 * BLOCK;
            let start_x = -(count as f32 - 1.0) * BLOCK * 0.5;
            for i in 0..count {
                blocks.push(BlockDescription {
                    position: [start_x + i as f32 * BLOCK, y, -0.5],
                    size: [BLOCK; 3],
                });
            }
        }

        Self {
            floor: FloorDescription {
                size: [1.5, 1.5],
                thickness: 0.02,
            },
            blocks,
            light: Some(LightDescription {
                pitch: -std::f32::consts::FRAC_PI_4,
                intensity: 1000.0,
            }),
        }
    }
}

/// Spawn сцены: скрытый container + дочерние floor/blocks/light
pub fn spawn_scene_container(commands: &mut Commands, description: &SceneDescription) -> SceneHandles {
    let container = commands
        .spawn((
            Name::new("container"),
            SceneContainer,
            ContainerVisibility::Hidden,
            Transform::default(),
        ))
        .id();

    let floor = &description.floor;
    commands.spawn((
        Name::new("floor"),
        SceneBody {
            kind: SceneBodyKind::Static,
            half_extents: Vec3::new(floor.size[0], floor.thickness, floor.size[1]) * 0.5,
        },
        // Верхняя грань пола на y = 0 container'а
        Transform::from_xyz(0.0, -floor.thickness * 0.5, 0.0),
        ChildOf(container),
    ));

    for (index, block) in description.blocks.iter().enumerate() {
        commands.spawn((
            Name::new(format!("block_{}", index)),
            SceneBody {
                kind: SceneBodyKind::Dynamic,
                half_extents: Vec3::from_array(block.size) * 0.5,
            },
            Transform::from_translation(Vec3::from_array(block.position)),
            ChildOf(container),
        ));
    }

    let light = description.light.as_ref().map(|light| {
        commands
            .spawn((
                Name::new("directional"),
                SceneLight {
                    intensity: light.intensity,
                },
                Transform::from_rotation(Quat::from_rotation_x(light.pitch)),
                ChildOf(container),
            ))
            .id()
    });

    SceneHandles { container, light }
}

/// Система: физика сцены после commit'а
///
/// Вешает Rapier тела на SceneBody, у которых их ещё нет.
pub fn enable_scene_physics(
    mut commands: Commands,
    state: Res<GameState>,
    bodies: Query<(Entity, &SceneBody), Without<RigidBody>>,
) {
    if !state.is_playing() {
        return;
    }

    for (entity, body) in bodies.iter() {
        let h = body.half_extents;
        let collider = Collider::cuboid(h.x, h.y, h.z);

        match body.kind {
            SceneBodyKind::Static => {
                commands
                    .entity(entity)
                    .insert((RigidBody::Fixed, collider, collision::static_scene_groups()));
            }
            SceneBodyKind::Dynamic => {
                commands
                    .entity(entity)
                    .insert((RigidBody::Dynamic, collider, collision::dynamic_scene_groups()));
            }
        }
    }
}
