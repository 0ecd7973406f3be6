//! Enemy spawning from registry definitions.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::components::{AiState, Enemy, EnemyKind, Facing, PatrolRoute};
use super::data::{EnemyDefinition, EnemyRegistry};
use super::sequence::AttackSlot;
use crate::combat::Health;
use crate::core::plane::to_plane;
use crate::feedback::AnimatorParams;

/// Ask for an enemy of `kind` to be spawned at `position`.
#[derive(Event, Debug, Clone)]
pub struct EnemySpawnRequest {
    pub kind: EnemyKind,
    pub position: Vec3,
}

/// Spawn one enemy with full health, patrolling to the left.
pub fn spawn_enemy(
    commands: &mut Commands,
    kind: EnemyKind,
    definition: &EnemyDefinition,
    position: Vec3,
    asset_server: Option<&AssetServer>,
) -> Entity {
    let collider = definition.collider;

    let mut entity = commands.spawn((
        Name::new(definition.name.clone()),
        Enemy,
        kind,
        Health::new(definition.max_health),
        definition.to_config(kind),
        AiState::default(),
        AttackSlot::default(),
        PatrolRoute {
            origin: to_plane(position),
            half_width: definition.movement.patrol_half_width,
            direction: -1.0,
        },
        Facing(-1.0),
        definition.to_death_behavior(),
        definition.to_cue_set(asset_server),
        AnimatorParams::default(),
        Transform::from_translation(position),
    ));

    entity.insert((
        RigidBody::Dynamic,
        Collider::capsule_y(collider.half_height, collider.radius),
        Velocity::zero(),
        LockedAxes::TRANSLATION_LOCKED_Z | LockedAxes::ROTATION_LOCKED,
        GravityScale(if definition.grounded { 1.0 } else { 0.0 }),
        ActiveEvents::COLLISION_EVENTS,
    ));

    if let Some(special) = definition.to_special() {
        entity.insert(special);
    }
    if let Some(probe) = definition.to_ledge_probe() {
        entity.insert(probe);
    }

    info!("Spawned {} at {:?}", definition.name, position);
    entity.id()
}

/// Spawn enemies for every pending request.
pub fn spawn_requested_enemies(
    mut commands: Commands,
    mut requests: EventReader<EnemySpawnRequest>,
    registry: Res<EnemyRegistry>,
    asset_server: Option<Res<AssetServer>>,
) {
    for request in requests.read() {
        let Some(definition) = registry.get(request.kind) else {
            warn!("No definition for {:?}, spawn skipped", request.kind);
            continue;
        };
        spawn_enemy(
            &mut commands,
            request.kind,
            definition,
            request.position,
            asset_server.as_deref(),
        );
    }
}
