//! Player spawning and oxygen drain.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::components::*;
use crate::combat::{DeathBehavior, DeathScene, Health};
use crate::core::{DamageEvent, SceneTarget};
use crate::feedback::{AnimatorParams, CueSet};

/// Spawn the player. Movement input is driven elsewhere through `Velocity`.
pub fn spawn_player(commands: &mut Commands, config: &PlayerConfig, position: Vec3) -> Entity {
    let mut entity = commands.spawn((
        Name::new("Player"),
        Player,
        Health::new(config.max_health),
        DeathBehavior {
            despawn_delay: None,
            scene: Some(DeathScene {
                target: SceneTarget::ReloadCurrent,
                delay: config.reload_delay,
            }),
        },
        CueSet::default(),
        AnimatorParams::default(),
        Transform::from_translation(position),
        RigidBody::Dynamic,
        Collider::capsule_y(config.collider_half_height, config.collider_radius),
        Velocity::zero(),
        LockedAxes::TRANSLATION_LOCKED_Z | LockedAxes::ROTATION_LOCKED,
        GravityScale(0.3),
        ActiveEvents::COLLISION_EVENTS,
    ));

    if let Some(interval) = config.drain_interval {
        entity.insert(OxygenDrain::new(interval, config.drain_amount));
    }

    info!("Spawned player at {:?}", position);
    entity.id()
}

/// Periodic damage without hit feedback.
pub fn drain_oxygen(
    time: Res<Time>,
    mut query: Query<(Entity, &Health, &mut OxygenDrain), With<Player>>,
    mut damage_events: EventWriter<DamageEvent>,
) {
    for (entity, health, mut drain) in query.iter_mut() {
        if health.is_dead() {
            continue;
        }

        drain.timer.tick(time.delta());
        for _ in 0..drain.timer.times_finished_this_tick() {
            damage_events.send(DamageEvent {
                target: entity,
                source: entity,
                amount: drain.amount,
                feedback: false,
            });
        }
    }
}
