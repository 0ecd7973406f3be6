//! Projectile spawning, contacts and lifetime.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::components::*;
use crate::core::plane::{direction_or, facing_rotation};
use crate::core::DamageEvent;
use crate::player::Player;

/// Spawn a projectile moving at constant velocity.
///
/// A degenerate direction is replaced by `fallback`.
pub fn spawn_projectile(
    commands: &mut Commands,
    launch: ProjectileLaunch,
    fallback: Vec2,
) -> Entity {
    let direction = direction_or(launch.direction, fallback);
    let velocity = direction * launch.speed;

    commands
        .spawn((
            Name::new("Projectile"),
            Projectile::new(
                launch.def.damage,
                launch.def.lifetime,
                launch.def.impact,
                launch.firer,
                launch.ignore,
            ),
            Transform::from_translation(launch.origin).with_rotation(facing_rotation(direction)),
            RigidBody::KinematicVelocityBased,
            Velocity::linear(velocity.extend(0.0)),
            GravityScale(0.0),
            Collider::ball(launch.def.radius),
            Sensor,
            ActiveEvents::COLLISION_EVENTS,
            ActiveCollisionTypes::default() | ActiveCollisionTypes::KINEMATIC_STATIC,
        ))
        .id()
}

/// Resolve projectile contacts reported by the physics engine.
pub fn handle_projectile_contacts(
    mut commands: Commands,
    mut collisions: EventReader<CollisionEvent>,
    mut projectiles: Query<&mut Projectile>,
    players: Query<(), With<Player>>,
    bodies: Query<&RigidBody>,
    mut damage_events: EventWriter<DamageEvent>,
) {
    for event in collisions.read() {
        let CollisionEvent::Started(a, b, _) = event else {
            continue;
        };

        for (entity, other) in [(*a, *b), (*b, *a)] {
            let Ok(mut projectile) = projectiles.get_mut(entity) else {
                continue;
            };

            let kind = if players.contains(other) {
                ContactKind::Player
            } else {
                match bodies.get(other) {
                    Ok(RigidBody::Fixed) | Err(_) => ContactKind::Environment,
                    Ok(_) => ContactKind::Other,
                }
            };

            match projectile.resolve_contact(other, kind) {
                ContactOutcome::Hit { damage } => {
                    debug!("Projectile {:?} hit {:?} for {}", entity, other, damage);
                    damage_events.send(DamageEvent::hit(other, projectile.firer, damage));
                    commands.entity(entity).despawn_recursive();
                }
                ContactOutcome::Destroy => {
                    commands.entity(entity).despawn_recursive();
                }
                ContactOutcome::PassThrough | ContactOutcome::Ignore => {}
            }
        }
    }
}

/// Despawn projectiles whose lifetime ran out.
pub fn tick_projectiles(
    mut commands: Commands,
    time: Res<Time>,
    mut query: Query<(Entity, &mut Projectile)>,
) {
    for (entity, mut projectile) in query.iter_mut() {
        // Already despawned by a contact this tick.
        if projectile.is_spent() {
            continue;
        }
        if projectile.tick(time.delta()) {
            commands.entity(entity).despawn_recursive();
        }
    }
}
