//! Environmental hazards: damaging plants, mines and wandering fish.

use std::f32::consts::TAU;

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;
use rand::Rng;

use crate::core::{AudioCue, DamageEvent};
use crate::feedback::SoundCue;
use crate::player::Player;

/// Damages the player on contact.
#[derive(Component, Debug, Clone)]
pub struct ContactHazard {
    pub damage: f32,
    /// Only the first contact deals damage
    pub once: bool,
    /// Removed after its first hit
    pub destroy_on_hit: bool,
    has_damaged: bool,
}

impl ContactHazard {
    pub fn new(damage: f32) -> Self {
        Self {
            damage,
            once: false,
            destroy_on_hit: false,
            has_damaged: false,
        }
    }

    pub fn once(mut self) -> Self {
        self.once = true;
        self
    }

    pub fn destroy_on_hit(mut self) -> Self {
        self.destroy_on_hit = true;
        self
    }

    /// Damage for a new contact, if this hazard still deals any.
    pub fn strike(&mut self) -> Option<f32> {
        if self.has_damaged && (self.once || self.destroy_on_hit) {
            return None;
        }
        self.has_damaged = true;
        Some(self.damage)
    }
}

/// Explodes on the first player contact.
#[derive(Component, Debug, Clone)]
pub struct Mine {
    pub damage: f32,
    pub cue: Option<SoundCue>,
    detonated: bool,
}

impl Mine {
    pub fn new(damage: f32, cue: Option<SoundCue>) -> Self {
        Self {
            damage,
            cue,
            detonated: false,
        }
    }

    /// Returns the damage the first time only.
    pub fn detonate(&mut self) -> Option<f32> {
        if self.detonated {
            return None;
        }
        self.detonated = true;
        Some(self.damage)
    }
}

/// Drifts in a random direction, re-rolled every interval.
#[derive(Component, Debug, Clone)]
pub struct Wanderer {
    pub speed: f32,
    pub damage: f32,
    pub direction: Vec2,
    pub change_timer: Timer,
}

impl Wanderer {
    pub fn new(speed: f32, change_interval: f32, damage: f32, rng: &mut impl Rng) -> Self {
        Self {
            speed,
            damage,
            direction: random_direction(rng),
            change_timer: Timer::from_seconds(change_interval, TimerMode::Repeating),
        }
    }
}

impl Default for Wanderer {
    fn default() -> Self {
        Self::new(2.0, 2.0, 1.0, &mut rand::thread_rng())
    }
}

/// Uniformly distributed unit vector in the gameplay plane.
pub fn random_direction(rng: &mut impl Rng) -> Vec2 {
    Vec2::from_angle(rng.gen_range(0.0..TAU))
}

/// Uniform point inside a `size` box centred on `center`.
pub fn scatter_point(center: Vec2, size: Vec2, rng: &mut impl Rng) -> Vec2 {
    let half = size.abs() / 2.0;
    center
        + Vec2::new(
            rng.gen_range(-half.x..=half.x),
            rng.gen_range(-half.y..=half.y),
        )
}

/// Spawn one wandering fish with default tuning.
pub fn spawn_wanderer(commands: &mut Commands, position: Vec3, rng: &mut impl Rng) -> Entity {
    commands
        .spawn((
            Name::new("Wanderer"),
            Wanderer::new(2.0, 2.0, 1.0, rng),
            Transform::from_translation(position),
            RigidBody::KinematicVelocityBased,
            Velocity::zero(),
            Collider::ball(0.3),
            Sensor,
            ActiveEvents::COLLISION_EVENTS,
        ))
        .id()
}

/// Scatter `count` wanderers across a `size` area around `center`.
pub fn spawn_wanderers(
    commands: &mut Commands,
    count: usize,
    center: Vec3,
    size: Vec2,
    rng: &mut impl Rng,
) -> Vec<Entity> {
    let spawned: Vec<Entity> = (0..count)
        .map(|_| {
            let point = scatter_point(center.truncate(), size, rng);
            spawn_wanderer(commands, point.extend(center.z), rng)
        })
        .collect();
    debug!("Spawned {} wanderers around {:?}", spawned.len(), center);
    spawned
}

/// Re-roll wander directions and drive velocity.
pub fn wander(time: Res<Time>, mut query: Query<(&mut Wanderer, &mut Velocity)>) {
    let mut rng = rand::thread_rng();
    for (mut wanderer, mut velocity) in query.iter_mut() {
        wanderer.change_timer.tick(time.delta());
        if wanderer.change_timer.just_finished() {
            wanderer.direction = random_direction(&mut rng);
        }
        velocity.linvel = (wanderer.direction * wanderer.speed).extend(0.0);
    }
}

/// Resolve hazard contacts with the player.
#[allow(clippy::type_complexity)]
pub fn hazard_contacts(
    mut commands: Commands,
    mut collisions: EventReader<CollisionEvent>,
    players: Query<(), With<Player>>,
    mut hazards: Query<
        (
            Option<&mut ContactHazard>,
            Option<&mut Mine>,
            Option<&Wanderer>,
        ),
        Or<(With<ContactHazard>, With<Mine>, With<Wanderer>)>,
    >,
    mut damage_events: EventWriter<DamageEvent>,
    mut cues: EventWriter<AudioCue>,
) {
    for event in collisions.read() {
        let CollisionEvent::Started(a, b, _) = event else {
            continue;
        };

        for (hazard, other) in [(*a, *b), (*b, *a)] {
            if !players.contains(other) {
                continue;
            }
            let Ok((contact, mine, wanderer)) = hazards.get_mut(hazard) else {
                continue;
            };
            let mut destroy = false;

            if let Some(mut contact) = contact {
                if let Some(damage) = contact.strike() {
                    damage_events.send(DamageEvent::hit(other, hazard, damage));
                    destroy |= contact.destroy_on_hit;
                }
            }

            if let Some(mut mine) = mine {
                if let Some(damage) = mine.detonate() {
                    damage_events.send(DamageEvent::hit(other, hazard, damage));
                    if let Some(cue) = &mine.cue {
                        cues.send(cue.cue());
                    }
                    debug!("Mine {:?} detonated", hazard);
                    destroy = true;
                }
            }

            if let Some(wanderer) = wanderer {
                damage_events.send(DamageEvent::hit(other, hazard, wanderer.damage));
            }

            if destroy {
                commands.entity(hazard).despawn_recursive();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeating_hazard_damages_every_contact() {
        let mut hazard = ContactHazard::new(2.0);
        assert_eq!(hazard.strike(), Some(2.0));
        assert_eq!(hazard.strike(), Some(2.0));
    }

    #[test]
    fn once_hazard_damages_first_contact_only() {
        let mut hazard = ContactHazard::new(2.0).once();
        assert_eq!(hazard.strike(), Some(2.0));
        assert_eq!(hazard.strike(), None);
    }

    #[test]
    fn mine_detonates_once() {
        let mut mine = Mine::new(1.0, None);
        assert_eq!(mine.detonate(), Some(1.0));
        assert_eq!(mine.detonate(), None);
    }

    #[test]
    fn random_direction_is_unit_length() {
        let mut rng = rand::thread_rng();
        for _ in 0..50 {
            let dir = random_direction(&mut rng);
            assert!((dir.length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn scattered_points_stay_in_area() {
        let mut rng = rand::thread_rng();
        let center = Vec2::new(4.0, -2.0);
        for _ in 0..100 {
            let point = scatter_point(center, Vec2::new(30.0, 10.0), &mut rng);
            assert!((point.x - center.x).abs() <= 15.0);
            assert!((point.y - center.y).abs() <= 5.0);
        }
        let mut rng = rand::thread_rng();
        assert_eq!(scatter_point(center, Vec2::ZERO, &mut rng), center);
    }

    #[test]
    fn spawns_requested_number_of_wanderers() {
        let mut world = World::new();
        let mut rng = rand::thread_rng();
        let spawned = spawn_wanderers(
            &mut world.commands(),
            10,
            Vec3::new(0.0, 5.0, 1.0),
            Vec2::new(30.0, 10.0),
            &mut rng,
        );
        world.flush();

        assert_eq!(spawned.len(), 10);
        let mut fish = world.query::<(&Wanderer, &Transform)>();
        assert_eq!(fish.iter(&world).count(), 10);
        for (_, transform) in fish.iter(&world) {
            assert_eq!(transform.translation.z, 1.0);
            assert!((transform.translation.y - 5.0).abs() <= 5.0);
        }
    }

    #[test]
    fn default_wanderer_matches_fish_tuning() {
        let fish = Wanderer::default();
        assert_eq!(fish.speed, 2.0);
        assert_eq!(fish.damage, 1.0);
        assert_eq!(fish.change_timer.duration().as_secs_f32(), 2.0);
    }
}
