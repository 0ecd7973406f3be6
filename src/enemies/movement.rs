//! Enemy movement: velocity per state, facing and ground probes.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::abilities::SpecialAbility;
use super::components::*;
use super::sequence::AttackSlot;
use super::targeting::TargetSnapshot;
use crate::combat::Health;
use crate::core::plane::{to_plane, STILL_EPSILON_SQ};
use crate::core::CombatConfig;
use crate::feedback::AnimatorParams;

/// Per-tick inputs for `compute_velocity`.
#[derive(Debug, Clone, Copy)]
pub struct MovementInput<'a> {
    pub position: Vec2,
    pub target: Option<Vec2>,
    /// Away vector captured when the current retreat began.
    pub retreat_away: Option<Vec2>,
    /// Velocity imposed by an in-flight special cast.
    pub cast_velocity: Option<Vec2>,
    pub probe: Option<&'a LedgeProbe>,
    pub fallback: Vec2,
}

/// Desired plane velocity for `state`. Patrol may flip the route direction.
pub fn compute_velocity(
    state: AiState,
    route: &mut PatrolRoute,
    movement: &MovementDef,
    input: &MovementInput,
) -> Vec2 {
    match state {
        AiState::Patrol => patrol_velocity(route, movement.patrol_speed, input),
        AiState::Chase => input
            .target
            .map(|target| (target - input.position).normalize_or_zero() * movement.chase_speed)
            .unwrap_or(Vec2::ZERO),
        AiState::Retreat => input.retreat_away.unwrap_or(input.fallback) * movement.retreat_speed,
        AiState::SpecialCast => input.cast_velocity.unwrap_or(Vec2::ZERO),
        AiState::MeleeAttack | AiState::Dead => Vec2::ZERO,
    }
}

fn patrol_velocity(route: &mut PatrolRoute, speed: f32, input: &MovementInput) -> Vec2 {
    if let Some(probe) = input.probe {
        if probe.wall_ahead || !probe.ground_ahead {
            // Nowhere to go on either side.
            if !probe.ground_behind {
                return Vec2::ZERO;
            }
            route.flip();
        }
    } else if let Some(half_width) = route.half_width {
        let offset = input.position.x - route.origin.x;
        if route.direction > 0.0 && offset >= half_width {
            route.direction = -1.0;
        } else if route.direction < 0.0 && offset <= -half_width {
            route.direction = 1.0;
        }
    }

    Vec2::new(route.direction * speed, 0.0)
}

/// New facing sign.
///
/// Engaged actors with `TargetWhenEngaged` face the target; otherwise the
/// sign follows velocity, and a velocity that is nearly still keeps the
/// current facing.
pub fn facing_sign(
    current: f32,
    rule: FacingRule,
    state: AiState,
    position: Vec2,
    target: Option<Vec2>,
    velocity: Vec2,
    epsilon: f32,
) -> f32 {
    if rule == FacingRule::TargetWhenEngaged && state.is_engaged() {
        if let Some(target) = target {
            return if target.x < position.x { -1.0 } else { 1.0 };
        }
    }

    if velocity.length_squared() < STILL_EPSILON_SQ || velocity.x.abs() <= epsilon {
        return current;
    }
    velocity.x.signum()
}

/// Refresh ledge and wall probes for ground walkers.
pub fn probe_ground(
    rapier_context: Query<&RapierContext>,
    mut walkers: Query<(Entity, &Transform, &PatrolRoute, &mut LedgeProbe), With<Enemy>>,
) {
    // Keep the last readings when no physics world is present.
    let Ok(context) = rapier_context.get_single() else {
        return;
    };

    for (entity, transform, route, mut probe) in walkers.iter_mut() {
        let center = transform.translation;
        let filter = QueryFilter::only_fixed()
            .exclude_sensors()
            .exclude_collider(entity);

        let ground_at = |side: f32| {
            let offset = Vec3::new(side * probe.front_offset, -probe.foot_offset + 0.05, 0.0);
            let origin = center + offset;
            context
                .cast_ray(origin, Vec3::NEG_Y, probe.ray_length, true, filter)
                .is_some()
        };
        let ground_ahead = ground_at(route.direction);
        let ground_behind = ground_at(-route.direction);
        let wall_ahead = context
            .cast_ray(
                center,
                Vec3::X * route.direction,
                probe.front_offset + probe.wall_distance,
                true,
                filter,
            )
            .is_some();

        probe.ground_ahead = ground_ahead;
        probe.ground_behind = ground_behind;
        probe.wall_ahead = wall_ahead;
    }
}

/// Set velocity and facing for every living enemy.
pub fn apply_enemy_movement(
    config: Res<CombatConfig>,
    snapshot: Res<TargetSnapshot>,
    mut enemies: Query<
        (
            &Transform,
            &Health,
            &VariantConfig,
            &AiState,
            &AttackSlot,
            &mut PatrolRoute,
            &mut Velocity,
            &mut Facing,
            Option<&SpecialAbility>,
            Option<&LedgeProbe>,
            Option<&mut AnimatorParams>,
        ),
        With<Enemy>,
    >,
) {
    let fallback = config.fallback();
    let target = snapshot.get().map(|(_, position)| position);

    for (
        transform,
        health,
        variant,
        state,
        slot,
        mut route,
        mut velocity,
        mut facing,
        special,
        probe,
        animator,
    ) in enemies.iter_mut()
    {
        if health.is_dead() || *state == AiState::Dead {
            continue;
        }

        let position = to_plane(transform.translation);
        let input = MovementInput {
            position,
            target,
            retreat_away: slot.retreat_direction(),
            cast_velocity: special.and_then(SpecialAbility::cast_velocity),
            probe,
            fallback,
        };
        let desired = compute_velocity(*state, &mut route, &variant.movement, &input);

        velocity.linvel = if variant.grounded {
            Vec3::new(desired.x, velocity.linvel.y, 0.0)
        } else {
            desired.extend(0.0)
        };

        facing.0 = facing_sign(
            facing.0,
            variant.facing,
            *state,
            position,
            target,
            velocity.linvel.truncate(),
            config.facing_epsilon,
        );

        if let Some(mut animator) = animator {
            animator.speed = velocity.linvel.truncate().length();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn speeds() -> MovementDef {
        MovementDef {
            patrol_speed: 2.0,
            chase_speed: 3.0,
            retreat_speed: 4.5,
            patrol_half_width: Some(3.0),
        }
    }

    fn route() -> PatrolRoute {
        PatrolRoute {
            origin: Vec2::ZERO,
            half_width: Some(3.0),
            direction: 1.0,
        }
    }

    fn input<'a>(position: Vec2) -> MovementInput<'a> {
        MovementInput {
            position,
            target: None,
            retreat_away: None,
            cast_velocity: None,
            probe: None,
            fallback: Vec2::NEG_X,
        }
    }

    #[test]
    fn patrol_flips_at_bounds() {
        let mut route = route();
        let v = compute_velocity(
            AiState::Patrol,
            &mut route,
            &speeds(),
            &input(Vec2::new(1.0, 0.0)),
        );
        assert_eq!(v, Vec2::new(2.0, 0.0));

        let v = compute_velocity(
            AiState::Patrol,
            &mut route,
            &speeds(),
            &input(Vec2::new(3.0, 0.0)),
        );
        assert_eq!(v, Vec2::new(-2.0, 0.0));

        let v = compute_velocity(
            AiState::Patrol,
            &mut route,
            &speeds(),
            &input(Vec2::new(-3.2, 0.0)),
        );
        assert_eq!(v, Vec2::new(2.0, 0.0));
    }

    #[test]
    fn ranged_mermaid_patrols_then_holds_position() {
        let movement = crate::enemies::EnemyDefinition::builtin(EnemyKind::MermaidRanged).movement;
        let mut route = PatrolRoute {
            origin: Vec2::ZERO,
            half_width: movement.patrol_half_width,
            direction: -1.0,
        };

        let v = compute_velocity(AiState::Patrol, &mut route, &movement, &input(Vec2::ZERO));
        assert_eq!(v, Vec2::new(-3.0, 0.0));
        let v = compute_velocity(
            AiState::Patrol,
            &mut route,
            &movement,
            &input(Vec2::new(-3.0, 0.0)),
        );
        assert_eq!(v, Vec2::new(3.0, 0.0));

        let mut engaged = input(Vec2::ZERO);
        engaged.target = Some(Vec2::new(5.0, 0.0));
        assert_eq!(compute_velocity(AiState::Chase, &mut route, &movement, &engaged), Vec2::ZERO);
    }

    #[test]
    fn chase_moves_toward_target() {
        let mut route = route();
        let mut i = input(Vec2::ZERO);
        i.target = Some(Vec2::new(0.0, -5.0));
        let v = compute_velocity(AiState::Chase, &mut route, &speeds(), &i);
        assert_eq!(v, Vec2::new(0.0, -3.0));

        i.target = Some(Vec2::ZERO);
        assert_eq!(compute_velocity(AiState::Chase, &mut route, &speeds(), &i), Vec2::ZERO);
    }

    #[test]
    fn retreat_uses_captured_direction_or_fallback() {
        let mut route = route();
        let mut i = input(Vec2::ZERO);
        i.retreat_away = Some(Vec2::X);
        assert_eq!(
            compute_velocity(AiState::Retreat, &mut route, &speeds(), &i),
            Vec2::new(4.5, 0.0)
        );

        i.retreat_away = None;
        assert_eq!(
            compute_velocity(AiState::Retreat, &mut route, &speeds(), &i),
            Vec2::new(-4.5, 0.0)
        );
    }

    #[test]
    fn committed_states_hold_still() {
        let mut route = route();
        let mut i = input(Vec2::ZERO);
        i.target = Some(Vec2::X);
        assert_eq!(compute_velocity(AiState::MeleeAttack, &mut route, &speeds(), &i), Vec2::ZERO);
        assert_eq!(compute_velocity(AiState::Dead, &mut route, &speeds(), &i), Vec2::ZERO);
        assert_eq!(compute_velocity(AiState::SpecialCast, &mut route, &speeds(), &i), Vec2::ZERO);

        i.cast_velocity = Some(Vec2::new(10.0, 0.0));
        assert_eq!(
            compute_velocity(AiState::SpecialCast, &mut route, &speeds(), &i),
            Vec2::new(10.0, 0.0)
        );
    }

    #[test]
    fn ledge_flips_then_stops_when_stranded() {
        let mut route = PatrolRoute {
            origin: Vec2::ZERO,
            half_width: None,
            direction: -1.0,
        };
        let mut probe = LedgeProbe::new(0.3, 0.1, 0.36, 0.7);

        probe.ground_ahead = false;
        let mut i = input(Vec2::ZERO);
        i.probe = Some(&probe);
        assert_eq!(
            compute_velocity(AiState::Patrol, &mut route, &speeds(), &i),
            Vec2::new(2.0, 0.0)
        );
        assert_eq!(route.direction, 1.0);

        let mut stranded = probe;
        stranded.ground_behind = false;
        i.probe = Some(&stranded);
        assert_eq!(compute_velocity(AiState::Patrol, &mut route, &speeds(), &i), Vec2::ZERO);
    }

    #[test]
    fn wall_ahead_flips_walker() {
        let mut route = PatrolRoute {
            origin: Vec2::ZERO,
            half_width: None,
            direction: 1.0,
        };
        let mut probe = LedgeProbe::new(0.3, 0.1, 0.36, 0.7);
        probe.wall_ahead = true;
        let mut i = input(Vec2::ZERO);
        i.probe = Some(&probe);
        assert_eq!(
            compute_velocity(AiState::Patrol, &mut route, &speeds(), &i),
            Vec2::new(-2.0, 0.0)
        );
    }

    #[test]
    fn facing_ignores_tiny_velocity() {
        let sign = facing_sign(
            -1.0,
            FacingRule::Velocity,
            AiState::Patrol,
            Vec2::ZERO,
            None,
            Vec2::new(0.005, 0.0),
            0.01,
        );
        assert_eq!(sign, -1.0);
        let sign = facing_sign(
            -1.0,
            FacingRule::Velocity,
            AiState::Patrol,
            Vec2::ZERO,
            None,
            Vec2::new(0.5, 0.0),
            0.01,
        );
        assert_eq!(sign, 1.0);
        // Mostly vertical motion keeps facing.
        let sign = facing_sign(
            1.0,
            FacingRule::Velocity,
            AiState::Chase,
            Vec2::ZERO,
            None,
            Vec2::new(0.001, 3.0),
            0.01,
        );
        assert_eq!(sign, 1.0);
    }

    #[test]
    fn engaged_actor_faces_target() {
        let target = Some(Vec2::new(-4.0, 0.0));
        let sign = facing_sign(
            1.0,
            FacingRule::TargetWhenEngaged,
            AiState::Retreat,
            Vec2::ZERO,
            target,
            Vec2::new(5.0, 0.0),
            0.01,
        );
        assert_eq!(sign, -1.0);

        // Velocity rule ignores the target.
        let sign = facing_sign(
            1.0,
            FacingRule::Velocity,
            AiState::Retreat,
            Vec2::ZERO,
            target,
            Vec2::new(5.0, 0.0),
            0.01,
        );
        assert_eq!(sign, 1.0);
    }
}
