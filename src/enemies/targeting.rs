//! Player target acquisition.
//!
//! The player entity is looked up once and cached. The cache is dropped when
//! the player despawns or a new scene loads, and re-resolved lazily on the
//! next tick.

use bevy::prelude::*;

use super::components::{AggroRule, AiState};
use crate::combat::Health;
use crate::core::SceneLoaded;
use crate::core::plane::to_plane;
use crate::player::Player;

/// Cached reference to the player entity.
#[derive(Resource, Default, Debug)]
pub struct PlayerTarget {
    cached: Option<Entity>,
    loss_logged: bool,
}

impl PlayerTarget {
    /// Return the cached entity while `is_valid` accepts it, otherwise run
    /// `lookup` and cache its result.
    pub fn resolve(
        &mut self,
        is_valid: impl Fn(Entity) -> bool,
        lookup: impl FnOnce() -> Option<Entity>,
    ) -> Option<Entity> {
        if let Some(entity) = self.cached {
            if is_valid(entity) {
                return Some(entity);
            }
            debug!("Cached player {:?} is gone", entity);
            self.cached = None;
        }

        match lookup() {
            Some(entity) => {
                info!("Player target resolved: {:?}", entity);
                self.cached = Some(entity);
                self.loss_logged = false;
                Some(entity)
            }
            None => {
                if !self.loss_logged {
                    warn!("No player found, target logic skipped until one appears");
                    self.loss_logged = true;
                }
                None
            }
        }
    }

    pub fn invalidate(&mut self) {
        self.cached = None;
    }

    pub fn get(&self) -> Option<Entity> {
        self.cached
    }
}

/// The resolved player and its plane position, valid for the current tick.
#[derive(Resource, Default, Debug, Clone, Copy, PartialEq)]
pub struct TargetSnapshot(pub Option<(Entity, Vec2)>);

impl TargetSnapshot {
    pub fn get(&self) -> Option<(Entity, Vec2)> {
        self.0
    }

    pub fn entity(&self) -> Option<Entity> {
        self.0.map(|(entity, _)| entity)
    }

    /// Position of `entity` if it is still the current target.
    pub fn position_of(&self, entity: Entity) -> Option<Vec2> {
        self.0
            .filter(|(target, _)| *target == entity)
            .map(|(_, position)| position)
    }
}

/// Resolve the player and record where it is this tick.
pub fn refresh_player_target(
    mut target: ResMut<PlayerTarget>,
    mut snapshot: ResMut<TargetSnapshot>,
    players: Query<(Entity, &Transform, Option<&Health>), With<Player>>,
) {
    let alive = |entity: Entity| {
        players
            .get(entity)
            .is_ok_and(|(_, _, health)| !health.is_some_and(Health::is_dead))
    };
    let lookup = || {
        players
            .iter()
            .find(|(_, _, health)| !health.is_some_and(Health::is_dead))
            .map(|(entity, _, _)| entity)
    };

    snapshot.0 = target.resolve(alive, lookup).and_then(|entity| {
        players
            .get(entity)
            .ok()
            .map(|(_, transform, _)| (entity, to_plane(transform.translation)))
    });
}

/// Drop the cached player when it despawns or a scene finishes loading.
pub fn invalidate_player_target(
    mut target: ResMut<PlayerTarget>,
    mut removed: RemovedComponents<Player>,
    mut loaded: EventReader<SceneLoaded>,
) {
    let cached = target.get();
    if removed.read().any(|entity| Some(entity) == cached) {
        target.invalidate();
    }
    if loaded.read().count() > 0 {
        target.invalidate();
    }
}

/// State selected by distance to the target.
///
/// Only `Patrol` and `Chase` can be switched; every other state is kept.
pub fn compute_aggro_state(current: AiState, distance: f32, rule: AggroRule) -> AiState {
    if !current.can_switch_for_aggro() {
        return current;
    }
    match rule {
        AggroRule::Never => AiState::Patrol,
        AggroRule::Within(range) if distance <= range => AiState::Chase,
        AggroRule::Within(_) => AiState::Patrol,
        AggroRule::Always => AiState::Chase,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aggro_switches_between_patrol_and_chase() {
        let rule = AggroRule::Within(8.0);
        assert_eq!(compute_aggro_state(AiState::Patrol, 10.0, rule), AiState::Patrol);
        assert_eq!(compute_aggro_state(AiState::Patrol, 5.0, rule), AiState::Chase);
        assert_eq!(compute_aggro_state(AiState::Chase, 8.0, rule), AiState::Chase);
        assert_eq!(compute_aggro_state(AiState::Chase, 8.5, rule), AiState::Patrol);
    }

    #[test]
    fn aggro_never_overrides_committed_states() {
        for state in [
            AiState::MeleeAttack,
            AiState::Retreat,
            AiState::SpecialCast,
            AiState::Dead,
        ] {
            assert_eq!(compute_aggro_state(state, 0.0, AggroRule::Always), state);
            assert_eq!(compute_aggro_state(state, 100.0, AggroRule::Within(8.0)), state);
        }
    }

    #[test]
    fn never_and_always_ignore_distance() {
        assert_eq!(compute_aggro_state(AiState::Patrol, 0.0, AggroRule::Never), AiState::Patrol);
        assert_eq!(compute_aggro_state(AiState::Patrol, 1000.0, AggroRule::Always), AiState::Chase);
    }

    #[test]
    fn resolve_caches_until_invalid() {
        let mut target = PlayerTarget::default();
        let player = Entity::from_raw(3);
        let mut lookups = 0;

        for _ in 0..3 {
            let found = target.resolve(|_| true, || {
                lookups += 1;
                Some(player)
            });
            assert_eq!(found, Some(player));
        }
        assert_eq!(lookups, 1);

        // Cached entity no longer valid: looked up again.
        let other = Entity::from_raw(4);
        assert_eq!(target.resolve(|e| e != player, || Some(other)), Some(other));
    }

    #[test]
    fn resolve_without_player_is_none() {
        let mut target = PlayerTarget::default();
        assert_eq!(target.resolve(|_| true, || None), None);
        assert_eq!(target.get(), None);
    }

    #[test]
    fn invalidate_forces_lookup() {
        let mut target = PlayerTarget::default();
        target.resolve(|_| true, || Some(Entity::from_raw(1)));
        target.invalidate();
        assert_eq!(
            target.resolve(|_| true, || Some(Entity::from_raw(2))),
            Some(Entity::from_raw(2))
        );
    }

    #[test]
    fn snapshot_position_only_for_current_target() {
        let snapshot = TargetSnapshot(Some((Entity::from_raw(1), Vec2::new(2.0, 3.0))));
        assert_eq!(snapshot.position_of(Entity::from_raw(1)), Some(Vec2::new(2.0, 3.0)));
        assert_eq!(snapshot.position_of(Entity::from_raw(2)), None);
    }
}
