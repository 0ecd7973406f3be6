//! Enemy plugin - registers all enemy systems.

use bevy::prelude::*;

use super::ai;
use super::data::{load_enemy_definitions, EnemyRegistry};
use super::movement;
use super::spawning::{spawn_requested_enemies, EnemySpawnRequest};
use super::targeting::{
    invalidate_player_target, refresh_player_target, PlayerTarget, TargetSnapshot,
};
use crate::combat::apply_damage;
use crate::core::CombatSet;

/// Enemy plugin - handles targeting, AI, attacks, movement and spawning.
pub struct EnemyPlugin;

impl Plugin for EnemyPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<EnemyRegistry>()
            .init_resource::<PlayerTarget>()
            .init_resource::<TargetSnapshot>()
            .add_event::<EnemySpawnRequest>()
            .add_systems(Startup, load_enemy_definitions)
            .add_systems(
                Update,
                (
                    spawn_requested_enemies,
                    invalidate_player_target,
                    refresh_player_target,
                )
                    .chain()
                    .in_set(CombatSet::Target),
            )
            .add_systems(
                Update,
                (
                    ai::evaluate_aggro,
                    ai::update_specials,
                    ai::advance_attack_sequences,
                    ai::handle_enemy_contacts,
                )
                    .chain()
                    .in_set(CombatSet::Behavior),
            )
            .add_systems(
                Update,
                (movement::probe_ground, movement::apply_enemy_movement)
                    .chain()
                    .in_set(CombatSet::Movement),
            )
            .add_systems(
                Update,
                ai::on_enemy_death
                    .after(apply_damage)
                    .in_set(CombatSet::Damage),
            );
    }
}
