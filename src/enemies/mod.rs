//! Enemies module - enemy entities, AI, and spawning.

pub mod abilities;
mod ai;
mod components;
pub mod data;
pub mod movement;
mod plugin;
pub mod sequence;
mod spawning;
pub mod targeting;

pub use abilities::{AbilityCooldown, CooldownPolicy, SpecialAbility, SpecialKind};
pub use ai::{
    advance_attack_sequences, evaluate_aggro, handle_enemy_contacts, on_enemy_death,
    update_specials,
};
pub use components::*;
pub use data::{EnemyDefinition, EnemyRegistry};
pub use plugin::EnemyPlugin;
pub use sequence::{AttackPhase, AttackSlot};
pub use spawning::{spawn_enemy, EnemySpawnRequest};
pub use targeting::{PlayerTarget, TargetSnapshot};
