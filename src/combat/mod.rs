//! Combat module - the health lifecycle: damage, heal, death and removal.

mod components;
mod plugin;
mod systems;

pub use components::*;
pub use plugin::CombatPlugin;
pub use systems::{apply_damage, apply_heal, despawn_dead, handle_deaths};
