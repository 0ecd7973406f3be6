//! Projectiles module - volley shots fired by special abilities.

mod components;
mod plugin;
mod systems;

pub use components::*;
pub use plugin::ProjectilePlugin;
pub use systems::{handle_projectile_contacts, spawn_projectile, tick_projectiles};
