//! Player module - player entity and oxygen drain.

mod components;
mod plugin;
mod systems;

pub use components::*;
pub use plugin::PlayerPlugin;
pub use systems::{drain_oxygen, spawn_player};
