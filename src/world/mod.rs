//! World module - scene transitions, teleporters and environmental hazards.

pub mod hazards;
mod plugin;
pub mod transition;

pub use hazards::{spawn_wanderers, ContactHazard, Mine, Wanderer};
pub use plugin::WorldPlugin;
pub use transition::{
    CurrentScene, PendingSceneLoad, SceneTransfer, SpawnReceiver, TeleportRequest, Teleporter,
    Transfer,
};
