//! Tidewrath - enemy combat behavior for an underwater side-on action game.
//!
//! Enemies patrol, notice the player, chase, bite, retreat and cast special
//! abilities. The player and every enemy share one health lifecycle.
//!
//! # Architecture
//!
//! The simulation is organized into plugins, each handling a specific aspect:
//!
//! - **Core**: Game states, global events, config, the `CombatSet` tick order
//! - **Combat**: Health, damage, death transitions and delayed removal
//! - **Enemies**: Targeting, aggro, attack sequences, special abilities, movement
//! - **Projectiles**: Volley shots with lifetimes and impact rules
//! - **Player**: The target entity contract and oxygen drain
//! - **World**: Scene transitions, teleporters, environmental hazards
//! - **Feedback**: Audio cues, hit flash, animator parameters
//!
//! Rendering, animation playback and scene loading live outside this crate;
//! they consume the events and components exposed here.

pub mod combat;
pub mod core;
pub mod enemies;
pub mod feedback;
pub mod player;
pub mod projectiles;
pub mod world;

use bevy::prelude::*;

/// Main plugin that adds all sub-plugins.
///
/// Physics (`RapierPhysicsPlugin`) and audio (`bevy_kira_audio::AudioPlugin`)
/// are left to the app.
pub struct TidewrathPlugin;

impl Plugin for TidewrathPlugin {
    fn build(&self, app: &mut App) {
        app
            // Core systems (must be first)
            .add_plugins(core::CorePlugin)

            // Health lifecycle
            .add_plugins(combat::CombatPlugin)

            // Actors
            .add_plugins(player::PlayerPlugin)
            .add_plugins(enemies::EnemyPlugin)
            .add_plugins(projectiles::ProjectilePlugin)

            // Scenes and hazards
            .add_plugins(world::WorldPlugin)

            // Sound and visual feedback
            .add_plugins(feedback::FeedbackPlugin);
    }
}
