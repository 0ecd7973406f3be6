//! Game state definitions that control the overall flow of the simulation.
//!
//! States determine which systems run at any given time. Enemy behavior,
//! projectiles and hazards only tick in the `InGame` state.

use bevy::prelude::*;

/// Main game states.
///
/// - Start in `Loading` while enemy definitions and config are read
/// - `InGame` is the active simulation
/// - `Paused` freezes every actor but keeps the world around
#[derive(States, Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum GameState {
    /// Initial state - reading data files
    #[default]
    Loading,
    /// Active simulation
    InGame,
    /// Simulation frozen
    Paused,
}

/// Per-frame ordering for the combat simulation.
///
/// Every tick runs these sets in order, so an actor's state is only ever
/// mutated by its own systems and all reads of the player are snapshots.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum CombatSet {
    /// Resolve the player target and snapshot its position.
    Target,
    /// Aggro, abilities, attack sequences, contact triggers.
    Behavior,
    /// Velocity and facing.
    Movement,
    /// Damage, heal and death transitions.
    Damage,
    /// Timers, despawns, feedback.
    Feedback,
}
