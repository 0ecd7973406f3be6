//! Combat plugin - health, damage and death.

use bevy::prelude::*;

use super::systems;

/// Combat plugin - handles the health lifecycle shared by enemies and the player.
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        systems::setup_combat_systems(app);
    }
}
