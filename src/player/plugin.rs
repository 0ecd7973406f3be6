//! Player plugin - the target entity contract and oxygen drain.

use bevy::prelude::*;

use super::components::*;
use super::systems;
use crate::core::CombatSet;

/// Player plugin - handles oxygen drain. Spawning is left to the level.
pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PlayerConfig>()
            .add_systems(Update, systems::drain_oxygen.in_set(CombatSet::Behavior));
    }
}
