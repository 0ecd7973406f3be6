//! World plugin - scene transitions, teleporters and hazards.

use bevy::prelude::*;

use super::hazards::{hazard_contacts, wander};
use super::transition::*;
use crate::core::CombatSet;
use crate::enemies::targeting::refresh_player_target;

/// World plugin - handles scene loads and the environment around the actors.
pub struct WorldPlugin;

impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PendingSceneLoad>()
            .init_resource::<SceneTransfer>()
            .add_event::<TeleportRequest>()
            .add_systems(Startup, init_current_scene)
            // Travellers land before anyone snapshots the player
            .add_systems(
                Update,
                complete_scene_loads
                    .before(refresh_player_target)
                    .in_set(CombatSet::Target),
            )
            .add_systems(
                Update,
                (
                    wander,
                    hazard_contacts,
                    track_teleporter_zones,
                    interact_with_teleporters,
                    handle_teleport_requests,
                )
                    .chain()
                    .in_set(CombatSet::Behavior),
            )
            // Death requests are sent during Damage, so queue them afterwards
            .add_systems(
                Update,
                (queue_scene_loads, tick_scene_loads)
                    .chain()
                    .in_set(CombatSet::Feedback),
            );
    }
}
