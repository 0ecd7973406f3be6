//! Projectile plugin.

use bevy::prelude::*;

use super::systems::{handle_projectile_contacts, tick_projectiles};
use crate::core::CombatSet;

pub struct ProjectilePlugin;

impl Plugin for ProjectilePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (handle_projectile_contacts, tick_projectiles)
                .chain()
                .in_set(CombatSet::Behavior),
        );
    }
}
