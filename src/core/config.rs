//! Combat configuration loaded from an external RON file.
//!
//! Allows tweaking global simulation parameters without recompilation.

use bevy::prelude::*;
use serde::Deserialize;
use std::fs;

const CONFIG_PATH: &str = "assets/data/combat.ron";

/// Global combat configuration loaded from assets/data/combat.ron.
#[derive(Resource, Clone, Debug, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    /// Directory holding per-variant enemy definitions
    pub enemy_data_dir: String,
    /// Direction substituted for degenerate retreat/aim vectors
    pub fallback_direction: (f32, f32),
    /// Minimum |velocity.x| that may change an actor's facing
    pub facing_epsilon: f32,
    /// How long the hit flash stays on after damage
    pub hit_flash_duration: f32,
    /// Scene reloaded when no explicit name is configured
    pub default_scene: String,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            enemy_data_dir: "assets/data/enemies".to_string(),
            fallback_direction: (-1.0, 0.0),
            facing_epsilon: 0.01,
            hit_flash_duration: 0.1,
            default_scene: "Reef".to_string(),
        }
    }
}

impl CombatConfig {
    /// Load combat config from RON file.
    pub fn load() -> Self {
        match fs::read_to_string(CONFIG_PATH) {
            Ok(contents) => Self::from_ron(&contents).unwrap_or_else(|e| {
                error!("Failed to parse {}: {}. Using defaults.", CONFIG_PATH, e);
                Self::default()
            }),
            Err(e) => {
                warn!("Could not read {}: {}. Using defaults.", CONFIG_PATH, e);
                Self::default()
            }
        }
    }

    /// Parse config from a RON string.
    pub fn from_ron(contents: &str) -> Result<Self, ron::error::SpannedError> {
        let config: Self = ron::from_str(contents)?;
        info!("Loaded combat config");
        Ok(config)
    }

    pub fn fallback(&self) -> Vec2 {
        Vec2::new(self.fallback_direction.0, self.fallback_direction.1)
    }
}

/// System to load combat config at startup.
///
/// A config inserted before startup (tests, embedding apps) is kept.
pub fn load_combat_config(mut commands: Commands, existing: Option<Res<CombatConfig>>) {
    if existing.is_none() {
        commands.insert_resource(CombatConfig::load());
    }
}
