//! Player-related components.

use bevy::prelude::*;

/// Marker component for the player entity.
///
/// Enemies target whichever living entity carries it.
#[derive(Component)]
pub struct Player;

/// Loses health steadily while underwater.
#[derive(Component, Debug)]
pub struct OxygenDrain {
    pub timer: Timer,
    pub amount: f32,
}

impl OxygenDrain {
    pub fn new(interval: f32, amount: f32) -> Self {
        Self {
            timer: Timer::from_seconds(interval, TimerMode::Repeating),
            amount,
        }
    }
}

/// Player tuning.
#[derive(Resource, Debug, Clone)]
pub struct PlayerConfig {
    pub max_health: f32,
    /// Seconds between oxygen ticks; `None` disables the drain
    pub drain_interval: Option<f32>,
    pub drain_amount: f32,
    /// Delay before the current scene reloads after death
    pub reload_delay: f32,
    pub collider_half_height: f32,
    pub collider_radius: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            max_health: 100.0,
            drain_interval: Some(1.0),
            drain_amount: 1.0,
            reload_delay: 0.0,
            collider_half_height: 0.5,
            collider_radius: 0.3,
        }
    }
}
