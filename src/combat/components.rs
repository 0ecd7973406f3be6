//! Health lifecycle components.

use bevy::prelude::*;

use crate::core::{CombatError, SceneTarget};

/// Component for entities that can take damage.
///
/// Health only goes down through `take_damage` and up through `heal`.
/// Once dead it stays at 0 and every further call is a no-op.
#[derive(Component, Debug, Clone)]
pub struct Health {
    pub current: f32,
    pub maximum: f32,
    dead: bool,
}

/// Result of a single `take_damage` call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DamageOutcome {
    /// Target was already dead; nothing changed.
    Ignored,
    /// Health went down but stayed above 0.
    Hurt { applied: f32 },
    /// This call brought health to 0. Returned at most once per entity.
    Killed { applied: f32 },
}

impl Health {
    pub fn new(max: f32) -> Self {
        Self {
            current: max,
            maximum: max,
            dead: false,
        }
    }

    pub fn take_damage(&mut self, amount: f32) -> DamageOutcome {
        if self.dead {
            return DamageOutcome::Ignored;
        }

        let applied = amount.max(0.0).min(self.current);
        self.current -= applied;

        if self.current <= 0.0 && self.die() {
            DamageOutcome::Killed { applied }
        } else {
            DamageOutcome::Hurt { applied }
        }
    }

    /// Enter the terminal state. Returns true only on the first call.
    pub fn die(&mut self) -> bool {
        if self.dead {
            return false;
        }
        self.dead = true;
        self.current = 0.0;
        true
    }

    pub fn heal(&mut self, amount: f32) -> Result<f32, CombatError> {
        if self.dead {
            return Err(CombatError::HealWhileDead);
        }
        let actual = amount.max(0.0).min(self.maximum - self.current);
        self.current += actual;
        Ok(actual)
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    pub fn percentage(&self) -> f32 {
        if self.maximum <= 0.0 {
            return 0.0;
        }
        self.current / self.maximum
    }
}

/// Marker component for entities that have died (prevents multiple death events).
#[derive(Component)]
pub struct Dead;

/// What the terminal transition does besides disabling collision.
#[derive(Component, Debug, Clone)]
pub struct DeathBehavior {
    /// Seconds before the entity is removed; `None` keeps it around.
    pub despawn_delay: Option<f32>,
    /// Scene to load after death, if any.
    pub scene: Option<DeathScene>,
}

#[derive(Debug, Clone)]
pub struct DeathScene {
    pub target: SceneTarget,
    pub delay: f32,
}

impl DeathBehavior {
    pub fn despawn_after(seconds: f32) -> Self {
        Self {
            despawn_delay: Some(seconds),
            scene: None,
        }
    }
}

/// Timer for the death effect before despawn.
#[derive(Component)]
pub struct DespawnTimer(pub Timer);

impl DespawnTimer {
    pub fn from_seconds(seconds: f32) -> Self {
        Self(Timer::from_seconds(seconds, TimerMode::Once))
    }
}
