//! Global events used for cross-system communication.
//!
//! Actors never mutate each other directly. An enemy that bites the player
//! sends a `DamageEvent`; the health system receives it and applies the
//! actual reduction. This keeps each actor's state owned by its own systems.

use bevy::prelude::*;

/// Sent when an entity should take damage.
///
/// Safe to send several times for the same target within one tick: the
/// damage system applies them as saturating decrements.
#[derive(Event, Debug, Clone)]
pub struct DamageEvent {
    /// Entity receiving damage
    pub target: Entity,
    /// Entity that caused the damage
    pub source: Entity,
    /// Damage amount
    pub amount: f32,
    /// Whether to play hit feedback (flash, hurt cue). Oxygen drain does not.
    pub feedback: bool,
}

impl DamageEvent {
    pub fn hit(target: Entity, source: Entity, amount: f32) -> Self {
        Self {
            target,
            source,
            amount,
            feedback: true,
        }
    }
}

/// Sent when an entity should regain health.
#[derive(Event, Debug, Clone)]
pub struct HealEvent {
    pub target: Entity,
    pub amount: f32,
}

/// Sent exactly once when an entity's health reaches 0.
#[derive(Event, Debug, Clone)]
pub struct DeathEvent {
    /// Entity that died
    pub entity: Entity,
    /// Entity that killed them (if any)
    pub killed_by: Option<Entity>,
}

/// Fire-and-forget request for the external animator.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct AnimationTrigger {
    pub entity: Entity,
    pub name: &'static str,
}

/// Fire-and-forget one-shot sound.
///
/// The playback rate is picked uniformly from `pitch_range` when played.
#[derive(Event, Debug, Clone)]
pub struct AudioCue {
    pub clip: Handle<bevy_kira_audio::AudioSource>,
    pub volume: f32,
    pub pitch_range: (f32, f32),
}

/// Which scene a load request points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneTarget {
    /// Reload whatever scene is active.
    ReloadCurrent,
    /// Load the scene with this name.
    Named(String),
}

/// Ask the world to load a scene once `delay` seconds have passed.
#[derive(Event, Debug, Clone)]
pub struct SceneLoadRequest {
    pub target: SceneTarget,
    pub delay: f32,
}

/// Emitted for the external scene loader when a pending load comes due.
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct SceneChange {
    pub scene: String,
}

/// Sent back by the external scene loader after a scene finished loading.
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct SceneLoaded {
    pub scene: String,
}
