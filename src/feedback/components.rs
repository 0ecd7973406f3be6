//! Feedback components consumed by the external renderer and animator.

use bevy::prelude::*;

use crate::core::AudioCue;

/// A configured one-shot sound.
#[derive(Debug, Clone)]
pub struct SoundCue {
    pub clip: Handle<bevy_kira_audio::AudioSource>,
    pub volume: f32,
    pub pitch_range: (f32, f32),
}

impl SoundCue {
    pub fn cue(&self) -> AudioCue {
        AudioCue {
            clip: self.clip.clone(),
            volume: self.volume,
            pitch_range: self.pitch_range,
        }
    }
}

/// Sounds an actor can emit. Unset slots are skipped silently.
#[derive(Component, Debug, Clone, Default)]
pub struct CueSet {
    pub attack: Option<SoundCue>,
    pub special: Option<SoundCue>,
    pub hurt: Option<SoundCue>,
    pub death: Option<SoundCue>,
}

/// Red tint applied for a short time after taking damage.
#[derive(Component)]
pub struct HitFlash(pub Timer);

impl HitFlash {
    pub fn new(seconds: f32) -> Self {
        Self(Timer::from_seconds(seconds, TimerMode::Once))
    }
}

/// Parameters mirrored for the external animator.
#[derive(Component, Debug, Default, Clone)]
pub struct AnimatorParams {
    /// Current speed, for walk/swim blending
    pub speed: f32,
    /// Last one-shot trigger sent
    pub last_trigger: Option<&'static str>,
}
