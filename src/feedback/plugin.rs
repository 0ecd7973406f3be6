//! Feedback plugin - sound playback and visual feedback.

use bevy::prelude::*;

use super::audio;
use super::visual;
use crate::core::CombatSet;

/// Feedback plugin - plays audio cues and drives hit flashes.
///
/// Expects `bevy_kira_audio::AudioPlugin` to be added by the app.
pub struct FeedbackPlugin;

impl Plugin for FeedbackPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (
                visual::record_animation_triggers,
                visual::tick_hit_flash,
                audio::play_audio_cues,
            )
                .in_set(CombatSet::Feedback),
        );
    }
}
