//! One-shot sound playback through kira.

use bevy::prelude::*;
use bevy_kira_audio::{Audio, AudioControl};
use rand::Rng;

use crate::core::AudioCue;

/// Play every queued cue with a randomized playback rate.
pub fn play_audio_cues(mut cues: EventReader<AudioCue>, audio: Option<Res<Audio>>) {
    let Some(audio) = audio else {
        // Audio backend missing; cues are fire-and-forget, so just drain them.
        cues.clear();
        return;
    };

    let mut rng = rand::thread_rng();
    for cue in cues.read() {
        let rate = pick_pitch(&mut rng, cue.pitch_range);
        audio
            .play(cue.clip.clone())
            .with_volume(f64::from(cue.volume))
            .with_playback_rate(f64::from(rate));
    }
}

/// Uniform pick inside `range`, tolerating reversed or empty ranges.
pub fn pick_pitch(rng: &mut impl Rng, range: (f32, f32)) -> f32 {
    let (low, high) = if range.0 <= range.1 {
        range
    } else {
        (range.1, range.0)
    };
    if high - low <= f32::EPSILON {
        return low;
    }
    rng.gen_range(low..=high)
}
