//! Feedback module - audio cues, hit flash and animator parameters.
//!
//! Everything here is fire-and-forget: nothing in the simulation reads
//! back what feedback did.

mod audio;
mod components;
mod plugin;
mod visual;

pub use audio::pick_pitch;
pub use components::*;
pub use plugin::FeedbackPlugin;
pub use visual::{record_animation_triggers, tick_hit_flash};
