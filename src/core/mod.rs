//! Core module - states, events, config and fundamental helpers.
//!
//! This module provides the foundation that all other game systems build upon.

mod config;
mod error;
mod events;
pub mod plane;
mod plugin;
mod states;

pub use config::{load_combat_config, CombatConfig};
pub use error::{CombatError, DataLoadError};
pub use events::*;
pub use plugin::CorePlugin;
pub use states::*;
