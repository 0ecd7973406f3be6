//! Core plugin that sets up game states, events, and system ordering.

use bevy::prelude::*;

use super::config::load_combat_config;
use super::events::*;
use super::states::*;

/// Core plugin - must be added first as other plugins depend on it.
///
/// This plugin sets up:
/// - Game states (Loading, InGame, Paused)
/// - Global events (DamageEvent, DeathEvent, AudioCue, scene requests, ...)
/// - The `CombatSet` ordering every simulation system runs in
pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        app
            // Initialize game states
            .init_state::<GameState>()

            // Register global events
            .add_event::<DamageEvent>()
            .add_event::<HealEvent>()
            .add_event::<DeathEvent>()
            .add_event::<AnimationTrigger>()
            .add_event::<AudioCue>()
            .add_event::<SceneLoadRequest>()
            .add_event::<SceneChange>()
            .add_event::<SceneLoaded>()

            // One chained tick, only while the simulation runs
            .configure_sets(
                Update,
                (
                    CombatSet::Target,
                    CombatSet::Behavior,
                    CombatSet::Movement,
                    CombatSet::Damage,
                    CombatSet::Feedback,
                )
                    .chain()
                    .run_if(in_state(GameState::InGame)),
            )

            .add_systems(PreStartup, load_combat_config)

            // Definitions are read during Startup, so Loading can end right away
            .add_systems(OnEnter(GameState::Loading), finish_loading)

            // Pause/unpause with Escape key
            .add_systems(
                Update,
                handle_pause_input
                    .run_if(in_state(GameState::InGame).or(in_state(GameState::Paused))),
            );
    }
}

/// Move from Loading into the simulation.
fn finish_loading(mut next_state: ResMut<NextState<GameState>>) {
    next_state.set(GameState::InGame);
}

/// Handle Escape key to pause/unpause the simulation.
fn handle_pause_input(
    keyboard: Option<Res<ButtonInput<KeyCode>>>,
    current_state: Res<State<GameState>>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    let Some(keyboard) = keyboard else {
        return;
    };

    if keyboard.just_pressed(KeyCode::Escape) {
        match current_state.get() {
            GameState::InGame => next_state.set(GameState::Paused),
            GameState::Paused => next_state.set(GameState::InGame),
            _ => {}
        }
    }
}
