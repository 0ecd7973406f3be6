//! Scene transitions: delayed load requests, teleporters and the
//! cross-scene transfer context.
//!
//! Actual loading is done by an external loader that listens for
//! `SceneChange` and answers with `SceneLoaded`.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use crate::core::{CombatConfig, SceneChange, SceneLoadRequest, SceneLoaded, SceneTarget};
use crate::player::Player;

/// Name of the active scene.
#[derive(Resource, Debug, Clone, PartialEq, Eq)]
pub struct CurrentScene(pub String);

impl CurrentScene {
    pub fn resolve(&self, target: &SceneTarget) -> String {
        match target {
            SceneTarget::ReloadCurrent => self.0.clone(),
            SceneTarget::Named(name) => name.clone(),
        }
    }
}

/// The scene load waiting for its delay. A newer request replaces it.
#[derive(Resource, Default, Debug)]
pub struct PendingSceneLoad {
    pending: Option<(SceneTarget, Timer)>,
}

impl PendingSceneLoad {
    /// Returns true if an earlier request was replaced.
    pub fn schedule(&mut self, target: SceneTarget, delay: f32) -> bool {
        let timer = Timer::from_seconds(delay.max(0.0), TimerMode::Once);
        self.pending.replace((target, timer)).is_some()
    }

    /// Advance the delay; yields the target once it is due.
    pub fn tick(&mut self, delta: std::time::Duration) -> Option<SceneTarget> {
        let (_, timer) = self.pending.as_mut()?;
        timer.tick(delta);
        if !timer.finished() {
            return None;
        }
        self.pending.take().map(|(target, _)| target)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

/// An entity travelling to a named receiver in the next scene.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transfer {
    pub traveller: Entity,
    pub receiver: String,
}

/// Explicit handoff between scenes: staged before a load, taken after it.
#[derive(Resource, Default, Debug)]
pub struct SceneTransfer(Option<Transfer>);

impl SceneTransfer {
    /// Stage a transfer, returning the one it replaced.
    pub fn stage(&mut self, traveller: Entity, receiver: impl Into<String>) -> Option<Transfer> {
        self.0.replace(Transfer {
            traveller,
            receiver: receiver.into(),
        })
    }

    pub fn take(&mut self) -> Option<Transfer> {
        self.0.take()
    }

    pub fn is_staged(&self) -> bool {
        self.0.is_some()
    }
}

/// Arrival point for teleported entities.
#[derive(Component, Debug, Clone)]
pub struct SpawnReceiver {
    pub name: String,
}

/// Zone that sends its occupant to another scene on interaction.
#[derive(Component, Debug, Clone)]
pub struct Teleporter {
    pub scene: String,
    pub receiver: String,
    /// Player currently inside the zone.
    pub occupant: Option<Entity>,
}

impl Teleporter {
    pub fn new(scene: impl Into<String>, receiver: impl Into<String>) -> Self {
        Self {
            scene: scene.into(),
            receiver: receiver.into(),
            occupant: None,
        }
    }
}

/// Ask `teleporter` to carry `traveller` to its destination.
#[derive(Event, Debug, Clone)]
pub struct TeleportRequest {
    pub teleporter: Entity,
    pub traveller: Entity,
}

pub fn init_current_scene(
    mut commands: Commands,
    config: Res<CombatConfig>,
    existing: Option<Res<CurrentScene>>,
) {
    if existing.is_none() {
        commands.insert_resource(CurrentScene(config.default_scene.clone()));
    }
}

/// Collect load requests into the pending slot.
pub fn queue_scene_loads(
    mut requests: EventReader<SceneLoadRequest>,
    mut pending: ResMut<PendingSceneLoad>,
) {
    for request in requests.read() {
        if pending.schedule(request.target.clone(), request.delay) {
            debug!("Scene load replaced by {:?}", request.target);
        }
    }
}

/// Emit `SceneChange` once the pending load is due.
pub fn tick_scene_loads(
    time: Res<Time>,
    current: Res<CurrentScene>,
    mut pending: ResMut<PendingSceneLoad>,
    mut changes: EventWriter<SceneChange>,
) {
    if let Some(target) = pending.tick(time.delta()) {
        let scene = current.resolve(&target);
        info!("Loading scene '{}'", scene);
        changes.send(SceneChange { scene });
    }
}

/// Track which player stands in each teleporter zone.
pub fn track_teleporter_zones(
    mut collisions: EventReader<CollisionEvent>,
    players: Query<(), With<Player>>,
    mut teleporters: Query<&mut Teleporter>,
) {
    for event in collisions.read() {
        let (a, b, entered) = match event {
            CollisionEvent::Started(a, b, _) => (*a, *b, true),
            CollisionEvent::Stopped(a, b, _) => (*a, *b, false),
        };
        for (zone, other) in [(a, b), (b, a)] {
            if !players.contains(other) {
                continue;
            }
            let Ok(mut teleporter) = teleporters.get_mut(zone) else {
                continue;
            };
            if entered {
                teleporter.occupant = Some(other);
            } else if teleporter.occupant == Some(other) {
                teleporter.occupant = None;
            }
        }
    }
}

/// Space inside a teleporter zone starts the trip.
pub fn interact_with_teleporters(
    keys: Option<Res<ButtonInput<KeyCode>>>,
    teleporters: Query<(Entity, &Teleporter)>,
    mut requests: EventWriter<TeleportRequest>,
) {
    let Some(keys) = keys else {
        return;
    };
    if !keys.just_pressed(KeyCode::Space) {
        return;
    }
    for (entity, teleporter) in teleporters.iter() {
        if let Some(traveller) = teleporter.occupant {
            requests.send(TeleportRequest {
                teleporter: entity,
                traveller,
            });
        }
    }
}

/// Stage the traveller and request the destination scene.
pub fn handle_teleport_requests(
    mut requests: EventReader<TeleportRequest>,
    teleporters: Query<&Teleporter>,
    mut transfer: ResMut<SceneTransfer>,
    mut loads: EventWriter<SceneLoadRequest>,
) {
    for request in requests.read() {
        let Ok(teleporter) = teleporters.get(request.teleporter) else {
            warn!("Teleport request for missing teleporter {:?}", request.teleporter);
            continue;
        };
        if let Some(previous) = transfer.stage(request.traveller, teleporter.receiver.clone()) {
            debug!("Replaced staged transfer of {:?}", previous.traveller);
        }
        loads.send(SceneLoadRequest {
            target: SceneTarget::Named(teleporter.scene.clone()),
            delay: 0.0,
        });
    }
}

/// Record the new scene and place any staged traveller at its receiver.
pub fn complete_scene_loads(
    mut loaded: EventReader<SceneLoaded>,
    mut current: ResMut<CurrentScene>,
    mut transfer: ResMut<SceneTransfer>,
    receivers: Query<(&SpawnReceiver, &Transform)>,
    mut travellers: Query<&mut Transform, Without<SpawnReceiver>>,
) {
    for event in loaded.read() {
        current.0 = event.scene.clone();
        info!("Scene '{}' loaded", event.scene);

        let Some(staged) = transfer.take() else {
            continue;
        };
        let Some((_, receiver)) = receivers
            .iter()
            .find(|(receiver, _)| receiver.name == staged.receiver)
        else {
            warn!(
                "Receiver '{}' not found in scene '{}'",
                staged.receiver, event.scene
            );
            continue;
        };
        let Ok(mut transform) = travellers.get_mut(staged.traveller) else {
            warn!("Traveller {:?} did not survive the transition", staged.traveller);
            continue;
        };

        // Keep the traveller's depth.
        let z = transform.translation.z;
        transform.translation = receiver.translation.truncate().extend(z);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn pending_load_fires_once_after_delay() {
        let mut pending = PendingSceneLoad::default();
        pending.schedule(SceneTarget::Named("Surface".into()), 2.0);

        for _ in 0..19 {
            assert_eq!(pending.tick(Duration::from_millis(100)), None);
        }
        assert_eq!(
            pending.tick(Duration::from_millis(100)),
            Some(SceneTarget::Named("Surface".into()))
        );
        assert_eq!(pending.tick(Duration::from_millis(100)), None);
    }

    #[test]
    fn zero_delay_load_is_due_next_tick() {
        let mut pending = PendingSceneLoad::default();
        pending.schedule(SceneTarget::ReloadCurrent, 0.0);
        assert_eq!(pending.tick(Duration::ZERO), Some(SceneTarget::ReloadCurrent));
    }

    #[test]
    fn newer_request_replaces_pending() {
        let mut pending = PendingSceneLoad::default();
        assert!(!pending.schedule(SceneTarget::Named("A".into()), 5.0));
        assert!(pending.schedule(SceneTarget::ReloadCurrent, 0.0));
        assert_eq!(pending.tick(Duration::ZERO), Some(SceneTarget::ReloadCurrent));
        assert!(!pending.is_pending());
    }

    #[test]
    fn transfer_is_taken_once() {
        let mut transfer = SceneTransfer::default();
        transfer.stage(Entity::from_raw(1), "Gate");
        assert!(transfer.is_staged());
        assert_eq!(
            transfer.take(),
            Some(Transfer {
                traveller: Entity::from_raw(1),
                receiver: "Gate".to_string(),
            })
        );
        assert_eq!(transfer.take(), None);
    }

    #[test]
    fn reload_resolves_to_current_scene() {
        let current = CurrentScene("Reef".to_string());
        assert_eq!(current.resolve(&SceneTarget::ReloadCurrent), "Reef");
        assert_eq!(current.resolve(&SceneTarget::Named("Abyss".into())), "Abyss");
    }
}
