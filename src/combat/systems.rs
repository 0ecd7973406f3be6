//! Combat systems - damage, heal, death transition and removal.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::components::*;
use crate::core::{
    AnimationTrigger, AudioCue, CombatConfig, CombatSet, DamageEvent, DeathEvent, HealEvent,
    SceneLoadRequest,
};
use crate::feedback::{CueSet, HitFlash};

/// Configure combat systems.
pub fn setup_combat_systems(app: &mut App) {
    app
        // Damage systems
        .add_systems(
            Update,
            (apply_damage, apply_heal, handle_deaths)
                .chain()
                .in_set(CombatSet::Damage),
        )
        // Cleanup
        .add_systems(Update, despawn_dead.in_set(CombatSet::Feedback));
}

/// Apply damage to entities.
///
/// Multiple events for the same target in one tick are applied in order;
/// the first one that brings health to 0 is the only one that reports a death.
pub fn apply_damage(
    mut commands: Commands,
    config: Res<CombatConfig>,
    mut damage_events: EventReader<DamageEvent>,
    mut health_query: Query<(&mut Health, Option<&CueSet>)>,
    mut death_events: EventWriter<DeathEvent>,
    mut cues: EventWriter<AudioCue>,
) {
    for event in damage_events.read() {
        let Ok((mut health, cue_set)) = health_query.get_mut(event.target) else {
            debug!("Damage for {:?} skipped: target has no health", event.target);
            continue;
        };

        let outcome = health.take_damage(event.amount);
        if outcome == DamageOutcome::Ignored {
            continue;
        }

        if event.feedback {
            commands
                .entity(event.target)
                .insert(HitFlash::new(config.hit_flash_duration));
            if let Some(cue) = cue_set.and_then(|set| set.hurt.as_ref()) {
                cues.send(cue.cue());
            }
        }

        if let DamageOutcome::Killed { applied } = outcome {
            debug!("{:?} took {} lethal damage from {:?}", event.target, applied, event.source);
            commands.entity(event.target).insert(Dead);
            death_events.send(DeathEvent {
                entity: event.target,
                killed_by: Some(event.source),
            });
        }
    }
}

/// Apply heals. Healing the dead is refused and logged.
pub fn apply_heal(mut heal_events: EventReader<HealEvent>, mut health_query: Query<&mut Health>) {
    for event in heal_events.read() {
        let Ok(mut health) = health_query.get_mut(event.target) else {
            continue;
        };
        if let Err(e) = health.heal(event.amount) {
            warn!("Heal for {:?} rejected: {}", event.target, e);
        }
    }
}

/// Terminal transition, run once per death event.
pub fn handle_deaths(
    mut commands: Commands,
    mut death_events: EventReader<DeathEvent>,
    mut query: Query<(Option<&DeathBehavior>, Option<&mut Velocity>, Option<&CueSet>)>,
    mut triggers: EventWriter<AnimationTrigger>,
    mut cues: EventWriter<AudioCue>,
    mut scene_requests: EventWriter<SceneLoadRequest>,
) {
    for event in death_events.read() {
        let Ok((behavior, velocity, cue_set)) = query.get_mut(event.entity) else {
            continue;
        };

        commands.entity(event.entity).insert(ColliderDisabled);
        if let Some(mut velocity) = velocity {
            *velocity = Velocity::zero();
        }

        triggers.send(AnimationTrigger {
            entity: event.entity,
            name: "Die",
        });
        if let Some(cue) = cue_set.and_then(|set| set.death.as_ref()) {
            cues.send(cue.cue());
        }

        if let Some(behavior) = behavior {
            if let Some(delay) = behavior.despawn_delay {
                commands
                    .entity(event.entity)
                    .insert(DespawnTimer::from_seconds(delay));
            }
            if let Some(scene) = &behavior.scene {
                scene_requests.send(SceneLoadRequest {
                    target: scene.target.clone(),
                    delay: scene.delay,
                });
            }
        }

        info!("{:?} died (killed by {:?})", event.entity, event.killed_by);
    }
}

/// Despawn entities once their death effect had time to play.
pub fn despawn_dead(
    mut commands: Commands,
    time: Res<Time>,
    mut query: Query<(Entity, &mut DespawnTimer)>,
) {
    for (entity, mut timer) in query.iter_mut() {
        timer.0.tick(time.delta());

        if timer.0.finished() {
            commands.entity(entity).despawn_recursive();
        }
    }
}
