//! Enemy AI behavior systems.

use std::time::Duration;

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::abilities::{volley_launches, CastEvent, SpecialAbility, SpecialKind};
use super::components::{AiState, Enemy, Facing, VariantConfig};
use super::sequence::{AbortReason, AttackSlot, SequenceContext, SequenceEvent};
use super::targeting::{compute_aggro_state, TargetSnapshot};
use crate::combat::Health;
use crate::core::plane::{from_plane, to_plane};
use crate::core::{AnimationTrigger, AudioCue, CombatConfig, DamageEvent, DeathEvent};
use crate::feedback::CueSet;
use crate::projectiles::{spawn_projectile, ProjectileLaunch};

/// Switch between Patrol and Chase from the current distance to the player.
pub fn evaluate_aggro(
    snapshot: Res<TargetSnapshot>,
    mut enemies: Query<(Entity, &Transform, &Health, &VariantConfig, &mut AiState), With<Enemy>>,
) {
    for (entity, transform, health, variant, mut state) in enemies.iter_mut() {
        if health.is_dead() {
            continue;
        }

        let next = match snapshot.get() {
            Some((_, target)) => {
                let distance = to_plane(transform.translation).distance(target);
                compute_aggro_state(*state, distance, variant.aggro)
            }
            // Nobody to chase.
            None if *state == AiState::Chase => AiState::Patrol,
            None => *state,
        };

        if next != *state {
            debug!("{:?} {:?} -> {:?}", entity, *state, next);
            *state = next;
        }
    }
}

/// Tick special cooldowns, start casts and drive casts in flight.
#[allow(clippy::too_many_arguments)]
pub fn update_specials(
    mut commands: Commands,
    time: Res<Time>,
    config: Res<CombatConfig>,
    snapshot: Res<TargetSnapshot>,
    children: Query<&Children>,
    mut enemies: Query<
        (
            Entity,
            &Transform,
            &Health,
            &VariantConfig,
            &Facing,
            &mut AiState,
            &mut SpecialAbility,
            Option<&CueSet>,
        ),
        With<Enemy>,
    >,
    mut triggers: EventWriter<AnimationTrigger>,
    mut cues: EventWriter<AudioCue>,
) {
    let fallback = config.fallback();

    for (entity, transform, health, variant, facing, mut state, mut special, cue_set) in
        enemies.iter_mut()
    {
        let alive = !health.is_dead() && *state != AiState::Dead;
        let position = to_plane(transform.translation);

        let event = if special.is_casting() {
            let target = special
                .cast()
                .and_then(|cast| snapshot.position_of(cast.target));
            special.advance_cast(time.delta(), alive, target)
        } else {
            if !alive {
                continue;
            }
            let in_range = snapshot
                .get()
                .is_some_and(|(_, target)| variant.aggro.in_range(position.distance(target)));
            special.cooldown.tick(time.delta(), in_range, *state);

            if !special.try_begin(*state, snapshot.get(), position, fallback) {
                continue;
            }
            *state = AiState::SpecialCast;
            debug!("{:?} casts {}", entity, special.cooldown.name);
            if matches!(special.kind, SpecialKind::Volley(_)) {
                triggers.send(AnimationTrigger {
                    entity,
                    name: variant.kind.volley_trigger(),
                });
            }

            // A cast without windup resolves on the tick it starts.
            let target = snapshot.get().map(|(_, target)| target);
            special.advance_cast(Duration::ZERO, true, target)
        };

        let Some(event) = event else {
            continue;
        };
        let special_cue = cue_set.and_then(|set| set.special.as_ref());

        match event {
            CastEvent::Fire { target } => {
                if let SpecialKind::Volley(volley) = &special.kind {
                    let ignore: Vec<Entity> = std::iter::once(entity)
                        .chain(children.iter_descendants(entity))
                        .collect();
                    for (origin, direction) in
                        volley_launches(volley, position, facing.0, target, fallback)
                    {
                        spawn_projectile(
                            &mut commands,
                            ProjectileLaunch {
                                origin: from_plane(origin, transform.translation.z),
                                direction,
                                speed: volley.speed,
                                def: volley.projectile,
                                firer: entity,
                                ignore: ignore.clone(),
                            },
                            fallback,
                        );
                    }
                    if let Some(cue) = special_cue {
                        cues.send(cue.cue());
                    }
                }
                *state = AiState::Chase;
            }
            CastEvent::DashStarted { direction } => {
                debug!("{:?} dashes along {:?}", entity, direction);
                triggers.send(AnimationTrigger {
                    entity,
                    name: "Special",
                });
                if let Some(cue) = special_cue {
                    cues.send(cue.cue());
                }
            }
            CastEvent::Completed => {
                *state = AiState::Chase;
            }
            CastEvent::Aborted => {
                debug!("{:?} cast aborted", entity);
            }
        }
    }
}

/// Resume every running melee sequence.
pub fn advance_attack_sequences(
    time: Res<Time>,
    config: Res<CombatConfig>,
    snapshot: Res<TargetSnapshot>,
    mut enemies: Query<
        (
            Entity,
            &Transform,
            &Health,
            &VariantConfig,
            &mut AttackSlot,
            &mut AiState,
        ),
        With<Enemy>,
    >,
    mut damage_events: EventWriter<DamageEvent>,
) {
    for (entity, transform, health, variant, mut slot, mut state) in enemies.iter_mut() {
        let Some(target) = slot.target() else {
            continue;
        };
        let Some(melee) = &variant.melee else {
            slot.cancel();
            continue;
        };

        let ctx = SequenceContext {
            alive: !health.is_dead() && *state != AiState::Dead,
            position: to_plane(transform.translation),
            target: snapshot.position_of(target),
            fallback: config.fallback(),
        };

        for event in slot.advance(time.delta(), &melee.timing, &ctx) {
            match event {
                SequenceEvent::Strike { hit: true, distance } => {
                    debug!("{:?} hits {:?} at {:.2}", entity, target, distance);
                    damage_events.send(DamageEvent::hit(target, entity, melee.timing.damage));
                }
                SequenceEvent::Strike { hit: false, distance } => {
                    debug!("{:?} misses {:?} at {:.2}", entity, target, distance);
                }
                SequenceEvent::RetreatFrom { .. } => {
                    *state = AiState::Retreat;
                }
                SequenceEvent::Finished { target_lost } => {
                    *state = variant.resting_state(target_lost);
                }
                SequenceEvent::Aborted(AbortReason::TargetLost) => {
                    debug!("{:?} lost its target mid-attack", entity);
                    *state = AiState::Patrol;
                }
                SequenceEvent::Aborted(AbortReason::ActorDied) | SequenceEvent::Entered(_) => {}
            }
        }
    }
}

/// Start melee sequences (or land dash hits) on contact with the player.
pub fn handle_enemy_contacts(
    snapshot: Res<TargetSnapshot>,
    mut collisions: EventReader<CollisionEvent>,
    mut enemies: Query<
        (
            &Health,
            &VariantConfig,
            &mut AttackSlot,
            &mut AiState,
            Option<&SpecialAbility>,
            Option<&CueSet>,
        ),
        With<Enemy>,
    >,
    mut damage_events: EventWriter<DamageEvent>,
    mut triggers: EventWriter<AnimationTrigger>,
    mut cues: EventWriter<AudioCue>,
) {
    let Some(player) = snapshot.entity() else {
        collisions.clear();
        return;
    };

    for event in collisions.read() {
        let CollisionEvent::Started(a, b, _) = event else {
            continue;
        };
        let enemy = if *a == player {
            *b
        } else if *b == player {
            *a
        } else {
            continue;
        };

        let Ok((health, variant, mut slot, mut state, special, cue_set)) = enemies.get_mut(enemy)
        else {
            continue;
        };
        if health.is_dead() || *state == AiState::Dead {
            continue;
        }

        if let Some(special) = special {
            if let Some(damage) = special.dash_damage() {
                debug!("{:?} rams {:?}", enemy, player);
                damage_events.send(DamageEvent::hit(player, enemy, damage));
                continue;
            }
            if special.is_casting() {
                continue;
            }
        }

        let Some(melee) = &variant.melee else {
            continue;
        };
        if !melee.trigger_states.contains(&*state) {
            continue;
        }

        let generation = slot.begin(player);
        *state = AiState::MeleeAttack;
        debug!("{:?} starts attack #{} on {:?}", enemy, generation, player);
        triggers.send(AnimationTrigger {
            entity: enemy,
            name: "Attack",
        });
        if let Some(cue) = cue_set.and_then(|set| set.attack.as_ref()) {
            cues.send(cue.cue());
        }
    }
}

/// Enemy side of the death transition: stop all behavior.
pub fn on_enemy_death(
    mut deaths: EventReader<DeathEvent>,
    mut enemies: Query<(&mut AiState, &mut AttackSlot, Option<&mut SpecialAbility>), With<Enemy>>,
) {
    for event in deaths.read() {
        let Ok((mut state, mut slot, special)) = enemies.get_mut(event.entity) else {
            continue;
        };

        *state = AiState::Dead;
        slot.cancel();
        if let Some(mut special) = special {
            special.cancel();
        }
    }
}
