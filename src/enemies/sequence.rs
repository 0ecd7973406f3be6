//! Melee attack sequence: windup, strike, pause, retreat.
//!
//! A sequence is a small phase machine owned by the actor's `AttackSlot`.
//! Starting a new one always cancels the previous one first, so an actor
//! never runs two sequences at once. Every resumption re-checks that the
//! actor is alive before doing anything else.

use std::time::Duration;

use bevy::prelude::*;

use crate::core::plane::direction_or;

/// Timing and damage of one melee attack.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttackTiming {
    pub windup: Duration,
    pub post_pause: Duration,
    pub retreat_duration: Duration,
    pub damage: f32,
    /// Strike only lands within this distance; `None` always lands.
    pub damage_radius: Option<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackPhase {
    Windup,
    DamageWindow,
    PostPause,
    Retreat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortReason {
    ActorDied,
    TargetLost,
}

/// What happened during one `advance` call, in order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SequenceEvent {
    Entered(AttackPhase),
    /// The damage window resolved against the captured target.
    Strike { hit: bool, distance: f32 },
    /// Retreat started; `away` is held until the sequence finishes.
    RetreatFrom { away: Vec2 },
    Finished { target_lost: bool },
    Aborted(AbortReason),
}

/// World state the sequence sees when it resumes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SequenceContext {
    pub alive: bool,
    pub position: Vec2,
    /// Position of the captured target, `None` if it is gone.
    pub target: Option<Vec2>,
    pub fallback: Vec2,
}

#[derive(Debug, Clone)]
struct AttackSequence {
    phase: AttackPhase,
    elapsed: Duration,
    target: Entity,
    away: Option<Vec2>,
}

/// Holds at most one running attack sequence.
#[derive(Component, Debug, Default)]
pub struct AttackSlot {
    current: Option<AttackSequence>,
    generation: u64,
}

impl AttackSlot {
    /// Start a sequence against `target`, cancelling any running one.
    ///
    /// Returns the generation of the new sequence.
    pub fn begin(&mut self, target: Entity) -> u64 {
        self.cancel();
        self.current = Some(AttackSequence {
            phase: AttackPhase::Windup,
            elapsed: Duration::ZERO,
            target,
            away: None,
        });
        self.generation
    }

    /// Stop the running sequence, if any. Returns whether one was running.
    pub fn cancel(&mut self) -> bool {
        self.generation += 1;
        self.current.take().is_some()
    }

    pub fn is_active(&self) -> bool {
        self.current.is_some()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn phase(&self) -> Option<AttackPhase> {
        self.current.as_ref().map(|seq| seq.phase)
    }

    pub fn target(&self) -> Option<Entity> {
        self.current.as_ref().map(|seq| seq.target)
    }

    /// Direction captured when the retreat phase began.
    pub fn retreat_direction(&self) -> Option<Vec2> {
        self.current
            .as_ref()
            .filter(|seq| seq.phase == AttackPhase::Retreat)
            .and_then(|seq| seq.away)
    }

    /// Resume the sequence after `delta` has passed.
    ///
    /// Phases that complete within the same call chain into each other, so a
    /// zero-length pause or retreat does not cost an extra tick.
    pub fn advance(
        &mut self,
        delta: Duration,
        timing: &AttackTiming,
        ctx: &SequenceContext,
    ) -> Vec<SequenceEvent> {
        let mut events = Vec::new();
        let Some(seq) = self.current.as_mut() else {
            return events;
        };

        if !ctx.alive {
            self.current = None;
            events.push(SequenceEvent::Aborted(AbortReason::ActorDied));
            return events;
        }

        seq.elapsed += delta;

        loop {
            match seq.phase {
                AttackPhase::Windup | AttackPhase::DamageWindow => {
                    if seq.phase == AttackPhase::Windup && seq.elapsed < timing.windup {
                        break;
                    }
                    let Some(target) = ctx.target else {
                        self.current = None;
                        events.push(SequenceEvent::Aborted(AbortReason::TargetLost));
                        return events;
                    };

                    seq.phase = AttackPhase::DamageWindow;
                    events.push(SequenceEvent::Entered(AttackPhase::DamageWindow));
                    let distance = ctx.position.distance(target);
                    let hit = timing.damage_radius.map_or(true, |radius| distance <= radius);
                    events.push(SequenceEvent::Strike { hit, distance });

                    seq.phase = AttackPhase::PostPause;
                    seq.elapsed = Duration::ZERO;
                    events.push(SequenceEvent::Entered(AttackPhase::PostPause));
                }
                AttackPhase::PostPause => {
                    if seq.elapsed < timing.post_pause {
                        break;
                    }
                    let Some(target) = ctx.target else {
                        self.current = None;
                        events.push(SequenceEvent::Aborted(AbortReason::TargetLost));
                        return events;
                    };

                    let away = direction_or(ctx.position - target, ctx.fallback);
                    seq.away = Some(away);
                    seq.phase = AttackPhase::Retreat;
                    seq.elapsed = Duration::ZERO;
                    events.push(SequenceEvent::RetreatFrom { away });
                }
                AttackPhase::Retreat => {
                    if seq.elapsed < timing.retreat_duration {
                        break;
                    }
                    self.current = None;
                    events.push(SequenceEvent::Finished {
                        target_lost: ctx.target.is_none(),
                    });
                    return events;
                }
            }
        }

        events
    }
}
