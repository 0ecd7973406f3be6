//! Cooldown-gated special abilities: projectile volleys and dashes.

use std::time::Duration;

use bevy::prelude::*;
use serde::Deserialize;

use super::components::AiState;
use crate::core::plane::{direction_or, rotate_degrees};
use crate::projectiles::ProjectileDef;

/// When a cooldown makes progress.
#[derive(Deserialize, Clone, Copy, Debug, PartialEq)]
pub enum CooldownPolicy {
    /// Counts only while the target is in aggro range.
    WhileInRange,
    /// Counts in range; out of range progress is clamped down to
    /// `floor * period` but never reset.
    DecayToFloor { floor: f32 },
    /// Counts while chasing or retreating.
    WhileMobile,
    Always,
}

/// Progress toward a named ability being ready.
#[derive(Debug, Clone, PartialEq)]
pub struct AbilityCooldown {
    pub name: String,
    pub policy: CooldownPolicy,
    period: Duration,
    progress: Duration,
}

impl AbilityCooldown {
    pub fn new(
        name: impl Into<String>,
        period: f32,
        policy: CooldownPolicy,
        start_ready: bool,
    ) -> Self {
        let period = Duration::from_secs_f32(period);
        Self {
            name: name.into(),
            policy,
            period,
            progress: if start_ready { period } else { Duration::ZERO },
        }
    }

    pub fn tick(&mut self, delta: Duration, in_range: bool, state: AiState) {
        let counting = match self.policy {
            CooldownPolicy::WhileInRange | CooldownPolicy::DecayToFloor { .. } => in_range,
            CooldownPolicy::WhileMobile => matches!(state, AiState::Chase | AiState::Retreat),
            CooldownPolicy::Always => true,
        };

        if counting {
            self.progress = (self.progress + delta).min(self.period);
        } else if let CooldownPolicy::DecayToFloor { floor } = self.policy {
            self.progress = self.progress.min(self.period.mul_f32(floor.clamp(0.0, 1.0)));
        }
    }

    pub fn is_ready(&self) -> bool {
        self.progress >= self.period
    }

    pub fn reset(&mut self) {
        self.progress = Duration::ZERO;
    }

    pub fn progress(&self) -> Duration {
        self.progress
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VolleyParams {
    pub windup: Duration,
    pub speed: f32,
    /// One projectile per angle (degrees) around the aim direction.
    pub spread: Vec<f32>,
    /// Spawn offset for a right-facing actor; X is mirrored by facing.
    pub offset: Vec2,
    pub projectile: ProjectileDef,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DashParams {
    pub windup: Duration,
    pub speed: f32,
    pub duration: Duration,
    pub damage: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SpecialKind {
    Volley(VolleyParams),
    Dash(DashParams),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CastPhase {
    Windup,
    Travel,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CastProgress {
    pub phase: CastPhase,
    pub target: Entity,
    /// Direction toward the target when the cast began.
    pub direction: Vec2,
    elapsed: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CastEvent {
    /// Volley windup done; fire toward `target`.
    Fire { target: Vec2 },
    DashStarted { direction: Vec2 },
    Completed,
    Aborted,
}

/// A special ability with its cooldown and in-flight cast.
#[derive(Component, Debug, Clone)]
pub struct SpecialAbility {
    pub cooldown: AbilityCooldown,
    pub kind: SpecialKind,
    cast: Option<CastProgress>,
}

impl SpecialAbility {
    pub fn new(cooldown: AbilityCooldown, kind: SpecialKind) -> Self {
        Self {
            cooldown,
            kind,
            cast: None,
        }
    }

    pub fn cast(&self) -> Option<&CastProgress> {
        self.cast.as_ref()
    }

    pub fn is_casting(&self) -> bool {
        self.cast.is_some()
    }

    /// Damage applied on contact for the whole dash, windup included.
    pub fn dash_damage(&self) -> Option<f32> {
        match (&self.kind, self.cast) {
            (SpecialKind::Dash(dash), Some(_)) => Some(dash.damage),
            _ => None,
        }
    }

    /// Start a cast if the cooldown is ready, the actor is chasing and a
    /// target is resolved. Resets the cooldown.
    pub fn try_begin(
        &mut self,
        state: AiState,
        target: Option<(Entity, Vec2)>,
        position: Vec2,
        fallback: Vec2,
    ) -> bool {
        if self.cast.is_some() || state != AiState::Chase || !self.cooldown.is_ready() {
            return false;
        }
        let Some((entity, target_position)) = target else {
            return false;
        };

        self.cooldown.reset();
        self.cast = Some(CastProgress {
            phase: CastPhase::Windup,
            target: entity,
            direction: direction_or(target_position - position, fallback),
            elapsed: Duration::ZERO,
        });
        true
    }

    /// Resume the cast. `target` is the captured target's current position.
    pub fn advance_cast(
        &mut self,
        delta: Duration,
        alive: bool,
        target: Option<Vec2>,
    ) -> Option<CastEvent> {
        let cast = self.cast.as_mut()?;
        if !alive {
            self.cast = None;
            return Some(CastEvent::Aborted);
        }

        cast.elapsed += delta;
        match (&self.kind, cast.phase) {
            (SpecialKind::Volley(volley), _) => {
                if cast.elapsed < volley.windup {
                    return None;
                }
                self.cast = None;
                Some(match target {
                    Some(target) => CastEvent::Fire { target },
                    None => CastEvent::Completed,
                })
            }
            (SpecialKind::Dash(dash), CastPhase::Windup) => {
                if cast.elapsed < dash.windup {
                    return None;
                }
                cast.phase = CastPhase::Travel;
                cast.elapsed = Duration::ZERO;
                Some(CastEvent::DashStarted {
                    direction: cast.direction,
                })
            }
            (SpecialKind::Dash(dash), CastPhase::Travel) => {
                if cast.elapsed < dash.duration {
                    return None;
                }
                self.cast = None;
                Some(CastEvent::Completed)
            }
        }
    }

    /// Velocity imposed by the cast, `None` when not casting.
    pub fn cast_velocity(&self) -> Option<Vec2> {
        let cast = self.cast.as_ref()?;
        match (&self.kind, cast.phase) {
            (SpecialKind::Dash(dash), CastPhase::Travel) => Some(cast.direction * dash.speed),
            _ => Some(Vec2::ZERO),
        }
    }

    pub fn cancel(&mut self) -> bool {
        self.cast.take().is_some()
    }
}

/// Origin and direction of every projectile in a volley.
pub fn volley_launches(
    volley: &VolleyParams,
    position: Vec2,
    facing: f32,
    target: Vec2,
    fallback: Vec2,
) -> Vec<(Vec2, Vec2)> {
    let origin = position + Vec2::new(volley.offset.x * facing, volley.offset.y);
    let aim = direction_or(target - origin, fallback);
    volley
        .spread
        .iter()
        .map(|angle| (origin, rotate_degrees(aim, *angle)))
        .collect()
}
