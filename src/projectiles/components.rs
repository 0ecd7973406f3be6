//! Projectile components and contact rules.

use std::time::Duration;

use bevy::prelude::*;
use serde::Deserialize;

/// Which contacts destroy a projectile.
#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImpactRule {
    /// Any non-ignored contact destroys it.
    AnyContact,
    /// Only the player or the environment; other actors are passed through.
    PlayerOrGround,
}

/// Projectile parameters carried by a volley definition.
#[derive(Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct ProjectileDef {
    pub damage: f32,
    pub lifetime: f32,
    #[serde(default = "default_radius")]
    pub radius: f32,
    pub impact: ImpactRule,
}

fn default_radius() -> f32 {
    0.15
}

/// What the projectile touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactKind {
    Player,
    /// Static level geometry.
    Environment,
    /// Any other body (enemies, props).
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ContactOutcome {
    Ignore,
    PassThrough,
    Hit { damage: f32 },
    Destroy,
}

/// A short-lived moving damage source.
#[derive(Component, Debug)]
pub struct Projectile {
    pub damage: f32,
    pub impact: ImpactRule,
    pub lifetime: Timer,
    /// Entity credited with the damage.
    pub firer: Entity,
    ignore: Vec<Entity>,
    spent: bool,
}

impl Projectile {
    pub fn new(
        damage: f32,
        lifetime: f32,
        impact: ImpactRule,
        firer: Entity,
        ignore: Vec<Entity>,
    ) -> Self {
        Self {
            damage,
            impact,
            lifetime: Timer::from_seconds(lifetime, TimerMode::Once),
            firer,
            ignore,
            spent: false,
        }
    }

    pub fn is_spent(&self) -> bool {
        self.spent
    }

    /// Decide what a contact does. A projectile damages at most once.
    pub fn resolve_contact(&mut self, other: Entity, kind: ContactKind) -> ContactOutcome {
        if self.spent || self.ignore.contains(&other) {
            return ContactOutcome::Ignore;
        }

        match (kind, self.impact) {
            (ContactKind::Player, _) => {
                self.spent = true;
                ContactOutcome::Hit { damage: self.damage }
            }
            (ContactKind::Environment, _) | (ContactKind::Other, ImpactRule::AnyContact) => {
                self.spent = true;
                ContactOutcome::Destroy
            }
            (ContactKind::Other, ImpactRule::PlayerOrGround) => ContactOutcome::PassThrough,
        }
    }

    /// Advance the lifetime. Returns true once it has run out.
    pub fn tick(&mut self, delta: Duration) -> bool {
        self.lifetime.tick(delta);
        self.lifetime.finished()
    }
}

/// Everything needed to spawn one projectile.
#[derive(Debug, Clone)]
pub struct ProjectileLaunch {
    pub origin: Vec3,
    pub direction: Vec2,
    pub speed: f32,
    pub def: ProjectileDef,
    pub firer: Entity,
    /// Firer and its children, captured at spawn.
    pub ignore: Vec<Entity>,
}
