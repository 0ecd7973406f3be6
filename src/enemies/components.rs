//! Enemy-related components.

use bevy::prelude::*;
use serde::Deserialize;

use super::sequence::AttackTiming;

/// Marker component for all enemies.
#[derive(Component)]
pub struct Enemy;

/// Enemy variant identifier (matches the RON file name).
#[derive(Component, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EnemyKind {
    Crab,
    Squid,
    MermaidRanged,
    MermaidKing,
    SharkBoss,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 5] = [
        EnemyKind::Crab,
        EnemyKind::Squid,
        EnemyKind::MermaidRanged,
        EnemyKind::MermaidKing,
        EnemyKind::SharkBoss,
    ];

    pub fn file_stem(self) -> &'static str {
        match self {
            EnemyKind::Crab => "crab",
            EnemyKind::Squid => "squid",
            EnemyKind::MermaidRanged => "mermaid_ranged",
            EnemyKind::MermaidKing => "mermaid_king",
            EnemyKind::SharkBoss => "shark_boss",
        }
    }

    pub fn from_file_stem(stem: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.file_stem() == stem)
    }

    /// Animation trigger sent when a volley cast starts.
    ///
    /// The ranged Mermaid's shot is its regular attack.
    pub fn volley_trigger(self) -> &'static str {
        match self {
            EnemyKind::MermaidRanged => "Attack",
            _ => "Special",
        }
    }
}

/// AI state machine for enemy behavior.
///
/// `MeleeAttack`, `Retreat` and `SpecialCast` are only left when the
/// attack sequence or cast that entered them finishes. `Dead` is terminal.
#[derive(Component, Deserialize, Default, PartialEq, Eq, Clone, Copy, Debug)]
pub enum AiState {
    /// Wandering around the spawn point, waiting for the player.
    #[default]
    Patrol,
    /// Moving toward the player.
    Chase,
    /// Committed to a melee attack sequence.
    MeleeAttack,
    /// Backing off after an attack.
    Retreat,
    /// Casting a special ability.
    SpecialCast,
    /// Playing the death effect before removal.
    Dead,
}

impl AiState {
    /// Whether distance re-evaluation may change this state.
    pub fn can_switch_for_aggro(self) -> bool {
        matches!(self, AiState::Patrol | AiState::Chase)
    }

    /// Whether the actor is busy with the player (faces them instead of its velocity).
    pub fn is_engaged(self) -> bool {
        matches!(
            self,
            AiState::Chase | AiState::MeleeAttack | AiState::Retreat | AiState::SpecialCast
        )
    }
}

/// When an enemy switches from Patrol to Chase.
#[derive(Deserialize, Clone, Copy, Debug, PartialEq)]
pub enum AggroRule {
    /// Never chases (ground walkers).
    Never,
    /// Chases while the player is within this distance.
    Within(f32),
    /// Always chases a resolved player (bosses).
    Always,
}

impl AggroRule {
    /// Whether the player counts as "in range" for cooldowns.
    pub fn in_range(self, distance: f32) -> bool {
        match self {
            AggroRule::Never => false,
            AggroRule::Within(range) => distance <= range,
            AggroRule::Always => true,
        }
    }
}

/// How an enemy decides which way it faces.
#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum FacingRule {
    /// Follow horizontal velocity.
    #[default]
    Velocity,
    /// Face the player while engaged, velocity otherwise.
    TargetWhenEngaged,
}

/// Facing sign along X: -1.0 is left, 1.0 is right.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Facing(pub f32);

impl Default for Facing {
    fn default() -> Self {
        Self(1.0)
    }
}

/// Patrol oscillation around the spawn point.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct PatrolRoute {
    pub origin: Vec2,
    /// Distance from origin to each bound; `None` patrols until a ledge or wall.
    pub half_width: Option<f32>,
    /// -1.0 or 1.0
    pub direction: f32,
}

impl PatrolRoute {
    pub fn flip(&mut self) {
        self.direction = -self.direction;
    }
}

/// Raycast-based ledge and wall detection for ground walkers.
///
/// The probe system refreshes the `*_ahead`/`ground_behind` flags every tick
/// from the physics world; movement reads them.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct LedgeProbe {
    pub ray_length: f32,
    pub wall_distance: f32,
    /// Horizontal distance from the center to the front edge.
    pub front_offset: f32,
    /// Vertical distance from the center to the feet.
    pub foot_offset: f32,
    pub ground_ahead: bool,
    pub ground_behind: bool,
    pub wall_ahead: bool,
}

impl LedgeProbe {
    pub fn new(ray_length: f32, wall_distance: f32, front_offset: f32, foot_offset: f32) -> Self {
        Self {
            ray_length,
            wall_distance,
            front_offset,
            foot_offset,
            ground_ahead: true,
            ground_behind: true,
            wall_ahead: false,
        }
    }
}

/// Movement speeds for one variant.
#[derive(Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct MovementDef {
    pub patrol_speed: f32,
    pub chase_speed: f32,
    #[serde(default)]
    pub retreat_speed: f32,
    #[serde(default)]
    pub patrol_half_width: Option<f32>,
}

/// Melee parameters resolved for the attack sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct MeleeParams {
    pub timing: AttackTiming,
    /// States in which contact with the player starts a sequence.
    pub trigger_states: Vec<AiState>,
}

/// Immutable per-variant parameters.
#[derive(Component, Debug, Clone)]
pub struct VariantConfig {
    pub kind: EnemyKind,
    pub movement: MovementDef,
    pub aggro: AggroRule,
    pub facing: FacingRule,
    /// Ground walkers keep the vertical velocity physics gives them.
    pub grounded: bool,
    pub melee: Option<MeleeParams>,
}

impl VariantConfig {
    /// State to fall back to once an attack sequence ends.
    pub fn resting_state(&self, target_lost: bool) -> AiState {
        if target_lost || self.aggro == AggroRule::Never {
            AiState::Patrol
        } else {
            AiState::Chase
        }
    }
}
