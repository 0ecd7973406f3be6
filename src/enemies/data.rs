//! Enemy data loading from RON files.
//!
//! Every variant has a built-in definition; `<enemy_data_dir>/<kind>.ron`
//! replaces it when present and valid.

use bevy::prelude::*;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

use super::abilities::{
    AbilityCooldown, CooldownPolicy, DashParams, SpecialAbility, SpecialKind, VolleyParams,
};
use super::components::{
    AggroRule, AiState, EnemyKind, FacingRule, LedgeProbe, MeleeParams, MovementDef, VariantConfig,
};
use super::sequence::AttackTiming;
use crate::combat::{DeathBehavior, DeathScene};
use crate::core::{CombatConfig, DataLoadError, SceneTarget};
use crate::feedback::{CueSet, SoundCue};
use crate::projectiles::{ImpactRule, ProjectileDef};

/// Collider configuration for an enemy type.
#[derive(Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct ColliderConfig {
    pub half_height: f32,
    pub radius: f32,
}

impl Default for ColliderConfig {
    fn default() -> Self {
        Self {
            half_height: 0.3,
            radius: 0.4,
        }
    }
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct MeleeDef {
    pub damage: f32,
    #[serde(default)]
    pub damage_radius: Option<f32>,
    pub windup: f32,
    #[serde(default)]
    pub post_pause: f32,
    #[serde(default)]
    pub retreat_duration: f32,
    pub trigger_states: Vec<AiState>,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
pub enum SpecialKindDef {
    Volley {
        #[serde(default)]
        windup: f32,
        speed: f32,
        spread: Vec<f32>,
        offset: (f32, f32),
        projectile: ProjectileDef,
    },
    Dash {
        windup: f32,
        speed: f32,
        duration: f32,
        damage: f32,
    },
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct SpecialDef {
    pub name: String,
    pub cooldown: f32,
    pub policy: CooldownPolicy,
    #[serde(default)]
    pub start_ready: bool,
    pub kind: SpecialKindDef,
}

#[derive(Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct LedgeProbeDef {
    pub ray_length: f32,
    #[serde(default = "default_wall_distance")]
    pub wall_distance: f32,
}

fn default_wall_distance() -> f32 {
    0.1
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct DeathSceneDef {
    /// Scene name; empty reloads the current scene.
    #[serde(default)]
    pub scene: String,
    pub delay: f32,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct SoundDef {
    pub path: String,
    #[serde(default = "default_volume")]
    pub volume: f32,
    #[serde(default = "default_pitch_range")]
    pub pitch_range: (f32, f32),
}

fn default_volume() -> f32 {
    1.0
}

fn default_pitch_range() -> (f32, f32) {
    (0.9, 1.1)
}

#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct SoundsDef {
    pub attack: Option<SoundDef>,
    pub special: Option<SoundDef>,
    pub hurt: Option<SoundDef>,
    pub death: Option<SoundDef>,
}

/// Enemy definition loaded from RON file.
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct EnemyDefinition {
    pub name: String,
    pub max_health: f32,
    pub movement: MovementDef,
    pub aggro: AggroRule,
    #[serde(default)]
    pub facing: FacingRule,
    #[serde(default)]
    pub grounded: bool,
    #[serde(default)]
    pub melee: Option<MeleeDef>,
    #[serde(default)]
    pub special: Option<SpecialDef>,
    #[serde(default)]
    pub ledge_probe: Option<LedgeProbeDef>,
    pub death_delay: f32,
    #[serde(default)]
    pub death_scene: Option<DeathSceneDef>,
    #[serde(default)]
    pub collider: ColliderConfig,
    #[serde(default)]
    pub sounds: SoundsDef,
}

impl EnemyDefinition {
    /// Built-in parameters for a variant.
    pub fn builtin(kind: EnemyKind) -> Self {
        let base = Self {
            name: String::new(),
            max_health: 20.0,
            movement: MovementDef {
                patrol_speed: 0.0,
                chase_speed: 0.0,
                retreat_speed: 0.0,
                patrol_half_width: None,
            },
            aggro: AggroRule::Within(8.0),
            facing: FacingRule::Velocity,
            grounded: false,
            melee: None,
            special: None,
            ledge_probe: None,
            death_delay: 2.0,
            death_scene: None,
            collider: ColliderConfig::default(),
            sounds: SoundsDef::default(),
        };

        match kind {
            EnemyKind::Crab => Self {
                name: "Crab".to_string(),
                movement: MovementDef {
                    patrol_speed: 2.0,
                    ..base.movement
                },
                aggro: AggroRule::Never,
                grounded: true,
                melee: Some(MeleeDef {
                    damage: 1.0,
                    damage_radius: None,
                    windup: 0.25,
                    post_pause: 0.2,
                    retreat_duration: 0.0,
                    trigger_states: vec![AiState::Patrol],
                }),
                ledge_probe: Some(LedgeProbeDef {
                    ray_length: 0.3,
                    wall_distance: default_wall_distance(),
                }),
                ..base
            },
            EnemyKind::Squid => Self {
                name: "Squid".to_string(),
                movement: MovementDef {
                    patrol_speed: 3.0,
                    chase_speed: 3.0,
                    retreat_speed: 4.5,
                    patrol_half_width: Some(3.0),
                },
                melee: Some(MeleeDef {
                    damage: 1.0,
                    damage_radius: Some(2.5),
                    windup: 0.25,
                    post_pause: 0.0,
                    retreat_duration: 2.0,
                    trigger_states: vec![AiState::Chase],
                }),
                ..base
            },
            EnemyKind::MermaidRanged => Self {
                name: "Mermaid".to_string(),
                movement: MovementDef {
                    patrol_speed: 3.0,
                    patrol_half_width: Some(3.0),
                    ..base.movement
                },
                facing: FacingRule::TargetWhenEngaged,
                special: Some(SpecialDef {
                    name: "Shot".to_string(),
                    cooldown: 1.5,
                    policy: CooldownPolicy::Always,
                    start_ready: true,
                    kind: SpecialKindDef::Volley {
                        windup: 0.0,
                        speed: 6.0,
                        spread: vec![0.0],
                        offset: (0.5, 0.0),
                        projectile: ProjectileDef {
                            damage: 1.0,
                            lifetime: 5.0,
                            radius: 0.15,
                            impact: ImpactRule::AnyContact,
                        },
                    },
                }),
                ..base
            },
            EnemyKind::MermaidKing => Self {
                name: "Mermaid King".to_string(),
                max_health: 40.0,
                movement: MovementDef {
                    patrol_speed: 2.5,
                    chase_speed: 3.5,
                    retreat_speed: 5.0,
                    patrol_half_width: Some(4.0),
                },
                facing: FacingRule::TargetWhenEngaged,
                melee: Some(MeleeDef {
                    damage: 1.0,
                    damage_radius: Some(2.0),
                    windup: 0.3,
                    post_pause: 0.3,
                    retreat_duration: 1.5,
                    trigger_states: vec![AiState::Patrol, AiState::Chase],
                }),
                special: Some(SpecialDef {
                    name: "Volley".to_string(),
                    cooldown: 10.0,
                    policy: CooldownPolicy::DecayToFloor { floor: 0.5 },
                    start_ready: false,
                    kind: SpecialKindDef::Volley {
                        windup: 0.5,
                        speed: 10.0,
                        spread: vec![0.0, 10.0, -10.0, 20.0, -20.0],
                        offset: (0.8, 0.2),
                        projectile: ProjectileDef {
                            damage: 2.0,
                            lifetime: 5.0,
                            radius: 0.15,
                            impact: ImpactRule::PlayerOrGround,
                        },
                    },
                }),
                death_delay: 3.0,
                collider: ColliderConfig {
                    half_height: 0.6,
                    radius: 0.5,
                },
                ..base
            },
            EnemyKind::SharkBoss => Self {
                name: "Shark".to_string(),
                max_health: 60.0,
                movement: MovementDef {
                    patrol_speed: 0.0,
                    chase_speed: 3.0,
                    retreat_speed: 4.5,
                    patrol_half_width: None,
                },
                aggro: AggroRule::Always,
                melee: Some(MeleeDef {
                    damage: 1.0,
                    damage_radius: Some(2.5),
                    windup: 0.25,
                    post_pause: 0.0,
                    retreat_duration: 2.0,
                    trigger_states: vec![AiState::Chase],
                }),
                special: Some(SpecialDef {
                    name: "Dash".to_string(),
                    cooldown: 20.0,
                    policy: CooldownPolicy::WhileMobile,
                    start_ready: false,
                    kind: SpecialKindDef::Dash {
                        windup: 0.7,
                        speed: 10.0,
                        duration: 1.0,
                        damage: 2.0,
                    },
                }),
                death_scene: Some(DeathSceneDef {
                    scene: "Surface".to_string(),
                    delay: 2.0,
                }),
                collider: ColliderConfig {
                    half_height: 0.4,
                    radius: 0.8,
                },
                ..base
            },
        }
    }

    /// Reject values the simulation cannot run with.
    ///
    /// Every number must be finite; durations feed `Duration::from_secs_f32`.
    pub fn validate(&self) -> Result<(), DataLoadError> {
        let invalid = |field: &'static str, reason: &str| DataLoadError::InvalidValue {
            variant: self.name.clone(),
            field,
            reason: reason.to_string(),
        };
        let non_negative = |field: &'static str, values: &[f32]| {
            if values.iter().all(|v| v.is_finite() && *v >= 0.0) {
                Ok(())
            } else {
                Err(invalid(field, "must be finite and not negative"))
            }
        };
        let positive = |field: &'static str, values: &[f32]| {
            if values.iter().all(|v| v.is_finite() && *v > 0.0) {
                Ok(())
            } else {
                Err(invalid(field, "must be finite and positive"))
            }
        };

        positive("max_health", &[self.max_health])?;
        non_negative(
            "movement",
            &[
                self.movement.patrol_speed,
                self.movement.chase_speed,
                self.movement.retreat_speed,
            ],
        )?;
        if let Some(width) = self.movement.patrol_half_width {
            positive("patrol_half_width", &[width])?;
        }
        non_negative("death_delay", &[self.death_delay])?;
        if let Some(scene) = &self.death_scene {
            non_negative("death_scene", &[scene.delay])?;
        }
        if let AggroRule::Within(range) = self.aggro {
            positive("aggro", &[range])?;
        }
        positive(
            "collider",
            &[self.collider.half_height, self.collider.radius],
        )?;
        if let Some(probe) = &self.ledge_probe {
            non_negative("ledge_probe", &[probe.ray_length, probe.wall_distance])?;
        }

        if let Some(melee) = &self.melee {
            non_negative(
                "melee",
                &[
                    melee.damage,
                    melee.windup,
                    melee.post_pause,
                    melee.retreat_duration,
                ],
            )?;
            if let Some(radius) = melee.damage_radius {
                non_negative("damage_radius", &[radius])?;
            }
            if melee.trigger_states.contains(&AiState::Dead) {
                return Err(invalid("trigger_states", "Dead cannot trigger an attack"));
            }
        }

        if let Some(special) = &self.special {
            positive("cooldown", &[special.cooldown])?;
            if let CooldownPolicy::DecayToFloor { floor } = special.policy {
                if !(0.0..=1.0).contains(&floor) {
                    return Err(invalid("policy", "floor must be within 0..=1"));
                }
            }
            match &special.kind {
                SpecialKindDef::Volley {
                    windup,
                    speed,
                    spread,
                    offset,
                    projectile,
                } => {
                    if spread.is_empty() {
                        return Err(invalid("spread", "needs at least one angle"));
                    }
                    if !spread.iter().all(|angle| angle.is_finite()) {
                        return Err(invalid("spread", "angles must be finite"));
                    }
                    if !offset.0.is_finite() || !offset.1.is_finite() {
                        return Err(invalid("offset", "must be finite"));
                    }
                    non_negative("kind", &[*windup, *speed, projectile.damage])?;
                    positive("projectile", &[projectile.lifetime, projectile.radius])?;
                }
                SpecialKindDef::Dash {
                    windup,
                    speed,
                    duration,
                    damage,
                } => {
                    non_negative("kind", &[*windup, *speed, *damage])?;
                    positive("duration", &[*duration])?;
                }
            }
        }

        Ok(())
    }

    /// Immutable per-actor parameters.
    pub fn to_config(&self, kind: EnemyKind) -> VariantConfig {
        VariantConfig {
            kind,
            movement: self.movement,
            aggro: self.aggro,
            facing: self.facing,
            grounded: self.grounded,
            melee: self.melee.as_ref().map(|melee| MeleeParams {
                timing: AttackTiming {
                    windup: Duration::from_secs_f32(melee.windup),
                    post_pause: Duration::from_secs_f32(melee.post_pause),
                    retreat_duration: Duration::from_secs_f32(melee.retreat_duration),
                    damage: melee.damage,
                    damage_radius: melee.damage_radius,
                },
                trigger_states: melee.trigger_states.clone(),
            }),
        }
    }

    pub fn to_special(&self) -> Option<SpecialAbility> {
        let special = self.special.as_ref()?;
        let cooldown = AbilityCooldown::new(
            special.name.clone(),
            special.cooldown,
            special.policy,
            special.start_ready,
        );
        let kind = match &special.kind {
            SpecialKindDef::Volley {
                windup,
                speed,
                spread,
                offset,
                projectile,
            } => SpecialKind::Volley(VolleyParams {
                windup: Duration::from_secs_f32(*windup),
                speed: *speed,
                spread: spread.clone(),
                offset: Vec2::new(offset.0, offset.1),
                projectile: *projectile,
            }),
            SpecialKindDef::Dash {
                windup,
                speed,
                duration,
                damage,
            } => SpecialKind::Dash(DashParams {
                windup: Duration::from_secs_f32(*windup),
                speed: *speed,
                duration: Duration::from_secs_f32(*duration),
                damage: *damage,
            }),
        };
        Some(SpecialAbility::new(cooldown, kind))
    }

    pub fn to_ledge_probe(&self) -> Option<LedgeProbe> {
        self.ledge_probe.map(|probe| {
            LedgeProbe::new(
                probe.ray_length,
                probe.wall_distance,
                self.collider.radius * 0.9,
                self.collider.half_height + self.collider.radius,
            )
        })
    }

    pub fn to_death_behavior(&self) -> DeathBehavior {
        DeathBehavior {
            despawn_delay: Some(self.death_delay),
            scene: self.death_scene.as_ref().map(|def| DeathScene {
                target: if def.scene.is_empty() {
                    SceneTarget::ReloadCurrent
                } else {
                    SceneTarget::Named(def.scene.clone())
                },
                delay: def.delay,
            }),
        }
    }

    /// Resolve sound paths. Without an asset server every slot stays empty.
    pub fn to_cue_set(&self, asset_server: Option<&AssetServer>) -> CueSet {
        let Some(assets) = asset_server else {
            return CueSet::default();
        };
        let load = |def: &Option<SoundDef>| {
            def.as_ref().map(|sound| SoundCue {
                clip: assets.load(sound.path.clone()),
                volume: sound.volume,
                pitch_range: sound.pitch_range,
            })
        };
        CueSet {
            attack: load(&self.sounds.attack),
            special: load(&self.sounds.special),
            hurt: load(&self.sounds.hurt),
            death: load(&self.sounds.death),
        }
    }
}

/// Parse and validate one definition.
pub fn parse_definition(path: &str, contents: &str) -> Result<EnemyDefinition, DataLoadError> {
    let definition: EnemyDefinition =
        ron::from_str(contents).map_err(|e| DataLoadError::ParseError {
            path: path.to_string(),
            details: e.to_string(),
        })?;
    definition.validate()?;
    Ok(definition)
}

fn load_definition_file(path: &Path) -> Result<(EnemyKind, EnemyDefinition), DataLoadError> {
    let display = path.display().to_string();
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    let kind = EnemyKind::from_file_stem(stem).ok_or_else(|| DataLoadError::UnknownVariant {
        name: stem.to_string(),
        path: display.clone(),
    })?;
    let contents = fs::read_to_string(path).map_err(|e| DataLoadError::ReadError {
        path: display.clone(),
        details: e.to_string(),
    })?;
    Ok((kind, parse_definition(&display, &contents)?))
}

/// Resource holding the definition for every variant.
#[derive(Resource, Debug)]
pub struct EnemyRegistry {
    pub definitions: HashMap<EnemyKind, EnemyDefinition>,
}

impl Default for EnemyRegistry {
    fn default() -> Self {
        Self {
            definitions: EnemyKind::ALL
                .into_iter()
                .map(|kind| (kind, EnemyDefinition::builtin(kind)))
                .collect(),
        }
    }
}

impl EnemyRegistry {
    /// Get an enemy definition by variant.
    pub fn get(&self, kind: EnemyKind) -> Option<&EnemyDefinition> {
        self.definitions.get(&kind)
    }
}

/// Load enemy definitions from the configured directory over the built-ins.
pub fn load_enemy_definitions(mut registry: ResMut<EnemyRegistry>, config: Res<CombatConfig>) {
    let enemies_dir = Path::new(&config.enemy_data_dir);

    let Ok(entries) = fs::read_dir(enemies_dir) else {
        warn!(
            "Enemy definitions directory {:?} not readable, using built-in definitions",
            enemies_dir
        );
        return;
    };

    let mut loaded = 0;
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.extension().is_some_and(|ext| ext == "ron") {
            continue;
        }

        match load_definition_file(&path) {
            Ok((kind, definition)) => {
                info!("Loaded enemy definition: {} ({:?})", definition.name, kind);
                registry.definitions.insert(kind, definition);
                loaded += 1;
            }
            Err(e) => {
                error!("{}. Keeping built-in definition.", e);
            }
        }
    }

    info!("Loaded {} enemy definitions from {:?}", loaded, enemies_dir);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_are_valid() {
        for kind in EnemyKind::ALL {
            let definition = EnemyDefinition::builtin(kind);
            assert!(definition.validate().is_ok(), "{:?} invalid", kind);
        }
    }

    #[test]
    fn optional_branches_follow_variant() {
        let crab = EnemyDefinition::builtin(EnemyKind::Crab);
        assert!(crab.to_ledge_probe().is_some());
        assert!(crab.to_special().is_none());
        assert_eq!(
            crab.to_config(EnemyKind::Crab).melee.map(|m| m.timing.damage_radius),
            Some(None)
        );

        let mermaid = EnemyDefinition::builtin(EnemyKind::MermaidRanged);
        assert!(mermaid.melee.is_none());
        assert!(mermaid.to_special().is_some_and(|s| s.cooldown.is_ready()));

        let shark = EnemyDefinition::builtin(EnemyKind::SharkBoss);
        assert_eq!(
            shark.to_death_behavior().scene.map(|s| s.target),
            Some(SceneTarget::Named("Surface".to_string()))
        );
        assert!(shark.to_special().is_some_and(|s| !s.cooldown.is_ready()));
    }

    #[test]
    fn parses_ron_definition() {
        let ron = r#"(
            name: "Reef Squid",
            max_health: 12.0,
            movement: (
                patrol_speed: 2.0,
                chase_speed: 3.0,
                retreat_speed: 4.0,
                patrol_half_width: Some(2.0),
            ),
            aggro: Within(6.0),
            melee: Some((
                damage: 1.0,
                damage_radius: Some(2.0),
                windup: 0.25,
                retreat_duration: 1.0,
                trigger_states: [Chase],
            )),
            death_delay: 2.0,
        )"#;
        let definition = parse_definition("squid.ron", ron).expect("valid definition");
        assert_eq!(definition.aggro, AggroRule::Within(6.0));
        assert_eq!(definition.facing, FacingRule::Velocity);
        assert_eq!(definition.melee.map(|m| m.post_pause), Some(0.0));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let mut definition = EnemyDefinition::builtin(EnemyKind::Squid);
        definition.max_health = 0.0;
        assert!(matches!(
            definition.validate(),
            Err(DataLoadError::InvalidValue { field: "max_health", .. })
        ));
    }

    #[test]
    fn non_finite_values_are_rejected() {
        let ron = r#"(
            name: "Broken Squid",
            max_health: 12.0,
            movement: (patrol_speed: 2.0, chase_speed: 3.0),
            aggro: Within(6.0),
            melee: Some((
                damage: 1.0,
                windup: NaN,
                trigger_states: [Chase],
            )),
            death_delay: 2.0,
        )"#;
        assert!(matches!(
            parse_definition("squid.ron", ron),
            Err(DataLoadError::InvalidValue { field: "melee", .. })
        ));

        let mut mermaid = EnemyDefinition::builtin(EnemyKind::MermaidKing);
        if let Some(special) = mermaid.special.as_mut() {
            special.cooldown = f32::INFINITY;
        }
        assert!(matches!(
            mermaid.validate(),
            Err(DataLoadError::InvalidValue { field: "cooldown", .. })
        ));

        let mut shark = EnemyDefinition::builtin(EnemyKind::SharkBoss);
        shark.death_delay = f32::NAN;
        assert!(matches!(
            shark.validate(),
            Err(DataLoadError::InvalidValue { field: "death_delay", .. })
        ));
    }

    #[test]
    fn garbage_is_a_parse_error() {
        assert!(matches!(
            parse_definition("bad.ron", "(name: )"),
            Err(DataLoadError::ParseError { .. })
        ));
    }

    #[test]
    fn shipped_definitions_parse() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("assets/data/enemies");
        for kind in EnemyKind::ALL {
            let path = dir.join(format!("{}.ron", kind.file_stem()));
            let (parsed_kind, definition) =
                load_definition_file(&path).expect("shipped definition");
            assert_eq!(parsed_kind, kind);
            assert_eq!(
                definition,
                EnemyDefinition::builtin(kind),
                "{:?} differs from built-in",
                kind
            );
        }
    }
}
