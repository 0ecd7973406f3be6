//! Headless runs of the full plugin stack: one app update per 100 ms tick.

use std::time::Duration;

use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use bevy::time::TimeUpdateStrategy;
use bevy_rapier3d::prelude::*;
use bevy_rapier3d::rapier::geometry::CollisionEventFlags;

use tidewrath::combat::{Dead, Health};
use tidewrath::core::{CombatConfig, DamageEvent, GameState, SceneChange, SceneLoaded};
use tidewrath::enemies::{AiState, AttackSlot, Enemy, EnemyKind, EnemySpawnRequest, SpecialAbility};
use tidewrath::feedback::AnimatorParams;
use tidewrath::player::{spawn_player, Player, PlayerConfig};
use tidewrath::projectiles::{
    spawn_projectile, ContactKind, ContactOutcome, ImpactRule, Projectile, ProjectileDef,
    ProjectileLaunch,
};
use tidewrath::world::{CurrentScene, SpawnReceiver, TeleportRequest, Teleporter};
use tidewrath::TidewrathPlugin;

fn test_app() -> App {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, StatesPlugin))
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(100)))
        .insert_state(GameState::InGame)
        .insert_resource(CombatConfig::default())
        .add_event::<CollisionEvent>()
        .add_plugins(TidewrathPlugin);
    // First update runs startup with a zero delta.
    app.update();
    app
}

fn tick(app: &mut App, times: usize) {
    for _ in 0..times {
        app.update();
    }
}

fn spawn_enemy_at(app: &mut App, kind: EnemyKind, position: Vec3) -> Entity {
    app.world_mut()
        .send_event(EnemySpawnRequest { kind, position });
    app.update();
    let mut enemies = app
        .world_mut()
        .query_filtered::<(Entity, &EnemyKind), With<Enemy>>();
    enemies
        .iter(app.world())
        .find(|(_, k)| **k == kind)
        .map(|(entity, _)| entity)
        .expect("enemy spawned")
}

fn spawn_target(app: &mut App, position: Vec3) -> Entity {
    app.world_mut()
        .spawn((Player, Health::new(100.0), Transform::from_translation(position)))
        .id()
}

fn health(app: &App, entity: Entity) -> f32 {
    app.world().get::<Health>(entity).expect("has health").current
}

fn state(app: &App, entity: Entity) -> AiState {
    *app.world().get::<AiState>(entity).expect("has state")
}

fn make_special_ready(app: &mut App, enemy: Entity) {
    let mut special = app
        .world_mut()
        .get_mut::<SpecialAbility>(enemy)
        .expect("has special");
    special
        .cooldown
        .tick(Duration::from_secs(60), true, AiState::Chase);
}

fn last_trigger(app: &App, entity: Entity) -> Option<&'static str> {
    app.world()
        .get::<AnimatorParams>(entity)
        .and_then(|params| params.last_trigger)
}

fn touch(app: &mut App, a: Entity, b: Entity) {
    app.world_mut()
        .send_event(CollisionEvent::Started(a, b, CollisionEventFlags::empty()));
}

#[test]
fn lethal_damage_kills_once_and_disables_collider() {
    let mut app = test_app();
    let crab = spawn_enemy_at(&mut app, EnemyKind::Crab, Vec3::new(20.0, 0.0, 0.0));
    assert_eq!(app.world().get::<Health>(crab).map(|h| h.maximum), Some(20.0));

    app.world_mut().send_event(DamageEvent::hit(crab, crab, 25.0));
    app.update();

    assert_eq!(health(&app, crab), 0.0);
    assert!(app.world().get::<Dead>(crab).is_some());
    assert!(app.world().get::<ColliderDisabled>(crab).is_some());
    assert_eq!(state(&app, crab), AiState::Dead);

    app.world_mut().send_event(DamageEvent::hit(crab, crab, 5.0));
    app.update();
    assert_eq!(health(&app, crab), 0.0);
    assert_eq!(state(&app, crab), AiState::Dead);
}

#[test]
fn aggro_switches_to_chase_when_target_comes_close() {
    let mut app = test_app();
    let player = spawn_target(&mut app, Vec3::new(10.0, 0.0, 0.0));
    let squid = spawn_enemy_at(&mut app, EnemyKind::Squid, Vec3::ZERO);

    tick(&mut app, 2);
    assert_eq!(state(&app, squid), AiState::Patrol);

    if let Some(mut transform) = app.world_mut().get_mut::<Transform>(player) {
        transform.translation.x = 5.0;
    }
    app.update();
    assert_eq!(state(&app, squid), AiState::Chase);
}

#[test]
fn contact_bite_hits_once_per_trigger() {
    let mut app = test_app();
    let player = spawn_target(&mut app, Vec3::new(2.0, 0.0, 0.0));
    let squid = spawn_enemy_at(&mut app, EnemyKind::Squid, Vec3::ZERO);
    tick(&mut app, 2);
    assert_eq!(state(&app, squid), AiState::Chase);

    touch(&mut app, player, squid);
    app.update();
    assert_eq!(state(&app, squid), AiState::MeleeAttack);
    assert_eq!(health(&app, player), 100.0);

    // Windup is 0.25 s.
    tick(&mut app, 5);
    assert_eq!(health(&app, player), 99.0);
    assert_eq!(state(&app, squid), AiState::Retreat);

    // Two second retreat, then back to the chase without a second bite.
    tick(&mut app, 30);
    assert_eq!(health(&app, player), 99.0);
    assert_eq!(state(&app, squid), AiState::Chase);
}

#[test]
fn projectile_despawns_at_lifetime_expiry() {
    let mut app = test_app();
    let firer = app.world_mut().spawn_empty().id();

    let world = app.world_mut();
    let projectile = spawn_projectile(
        &mut world.commands(),
        ProjectileLaunch {
            origin: Vec3::ZERO,
            direction: Vec2::X,
            speed: 6.0,
            def: ProjectileDef {
                damage: 1.0,
                lifetime: 5.0,
                radius: 0.15,
                impact: ImpactRule::AnyContact,
            },
            firer,
            ignore: vec![firer],
        },
        Vec2::NEG_X,
    );
    world.flush();
    assert!(app.world().get::<Projectile>(projectile).is_some());

    tick(&mut app, 45);
    assert!(app.world().get::<Projectile>(projectile).is_some());

    tick(&mut app, 10);
    assert!(app.world().get::<Projectile>(projectile).is_none());
}

#[test]
fn player_death_reloads_current_scene() {
    let mut app = test_app();
    let world = app.world_mut();
    let config = PlayerConfig {
        drain_interval: None,
        ..default()
    };
    let player = spawn_player(&mut world.commands(), &config, Vec3::ZERO);
    world.flush();

    app.world_mut().send_event(DamageEvent::hit(player, player, 150.0));
    app.update();

    let changes = app.world().resource::<Events<SceneChange>>();
    let scenes: Vec<String> = changes
        .iter_current_update_events()
        .map(|change| change.scene.clone())
        .collect();
    assert_eq!(scenes, vec!["Reef".to_string()]);
}

#[test]
fn teleport_places_traveller_at_receiver() {
    let mut app = test_app();
    let player = spawn_target(&mut app, Vec3::new(0.0, 0.0, 2.0));
    let teleporter = app
        .world_mut()
        .spawn(Teleporter::new("Abyss", "Gate"))
        .id();

    app.world_mut().send_event(TeleportRequest {
        teleporter,
        traveller: player,
    });
    app.update();

    let changes = app.world().resource::<Events<SceneChange>>();
    assert!(changes
        .iter_current_update_events()
        .any(|change| change.scene == "Abyss"));

    // The loader builds the new scene, then reports back.
    app.world_mut().spawn((
        SpawnReceiver {
            name: "Gate".to_string(),
        },
        Transform::from_xyz(7.0, 3.0, 0.0),
    ));
    app.world_mut().send_event(SceneLoaded {
        scene: "Abyss".to_string(),
    });
    app.update();

    let translation = app
        .world()
        .get::<Transform>(player)
        .map(|t| t.translation);
    assert_eq!(translation, Some(Vec3::new(7.0, 3.0, 2.0)));
    assert_eq!(app.world().resource::<CurrentScene>().0, "Abyss");
}

#[test]
fn paused_simulation_ignores_damage() {
    let mut app = test_app();
    let player = spawn_target(&mut app, Vec3::ZERO);
    app.world_mut()
        .resource_mut::<NextState<GameState>>()
        .set(GameState::Paused);
    app.update();

    app.world_mut().send_event(DamageEvent::hit(player, player, 10.0));
    app.update();
    assert_eq!(health(&app, player), 100.0);
}

#[test]
fn king_volley_fires_five_shots_that_spare_the_king() {
    let mut app = test_app();
    spawn_target(&mut app, Vec3::new(3.0, 0.0, 0.0));
    let king = spawn_enemy_at(&mut app, EnemyKind::MermaidKing, Vec3::ZERO);
    tick(&mut app, 2);
    assert_eq!(state(&app, king), AiState::Chase);

    make_special_ready(&mut app, king);
    app.update();
    assert_eq!(state(&app, king), AiState::SpecialCast);
    assert_eq!(last_trigger(&app, king), Some("Special"));

    // Half a second of windup.
    tick(&mut app, 7);
    assert_eq!(state(&app, king), AiState::Chase);

    let mut projectiles = app.world_mut().query::<&mut Projectile>();
    let mut count = 0;
    for mut projectile in projectiles.iter_mut(app.world_mut()) {
        count += 1;
        assert_eq!(projectile.firer, king);
        assert_eq!(
            projectile.resolve_contact(king, ContactKind::Other),
            ContactOutcome::Ignore
        );
    }
    assert_eq!(count, 5);
}

#[test]
fn ranged_mermaid_shot_uses_attack_trigger() {
    let mut app = test_app();
    spawn_target(&mut app, Vec3::new(3.0, 0.0, 0.0));
    let mermaid = spawn_enemy_at(&mut app, EnemyKind::MermaidRanged, Vec3::ZERO);
    tick(&mut app, 2);

    assert_eq!(last_trigger(&app, mermaid), Some("Attack"));
    let mut projectiles = app.world_mut().query::<&Projectile>();
    assert_eq!(projectiles.iter(app.world()).count(), 1);
    assert_eq!(state(&app, mermaid), AiState::Chase);
}

#[test]
fn shark_contact_during_dash_rams_instead_of_biting() {
    let mut app = test_app();
    let player = spawn_target(&mut app, Vec3::new(4.0, 0.0, 0.0));
    let shark = spawn_enemy_at(&mut app, EnemyKind::SharkBoss, Vec3::ZERO);
    tick(&mut app, 2);
    assert_eq!(state(&app, shark), AiState::Chase);

    make_special_ready(&mut app, shark);
    app.update();
    assert_eq!(state(&app, shark), AiState::SpecialCast);

    // Still winding up.
    touch(&mut app, player, shark);
    app.update();
    assert_eq!(health(&app, player), 98.0);
    assert_eq!(state(&app, shark), AiState::SpecialCast);
    let slot = app.world().get::<AttackSlot>(shark).expect("has slot");
    assert!(!slot.is_active());
}

#[test]
fn repeated_contact_during_attack_strikes_once() {
    let mut app = test_app();
    let player = spawn_target(&mut app, Vec3::new(1.5, 0.0, 0.0));
    let king = spawn_enemy_at(&mut app, EnemyKind::MermaidKing, Vec3::ZERO);
    tick(&mut app, 2);

    touch(&mut app, player, king);
    app.update();
    assert_eq!(state(&app, king), AiState::MeleeAttack);

    touch(&mut app, king, player);
    app.update();
    touch(&mut app, player, king);
    tick(&mut app, 6);
    assert_eq!(health(&app, player), 99.0);

    // Post pause and retreat, then back to the chase.
    tick(&mut app, 25);
    assert_eq!(health(&app, player), 99.0);
    assert_eq!(state(&app, king), AiState::Chase);
}
