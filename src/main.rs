//! Tidewrath - Entry Point
//!
//! Sets up a small reef with one of each enemy variant around the player.
//!
//! Controls:
//! - Space: Use a teleporter
//! - Escape: Pause/Unpause

use bevy::prelude::*;
use bevy_kira_audio::AudioPlugin;
use bevy_rapier3d::prelude::*;

use tidewrath::enemies::{EnemyKind, EnemySpawnRequest};
use tidewrath::player::{spawn_player, PlayerConfig};
use tidewrath::world::{spawn_wanderers, ContactHazard, Mine};

fn main() {
    App::new()
        // Bevy default plugins; kira replaces bevy's own audio
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Tidewrath".to_string(),
                        resolution: (1280.0, 720.0).into(),
                        ..default()
                    }),
                    ..default()
                })
                .disable::<bevy::audio::AudioPlugin>(),
        )

        // Physics and audio
        .add_plugins(RapierPhysicsPlugin::<NoUserData>::default())
        .add_plugins(AudioPlugin)

        // Our game plugin
        .add_plugins(tidewrath::TidewrathPlugin)

        .add_systems(Startup, setup_reef)
        .run();
}

/// Floor, camera, the player and a handful of enemies and hazards.
fn setup_reef(
    mut commands: Commands,
    config: Res<PlayerConfig>,
    mut spawns: EventWriter<EnemySpawnRequest>,
) {
    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(0.0, 2.0, 18.0).looking_at(Vec3::new(0.0, 2.0, 0.0), Vec3::Y),
    ));
    commands.spawn((
        DirectionalLight::default(),
        Transform::from_xyz(4.0, 10.0, 6.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    commands.spawn((
        Name::new("Seabed"),
        Transform::from_xyz(0.0, -0.5, 0.0),
        RigidBody::Fixed,
        Collider::cuboid(30.0, 0.5, 2.0),
    ));

    spawn_player(&mut commands, &config, Vec3::new(0.0, 1.0, 0.0));

    for (kind, x, y) in [
        (EnemyKind::Crab, -8.0, 0.7),
        (EnemyKind::Squid, 6.0, 4.0),
        (EnemyKind::MermaidRanged, 12.0, 3.0),
        (EnemyKind::MermaidKing, -14.0, 3.0),
        (EnemyKind::SharkBoss, 20.0, 5.0),
    ] {
        spawns.send(EnemySpawnRequest {
            kind,
            position: Vec3::new(x, y, 0.0),
        });
    }

    commands.spawn((
        Name::new("Stinging Anemone"),
        ContactHazard::new(2.0).once(),
        Transform::from_xyz(-3.0, 0.3, 0.0),
        Collider::ball(0.4),
        Sensor,
        ActiveEvents::COLLISION_EVENTS,
    ));
    commands.spawn((
        Name::new("Mine"),
        Mine::new(1.0, None),
        Transform::from_xyz(3.0, 2.5, 0.0),
        Collider::ball(0.5),
        Sensor,
        ActiveEvents::COLLISION_EVENTS,
    ));
    spawn_wanderers(
        &mut commands,
        10,
        Vec3::new(0.0, 5.0, 0.0),
        Vec2::new(30.0, 10.0),
        &mut rand::thread_rng(),
    );
}
