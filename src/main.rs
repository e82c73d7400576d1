//! Headless demo of the focus tracker.
//!
//! Builds a small scene with a book to focus on and a window to get
//! distracted by, sweeps the observer's gaze between them, and logs every
//! attention change.
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use bevy::transform::plugins::TransformPlugin;
use clap::Parser;
use focus_tracker::{
    init_logging, Attention, FocusSettings, FocusTarget, FocusTrackerPlugin, FogParticles,
    GazeCollider, GazeObserver, OverlayChannel, ReminderOverlay,
};
use log::info;

/// Gaze focus tracking with a fading distraction reminder
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
    /// JSON file overriding the default focus settings
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Number of frames to simulate
    #[arg(long, default_value_t = 600)]
    frames: u32,
    /// Simulated frame length in milliseconds
    #[arg(long, default_value_t = 50)]
    frame_ms: u64,
}

/// Yaw sweep applied to the observer each frame.
#[derive(Component, Debug)]
struct Sweep {
    /// Radians per second.
    angular_speed: f32,
}

fn spawn_scene(mut commands: Commands) {
    commands.spawn((
        Name::new("Observer"),
        GazeObserver,
        Sweep {
            angular_speed: 0.6,
        },
        Transform::from_xyz(0.0, 1.6, 0.0),
    ));
    commands.spawn((
        Name::new("Notes"),
        FocusTarget,
        GazeCollider::cuboid(Vec3::new(0.6, 0.4, 0.1)),
        Transform::from_xyz(0.0, 1.6, -3.0),
    ));
    commands.spawn((
        Name::new("Window"),
        GazeCollider::cuboid(Vec3::new(0.1, 1.0, 1.0)),
        Transform::from_xyz(4.0, 1.6, 0.0),
    ));
    commands.spawn((Name::new("PopupReminder"), ReminderOverlay::default()));
    commands.spawn((Name::new("Fog"), FogParticles::default()));
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems require parameters by value, not by reference."
)]
fn sweep_observer_system(time: Res<Time>, mut observers: Query<(&mut Transform, &Sweep)>) {
    for (mut transform, sweep) in &mut observers {
        transform.rotate_y(sweep.angular_speed * time.delta_secs());
    }
}

fn load_settings(path: Option<&PathBuf>) -> Result<FocusSettings> {
    let Some(config) = path else {
        return Ok(FocusSettings::default());
    };
    FocusSettings::load(config)
        .with_context(|| format!("loading focus settings from {}", config.display()))
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let settings = load_settings(args.config.as_ref())?;
    info!("focus settings: {settings:?}");

    let mut app = App::new();
    app.add_plugins((MinimalPlugins, TransformPlugin))
        .insert_resource(settings)
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(
            args.frame_ms,
        )))
        .add_plugins(FocusTrackerPlugin)
        .add_systems(Startup, spawn_scene)
        .add_systems(Update, sweep_observer_system);

    for _ in 0..args.frames {
        app.update();
    }

    let world = app.world_mut();
    let state = world.resource::<Attention>().state();
    let overlay = world
        .query::<&ReminderOverlay>()
        .iter(world)
        .next()
        .map_or(0.0, OverlayChannel::opacity);
    info!(
        "finished after {} frames: attention {state:?}, overlay opacity {overlay:.3}",
        args.frames
    );
    Ok(())
}
