//! # squish2d - Soft-body viewer
//!
//! Drops textured jelly blobs into an arena and bounces them.
//!
//! Usage:
//!   squish2d                                 # Default blob + arena
//!   squish2d --config squish.yaml            # Custom config (YAML or TOML)
//!   squish2d --count 5                       # Five blobs
//!   squish2d --headless --frames 600         # Physics only, log and exit

mod render;
mod scene;

use anyhow::Result;
use bevy::app::ScheduleRunnerPlugin;
use bevy::prelude::*;
use clap::Parser;
use squish_core::SquishConfig;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// CLI arguments
#[derive(Parser, Debug)]
#[command(name = "squish2d")]
#[command(about = "Soft-body viewer built on rapier2d and bevy")]
pub struct Args {
    /// Configuration file (YAML, or TOML with a .toml extension)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of soft bodies (overrides viewer.spawn_count)
    #[arg(long)]
    count: Option<usize>,

    /// Run in headless mode (no window)
    #[arg(long)]
    headless: bool,

    /// Frames to simulate in headless mode
    #[arg(long, default_value = "600")]
    frames: u32,
}

/// App configuration
#[derive(Resource)]
pub struct AppConfig {
    pub config: SquishConfig,
    pub headless: bool,
    pub frames: u32,
}

impl AppConfig {
    fn new(args: Args) -> Self {
        let (mut config, load_error) = SquishConfig::load_or_default(args.config.as_deref());
        if let Some(e) = load_error {
            warn!("Failed to load config: {}", e);
            warn!("Falling back to default config");
        }
        for warning in config.validate() {
            warn!("config: {}", warning);
        }
        if let Some(count) = args.count {
            config.viewer.spawn_count = count;
        }

        info!(
            " Soft body: {} segments, radius {:.2}m, stiffness {:.1}",
            config.soft_body.segments, config.soft_body.radius, config.soft_body.stiffness
        );
        info!(
            " World: gravity ({:.2}, {:.2}), dt {:.4}s, arena {}",
            config.world.gravity[0],
            config.world.gravity[1],
            config.world.time_step,
            if config.world.arena.is_some() { "on" } else { "off" }
        );

        Self {
            config,
            headless: args.headless,
            frames: args.frames,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let app_config = AppConfig::new(args);

    let mut app = App::new();

    if app_config.headless {
        info!(" Starting squish2d - Headless Mode");
        info!("   Physics only, {} frames", app_config.frames);

        app.add_plugins(MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::ZERO)))
            .add_plugins(scene::ScenePlugin)
            .insert_resource(app_config)
            .add_systems(Update, scene::step_physics)
            .add_systems(Update, scene::headless_report.after(scene::step_physics));
    } else {
        info!(" Starting squish2d - Soft-body viewer");

        let viewer = app_config.config.viewer.clone();
        let dt = app_config.config.world.time_step.max(1e-4) as f64;
        app.add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: viewer.title.clone(),
                        resolution: (viewer.width, viewer.height).into(),
                        ..default()
                    }),
                    ..default()
                })
                .disable::<bevy::log::LogPlugin>(), // tracing_subscriber is already installed
        )
        .insert_resource(Time::<Fixed>::from_seconds(dt))
        .insert_resource(app_config)
        .add_plugins((scene::ScenePlugin, render::SoftBodyRenderPlugin))
        .add_systems(FixedUpdate, scene::step_physics);
    }

    app.run();

    Ok(())
}
