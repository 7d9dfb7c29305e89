//! Physics-side systems: world setup, soft-body spawning, stepping and bouncing

use bevy::prelude::*;
use nalgebra::Point2;
use rand::Rng;
use squish_core::{Node, PhysicsWorld, SoftBodyNode};
use tracing::{info, warn};

use crate::AppConfig;

/// Physics world shared by every soft body
#[derive(Resource, Deref, DerefMut)]
pub struct SimWorld(pub PhysicsWorld);

/// Soft-body entity in Bevy
#[derive(Component)]
pub struct SoftBody {
    pub node: SoftBodyNode,
}

/// Simulated time of the next automatic bounce
#[derive(Resource, Default)]
struct BounceClock {
    next_at: f32,
}

pub struct ScenePlugin;

impl Plugin for ScenePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<BounceClock>()
            .add_systems(Startup, (setup_world, spawn_soft_bodies).chain())
            .add_systems(Update, auto_bounce);
    }
}

fn setup_world(mut commands: Commands, app_config: Res<AppConfig>, mut clock: ResMut<BounceClock>) {
    let config = &app_config.config;
    let mut world = PhysicsWorld::new(&config.world);
    if let Some(arena) = &config.world.arena {
        world.build_arena(arena);
        info!(" Arena: {:.1}m x {:.1}m", arena.width, arena.height);
    }
    clock.next_at = config.viewer.auto_bounce_secs;
    commands.insert_resource(SimWorld(world));
}

fn spawn_soft_bodies(mut commands: Commands, app_config: Res<AppConfig>, mut world: ResMut<SimWorld>) {
    let config = &app_config.config;
    let viewer = &config.viewer;
    let mut rng = rand::thread_rng();

    for i in 0..viewer.spawn_count {
        let [min_x, max_x] = viewer.spawn_x;
        let x = if min_x < max_x {
            rng.gen_range(min_x..max_x)
        } else {
            min_x
        };
        let origin = Point2::new(x, viewer.spawn_y);

        let mut node = match SoftBodyNode::new(
            format!("blob_{i}"),
            origin,
            config.soft_body.clone(),
            config.bounce.clone(),
        ) {
            Ok(node) => node,
            Err(e) => {
                warn!("Cannot build soft body: {}", e);
                return;
            }
        };
        if let Err(e) = node.init(&mut world) {
            warn!("{}: not spawned: {}", node.name(), e);
            continue;
        }
        commands.spawn((SoftBody { node }, Transform::default(), Visibility::default()));
    }

    info!(" Spawned soft bodies ({} bodies in world)", world.body_count());
}

/// Advance the physics world by one timestep
pub fn step_physics(mut world: ResMut<SimWorld>) {
    world.step();
}

fn auto_bounce(
    app_config: Res<AppConfig>,
    mut clock: ResMut<BounceClock>,
    mut world: ResMut<SimWorld>,
    bodies: Query<&SoftBody>,
) {
    let interval = app_config.config.viewer.auto_bounce_secs;
    if interval <= 0.0 {
        return;
    }
    let sim_time = world.steps() as f32 * world.time_step();
    if sim_time < clock.next_at {
        return;
    }
    clock.next_at = sim_time + interval;

    for body in bodies.iter() {
        if let Err(e) = body.node.bounce(&mut world) {
            warn!("{}: bounce failed: {}", body.node.name(), e);
        }
    }
}

/// Headless progress log; exits after the requested number of frames
pub fn headless_report(
    app_config: Res<AppConfig>,
    world: Res<SimWorld>,
    bodies: Query<&SoftBody>,
    mut frame: Local<u32>,
    mut exit: EventWriter<AppExit>,
) {
    *frame += 1;
    let done = *frame >= app_config.frames;
    if *frame % 60 != 0 && !done {
        return;
    }

    for body in bodies.iter() {
        let node = &body.node;
        match (node.center_position(&world), node.mean_ring_radius(&world)) {
            (Ok(center), Ok(radius)) => info!(
                "[frame {:>5}] {}: centre ({:+.2}, {:+.2}) mean radius {:.3} (rest {:.3})",
                *frame,
                node.name(),
                center.x,
                center.y,
                radius,
                node.rest_radius()
            ),
            (Err(e), _) | (_, Err(e)) => warn!("{}: {}", node.name(), e),
        }
    }

    if done {
        info!(" Headless run finished after {} frames", *frame);
        exit.send(AppExit::Success);
    }
}
