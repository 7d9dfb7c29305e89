//! Soft-body node: a ring of rigid balls held around a central ball by springs

use nalgebra::{Point2, Vector2};
use rapier2d::prelude::*;
use tracing::{debug, info};

use super::joints::{self, Link, LinkKind, LinkParams};
use super::mesh::{self, MeshVertex};
use crate::config::{BounceConfig, BounceMode, SoftBodyConfig};
use crate::core::{Drawable, Node, NodeState};
use crate::error::{SoftBodyError, SoftBodyResult};
use crate::world::{BallDesc, PhysicsWorld};

/// Handles into the world, present only while the node is active
#[derive(Debug, Clone)]
struct RingBodies {
    center: RigidBodyHandle,
    ring: Vec<RigidBodyHandle>,
    links: Vec<Link>,
}

/// Deformable textured circle
#[derive(Debug)]
pub struct SoftBodyNode {
    name: String,
    origin: Point2<f32>,
    config: SoftBodyConfig,
    bounce: BounceConfig,
    angle_step: f32,
    tex_coords: Vec<[f32; 2]>,
    bodies: Option<RingBodies>,
}

impl SoftBodyNode {
    /// Build an inactive node centred at `origin`; no bodies are created yet.
    pub fn new(
        name: impl Into<String>,
        origin: Point2<f32>,
        config: SoftBodyConfig,
        bounce: BounceConfig,
    ) -> SoftBodyResult<Self> {
        config.check()?;
        let tex_coords = mesh::fan_tex_coords(&config.texture_rect, config.segments);
        Ok(Self {
            name: name.into(),
            origin,
            angle_step: mesh::angle_step(config.segments),
            tex_coords,
            config,
            bounce,
            bodies: None,
        })
    }

    pub fn segment_count(&self) -> usize {
        self.config.segments
    }

    pub fn angle_step(&self) -> f32 {
        self.angle_step
    }

    pub fn rest_radius(&self) -> f32 {
        self.config.radius
    }

    pub fn origin(&self) -> Point2<f32> {
        self.origin
    }

    pub fn config(&self) -> &SoftBodyConfig {
        &self.config
    }

    /// Fan texture coordinates, fixed at construction
    pub fn tex_coords(&self) -> &[[f32; 2]] {
        &self.tex_coords
    }

    /// Live bodies owned by this node in its world (0 when inactive)
    pub fn body_count(&self) -> usize {
        self.bodies.as_ref().map_or(0, |b| b.ring.len() + 1)
    }

    pub fn link_count(&self) -> usize {
        self.bodies.as_ref().map_or(0, |b| b.links.len())
    }

    pub fn center_handle(&self) -> Option<RigidBodyHandle> {
        self.bodies.as_ref().map(|b| b.center)
    }

    pub fn ring_handles(&self) -> Option<&[RigidBodyHandle]> {
        self.bodies.as_ref().map(|b| b.ring.as_slice())
    }

    /// Create the central body, the ring and their joints in `world`
    pub fn create_physics_object(&mut self, world: &mut PhysicsWorld) -> SoftBodyResult<()> {
        if self.bodies.is_some() {
            return Err(SoftBodyError::AlreadyInitialized);
        }
        world.ensure_accepts_bodies()?;

        let cfg = &self.config;
        let segments = cfg.segments;

        let center = world.insert_dynamic_ball(BallDesc {
            position: self.origin.coords,
            radius: cfg.center_body_radius,
            mass: cfg.center_body_mass,
            linear_damping: cfg.linear_damping,
            friction: cfg.friction,
            restitution: cfg.restitution,
        });

        let ring: Vec<_> = (0..segments)
            .map(|k| {
                let offset = mesh::ring_direction(k, segments) * cfg.radius;
                world.insert_dynamic_ball(BallDesc {
                    position: self.origin.coords + offset,
                    radius: cfg.ring_body_radius,
                    mass: cfg.ring_body_mass,
                    linear_damping: cfg.linear_damping,
                    friction: cfg.friction,
                    restitution: cfg.restitution,
                })
            })
            .collect();

        let params = LinkParams {
            stiffness: cfg.stiffness,
            damping: cfg.damping,
            max_stretch: cfg.max_stretch,
        };
        let chord = joints::chord_length(cfg.radius, segments);

        let mut links = Vec::with_capacity(segments * 2);
        for (k, &body) in ring.iter().enumerate() {
            let next = ring[(k + 1) % segments];
            links.push(connect(world, body, next, chord, LinkKind::Neighbour, &params));
            links.push(connect(world, center, body, cfg.radius, LinkKind::Spoke, &params));
        }

        info!(
            "{}: created {} ring bodies around ({:.2}, {:.2}), {} links",
            self.name,
            ring.len(),
            self.origin.x,
            self.origin.y,
            links.len()
        );

        self.bodies = Some(RingBodies {
            center,
            ring,
            links,
        });
        Ok(())
    }

    /// Remove every body this node created; the node can be created again afterwards.
    pub fn destroy_physics_object(&mut self, world: &mut PhysicsWorld) -> SoftBodyResult<()> {
        world.ensure_accepts_bodies()?;
        let bodies = self.bodies.take().ok_or(SoftBodyError::NotInitialized)?;
        let removed = std::iter::once(bodies.center)
            .chain(bodies.ring)
            .filter_map(|handle| world.remove_body(handle))
            .count();
        debug!("{}: removed {} bodies", self.name, removed);
        Ok(())
    }

    /// Kick the shape so the joints visibly deform and restore it.
    ///
    /// Changes velocities only; time is advanced by whoever steps the world.
    /// Every body is resolved before any velocity changes, so an error leaves
    /// the world untouched.
    pub fn bounce(&self, world: &mut PhysicsWorld) -> SoftBodyResult<()> {
        let bodies = self.bodies.as_ref().ok_or(SoftBodyError::NotInitialized)?;
        let impulse = self.bounce.impulse;

        let kicks: Vec<(RigidBodyHandle, Vector2<f32>)> = match self.bounce.mode {
            BounceMode::Radial => {
                let center = body_position(world, bodies.center)?;
                let dv_scale = impulse / self.config.ring_body_mass;
                let segments = bodies.ring.len();
                bodies
                    .ring
                    .iter()
                    .enumerate()
                    .map(|(k, &handle)| {
                        let offset = body_position(world, handle)? - center;
                        let direction = offset
                            .try_normalize(1e-6)
                            .unwrap_or_else(|| mesh::ring_direction(k, segments));
                        Ok((handle, direction * dv_scale))
                    })
                    .collect::<SoftBodyResult<_>>()?
            }
            BounceMode::Upward => {
                let dv = Vector2::new(0.0, impulse);
                std::iter::once(&bodies.center)
                    .chain(&bodies.ring)
                    .map(|&handle| body_position(world, handle).map(|_| (handle, dv)))
                    .collect::<SoftBodyResult<_>>()?
            }
        };

        for (handle, dv) in kicks {
            add_velocity(world, handle, dv)?;
        }

        debug!("{}: bounce ({:?}, impulse {})", self.name, self.bounce.mode, impulse);
        Ok(())
    }

    pub fn center_position(&self, world: &PhysicsWorld) -> SoftBodyResult<Point2<f32>> {
        let bodies = self.bodies.as_ref().ok_or(SoftBodyError::NotInitialized)?;
        body_position(world, bodies.center)
    }

    /// Ring body positions in angular order
    pub fn ring_positions(&self, world: &PhysicsWorld) -> SoftBodyResult<Vec<Point2<f32>>> {
        let bodies = self.bodies.as_ref().ok_or(SoftBodyError::NotInitialized)?;
        bodies
            .ring
            .iter()
            .map(|&handle| body_position(world, handle))
            .collect()
    }

    /// Average centre-to-ring distance; equals the rest radius when undisturbed
    pub fn mean_ring_radius(&self, world: &PhysicsWorld) -> SoftBodyResult<f32> {
        let center = self.center_position(world)?;
        let ring = self.ring_positions(world)?;
        let total: f32 = ring.iter().map(|p| (p - center).norm()).sum();
        Ok(total / ring.len() as f32)
    }
}

impl Node for SoftBodyNode {
    fn name(&self) -> &str {
        &self.name
    }

    fn init(&mut self, world: &mut PhysicsWorld) -> SoftBodyResult<()> {
        self.create_physics_object(world)
    }

    fn shutdown(&mut self, world: &mut PhysicsWorld) -> SoftBodyResult<()> {
        self.destroy_physics_object(world)
    }

    fn state(&self) -> NodeState {
        if self.bodies.is_some() {
            NodeState::Active
        } else {
            NodeState::Uninitialized
        }
    }
}

impl Drawable for SoftBodyNode {
    fn triangle_fan(&self, world: &PhysicsWorld) -> SoftBodyResult<Vec<MeshVertex>> {
        let center = self.center_position(world)?;
        let ring = self.ring_positions(world)?;
        Ok(mesh::build_fan(
            center,
            &ring,
            &self.tex_coords,
            self.config.outline_padding,
        ))
    }

    fn texture_path(&self) -> Option<&str> {
        self.config.texture.as_deref()
    }
}

fn connect(
    world: &mut PhysicsWorld,
    body1: RigidBodyHandle,
    body2: RigidBodyHandle,
    rest_length: Real,
    kind: LinkKind,
    params: &LinkParams,
) -> Link {
    let spring = world.insert_joint(body1, body2, joints::create_spring_joint(rest_length, params));
    let limit = world.insert_joint(body1, body2, joints::create_limit_joint(rest_length, params));
    Link { kind, spring, limit }
}

fn body_position(world: &PhysicsWorld, handle: RigidBodyHandle) -> SoftBodyResult<Point2<f32>> {
    world
        .body(handle)
        .map(|body| Point2::from(*body.translation()))
        .ok_or(SoftBodyError::BodyMissing(handle))
}

fn add_velocity(
    world: &mut PhysicsWorld,
    handle: RigidBodyHandle,
    delta: Vector2<f32>,
) -> SoftBodyResult<()> {
    let body = world
        .body_mut(handle)
        .ok_or(SoftBodyError::BodyMissing(handle))?;
    let linvel = *body.linvel() + delta;
    body.set_linvel(linvel, true);
    Ok(())
}
