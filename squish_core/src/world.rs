//! Physics world owning the rapier2d sets
//!
//! The soft body only keeps handles into this world; body memory, joints and
//! colliders belong here. Advancing time is the caller's job.

use rapier2d::prelude::*;
use std::fmt;
use tracing::debug;

use crate::config::{ArenaConfig, WorldConfig};
use crate::error::{SoftBodyError, SoftBodyResult};

/// Whether the world can be mutated structurally
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorldState {
    Ready,
    /// Inside a step; bodies and joints must not be created
    Stepping,
}

impl fmt::Display for WorldState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorldState::Ready => write!(f, "Ready"),
            WorldState::Stepping => write!(f, "Stepping"),
        }
    }
}

/// Parameters for a dynamic ball body
#[derive(Debug, Clone, Copy)]
pub struct BallDesc {
    pub position: Vector<Real>,
    pub radius: Real,
    pub mass: Real,
    pub linear_damping: Real,
    pub friction: Real,
    pub restitution: Real,
}

/// Physics world
pub struct PhysicsWorld {
    rigid_body_set: RigidBodySet,
    collider_set: ColliderSet,
    gravity: Vector<Real>,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    impulse_joint_set: ImpulseJointSet,
    multibody_joint_set: MultibodyJointSet,
    ccd_solver: CCDSolver,
    physics_hooks: (),
    event_handler: (),
    state: WorldState,
    steps: u64,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new(&WorldConfig::default())
    }
}

impl PhysicsWorld {
    /// Empty world; `config.arena` is not built here, see [`PhysicsWorld::build_arena`].
    pub fn new(config: &WorldConfig) -> Self {
        Self {
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            gravity: vector![config.gravity[0], config.gravity[1]],
            integration_parameters: IntegrationParameters {
                dt: config.time_step,
                ..Default::default()
            },
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            physics_hooks: (),
            event_handler: (),
            state: WorldState::Ready,
            steps: 0,
        }
    }

    pub fn state(&self) -> WorldState {
        self.state
    }

    pub fn time_step(&self) -> Real {
        self.integration_parameters.dt
    }

    pub fn gravity(&self) -> Vector<Real> {
        self.gravity
    }

    /// Number of completed steps
    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn body_count(&self) -> usize {
        self.rigid_body_set.len()
    }

    pub fn joint_count(&self) -> usize {
        self.impulse_joint_set.len()
    }

    pub fn body(&self, handle: RigidBodyHandle) -> Option<&RigidBody> {
        self.rigid_body_set.get(handle)
    }

    pub fn body_mut(&mut self, handle: RigidBodyHandle) -> Option<&mut RigidBody> {
        self.rigid_body_set.get_mut(handle)
    }

    pub fn contains(&self, handle: RigidBodyHandle) -> bool {
        self.rigid_body_set.contains(handle)
    }

    /// Fails unless bodies and joints may be created right now
    pub fn ensure_accepts_bodies(&self) -> SoftBodyResult<()> {
        if self.state == WorldState::Stepping {
            return Err(SoftBodyError::invalid_world("world is stepping"));
        }
        let dt = self.integration_parameters.dt;
        if !(dt.is_finite() && dt > 0.0) {
            return Err(SoftBodyError::invalid_world(format!(
                "integration timestep {dt} is not initialized"
            )));
        }
        if !(self.gravity.x.is_finite() && self.gravity.y.is_finite()) {
            return Err(SoftBodyError::invalid_world("gravity is not finite"));
        }
        Ok(())
    }

    /// Insert a dynamic ball with one collider
    pub fn insert_dynamic_ball(&mut self, desc: BallDesc) -> RigidBodyHandle {
        let body = RigidBodyBuilder::dynamic()
            .translation(desc.position)
            .linear_damping(desc.linear_damping)
            .build();
        let handle = self.rigid_body_set.insert(body);

        let collider = ColliderBuilder::ball(desc.radius)
            .mass(desc.mass)
            .friction(desc.friction)
            .restitution(desc.restitution)
            .build();
        self.collider_set
            .insert_with_parent(collider, handle, &mut self.rigid_body_set);
        handle
    }

    /// Static box, e.g. a floor or wall
    pub fn add_static_box(&mut self, center: Vector<Real>, half_extents: Vector<Real>) -> RigidBodyHandle {
        let body = RigidBodyBuilder::fixed().translation(center).build();
        let handle = self.rigid_body_set.insert(body);
        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y)
            .friction(0.8)
            .build();
        self.collider_set
            .insert_with_parent(collider, handle, &mut self.rigid_body_set);
        handle
    }

    /// Floor, ceiling and side walls enclosing `arena`, centred on the origin
    pub fn build_arena(&mut self, arena: &ArenaConfig) -> Vec<RigidBodyHandle> {
        let half_w = arena.width * 0.5;
        let half_h = arena.height * 0.5;
        let t = arena.wall_thickness * 0.5;

        let walls = [
            (vector![0.0, -half_h - t], vector![half_w + 2.0 * t, t]),
            (vector![0.0, half_h + t], vector![half_w + 2.0 * t, t]),
            (vector![-half_w - t, 0.0], vector![t, half_h]),
            (vector![half_w + t, 0.0], vector![t, half_h]),
        ];
        let handles: Vec<_> = walls
            .into_iter()
            .map(|(center, half)| self.add_static_box(center, half))
            .collect();
        debug!(
            "arena built: {:.1}m x {:.1}m ({} walls)",
            arena.width,
            arena.height,
            handles.len()
        );
        handles
    }

    pub fn insert_joint(
        &mut self,
        body1: RigidBodyHandle,
        body2: RigidBodyHandle,
        joint: impl Into<GenericJoint>,
    ) -> ImpulseJointHandle {
        self.impulse_joint_set.insert(body1, body2, joint, true)
    }

    /// Remove a body together with its colliders and attached joints
    pub fn remove_body(&mut self, handle: RigidBodyHandle) -> Option<RigidBody> {
        self.rigid_body_set.remove(
            handle,
            &mut self.island_manager,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            true,
        )
    }

    /// Advance the simulation by one timestep
    pub fn step(&mut self) {
        let PhysicsWorld {
            ref mut physics_pipeline,
            ref gravity,
            ref integration_parameters,
            ref mut island_manager,
            ref mut broad_phase,
            ref mut narrow_phase,
            ref mut rigid_body_set,
            ref mut collider_set,
            ref mut impulse_joint_set,
            ref mut multibody_joint_set,
            ref mut ccd_solver,
            ref physics_hooks,
            ref event_handler,
            ..
        } = *self;

        physics_pipeline.step(
            gravity,
            integration_parameters,
            island_manager,
            broad_phase,
            narrow_phase,
            rigid_body_set,
            collider_set,
            impulse_joint_set,
            multibody_joint_set,
            ccd_solver,
            None,
            physics_hooks,
            event_handler,
        );
        self.steps += 1;
    }

    /// Step, then run `hook` before the step is reported complete.
    ///
    /// While the hook runs the world is [`WorldState::Stepping`] and refuses
    /// structural changes.
    pub fn step_with_hook<F>(&mut self, hook: F)
    where
        F: FnOnce(&mut PhysicsWorld),
    {
        self.state = WorldState::Stepping;
        self.step();
        hook(self);
        self.state = WorldState::Ready;
    }
}
