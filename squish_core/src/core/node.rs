use std::fmt;

use crate::error::SoftBodyResult;
use crate::soft_body::MeshVertex;
use crate::world::PhysicsWorld;

/// Node lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeState {
    /// Constructed, no bodies in any world
    Uninitialized,
    /// Bodies live in a world
    Active,
}

impl fmt::Display for NodeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeState::Uninitialized => write!(f, "Uninitialized"),
            NodeState::Active => write!(f, "Active"),
        }
    }
}

/// A scene node backed by bodies in a [`PhysicsWorld`]
pub trait Node {
    /// Get the node's name
    fn name(&self) -> &str;

    /// Create the node's bodies in `world`
    fn init(&mut self, world: &mut PhysicsWorld) -> SoftBodyResult<()>;

    /// Remove the node's bodies from `world`
    fn shutdown(&mut self, world: &mut PhysicsWorld) -> SoftBodyResult<()>;

    fn state(&self) -> NodeState;

    fn is_active(&self) -> bool {
        self.state() == NodeState::Active
    }
}

/// Something the renderer can draw as a textured triangle fan
pub trait Drawable {
    /// Fan for the current frame, centre first and closed on the first rim vertex
    fn triangle_fan(&self, world: &PhysicsWorld) -> SoftBodyResult<Vec<MeshVertex>>;

    /// Texture asset to draw with, if any
    fn texture_path(&self) -> Option<&str>;
}
