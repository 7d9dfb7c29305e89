//! # Squish Core
//!
//! A deformable, textured circle simulated as a ring of small rigid bodies
//! joined by springs to each other and to a central body.
//!
//! - **World**: [`PhysicsWorld`] owns the rapier2d sets; nodes only hold handles
//! - **Soft body**: [`SoftBodyNode`] creates the ring, bounces it and derives
//!   a triangle fan from the live body positions every frame
//! - **Capabilities**: [`Node`] and [`Drawable`] let a host engine drive and
//!   draw nodes without knowing their concrete type
//!
//! ## Quick Start
//!
//! ```rust
//! use nalgebra::Point2;
//! use squish_core::{BounceConfig, Drawable, PhysicsWorld, SoftBodyConfig, SoftBodyNode, WorldConfig};
//!
//! let mut world = PhysicsWorld::new(&WorldConfig::floating());
//! let mut blob = SoftBodyNode::new(
//!     "blob",
//!     Point2::origin(),
//!     SoftBodyConfig::default(),
//!     BounceConfig::default(),
//! )?;
//! blob.create_physics_object(&mut world)?;
//! blob.bounce(&mut world)?;
//! world.step();
//!
//! let fan = blob.triangle_fan(&world)?;
//! assert_eq!(fan.len(), blob.segment_count() + 2);
//! # Ok::<(), squish_core::SoftBodyError>(())
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod soft_body;
pub mod world;

pub use config::{
    ArenaConfig, BounceConfig, BounceMode, SoftBodyConfig, SquishConfig, ViewerConfig, WorldConfig,
};
pub use core::{Drawable, Node, NodeState};
pub use error::{SoftBodyError, SoftBodyResult};
pub use soft_body::{MeshVertex, SoftBodyNode, TextureRect};
pub use world::{PhysicsWorld, WorldState};
