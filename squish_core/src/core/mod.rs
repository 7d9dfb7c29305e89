//! # Node capabilities
//!
//! Host frameworks drive scene nodes through two traits instead of a base class:
//!
//! - **Node**: lifecycle against a physics world (`init` creates bodies,
//!   `shutdown` removes them)
//! - **Drawable**: per-frame mesh and texture for the renderer

pub mod node;

pub use node::{Drawable, Node, NodeState};
