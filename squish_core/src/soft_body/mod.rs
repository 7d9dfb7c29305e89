//! Soft body built from a ring of rigid bodies joined by springs

pub mod joints;
pub mod mesh;
pub mod node;
pub mod texture;

pub use joints::{Link, LinkKind, LinkParams};
pub use mesh::{fan_to_triangle_list, MeshVertex};
pub use node::SoftBodyNode;
pub use texture::TextureRect;
