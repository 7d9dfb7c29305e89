//! Triangle-fan mesh derived from live body positions

use bytemuck::{Pod, Zeroable};
use nalgebra::{Point2, Vector2};
use std::f32::consts::TAU;

use super::texture::TextureRect;

/// One fan vertex, laid out for direct upload
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 2],
    pub tex_coord: [f32; 2],
}

impl MeshVertex {
    pub fn new(position: Point2<f32>, tex_coord: [f32; 2]) -> Self {
        Self {
            position: [position.x, position.y],
            tex_coord,
        }
    }

    pub fn point(&self) -> Point2<f32> {
        Point2::new(self.position[0], self.position[1])
    }
}

/// Angle between neighbouring ring bodies
pub fn angle_step(segments: usize) -> f32 {
    TAU / segments as f32
}

/// Unit direction of ring slot `k`
pub fn ring_direction(k: usize, segments: usize) -> Vector2<f32> {
    let angle = angle_step(segments) * k as f32;
    Vector2::new(angle.cos(), angle.sin())
}

/// Fan texture coordinates: centre, one per ring slot, then the first slot again.
pub fn fan_tex_coords(rect: &TextureRect, segments: usize) -> Vec<[f32; 2]> {
    let step = angle_step(segments);
    let mut coords = Vec::with_capacity(segments + 2);
    coords.push(rect.center());
    coords.extend((0..segments).map(|k| rect.sample_circle(step * k as f32)));
    coords.push(coords[1]);
    coords
}

/// Assemble a closed fan from the centre and the ring in angular order.
///
/// Each perimeter vertex is moved `padding` further out along the
/// centre-to-body direction. `tex_coords` must hold `ring.len() + 2` entries.
pub fn build_fan(
    center: Point2<f32>,
    ring: &[Point2<f32>],
    tex_coords: &[[f32; 2]],
    padding: f32,
) -> Vec<MeshVertex> {
    debug_assert_eq!(tex_coords.len(), ring.len() + 2);

    let mut fan = Vec::with_capacity(ring.len() + 2);
    fan.push(MeshVertex::new(center, tex_coords[0]));
    for (k, body) in ring.iter().enumerate() {
        fan.push(MeshVertex::new(pad_outward(center, *body, padding), tex_coords[k + 1]));
    }
    if let Some(first) = fan.get(1).copied() {
        fan.push(first);
    }
    fan
}

fn pad_outward(center: Point2<f32>, body: Point2<f32>, padding: f32) -> Point2<f32> {
    let offset = body - center;
    let distance = offset.norm();
    if padding == 0.0 || distance < 1e-6 {
        return body;
    }
    body + offset / distance * padding
}

/// Expand an `n + 2` vertex fan into triangle-list indices (3 per segment).
pub fn fan_to_triangle_list(fan_len: usize) -> Vec<u32> {
    if fan_len < 3 {
        return Vec::new();
    }
    (1..fan_len as u32 - 1)
        .flat_map(|i| [0, i, i + 1])
        .collect()
}
