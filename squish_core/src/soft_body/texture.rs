//! Texture quad mapped onto the deformable circle

use serde::{Deserialize, Serialize};

/// Four texture-space corners the flat texture is stretched across.
///
/// Corners follow the circle's geometric orientation (y up): bottom-left,
/// bottom-right, top-right, top-left. The default covers the whole image
/// with v pointing down, which is what most image loaders produce.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextureRect {
    pub bottom_left: [f32; 2],
    pub bottom_right: [f32; 2],
    pub top_right: [f32; 2],
    pub top_left: [f32; 2],
}

impl Default for TextureRect {
    fn default() -> Self {
        Self {
            bottom_left: [0.0, 1.0],
            bottom_right: [1.0, 1.0],
            top_right: [1.0, 0.0],
            top_left: [0.0, 0.0],
        }
    }
}

impl TextureRect {
    /// Axis-aligned sub-rectangle of an atlas, v pointing down.
    pub fn from_min_max(min: [f32; 2], max: [f32; 2]) -> Self {
        Self {
            bottom_left: [min[0], max[1]],
            bottom_right: [max[0], max[1]],
            top_right: [max[0], min[1]],
            top_left: [min[0], min[1]],
        }
    }

    pub fn corners(&self) -> [[f32; 2]; 4] {
        [
            self.bottom_left,
            self.bottom_right,
            self.top_right,
            self.top_left,
        ]
    }

    /// Bilinear lookup; `s` runs left to right, `t` bottom to top, both in [0, 1].
    pub fn sample(&self, s: f32, t: f32) -> [f32; 2] {
        let bottom = lerp2(self.bottom_left, self.bottom_right, s);
        let top = lerp2(self.top_left, self.top_right, s);
        lerp2(bottom, top, t)
    }

    /// Texture coordinate for a point on the unit circle at `angle`.
    pub fn sample_circle(&self, angle: f32) -> [f32; 2] {
        self.sample(0.5 + 0.5 * angle.cos(), 0.5 + 0.5 * angle.sin())
    }

    pub fn center(&self) -> [f32; 2] {
        self.sample(0.5, 0.5)
    }
}

fn lerp2(a: [f32; 2], b: [f32; 2], t: f32) -> [f32; 2] {
    [a[0] + (b[0] - a[0]) * t, a[1] + (b[1] - a[1]) * t]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_default_rect_corners() {
        let rect = TextureRect::default();
        assert_eq!(rect.sample(0.0, 0.0), [0.0, 1.0]);
        assert_eq!(rect.sample(1.0, 1.0), [1.0, 0.0]);
        assert_eq!(rect.center(), [0.5, 0.5]);
    }

    #[test]
    fn test_circle_sampling_default_rect() {
        let rect = TextureRect::default();

        let right = rect.sample_circle(0.0);
        assert_relative_eq!(right[0], 1.0, epsilon = 1e-6);
        assert_relative_eq!(right[1], 0.5, epsilon = 1e-6);

        // Geometric top maps to v = 0 (image top)
        let top = rect.sample_circle(FRAC_PI_2);
        assert_relative_eq!(top[0], 0.5, epsilon = 1e-6);
        assert_relative_eq!(top[1], 0.0, epsilon = 1e-6);

        let left = rect.sample_circle(PI);
        assert_relative_eq!(left[0], 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_atlas_sub_rect() {
        let rect = TextureRect::from_min_max([0.25, 0.5], [0.75, 1.0]);
        let center = rect.center();
        assert_relative_eq!(center[0], 0.5, epsilon = 1e-6);
        assert_relative_eq!(center[1], 0.75, epsilon = 1e-6);
        assert_eq!(rect.corners()[0], [0.25, 1.0]);
    }
}
