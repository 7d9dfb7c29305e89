//! Configuration for the physics world, the soft body and the viewer
//!
//! Files are YAML by default; a `.toml` extension switches to TOML. Every
//! field is optional and falls back to its default.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{SoftBodyError, SoftBodyResult};
use crate::soft_body::TextureRect;

/// Smallest ring that still encloses an area
pub const MIN_SEGMENTS: usize = 3;

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SquishConfig {
    pub world: WorldConfig,
    pub soft_body: SoftBodyConfig,
    pub bounce: BounceConfig,
    pub viewer: ViewerConfig,
}

/// Physics world settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Gravity in m/s²
    pub gravity: [f32; 2],
    /// Fixed integration timestep in seconds
    pub time_step: f32,
    /// Static floor and walls around the origin
    pub arena: Option<ArenaConfig>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            gravity: [0.0, -9.81],
            time_step: 1.0 / 60.0,
            arena: Some(ArenaConfig::default()),
        }
    }
}

impl WorldConfig {
    /// Zero gravity, no arena
    pub fn floating() -> Self {
        Self {
            gravity: [0.0, 0.0],
            arena: None,
            ..Self::default()
        }
    }
}

/// Box arena centred on the origin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    pub width: f32,
    pub height: f32,
    pub wall_thickness: f32,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            width: 16.0,
            height: 9.0,
            wall_thickness: 0.5,
        }
    }
}

/// Ring geometry, joint tuning and texture mapping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SoftBodyConfig {
    /// Number of ring bodies (the more, the smoother the circle)
    pub segments: usize,
    /// Rest distance from the centre to each ring body
    pub radius: f32,
    pub ring_body_radius: f32,
    pub center_body_radius: f32,
    pub ring_body_mass: f32,
    pub center_body_mass: f32,
    /// Spring stiffness of every joint (N/m)
    pub stiffness: f32,
    /// Spring damping of every joint
    pub damping: f32,
    /// Allowed stretch beyond rest length, as a fraction of it
    pub max_stretch: f32,
    pub linear_damping: f32,
    pub friction: f32,
    pub restitution: f32,
    /// Outward push of the fan outline; 0 keeps vertices on the ring bodies
    pub outline_padding: f32,
    pub texture_rect: TextureRect,
    /// Texture asset path, resolved by the renderer
    pub texture: Option<String>,
}

impl Default for SoftBodyConfig {
    fn default() -> Self {
        Self {
            segments: 20,
            radius: 1.0,
            ring_body_radius: 0.12,
            center_body_radius: 0.5,
            ring_body_mass: 0.25,
            center_body_mass: 1.0,
            stiffness: 20.0,
            damping: 0.6,
            max_stretch: 0.5,
            linear_damping: 0.4,
            friction: 0.6,
            restitution: 0.2,
            outline_padding: 0.0,
            texture_rect: TextureRect::default(),
            texture: None,
        }
    }
}

impl SoftBodyConfig {
    pub fn with_segments(mut self, segments: usize) -> Self {
        self.segments = segments;
        self
    }

    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_outline_padding(mut self, padding: f32) -> Self {
        self.outline_padding = padding;
        self
    }

    pub fn with_texture(mut self, path: impl Into<String>) -> Self {
        self.texture = Some(path.into());
        self
    }

    /// Reject values that make construction impossible
    pub fn check(&self) -> SoftBodyResult<()> {
        if self.segments < MIN_SEGMENTS {
            return Err(SoftBodyError::InvalidConfig(format!(
                "segments must be >= {MIN_SEGMENTS} (got {})",
                self.segments
            )));
        }
        let positive = [
            ("radius", self.radius),
            ("ring_body_radius", self.ring_body_radius),
            ("center_body_radius", self.center_body_radius),
            ("ring_body_mass", self.ring_body_mass),
            ("center_body_mass", self.center_body_mass),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(SoftBodyError::InvalidConfig(format!(
                    "{name} must be a positive number (got {value})"
                )));
            }
        }
        let non_negative = [
            ("stiffness", self.stiffness),
            ("damping", self.damping),
            ("max_stretch", self.max_stretch),
            ("linear_damping", self.linear_damping),
            ("friction", self.friction),
            ("restitution", self.restitution),
            ("outline_padding", self.outline_padding),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(SoftBodyError::InvalidConfig(format!(
                    "{name} must be a non-negative number (got {value})"
                )));
            }
        }
        Ok(())
    }
}

/// How `bounce` pushes the body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BounceMode {
    /// Every ring body outward along its radius
    #[default]
    Radial,
    /// Every body straight up with the same velocity change
    Upward,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BounceConfig {
    /// Impulse magnitude (N·s); per ring body for radial, per unit mass for upward
    pub impulse: f32,
    pub mode: BounceMode,
}

impl Default for BounceConfig {
    fn default() -> Self {
        Self {
            impulse: 0.5,
            mode: BounceMode::Radial,
        }
    }
}

/// Window and spawn settings for the viewer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub title: String,
    pub width: f32,
    pub height: f32,
    pub pixels_per_meter: f32,
    /// Seconds between automatic bounces; 0 disables them
    pub auto_bounce_secs: f32,
    pub spawn_count: usize,
    /// Horizontal spawn range in metres
    pub spawn_x: [f32; 2],
    pub spawn_y: f32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            title: "squish2d".to_string(),
            width: 1280.0,
            height: 720.0,
            pixels_per_meter: 70.0,
            auto_bounce_secs: 2.5,
            spawn_count: 1,
            spawn_x: [-5.0, 5.0],
            spawn_y: 1.5,
        }
    }
}

impl SquishConfig {
    pub fn load(path: impl AsRef<Path>) -> SoftBodyResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let is_toml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
        if is_toml {
            Ok(toml::from_str(&content)?)
        } else {
            Ok(serde_yaml::from_str(&content)?)
        }
    }

    /// Load `path` if given, otherwise defaults; the error string is for logging.
    pub fn load_or_default(path: Option<&Path>) -> (Self, Option<String>) {
        match path {
            None => (Self::default(), None),
            Some(path) => match Self::load(path) {
                Ok(cfg) => (cfg, None),
                Err(e) => (
                    Self::default(),
                    Some(format!("{}: {e}", path.display())),
                ),
            },
        }
    }

    /// Human-readable warnings for suspicious but loadable values
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        let sb = &self.soft_body;

        if let Err(e) = sb.check() {
            warnings.push(e.to_string());
        }
        if !(self.world.time_step.is_finite() && self.world.time_step > 0.0) {
            warnings.push(format!(
                "world.time_step must be > 0 (got {})",
                self.world.time_step
            ));
        } else if self.world.time_step > 0.05 {
            warnings.push(format!(
                "world.time_step {} is large; joints may explode",
                self.world.time_step
            ));
        }
        if sb.segments >= MIN_SEGMENTS && sb.radius > 0.0 {
            let chord = 2.0 * sb.radius * (std::f32::consts::PI / sb.segments as f32).sin();
            if 2.0 * sb.ring_body_radius >= chord {
                warnings.push(format!(
                    "soft_body.ring_body_radius {} overlaps neighbours (chord {chord:.3})",
                    sb.ring_body_radius
                ));
            }
            if sb.center_body_radius + sb.ring_body_radius >= sb.radius {
                warnings.push(
                    "soft_body.center_body_radius leaves no room for the ring to compress".into(),
                );
            }
        }
        if sb.max_stretch <= 0.0 {
            warnings.push("soft_body.max_stretch <= 0 locks the ring rigid".into());
        }
        if sb.stiffness == 0.0 {
            warnings.push("soft_body.stiffness is 0; the shape will not restore".into());
        }
        if self.bounce.impulse <= 0.0 {
            warnings.push(format!(
                "bounce.impulse must be > 0 (got {})",
                self.bounce.impulse
            ));
        }
        if let Some(arena) = &self.world.arena {
            if arena.width <= 0.0 || arena.height <= 0.0 {
                warnings.push("world.arena dimensions must be > 0".into());
            }
        }
        if self.viewer.pixels_per_meter <= 0.0 {
            warnings.push("viewer.pixels_per_meter must be > 0".into());
        }
        if self.viewer.auto_bounce_secs < 0.0 {
            warnings.push("viewer.auto_bounce_secs negative; treated as disabled".into());
        }
        if self.viewer.spawn_x[0] > self.viewer.spawn_x[1] {
            warnings.push(format!(
                "viewer.spawn_x min ({}) > max ({})",
                self.viewer.spawn_x[0], self.viewer.spawn_x[1]
            ));
        }
        warnings
    }
}
