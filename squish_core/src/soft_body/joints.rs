//! Spring and rope joints that hold the ring together

use rapier2d::prelude::*;

/// Role of a joint inside the ring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    /// Ring body to its next angular neighbour
    Neighbour,
    /// Ring body to the central body
    Spoke,
}

/// Joint handles for one connection
#[derive(Debug, Clone, Copy)]
pub struct Link {
    pub kind: LinkKind,
    pub spring: ImpulseJointHandle,
    pub limit: ImpulseJointHandle,
}

/// Elastic link tuning shared by every joint of a ring
#[derive(Debug, Clone, Copy)]
pub struct LinkParams {
    pub stiffness: Real,
    pub damping: Real,
    /// Extra length allowed before the rope goes taut, as a fraction of rest
    pub max_stretch: Real,
}

/// Spring pulling the anchors back to `rest_length`
pub fn create_spring_joint(rest_length: Real, params: &LinkParams) -> GenericJoint {
    let mut joint: GenericJoint =
        SpringJointBuilder::new(rest_length, params.stiffness, params.damping)
            .build()
            .into();
    joint.set_contacts_enabled(false);
    joint
}

/// Hard cap on separation
pub fn create_limit_joint(rest_length: Real, params: &LinkParams) -> GenericJoint {
    let max_dist = rest_length * (1.0 + params.max_stretch.max(0.0));
    let mut joint: GenericJoint = RopeJointBuilder::new(max_dist).build().into();
    joint.set_contacts_enabled(false);
    joint
}

/// Distance between two neighbouring ring slots
pub fn chord_length(radius: Real, segments: usize) -> Real {
    2.0 * radius * (std::f32::consts::PI / segments as Real).sin()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn params() -> LinkParams {
        LinkParams {
            stiffness: 20.0,
            damping: 0.5,
            max_stretch: 0.5,
        }
    }

    #[test]
    fn test_chord_length() {
        // Hexagon: chord equals radius
        assert_relative_eq!(chord_length(1.0, 6), 1.0, epsilon = 1e-6);
        assert_relative_eq!(chord_length(2.0, 4), 2.0 * 2.0_f32.sqrt(), epsilon = 1e-5);
    }

    #[test]
    fn test_joints_disable_contacts() {
        assert!(!create_spring_joint(1.0, &params()).contacts_enabled);
        assert!(!create_limit_joint(1.0, &params()).contacts_enabled);
    }
}
