// Soft body construction, teardown and mesh layout against a real world
use nalgebra::Point2;
use squish_core::{
    BounceConfig, Drawable, Node, NodeState, PhysicsWorld, SoftBodyConfig, SoftBodyError,
    SoftBodyNode, WorldConfig,
};

fn blob(segments: usize) -> SoftBodyNode {
    SoftBodyNode::new(
        format!("blob_{segments}"),
        Point2::new(0.5, -0.25),
        SoftBodyConfig::default().with_segments(segments),
        BounceConfig::default(),
    )
    .expect("valid config")
}

#[test]
fn test_creates_ring_plus_center() {
    for segments in [3, 4, 7, 20, 32] {
        let mut world = PhysicsWorld::new(&WorldConfig::floating());
        let mut node = blob(segments);

        node.create_physics_object(&mut world).unwrap();

        assert_eq!(world.body_count(), segments + 1, "segments = {segments}");
        assert_eq!(node.body_count(), segments + 1);
        assert_eq!(node.state(), NodeState::Active);
    }
}

#[test]
fn test_fan_layout_for_default_ring() {
    let mut world = PhysicsWorld::new(&WorldConfig::floating());
    let mut node = blob(20);
    node.create_physics_object(&mut world).unwrap();
    assert_eq!(world.body_count(), 21);

    let fan = node.triangle_fan(&world).unwrap();
    assert_eq!(fan.len(), 22);

    let center = node.center_position(&world).unwrap();
    assert_eq!(fan[0].position, [center.x, center.y]);
    assert_eq!(fan[0].position, [0.5, -0.25]);
    assert_eq!(fan[1], fan[21]);
    assert_eq!(fan[1].tex_coord, fan[21].tex_coord);
}

#[test]
fn test_default_fan_tracks_bodies() {
    let mut world = PhysicsWorld::new(&WorldConfig::floating());
    let mut node = blob(10);
    node.create_physics_object(&mut world).unwrap();

    let fan = node.triangle_fan(&world).unwrap();
    let ring = node.ring_positions(&world).unwrap();
    for (k, body) in ring.iter().enumerate() {
        assert_eq!(fan[k + 1].position, [body.x, body.y]);
    }
}

#[test]
fn test_padded_fan_sits_outside_bodies() {
    let mut world = PhysicsWorld::new(&WorldConfig::floating());
    let config = SoftBodyConfig::default().with_segments(10);
    let padding = config.ring_body_radius;
    let mut node = SoftBodyNode::new(
        "padded",
        Point2::origin(),
        config.with_outline_padding(padding),
        BounceConfig::default(),
    )
    .unwrap();
    node.create_physics_object(&mut world).unwrap();

    let fan = node.triangle_fan(&world).unwrap();
    for vertex in &fan[1..] {
        let distance = Point2::from(vertex.position).coords.norm();
        assert!((distance - (node.rest_radius() + padding)).abs() < 1e-5);
    }
}

#[test]
fn test_non_finite_tuning_is_rejected_before_creation() {
    let mut stiff = SoftBodyConfig::default();
    stiff.stiffness = f32::NAN;
    let padded = SoftBodyConfig::default().with_outline_padding(f32::NAN);

    for config in [stiff, padded] {
        let result = SoftBodyNode::new("bad", Point2::origin(), config, BounceConfig::default());
        assert!(matches!(result, Err(SoftBodyError::InvalidConfig(_))));
    }
}

#[test]
fn test_double_create_keeps_original_bodies() {
    let mut world = PhysicsWorld::new(&WorldConfig::floating());
    let mut node = blob(8);
    node.create_physics_object(&mut world).unwrap();
    let handles = node.ring_handles().unwrap().to_vec();
    let center = node.center_handle().unwrap();

    let err = node.create_physics_object(&mut world).unwrap_err();
    assert!(matches!(err, SoftBodyError::AlreadyInitialized));

    assert_eq!(world.body_count(), 9);
    assert_eq!(node.ring_handles().unwrap(), handles.as_slice());
    assert_eq!(node.center_handle(), Some(center));
    assert!(handles.iter().all(|h| world.contains(*h)));
}

#[test]
fn test_bounce_before_create_leaves_world_alone() {
    let mut world = PhysicsWorld::new(&WorldConfig::floating());
    let other = blob(6);
    let mut active = blob(6);
    active.create_physics_object(&mut world).unwrap();

    let err = other.bounce(&mut world).unwrap_err();
    assert!(matches!(err, SoftBodyError::NotInitialized));

    assert_eq!(world.body_count(), 7);
    for handle in active.ring_handles().unwrap() {
        assert_eq!(world.body(*handle).unwrap().linvel().norm(), 0.0);
    }
}

#[test]
fn test_create_while_stepping_is_rejected() {
    let mut world = PhysicsWorld::new(&WorldConfig::floating());
    let mut node = blob(8);

    let mut result = None;
    world.step_with_hook(|w| result = Some(node.create_physics_object(w)));

    assert!(matches!(
        result,
        Some(Err(SoftBodyError::InvalidWorldState { .. }))
    ));
    assert_eq!(world.body_count(), 0);
    assert_eq!(node.state(), NodeState::Uninitialized);

    // Same world accepts the node once the step is over
    node.create_physics_object(&mut world).unwrap();
    assert_eq!(world.body_count(), 9);
}

#[test]
fn test_create_without_timestep_is_rejected() {
    let mut world = PhysicsWorld::new(&WorldConfig {
        time_step: f32::NAN,
        ..WorldConfig::floating()
    });
    let mut node = blob(8);
    assert!(matches!(
        node.create_physics_object(&mut world),
        Err(SoftBodyError::InvalidWorldState { .. })
    ));
    assert_eq!(world.body_count(), 0);
}

#[test]
fn test_shutdown_then_init_again() {
    let mut world = PhysicsWorld::new(&WorldConfig::floating());
    let mut node = blob(12);

    node.init(&mut world).unwrap();
    assert_eq!(world.body_count(), 13);
    assert!(world.joint_count() > 0);

    node.shutdown(&mut world).unwrap();
    assert_eq!(world.body_count(), 0);
    assert_eq!(world.joint_count(), 0);
    assert!(!node.is_active());
    assert!(matches!(
        node.shutdown(&mut world),
        Err(SoftBodyError::NotInitialized)
    ));

    node.init(&mut world).unwrap();
    assert_eq!(world.body_count(), 13);
}

#[test]
fn test_two_nodes_share_a_world() {
    let mut world = PhysicsWorld::new(&WorldConfig::floating());
    let mut left = blob(5);
    let mut right = SoftBodyNode::new(
        "right",
        Point2::new(4.0, 0.0),
        SoftBodyConfig::default().with_segments(9),
        BounceConfig::default(),
    )
    .unwrap();

    left.create_physics_object(&mut world).unwrap();
    right.create_physics_object(&mut world).unwrap();
    assert_eq!(world.body_count(), 6 + 10);

    left.destroy_physics_object(&mut world).unwrap();
    assert_eq!(world.body_count(), 10);
    assert_eq!(right.triangle_fan(&world).unwrap().len(), 11);
}
