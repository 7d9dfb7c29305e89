// Qualitative elasticity: a bounced ring deforms and springs back
use approx::assert_abs_diff_eq;
use nalgebra::Point2;
use squish_core::{
    ArenaConfig, BounceConfig, BounceMode, Drawable, PhysicsWorld, SoftBodyConfig, SoftBodyNode,
    WorldConfig,
};

const TOLERANCE: f32 = 0.05; // 5% of the rest radius

fn floating_blob() -> (SoftBodyNode, PhysicsWorld) {
    let mut world = PhysicsWorld::new(&WorldConfig::floating());
    let mut node = SoftBodyNode::new(
        "blob",
        Point2::origin(),
        SoftBodyConfig::default(),
        BounceConfig {
            impulse: 0.5,
            mode: BounceMode::Radial,
        },
    )
    .unwrap();
    node.create_physics_object(&mut world).unwrap();
    (node, world)
}

#[test]
fn test_radial_bounce_points_outward() {
    let (node, mut world) = floating_blob();
    node.bounce(&mut world).unwrap();

    let center = node.center_position(&world).unwrap();
    for handle in node.ring_handles().unwrap() {
        let body = world.body(*handle).unwrap();
        let radial = (Point2::from(*body.translation()) - center).normalize();
        let vel = body.linvel();
        assert!(vel.norm() > 0.0);
        assert!(vel.dot(&radial) > 0.0, "velocity {vel:?} not outward");
        assert_abs_diff_eq!(vel.dot(&radial), vel.norm(), epsilon = 1e-4);
    }
}

#[test]
fn test_ring_expands_then_returns_to_rest() {
    let (node, mut world) = floating_blob();
    let rest = node.rest_radius();
    assert_abs_diff_eq!(node.mean_ring_radius(&world).unwrap(), rest, epsilon = 1e-5);

    node.bounce(&mut world).unwrap();
    world.step();
    let after_one = node.mean_ring_radius(&world).unwrap();
    assert!(after_one > rest, "ring did not expand: {after_one}");

    let mut peak = after_one;
    for _ in 0..60 {
        world.step();
        peak = peak.max(node.mean_ring_radius(&world).unwrap());
    }
    assert!(peak > after_one);
    // Rope limits cap the stretch
    assert!(peak <= rest * (1.0 + node.config().max_stretch) + TOLERANCE);

    for _ in 0..1200 {
        world.step();
    }
    let settled = node.mean_ring_radius(&world).unwrap();
    assert_abs_diff_eq!(settled, rest, epsilon = rest * TOLERANCE);
}

#[test]
fn test_tex_coords_fixed_while_positions_move() {
    let (node, mut world) = floating_blob();
    let before = node.triangle_fan(&world).unwrap();

    node.bounce(&mut world).unwrap();
    for _ in 0..5 {
        world.step();
    }
    let after = node.triangle_fan(&world).unwrap();

    assert_eq!(before.len(), after.len());
    for (a, b) in before.iter().zip(&after) {
        assert_eq!(a.tex_coord, b.tex_coord);
    }
    assert!(before
        .iter()
        .zip(&after)
        .skip(1)
        .any(|(a, b)| a.position != b.position));
    assert_eq!(after[1], after[after.len() - 1]);
}

#[test]
fn test_blob_settles_on_arena_floor() {
    let arena = ArenaConfig::default();
    let mut world = PhysicsWorld::new(&WorldConfig::default());
    world.build_arena(&arena);

    let mut node = SoftBodyNode::new(
        "dropped",
        Point2::new(0.0, -2.0),
        SoftBodyConfig::default(),
        BounceConfig {
            impulse: 4.0,
            mode: BounceMode::Upward,
        },
    )
    .unwrap();
    node.create_physics_object(&mut world).unwrap();

    for _ in 0..600 {
        world.step();
    }

    let floor = -arena.height * 0.5;
    let center = node.center_position(&world).unwrap();
    assert!(center.y > floor, "centre fell through the floor: {center}");
    assert!(center.y < floor + 2.0 * node.rest_radius());

    // A jump lifts the whole shape off its resting height
    let resting_y = center.y;
    node.bounce(&mut world).unwrap();
    for _ in 0..10 {
        world.step();
    }
    assert!(node.center_position(&world).unwrap().y > resting_y);
}
