use std::f32::consts::FRAC_PI_2;

use approx::assert_abs_diff_eq;
use proptest::prelude::*;

use whammo::geom::{RectExt, VectorExt, fudge_to_zero};
use whammo::{Basis, Capsule, Circle, Point, Polygon, Rot, Shape, ShapeError, Transform, Vector, aabb, point2, vec2};

fn assert_vec_near(actual: Vector, expected: Vector) {
    assert_abs_diff_eq!(actual.x, expected.x, epsilon = 1e-4);
    assert_abs_diff_eq!(actual.y, expected.y, epsilon = 1e-4);
}

fn assert_point_near(actual: Point, expected: Point) {
    assert_vec_near(actual.to_vector(), expected.to_vector());
}

#[test]
fn quarter_turns() {
    let v = vec2(3.0, 1.0);
    assert_eq!(v.skew(), vec2(-1.0, 3.0));
    assert_eq!(v.cw90(), vec2(1.0, -3.0));
    assert_eq!(v.det(v.skew()), v.square_length());
    assert_vec_near(Rot::from_angle(FRAC_PI_2).apply(v), v.skew());
}

#[test]
fn normalizing_tiny_vectors_falls_back() {
    assert_eq!(Vector::zero().norm_or(vec2(0.0, 1.0)), vec2(0.0, 1.0));
    assert_eq!(Vector::zero().norm_or_zero(), Vector::zero());
    assert_vec_near(vec2(0.0, -4.0).norm_or_zero(), vec2(0.0, -1.0));
    assert_eq!(fudge_to_zero(1e-7), 0.0);
    assert_eq!(fudge_to_zero(-0.5), -0.5);
}

#[test]
fn boxes() {
    let bbox = aabb(4.0, 3.0, -2.0, -1.0);
    assert_eq!(bbox.min, point2(-2.0, -1.0));
    assert_eq!(bbox.max, point2(4.0, 3.0));
    assert!(bbox.contains_inclusive(point2(4.0, 3.0)));
    assert!(!bbox.contains_inclusive(point2(4.1, 3.0)));
    assert_eq!(bbox.clamp_point(point2(10.0, 0.0)), point2(4.0, 0.0));
    assert_eq!(bbox.corners(), [point2(-2.0, -1.0), point2(4.0, -1.0), point2(4.0, 3.0), point2(-2.0, 3.0)]);
    assert!(bbox.touches(&aabb(4.0, 3.0, 5.0, 5.0)));
    assert!(!bbox.touches(&aabb(4.5, 3.0, 5.0, 5.0)));
}

#[test]
fn rotations_compose() {
    let a = Rot::from_angle(0.3);
    let b = Rot::from_angle(1.1);
    assert_abs_diff_eq!(a.then(&b).angle(), 1.4, epsilon = 1e-5);
    assert_abs_diff_eq!(a.then(&a.inverse()).angle(), 0.0, epsilon = 1e-6);
    assert_abs_diff_eq!(Rot::from_direction(vec2(0.0, 2.0)).angle(), FRAC_PI_2, epsilon = 1e-6);
    assert_eq!(Rot::from_direction(Vector::zero()), Rot::IDENTITY);
}

#[test]
fn bases() {
    let basis = Basis::from_rot(Rot::from_angle(FRAC_PI_2));
    assert_vec_near(basis.apply(vec2(1.0, 0.0)), vec2(0.0, 1.0));
    assert_vec_near(basis.apply_inv(vec2(0.0, 1.0)), vec2(1.0, 0.0));

    let basis = Basis::from_x_axis(vec2(3.0, 4.0));
    assert_vec_near(basis.x, vec2(0.6, 0.8));
    assert_vec_near(basis.y, vec2(-0.8, 0.6));
    let v = vec2(2.0, -7.0);
    assert_vec_near(basis.apply_inv(basis.apply(v)), v);
}

#[test]
fn transforms() {
    let x = Transform::new(vec2(10.0, 0.0), Rot::from_angle(FRAC_PI_2));
    assert_point_near(x.apply_point(point2(1.0, 0.0)), point2(10.0, 1.0));
    assert_vec_near(x.apply_vector(vec2(1.0, 0.0)), vec2(0.0, 1.0));
    assert_point_near(x.apply_point_inv(point2(10.0, 1.0)), point2(1.0, 0.0));

    let y = Transform::translation(vec2(0.0, 5.0));
    let p = point2(2.0, 3.0);
    assert_point_near(x.then(&y).apply_point(p), y.apply_point(x.apply_point(p)));
    assert_point_near(x.inverse().apply_point(x.apply_point(p)), p);
    assert_eq!(Transform::default(), Transform::identity());
}

#[test]
fn polygon_construction() {
    assert_eq!(Polygon::new(&[]), Err(ShapeError::Empty));
    assert_eq!(Polygon::new(&[point2(0.0, f32::INFINITY)]), Err(ShapeError::NonFinite));
    let lots = [point2(0.0, 0.0); 9];
    assert_eq!(Polygon::new(&lots), Err(ShapeError::TooManyVertices{ count: 9, max: 8 }));

    let tri = Polygon::new(&[point2(0.0, 0.0), point2(4.0, 0.0), point2(0.0, 4.0)]).unwrap();
    assert_eq!(tri.len(), 3);
    let diag = 1.0 / 2.0f32.sqrt();
    assert_vec_near(tri.norms()[0], vec2(0.0, -1.0));
    assert_vec_near(tri.norms()[1], vec2(diag, diag));
    assert_vec_near(tri.norms()[2], vec2(-1.0, 0.0));
    assert_eq!(tri.support(vec2(1.0, 0.1)), point2(4.0, 0.0));
}

#[test]
fn from_aabb_matches_computed_normals() {
    let bbox = aabb(1.0, 2.0, 5.0, 3.0);
    let from_box = Polygon::from_aabb(&bbox);
    let computed = Polygon::new(&bbox.corners()).unwrap();
    assert_eq!(from_box.verts(), computed.verts());
    for (a, b) in from_box.norms().iter().zip(computed.norms()) {
        assert_vec_near(*a, *b);
    }
}

#[test]
fn containment() {
    let circle = Circle::new(point2(0.0, 0.0), 2.0);
    assert!(circle.contains_point(point2(2.0, 0.0)));
    assert!(!circle.contains_point(point2(1.5, 1.5)));

    let capsule = Capsule::new(point2(0.0, 0.0), point2(10.0, 0.0), 1.0);
    assert!(capsule.contains_point(point2(5.0, 1.0)));
    assert!(capsule.contains_point(point2(10.5, 0.5)));
    assert!(!capsule.contains_point(point2(11.0, 1.0)));

    let tri = Shape::Polygon(Polygon::new(&[point2(0.0, 0.0), point2(4.0, 0.0), point2(0.0, 4.0)]).unwrap());
    assert!(tri.contains_point(point2(1.0, 1.0)));
    assert!(tri.contains_point(point2(2.0, 2.0)));
    assert!(!tri.contains_point(point2(2.5, 2.5)));
    assert!(Shape::Aabb(aabb(0.0, 0.0, 1.0, 1.0)).contains_point(point2(1.0, 1.0)));
}

#[test]
fn negative_radius_is_clamped() {
    assert_eq!(Circle::new(point2(0.0, 0.0), -3.0).r, 0.0);
    assert_eq!(Capsule::new(point2(0.0, 0.0), point2(1.0, 0.0), -1.0).r, 0.0);
}

#[test]
fn support_points() {
    let circle = Shape::Circle(Circle::new(point2(1.0, 1.0), 2.0));
    assert_point_near(circle.support(vec2(0.0, 5.0)), point2(1.0, 3.0));
    let bbox = Shape::Aabb(aabb(0.0, 0.0, 2.0, 1.0));
    assert_eq!(bbox.support(vec2(-1.0, 1.0)), point2(0.0, 1.0));
    let capsule = Shape::Capsule(Capsule::new(point2(0.0, 0.0), point2(4.0, 0.0), 1.0));
    assert_point_near(capsule.support(vec2(1.0, 0.0)), point2(5.0, 0.0));
    assert_eq!(capsule.radius(), 1.0);
    assert_eq!(bbox.radius(), 0.0);
}

#[test]
fn transformed_shapes() {
    let bbox = Shape::Aabb(aabb(0.0, 0.0, 2.0, 1.0));
    match bbox.transformed(&Transform::translation(vec2(1.0, 1.0))) {
        Shape::Aabb(moved) => assert_eq!(moved, aabb(1.0, 1.0, 3.0, 2.0)),
        other => panic!("translated box should stay a box, got {:?}", other),
    }

    let turned = bbox.transformed(&Transform::rotation(Rot::from_angle(FRAC_PI_2)));
    let poly = match turned {
        Shape::Polygon(poly) => poly,
        other => panic!("rotated box should become a polygon, got {:?}", other),
    };
    let bounds = poly.bounds();
    assert_point_near(bounds.min, point2(-1.0, 0.0));
    assert_point_near(bounds.max, point2(0.0, 2.0));
    // The first edge was the bottom; now it faces right
    assert_vec_near(poly.norms()[0], vec2(1.0, 0.0));

    let capsule = Capsule::new(point2(0.0, 0.0), point2(1.0, 0.0), 0.5);
    let moved = capsule.transformed(&Transform::new(vec2(0.0, 3.0), Rot::from_angle(FRAC_PI_2)));
    assert_point_near(moved.b, point2(0.0, 4.0));
    assert_eq!(moved.r, 0.5);
}

proptest! {
    #[test]
    fn transform_round_trips(
        x in -100.0f32..100.0, y in -100.0f32..100.0,
        tx in -100.0f32..100.0, ty in -100.0f32..100.0,
        angle in -6.28f32..6.28,
    ) {
        let xf = Transform::new(vec2(tx, ty), Rot::from_angle(angle));
        let p = point2(x, y);
        let back = xf.apply_point_inv(xf.apply_point(p));
        prop_assert!((back - p).length() < 1e-3);
        let back = xf.inverse().apply_point(xf.apply_point(p));
        prop_assert!((back - p).length() < 1e-3);
    }

    #[test]
    fn rotation_preserves_length(x in -100.0f32..100.0, y in -100.0f32..100.0, angle in -6.28f32..6.28) {
        let v = vec2(x, y);
        let r = Rot::from_angle(angle);
        prop_assert!((r.apply(v).length() - v.length()).abs() < 1e-3);
        prop_assert!((r.apply_inv(r.apply(v)) - v).length() < 1e-3);
    }
}
