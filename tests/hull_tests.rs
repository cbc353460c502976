use proptest::prelude::*;

use whammo::{Hull, Point, Polygon, ShapeError, Shape, hull, point2};

#[test]
fn square_with_clutter() {
    let points = [
        point2(0.0, 0.0),
        point2(1.0, 1.0),
        point2(2.0, 2.0),
        point2(1.0, 0.0),
        point2(2.0, 0.0),
        point2(0.0, 2.0),
        point2(2.0, 2.0),
        point2(0.5, 1.5),
    ];
    let poly = hull(&points).unwrap().polygon().unwrap();
    assert_eq!(poly.verts(), &[point2(2.0, 0.0), point2(2.0, 2.0), point2(0.0, 2.0), point2(0.0, 0.0)]);
}

#[test]
fn nearly_coincident_points_merge() {
    let points = [
        point2(0.0, 0.0),
        point2(3.0, 0.0),
        point2(3.0, 0.000_001),
        point2(0.0, 3.0),
    ];
    let poly = hull(&points).unwrap().polygon().unwrap();
    assert_eq!(poly.len(), 3);
}

#[test]
fn degenerate_inputs() {
    assert_eq!(hull(&[]), Err(ShapeError::Empty));
    assert_eq!(hull(&[point2(f32::NAN, 0.0)]), Err(ShapeError::NonFinite));

    let same = [point2(1.0, 2.0); 5];
    assert_eq!(hull(&same), Ok(Hull::Point(point2(1.0, 2.0))));

    let line = [point2(0.0, 0.0), point2(1.0, 1.0), point2(3.0, 3.0), point2(2.0, 2.0)];
    assert_eq!(hull(&line), Ok(Hull::Segment(point2(3.0, 3.0), point2(0.0, 0.0))));
}

#[test]
fn degenerate_hulls_become_round_shapes() {
    match hull(&[point2(1.0, 2.0)]).unwrap().into_shape() {
        Shape::Circle(circle) => {
            assert_eq!(circle.p, point2(1.0, 2.0));
            assert_eq!(circle.r, 0.0);
        }
        other => panic!("expected a circle, got {:?}", other),
    }

    match hull(&[point2(0.0, 0.0), point2(4.0, 0.0)]).unwrap().into_shape() {
        Shape::Capsule(capsule) => assert_eq!(capsule.r, 0.0),
        other => panic!("expected a capsule, got {:?}", other),
    }
}

#[test]
fn too_many_hull_vertices() {
    let points: Vec<Point> = (0..12)
        .map(|i| {
            let angle = i as f32 * std::f32::consts::TAU / 12.0;
            point2(10.0 * angle.cos(), 10.0 * angle.sin())
        })
        .collect();
    assert_eq!(hull(&points), Err(ShapeError::TooManyVertices{ count: 12, max: whammo::MAX_POLYGON_VERTS }));

    // Lots of input points is fine, as long as the hull is small
    let mut crowded = points.iter().map(|p| point2(p.x * 0.5, p.y * 0.5)).collect::<Vec<_>>();
    crowded.extend([point2(-20.0, -20.0), point2(20.0, -20.0), point2(20.0, 20.0), point2(-20.0, 20.0)]);
    assert_eq!(Polygon::hull(&crowded).unwrap().polygon().unwrap().len(), 4);
}

fn arb_points() -> impl Strategy<Value = Vec<Point>> {
    // Integer coordinates keep the orientation tests exact
    prop::collection::vec((-10i32..10, -10i32..10), 3..=8)
        .prop_map(|pts| pts.into_iter().map(|(x, y)| point2(x as f32, y as f32)).collect())
}

proptest! {
    #[test]
    fn hull_is_a_fixed_point(points in arb_points()) {
        if let Hull::Polygon(poly) = hull(&points).unwrap() {
            let again = hull(poly.verts()).unwrap();
            prop_assert_eq!(again, Hull::Polygon(poly));
        }
    }

    #[test]
    fn hull_is_convex_and_contains_its_input(points in arb_points()) {
        if let Hull::Polygon(poly) = hull(&points).unwrap() {
            let verts = poly.verts();
            let n = verts.len();
            for i in 0..n {
                let e1 = verts[(i + 1) % n] - verts[i];
                let e2 = verts[(i + 2) % n] - verts[(i + 1) % n];
                // Strictly left turns: counter-clockwise, no collinear vertices
                prop_assert!(e1.x * e2.y - e1.y * e2.x > 0.0);
            }
            for &p in &points {
                for (&v, &normal) in verts.iter().zip(poly.norms()) {
                    prop_assert!(normal.dot(p - v) <= 1e-3, "{:?} outside {:?}", p, verts);
                }
            }
        }
    }
}
