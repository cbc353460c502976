//! Convex hulls of arbitrary point clouds.
//!
//! Gift wrapping: start from the rightmost point, and repeatedly pick the point that leaves every
//! other point on the left of the new edge.  That walks the hull counter-clockwise, which is the
//! winding [`Polygon`] wants.  With at most [`MAX_POLYGON_VERTS`] hull vertices the quadratic
//! worst case never matters.

use crate::geom::{Point, Vector, VectorExt, PRECISION};
use crate::shapes::{Capsule, Circle, Polygon, Shape};
use crate::{ShapeError, MAX_POLYGON_VERTS};

/// Result of hulling a point cloud.  Fewer than three non-collinear points can't make a polygon,
/// so those collapse to whatever they do make.
#[derive(Clone, Debug, PartialEq)]
pub enum Hull {
    Point(Point),
    Segment(Point, Point),
    Polygon(Polygon),
}

impl Hull {
    /// The hull as something the queries accept: a point is a zero-radius circle, a segment a
    /// zero-radius capsule.
    pub fn into_shape(self) -> Shape {
        match self {
            Hull::Point(p) => Shape::Circle(Circle::new(p, 0.0)),
            Hull::Segment(a, b) => Shape::Capsule(Capsule::new(a, b, 0.0)),
            Hull::Polygon(poly) => Shape::Polygon(poly),
        }
    }

    pub fn polygon(self) -> Option<Polygon> {
        match self {
            Hull::Polygon(poly) => Some(poly),
            _ => None,
        }
    }
}

impl Polygon {
    /// Shorthand for [`hull`].
    pub fn hull(points: &[Point]) -> Result<Hull, ShapeError> {
        hull(points)
    }
}

#[inline]
fn coincident(a: Point, b: Point) -> bool {
    (a - b).square_length() <= PRECISION * PRECISION
}

/// Is `e2` far enough off the line of `e1` to count as a turn?
#[inline]
fn turn(e1: Vector, e2: Vector) -> f32 {
    let c = e1.det(e2);
    if c.abs() <= PRECISION * e1.length() * e2.length() {
        0.0
    }
    else {
        c
    }
}

/// Convex hull of `points`, counter-clockwise, starting from the rightmost (then lowest) point.
///
/// Interior and collinear points are dropped, and points closer together than
/// [`PRECISION`](crate::geom::PRECISION) are treated as one.  The input can be any length, but
/// the hull itself must fit in a polygon.
pub fn hull(points: &[Point]) -> Result<Hull, ShapeError> {
    if points.is_empty() {
        return Err(ShapeError::Empty);
    }
    if points.iter().any(|pt| !pt.x.is_finite() || !pt.y.is_finite()) {
        return Err(ShapeError::NonFinite);
    }

    let mut right = 0;
    for (i, pt) in points.iter().enumerate().skip(1) {
        let best = points[right];
        if pt.x > best.x || (pt.x == best.x && pt.y < best.y) {
            right = i;
        }
    }

    let mut out: [Point; MAX_POLYGON_VERTS] = [points[right]; MAX_POLYGON_VERTS];
    let mut count = 0;
    let mut current = right;
    // Every hull vertex is a distinct input point, so this bounds the walk even if rounding
    // conspires against us
    for _ in 0..points.len() {
        if count < MAX_POLYGON_VERTS {
            out[count] = points[current];
        }
        count += 1;

        let origin = points[current];
        let mut next: Option<usize> = None;
        for (i, &pt) in points.iter().enumerate() {
            if coincident(pt, origin) {
                continue;
            }
            let candidate = match next {
                None => {
                    next = Some(i);
                    continue;
                }
                Some(candidate) => candidate,
            };

            let e1 = points[candidate] - origin;
            let e2 = pt - origin;
            let c = turn(e1, e2);
            if c < 0.0 || (c == 0.0 && e2.square_length() > e1.square_length()) {
                next = Some(i);
            }
        }

        match next {
            Some(i) if !coincident(points[i], points[right]) => current = i,
            _ => break,
        }
    }

    if count > MAX_POLYGON_VERTS {
        return Err(ShapeError::TooManyVertices{ count, max: MAX_POLYGON_VERTS });
    }
    match count {
        1 => {
            spew!("hull of {} points collapsed to a point", points.len());
            Ok(Hull::Point(out[0]))
        }
        2 => {
            spew!("hull of {} points collapsed to a segment", points.len());
            Ok(Hull::Segment(out[0], out[1]))
        }
        _ => Ok(Hull::Polygon(Polygon::new(&out[..count])?)),
    }
}
