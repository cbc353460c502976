use arrayvec::ArrayVec;
use euclid::Box2D;

use crate::geom::{Aabb, Point, RectExt, Transform, Vector, VectorExt, WorldUnit, PRECISION, fudge_to_zero, vec2};
use crate::{ShapeError, MAX_POLYGON_VERTS};

pub type VertexVec = ArrayVec<Point, MAX_POLYGON_VERTS>;
pub type NormalVec = ArrayVec<Vector, MAX_POLYGON_VERTS>;

/// Direction used whenever a query asks for "some" direction and the geometry doesn't offer one,
/// e.g. the normal between two coincident centers.
pub const FALLBACK_AXIS: Vector = Vector::new(1.0, 0.0);

/// Closest point to `p` on the segment from `a` to `b`.
pub fn closest_on_segment(a: Point, b: Point, p: Point) -> Point {
    let ab = b - a;
    let len2 = ab.square_length();
    if len2 <= PRECISION * PRECISION {
        return a;
    }
    let t = num_traits::clamp((p - a).dot(ab) / len2, 0.0, 1.0);
    a + ab * t
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Circle {
    pub p: Point,
    pub r: WorldUnit,
}

impl Circle {
    pub fn new(p: Point, r: WorldUnit) -> Circle {
        Circle{ p, r: r.max(0.0) }
    }

    pub fn support(&self, dir: Vector) -> Point {
        self.p + dir.norm_or(FALLBACK_AXIS) * self.r
    }

    pub fn contains_point(&self, point: Point) -> bool {
        (point - self.p).square_length() <= self.r * self.r
    }

    pub fn transformed(&self, x: &Transform) -> Circle {
        Circle{ p: x.apply_point(self.p), r: self.r }
    }

    pub fn bounds(&self) -> Aabb {
        let r = vec2(self.r, self.r);
        Box2D::new(self.p - r, self.p + r)
    }

    pub fn proxy(&self) -> Proxy {
        let mut verts = VertexVec::new();
        verts.push(self.p);
        Proxy{ verts, radius: self.r }
    }
}

/// A line segment swept by a circle: every point within `r` of the segment from `a` to `b`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Capsule {
    pub a: Point,
    pub b: Point,
    pub r: WorldUnit,
}

impl Capsule {
    pub fn new(a: Point, b: Point, r: WorldUnit) -> Capsule {
        Capsule{ a, b, r: r.max(0.0) }
    }

    pub fn support(&self, dir: Vector) -> Point {
        let core = if self.a.to_vector().dot(dir) >= self.b.to_vector().dot(dir) { self.a } else { self.b };
        core + dir.norm_or(FALLBACK_AXIS) * self.r
    }

    pub fn contains_point(&self, point: Point) -> bool {
        let nearest = closest_on_segment(self.a, self.b, point);
        (point - nearest).square_length() <= self.r * self.r
    }

    pub fn transformed(&self, x: &Transform) -> Capsule {
        Capsule{ a: x.apply_point(self.a), b: x.apply_point(self.b), r: self.r }
    }

    pub fn bounds(&self) -> Aabb {
        let r = vec2(self.r, self.r);
        Box2D::new(self.a.min(self.b) - r, self.a.max(self.b) + r)
    }

    pub fn proxy(&self) -> Proxy {
        let mut verts = VertexVec::new();
        verts.push(self.a);
        verts.push(self.b);
        Proxy{ verts, radius: self.r }
    }
}

/// An arbitrary (CONVEX) polygon, with its vertices in counter-clockwise order.
///
/// Convexity is the caller's problem: nothing here checks it, and a concave or clockwise polygon
/// will give nonsense answers.  Run arbitrary points through [`crate::hull::hull`] first.
#[derive(Clone, Debug, PartialEq)]
pub struct Polygon {
    verts: VertexVec,
    // norms[i] is the outward normal of the edge from verts[i] to verts[i + 1]
    norms: NormalVec,
}

impl Polygon {
    pub fn new(points: &[Point]) -> Result<Polygon, ShapeError> {
        if points.is_empty() {
            return Err(ShapeError::Empty);
        }
        if points.len() > MAX_POLYGON_VERTS {
            return Err(ShapeError::TooManyVertices{ count: points.len(), max: MAX_POLYGON_VERTS });
        }
        if points.iter().any(|pt| !pt.x.is_finite() || !pt.y.is_finite()) {
            return Err(ShapeError::NonFinite);
        }

        let verts: VertexVec = points.iter().copied().collect();
        Ok(Polygon{ norms: edge_normals(&verts), verts })
    }

    pub fn from_aabb(bbox: &Aabb) -> Polygon {
        let verts: VertexVec = bbox.corners().iter().copied().collect();
        let mut norms = NormalVec::new();
        norms.push(vec2(0.0, -1.0));
        norms.push(vec2(1.0, 0.0));
        norms.push(vec2(0.0, 1.0));
        norms.push(vec2(-1.0, 0.0));
        Polygon{ verts, norms }
    }

    pub fn verts(&self) -> &[Point] {
        &self.verts
    }

    pub fn norms(&self) -> &[Vector] {
        &self.norms
    }

    pub fn len(&self) -> usize {
        self.verts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.verts.is_empty()
    }

    /// Index of the vertex furthest along `dir`.
    pub fn support_index(&self, dir: Vector) -> usize {
        support_index(&self.verts, dir)
    }

    pub fn support(&self, dir: Vector) -> Point {
        self.verts.get(self.support_index(dir)).copied().unwrap_or_else(Point::origin)
    }

    pub fn contains_point(&self, point: Point) -> bool {
        match self.verts.len() {
            0 => false,
            1 => (point - self.verts[0]).square_length() <= PRECISION * PRECISION,
            2 => {
                let nearest = closest_on_segment(self.verts[0], self.verts[1], point);
                (point - nearest).square_length() <= PRECISION * PRECISION
            }
            _ => self.verts.iter().zip(self.norms.iter())
                .all(|(&v, &n)| fudge_to_zero(n.dot(point - v)) <= 0.0),
        }
    }

    pub fn transformed(&self, x: &Transform) -> Polygon {
        Polygon{
            verts: self.verts.iter().map(|&v| x.apply_point(v)).collect(),
            norms: self.norms.iter().map(|&n| x.apply_vector(n)).collect(),
        }
    }

    pub fn bounds(&self) -> Aabb {
        Box2D::from_points(self.verts.iter().copied())
    }

    pub fn proxy(&self) -> Proxy {
        Proxy{ verts: self.verts.clone(), radius: 0.0 }
    }
}

fn edge_normals(verts: &[Point]) -> NormalVec {
    let count = verts.len();
    (0..count)
        .map(|i| {
            let edge = verts[(i + 1) % count] - verts[i];
            // Vertices are counter-clockwise, so the outside is on the right
            edge.cw90().norm_or_zero()
        })
        .collect()
}

/// Index of the point with the greatest projection onto `dir`.  Ties go to the earliest point.
pub fn support_index(verts: &[Point], dir: Vector) -> usize {
    let mut best = 0;
    let mut best_dot = WorldUnit::NEG_INFINITY;
    for (i, v) in verts.iter().enumerate() {
        let dot = v.to_vector().dot(dir);
        if dot > best_dot {
            best = i;
            best_dot = dot;
        }
    }
    best
}

/// Any of the supported convex shapes.
#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    Circle(Circle),
    Aabb(Aabb),
    Capsule(Capsule),
    Polygon(Polygon),
}

impl Shape {
    /// The point on this shape's boundary furthest along `dir`.
    pub fn support(&self, dir: Vector) -> Point {
        match self {
            Shape::Circle(circle) => circle.support(dir),
            Shape::Aabb(bbox) => aabb_support(bbox, dir),
            Shape::Capsule(capsule) => capsule.support(dir),
            Shape::Polygon(poly) => poly.support(dir),
        }
    }

    pub fn contains_point(&self, point: Point) -> bool {
        match self {
            Shape::Circle(circle) => circle.contains_point(point),
            Shape::Aabb(bbox) => bbox.contains_inclusive(point),
            Shape::Capsule(capsule) => capsule.contains_point(point),
            Shape::Polygon(poly) => poly.contains_point(point),
        }
    }

    /// Bake a transform into the geometry.  A rotated box can't stay axis-aligned, so it comes
    /// back as a polygon.
    pub fn transformed(&self, x: &Transform) -> Shape {
        match self {
            Shape::Circle(circle) => Shape::Circle(circle.transformed(x)),
            Shape::Aabb(bbox) => {
                if x.r.s == 0.0 && x.r.c > 0.0 {
                    Shape::Aabb(bbox.translate(x.p))
                }
                else {
                    Shape::Polygon(Polygon::from_aabb(bbox).transformed(x))
                }
            }
            Shape::Capsule(capsule) => Shape::Capsule(capsule.transformed(x)),
            Shape::Polygon(poly) => Shape::Polygon(poly.transformed(x)),
        }
    }

    pub fn bounds(&self) -> Aabb {
        match self {
            Shape::Circle(circle) => circle.bounds(),
            Shape::Aabb(bbox) => *bbox,
            Shape::Capsule(capsule) => capsule.bounds(),
            Shape::Polygon(poly) => poly.bounds(),
        }
    }

    /// The radius GJK rounds this shape's core by.
    pub fn radius(&self) -> WorldUnit {
        match self {
            Shape::Circle(circle) => circle.r,
            Shape::Capsule(capsule) => capsule.r,
            Shape::Aabb(_) | Shape::Polygon(_) => 0.0,
        }
    }

    /// The shape's core as a point cloud, with its radius split off.
    pub fn proxy(&self) -> Proxy {
        match self {
            Shape::Circle(circle) => circle.proxy(),
            Shape::Aabb(bbox) => aabb_proxy(bbox),
            Shape::Capsule(capsule) => capsule.proxy(),
            Shape::Polygon(poly) => poly.proxy(),
        }
    }
}

pub fn aabb_proxy(bbox: &Aabb) -> Proxy {
    Proxy{ verts: bbox.corners().iter().copied().collect(), radius: 0.0 }
}

pub fn aabb_support(bbox: &Aabb, dir: Vector) -> Point {
    let x = if dir.x < 0.0 { bbox.min.x }
            else           { bbox.max.x };
    let y = if dir.y < 0.0 { bbox.min.y }
            else           { bbox.max.y };
    Point::new(x, y)
}

impl From<Circle> for Shape {
    fn from(circle: Circle) -> Shape {
        Shape::Circle(circle)
    }
}

impl From<Aabb> for Shape {
    fn from(bbox: Aabb) -> Shape {
        Shape::Aabb(bbox)
    }
}

impl From<Capsule> for Shape {
    fn from(capsule: Capsule) -> Shape {
        Shape::Capsule(capsule)
    }
}

impl From<Polygon> for Shape {
    fn from(poly: Polygon) -> Shape {
        Shape::Polygon(poly)
    }
}

/// What GJK actually sees of a shape: a handful of core points, and a radius to round them by.
///
/// A circle is one point, a capsule two, a box its four corners.  The support function of the
/// core is just the vertex with the largest projection, which is what lets GJK spot when it's
/// found the same Minkowski vertex twice.
#[derive(Clone, Debug, PartialEq)]
pub struct Proxy {
    pub verts: VertexVec,
    pub radius: WorldUnit,
}

impl Proxy {
    pub fn support_index(&self, dir: Vector) -> usize {
        support_index(&self.verts, dir)
    }
}
