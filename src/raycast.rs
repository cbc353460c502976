//! Where a ray first hits a shape.
//!
//! Every query returns `None` for a miss, including when the hit would be past the end of the ray,
//! and also when the ray starts inside the shape.  Only entry hits count: a ray starting on the
//! surface hits at `t = 0` if it's heading in, and misses if it's heading away.

use crate::geom::{Aabb, Basis, Point, Vector, VectorExt, WorldUnit, PRECISION, fudge_to_zero, vec2};
use crate::shapes::{Capsule, Circle, Polygon, Shape, FALLBACK_AXIS, closest_on_segment};

/// The segment `p + d * s` for `s` in `[0, t]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub p: Point,
    /// Unit direction.
    pub d: Vector,
    /// Length; hits further than this are ignored.
    pub t: WorldUnit,
}

impl Ray {
    /// `d` needn't be normalized; a zero direction falls back to +x.  A negative length is clamped
    /// to zero.
    pub fn new(p: Point, d: Vector, t: WorldUnit) -> Ray {
        Ray{ p, d: d.norm_or(FALLBACK_AXIS), t: t.max(0.0) }
    }

    /// Ray from `from` that ends exactly at `to`.
    pub fn between(from: Point, to: Point) -> Ray {
        let delta = to - from;
        Ray::new(from, delta, delta.length())
    }

    pub fn impact(&self, t: WorldUnit) -> Point {
        self.p + self.d * t
    }

    pub fn end(&self) -> Point {
        self.impact(self.t)
    }
}

/// A ray hit: how far along the ray, and the surface normal there (pointing out of the shape).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Raycast {
    pub t: WorldUnit,
    pub n: Vector,
}

impl Raycast {
    fn earliest(a: Option<Raycast>, b: Option<Raycast>) -> Option<Raycast> {
        match (a, b) {
            (Some(a), Some(b)) => Some(if b.t < a.t { b } else { a }),
            (a, None) => a,
            (None, b) => b,
        }
    }
}

pub fn ray_to_circle(ray: &Ray, circle: &Circle) -> Option<Raycast> {
    let m = ray.p - circle.p;
    if m.length() < circle.r - PRECISION {
        return None;
    }
    let b = m.dot(ray.d);
    if b >= 0.0 {
        // Heading away, or skimming the surface
        return None;
    }

    let c = m.square_length() - circle.r * circle.r;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    // The smaller root is where we enter; it only dips below zero when starting on the surface
    let t = (-b - disc.sqrt()).max(0.0);
    if t > ray.t {
        return None;
    }

    let n = (ray.impact(t) - circle.p).norm_or(-ray.d);
    Some(Raycast{ t, n })
}

/// Is the point inside the box by more than the touching tolerance?
fn deep_inside(bbox: &Aabb, p: Point) -> bool {
    bbox.min.x + PRECISION < p.x && p.x < bbox.max.x - PRECISION &&
    bbox.min.y + PRECISION < p.y && p.y < bbox.max.y - PRECISION
}

pub fn ray_to_aabb(ray: &Ray, bbox: &Aabb) -> Option<Raycast> {
    if deep_inside(bbox, ray.p) {
        return None;
    }

    let mut t_in = WorldUnit::NEG_INFINITY;
    let mut t_out = WorldUnit::INFINITY;
    let mut n = Vector::zero();
    let slabs = [
        (ray.p.x, ray.d.x, bbox.min.x, bbox.max.x, vec2(1.0, 0.0)),
        (ray.p.y, ray.d.y, bbox.min.y, bbox.max.y, vec2(0.0, 1.0)),
    ];
    for &(p, d, lo, hi, axis) in &slabs {
        if d.abs() <= WorldUnit::EPSILON {
            if p < lo || p > hi {
                return None;
            }
            continue;
        }

        let (near, far, facing) =
            if d > 0.0 { ((lo - p) / d, (hi - p) / d, -axis) }
            else       { ((hi - p) / d, (lo - p) / d, axis) };
        if near > t_in {
            t_in = near;
            n = facing;
        }
        t_out = t_out.min(far);
    }

    if t_in > t_out || t_in < -PRECISION || t_in > ray.t {
        return None;
    }
    Some(Raycast{ t: t_in.max(0.0), n })
}

pub fn ray_to_capsule(ray: &Ray, capsule: &Capsule) -> Option<Raycast> {
    let nearest = closest_on_segment(capsule.a, capsule.b, ray.p);
    if (ray.p - nearest).length() < capsule.r - PRECISION {
        return None;
    }

    let ends = Raycast::earliest(
        ray_to_circle(ray, &Circle::new(capsule.a, capsule.r)),
        ray_to_circle(ray, &Circle::new(capsule.b, capsule.r)),
    );

    let along = capsule.b - capsule.a;
    let len = along.length();
    if len <= PRECISION {
        // No body, just the one circle
        return ends;
    }

    // The two flat sides, each pushed out from the core by the radius
    let frame = Basis::from_x_axis(along);
    let mut best = ends;
    for n in [frame.y, -frame.y] {
        let facing = n.dot(ray.d);
        if facing >= 0.0 {
            continue;
        }
        let start = capsule.a + n * capsule.r;
        let t = n.dot(start - ray.p) / facing;
        if t < -PRECISION || t > ray.t {
            continue;
        }
        let t = t.max(0.0);
        let s = frame.x.dot(ray.impact(t) - start);
        if s < 0.0 || s > len {
            continue;
        }
        best = Raycast::earliest(best, Some(Raycast{ t, n }));
    }
    best
}

pub fn ray_to_poly(ray: &Ray, poly: &Polygon) -> Option<Raycast> {
    let verts = poly.verts();
    match verts.len() {
        0 => return None,
        1 => return ray_to_circle(ray, &Circle::new(verts[0], 0.0)),
        2 => return ray_to_capsule(ray, &Capsule::new(verts[0], verts[1], 0.0)),
        _ => {}
    }
    let deep_inside = verts.iter().zip(poly.norms())
        .all(|(&v, &n)| n.dot(ray.p - v) < -PRECISION);
    if deep_inside {
        return None;
    }

    // Clip the line against every edge's half-plane; the last edge to push the start forward is
    // the one we come in through
    let mut lo = WorldUnit::NEG_INFINITY;
    let mut hi = ray.t;
    let mut entry = None;
    for (i, (&v, &n)) in verts.iter().zip(poly.norms()).enumerate() {
        let num = n.dot(v - ray.p);
        let den = n.dot(ray.d);
        if den.abs() <= WorldUnit::EPSILON {
            if fudge_to_zero(num) < 0.0 {
                // Parallel to this edge and outside it
                return None;
            }
            continue;
        }

        let t = num / den;
        if den < 0.0 {
            if t > lo {
                lo = t;
                entry = Some(i);
            }
        }
        else {
            hi = hi.min(t);
        }
        if hi < lo {
            return None;
        }
    }

    // Entering behind the origin means we started inside, or on the surface heading out
    if lo < -PRECISION {
        return None;
    }
    let i = entry?;
    Some(Raycast{ t: lo.max(0.0), n: poly.norms()[i] })
}

/// First hit of `ray` on any kind of shape.
pub fn raycast(ray: &Ray, shape: &Shape) -> Option<Raycast> {
    match shape {
        Shape::Circle(circle) => ray_to_circle(ray, circle),
        Shape::Aabb(bbox) => ray_to_aabb(ray, bbox),
        Shape::Capsule(capsule) => ray_to_capsule(ray, capsule),
        Shape::Polygon(poly) => ray_to_poly(ray, poly),
    }
}

impl Shape {
    pub fn raycast(&self, ray: &Ray) -> Option<Raycast> {
        raycast(ray, self)
    }
}
