//! Yes-or-no overlap tests between pairs of shapes.
//!
//! All of these are inclusive: shapes that merely touch count as overlapping.  The round shapes
//! and boxes get closed-form tests; anything involving a polygon (or two capsules) asks GJK
//! whether the distance is zero.

use crate::geom::{Aabb, Point, RectExt, Transform, WorldUnit};
use crate::gjk::{GjkParams, gjk_proxies};
use crate::shapes::{Capsule, Circle, Polygon, Proxy, Shape, aabb_proxy, closest_on_segment};

pub fn circle_to_circle(a: &Circle, b: &Circle) -> bool {
    let d2 = (b.p - a.p).square_length();
    let r = a.r + b.r;
    d2 <= r * r
}

pub fn circle_to_aabb(a: &Circle, b: &Aabb) -> bool {
    let nearest = b.clamp_point(a.p);
    (a.p - nearest).square_length() <= a.r * a.r
}

pub fn circle_to_capsule(a: &Circle, b: &Capsule) -> bool {
    let nearest = closest_on_segment(b.a, b.b, a.p);
    let r = a.r + b.r;
    (a.p - nearest).square_length() <= r * r
}

pub fn aabb_to_aabb(a: &Aabb, b: &Aabb) -> bool {
    a.touches(b)
}

/// Does the segment from `a` to `b` pass through the box?
fn segment_touches_aabb(a: Point, b: Point, bbox: &Aabb) -> bool {
    let d = b - a;
    let mut t0: WorldUnit = 0.0;
    let mut t1: WorldUnit = 1.0;
    for &(p, dp, lo, hi) in &[(a.x, d.x, bbox.min.x, bbox.max.x), (a.y, d.y, bbox.min.y, bbox.max.y)] {
        if dp.abs() <= WorldUnit::EPSILON {
            // Parallel to this slab, so it had better already be inside it
            if p < lo || p > hi {
                return false;
            }
            continue;
        }

        let (mut near, mut far) = ((lo - p) / dp, (hi - p) / dp);
        if near > far {
            core::mem::swap(&mut near, &mut far);
        }
        t0 = t0.max(near);
        t1 = t1.min(far);
        if t0 > t1 {
            return false;
        }
    }
    true
}

pub fn aabb_to_capsule(a: &Aabb, b: &Capsule) -> bool {
    if segment_touches_aabb(b.a, b.b, a) {
        return true;
    }

    // The box and the capsule's core are disjoint convex shapes, so the gap between them is
    // realized at a vertex of one or the other: a segment end, or a box corner
    let r2 = b.r * b.r;
    let ends = [b.a, b.b].into_iter()
        .map(|p| (p - a.clamp_point(p)).square_length());
    let corners = a.corners().into_iter()
        .map(|c| (c - closest_on_segment(b.a, b.b, c)).square_length());
    ends.chain(corners).any(|d2| d2 <= r2)
}

fn proxies_touch(a: &Proxy, b: &Proxy) -> bool {
    let identity = Transform::identity();
    gjk_proxies(a, &identity, b, &identity, &GjkParams::default(), None).overlapping()
}

pub fn capsule_to_capsule(a: &Capsule, b: &Capsule) -> bool {
    a.bounds().touches(&b.bounds()) && proxies_touch(&a.proxy(), &b.proxy())
}

pub fn circle_to_poly(a: &Circle, b: &Polygon) -> bool {
    a.bounds().touches(&b.bounds()) && proxies_touch(&a.proxy(), &b.proxy())
}

pub fn aabb_to_poly(a: &Aabb, b: &Polygon) -> bool {
    a.touches(&b.bounds()) && proxies_touch(&aabb_proxy(a), &b.proxy())
}

pub fn capsule_to_poly(a: &Capsule, b: &Polygon) -> bool {
    a.bounds().touches(&b.bounds()) && proxies_touch(&a.proxy(), &b.proxy())
}

pub fn poly_to_poly(a: &Polygon, b: &Polygon) -> bool {
    a.bounds().touches(&b.bounds()) && proxies_touch(&a.proxy(), &b.proxy())
}

/// Do two shapes of any kind overlap?  Picks the specific test for the pair, in either order.
pub fn collided(a: &Shape, b: &Shape) -> bool {
    use Shape::*;

    match (a, b) {
        (Circle(a), Circle(b)) => circle_to_circle(a, b),
        (Circle(c), Aabb(bb)) | (Aabb(bb), Circle(c)) => circle_to_aabb(c, bb),
        (Circle(c), Capsule(cap)) | (Capsule(cap), Circle(c)) => circle_to_capsule(c, cap),
        (Circle(c), Polygon(poly)) | (Polygon(poly), Circle(c)) => circle_to_poly(c, poly),

        (Aabb(a), Aabb(b)) => aabb_to_aabb(a, b),
        (Aabb(bb), Capsule(cap)) | (Capsule(cap), Aabb(bb)) => aabb_to_capsule(bb, cap),
        (Aabb(bb), Polygon(poly)) | (Polygon(poly), Aabb(bb)) => aabb_to_poly(bb, poly),

        (Capsule(a), Capsule(b)) => capsule_to_capsule(a, b),
        (Capsule(cap), Polygon(poly)) | (Polygon(poly), Capsule(cap)) => capsule_to_poly(cap, poly),

        (Polygon(a), Polygon(b)) => poly_to_poly(a, b),
    }
}
