//! Closest points between two convex shapes, via Gilbert–Johnson–Keerthi.
//!
//! GJK never looks at a shape directly.  It only asks each shape's [`Proxy`] for the vertex
//! furthest along some direction, and uses those to grow a simplex (point, segment, or triangle)
//! inside the Minkowski difference `B - A`, steering it towards the origin.  The point of the
//! Minkowski difference closest to the origin is the vector between the closest points of the two
//! shapes; if the simplex ever surrounds the origin, the shapes overlap.
//!
//! Circles and capsules are run as their cores (a point, a segment) and rounded off afterwards,
//! which is both cheaper and exact.

use arrayvec::ArrayVec;

use crate::geom::{Point, Transform, Vector, VectorExt, WorldUnit, PRECISION};
use crate::shapes::{Proxy, Shape, FALLBACK_AXIS};
use crate::GJK_ITERATIONS;

/// A shape placed in the world by an optional local-to-world transform.
///
/// Passing a transform here is cheaper than baking it in with [`Shape::transformed`], since only
/// the handful of support points GJK actually visits get transformed.
#[derive(Clone, Copy, Debug)]
pub struct Posed<'a> {
    pub shape: &'a Shape,
    pub transform: Option<Transform>,
}

impl<'a> Posed<'a> {
    pub fn new(shape: &'a Shape, transform: Transform) -> Posed<'a> {
        Posed{ shape, transform: Some(transform) }
    }
}

impl<'a> From<&'a Shape> for Posed<'a> {
    fn from(shape: &'a Shape) -> Posed<'a> {
        Posed{ shape, transform: None }
    }
}

impl Shape {
    /// This shape, placed by `transform`, for handing to [`gjk`].
    pub fn at(&self, transform: Transform) -> Posed<'_> {
        Posed::new(self, transform)
    }
}

/// Knobs for a single GJK query.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GjkParams {
    /// Round the cores off by each shape's radius.  Without this, circles act like points and
    /// capsules like segments.
    pub use_radius: bool,
    /// Give up and return the best estimate so far after this many support queries.
    pub max_iterations: usize,
    /// Distances below this are touching.
    pub tolerance: WorldUnit,
}

impl Default for GjkParams {
    fn default() -> Self {
        GjkParams{
            use_radius: true,
            max_iterations: GJK_ITERATIONS,
            tolerance: PRECISION,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GjkResult {
    /// Closest point on the first shape.
    pub a: Point,
    /// Closest point on the second shape.
    pub b: Point,
    /// Gap between the two shapes; zero if they touch or overlap.  Never negative.
    pub distance: WorldUnit,
    /// How many support points were added to the simplex.
    pub iterations: usize,
    /// False if GJK ran out of iterations, in which case the answer is only an approximation.
    pub converged: bool,
}

impl GjkResult {
    pub fn overlapping(&self) -> bool {
        self.distance == 0.0
    }

    /// Unit vector pointing from the first shape towards the second.
    pub fn normal(&self) -> Vector {
        (self.b - self.a).norm_or(FALLBACK_AXIS)
    }
}

/// The final simplex from a previous query, to warm-start the next query on the same pair.
///
/// Purely a speedup.  Reusing a cache with a different pair of shapes is harmless; a cache that
/// no longer fits is thrown away.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SimplexCache {
    metric: WorldUnit,
    count: usize,
    ia: [usize; 3],
    ib: [usize; 3],
}

impl SimplexCache {
    pub fn new() -> SimplexCache {
        SimplexCache::default()
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn clear(&mut self) {
        *self = SimplexCache::default();
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct SimplexVertex {
    // support point on A, on B, and their difference B - A
    a: Point,
    b: Point,
    p: Vector,
    // barycentric weight, normalized across the simplex
    u: WorldUnit,
    ia: usize,
    ib: usize,
}

#[derive(Clone, Debug, Default)]
struct Simplex {
    verts: ArrayVec<SimplexVertex, 3>,
}

impl Simplex {
    fn len(&self) -> usize {
        self.verts.len()
    }

    fn contains(&self, ia: usize, ib: usize) -> bool {
        self.verts.iter().any(|v| v.ia == ia && v.ib == ib)
    }

    /// Shrink to the smallest sub-simplex whose hull contains the point closest to the origin,
    /// and weight its vertices to hit that point.
    fn solve(&mut self) {
        match self.verts.len() {
            2 => self.solve2(),
            3 => self.solve3(),
            _ => {
                for v in self.verts.iter_mut() {
                    v.u = 1.0;
                }
            }
        }
    }

    fn keep(&mut self, picked: &[(SimplexVertex, WorldUnit)]) {
        let total: WorldUnit = picked.iter().map(|&(_, u)| u).sum();
        self.verts.clear();
        for &(mut v, u) in picked {
            v.u = if total > 0.0 { u / total } else { 1.0 / picked.len() as WorldUnit };
            self.verts.push(v);
        }
    }

    fn solve2(&mut self) {
        let (a, b) = (self.verts[0], self.verts[1]);
        // Each weight is the distance from the origin's projection to the *other* end
        let u = b.p.dot((b.p - a.p).norm_or_zero());
        let v = a.p.dot((a.p - b.p).norm_or_zero());

        if v <= 0.0 {
            self.keep(&[(a, 1.0)]);
        }
        else if u <= 0.0 {
            self.keep(&[(b, 1.0)]);
        }
        else {
            self.keep(&[(a, u), (b, v)]);
        }
    }

    fn solve3(&mut self) {
        let (a, b, c) = (self.verts[0], self.verts[1], self.verts[2]);
        let (pa, pb, pc) = (a.p, b.p, c.p);

        let u_ab = pb.dot((pb - pa).norm_or_zero());
        let v_ab = pa.dot((pa - pb).norm_or_zero());
        let u_bc = pc.dot((pc - pb).norm_or_zero());
        let v_bc = pb.dot((pb - pc).norm_or_zero());
        let u_ca = pa.dot((pa - pc).norm_or_zero());
        let v_ca = pc.dot((pc - pa).norm_or_zero());

        // Signed areas of the sub-triangles facing each vertex, oriented to match abc's winding
        let area = (pb - pa).norm_or_zero().det((pc - pa).norm_or_zero());
        let u_abc = pb.det(pc) * area;
        let v_abc = pc.det(pa) * area;
        let w_abc = pa.det(pb) * area;

        if v_ab <= 0.0 && u_ca <= 0.0 {
            self.keep(&[(a, 1.0)]);
        }
        else if u_ab <= 0.0 && v_bc <= 0.0 {
            self.keep(&[(b, 1.0)]);
        }
        else if u_bc <= 0.0 && v_ca <= 0.0 {
            self.keep(&[(c, 1.0)]);
        }
        else if u_ab > 0.0 && v_ab > 0.0 && w_abc <= 0.0 {
            self.keep(&[(a, u_ab), (b, v_ab)]);
        }
        else if u_bc > 0.0 && v_bc > 0.0 && u_abc <= 0.0 {
            self.keep(&[(b, u_bc), (c, v_bc)]);
        }
        else if u_ca > 0.0 && v_ca > 0.0 && v_abc <= 0.0 {
            self.keep(&[(c, u_ca), (a, v_ca)]);
        }
        else {
            // Origin is inside the triangle
            self.keep(&[(a, u_abc), (b, v_abc), (c, w_abc)]);
        }
    }

    /// Point on the simplex closest to the origin.  Only meaningful after `solve`.
    fn closest(&self) -> Vector {
        match self.verts.len() {
            3 => Vector::zero(),
            _ => self.verts.iter().fold(Vector::zero(), |acc, v| acc + v.p * v.u),
        }
    }

    /// Direction to search for the next support point: from the simplex towards the origin.
    fn search_direction(&self) -> Vector {
        match self.verts.as_slice() {
            [a] => -a.p,
            [a, b] => {
                let ab = b.p - a.p;
                if ab.det(-a.p) > 0.0 { ab.skew() } else { ab.cw90() }
            }
            _ => Vector::zero(),
        }
    }

    /// Closest points on A and on B, from the weights.
    fn witness(&self) -> (Point, Point) {
        let mut a = Vector::zero();
        let mut b = Vector::zero();
        for v in &self.verts {
            a += v.a.to_vector() * v.u;
            b += v.b.to_vector() * v.u;
        }
        (a.to_point(), b.to_point())
    }

    /// Rough size of the simplex, used to tell whether a cached simplex still describes the pair.
    fn metric(&self) -> WorldUnit {
        match self.verts.as_slice() {
            [a, b] => (b.p - a.p).length(),
            [a, b, c] => (b.p - a.p).det(c.p - a.p).abs(),
            _ => 0.0,
        }
    }
}

struct Pair<'a> {
    a: &'a Proxy,
    b: &'a Proxy,
    xa: Transform,
    xb: Transform,
}

impl Pair<'_> {
    fn vertex(&self, ia: usize, ib: usize) -> SimplexVertex {
        let a = self.xa.apply_point(self.a.verts.get(ia).copied().unwrap_or_else(Point::origin));
        let b = self.xb.apply_point(self.b.verts.get(ib).copied().unwrap_or_else(Point::origin));
        SimplexVertex{ a, b, p: b - a, u: 1.0, ia, ib }
    }

    /// Support point of the Minkowski difference `B - A` along world-space `dir`.
    fn support(&self, dir: Vector) -> SimplexVertex {
        let ia = self.a.support_index(self.xa.apply_vector_inv(-dir));
        let ib = self.b.support_index(self.xb.apply_vector_inv(dir));
        self.vertex(ia, ib)
    }

    fn fits(&self, cache: &SimplexCache) -> bool {
        cache.count <= 3 &&
            cache.ia[..cache.count].iter().all(|&i| i < self.a.verts.len()) &&
            cache.ib[..cache.count].iter().all(|&i| i < self.b.verts.len())
    }
}

/// Closest points and distance between two shapes.
///
/// Either argument can be a bare `&Shape` (already in world space) or a [`Posed`] shape carrying
/// its own transform.  Pass the same `cache` back in for the same pair on the next frame to
/// converge faster.
pub fn gjk<'a, 'b>(
    a: impl Into<Posed<'a>>,
    b: impl Into<Posed<'b>>,
    params: &GjkParams,
    cache: Option<&mut SimplexCache>,
) -> GjkResult {
    let (a, b) = (a.into(), b.into());
    gjk_proxies(
        &a.shape.proxy(), &a.transform.unwrap_or_default(),
        &b.shape.proxy(), &b.transform.unwrap_or_default(),
        params,
        cache,
    )
}

/// [`gjk`], working directly on proxies.  Handy when the shapes aren't wrapped in a [`Shape`].
pub fn gjk_proxies(
    proxy_a: &Proxy,
    xa: &Transform,
    proxy_b: &Proxy,
    xb: &Transform,
    params: &GjkParams,
    cache: Option<&mut SimplexCache>,
) -> GjkResult {
    let pair = Pair{ a: proxy_a, b: proxy_b, xa: *xa, xb: *xb };
    let tol2 = params.tolerance * params.tolerance;

    let mut simplex = Simplex::default();
    if let Some(cached) = cache.as_deref() {
        if cached.count > 0 && pair.fits(cached) {
            for i in 0..cached.count {
                simplex.verts.push(pair.vertex(cached.ia[i], cached.ib[i]));
            }
            let metric = simplex.metric();
            let stale = cached.count > 1 &&
                (metric < 0.5 * cached.metric || metric > 2.0 * cached.metric || metric <= params.tolerance);
            if stale {
                spew!("discarding stale GJK cache (metric {} -> {})", cached.metric, metric);
                simplex.verts.clear();
            }
        }
    }
    if simplex.len() == 0 {
        simplex.verts.push(pair.vertex(0, 0));
    }

    let mut prev_dist2 = WorldUnit::MAX;
    let mut iterations = 0;
    let mut hit = false;
    let mut converged = false;
    while iterations < params.max_iterations {
        // Remember what we had before solving, so we can tell when a support point is a repeat
        let saved = simplex.clone();
        simplex.solve();

        if simplex.len() == 3 {
            hit = true;
            converged = true;
            break;
        }

        let closest = simplex.closest();
        let dist2 = closest.square_length();
        if dist2 <= tol2 {
            // The cores touch
            hit = true;
            converged = true;
            break;
        }
        if dist2 > prev_dist2 {
            // No progress; rounding error is running the show now
            converged = true;
            break;
        }
        prev_dist2 = dist2;

        let dir = simplex.search_direction();
        if dir.square_length() <= WorldUnit::EPSILON * WorldUnit::EPSILON {
            converged = true;
            break;
        }

        let v = pair.support(dir);
        if saved.contains(v.ia, v.ib) {
            converged = true;
            break;
        }
        simplex.verts.push(v);
        iterations += 1;
    }

    if !converged {
        spew!("GJK gave up after {} iterations", iterations);
        // The last support point hasn't been folded in yet
        simplex.solve();
        hit = simplex.len() == 3;
    }

    let (mut pa, mut pb) = simplex.witness();
    let mut distance = (pb - pa).length();
    if hit {
        pa = pb;
        distance = 0.0;
    }
    else if params.use_radius {
        let (ra, rb) = (proxy_a.radius, proxy_b.radius);
        if distance > ra + rb + params.tolerance {
            let n = (pb - pa) / distance;
            pa += n * ra;
            pb -= n * rb;
            distance -= ra + rb;
        }
        else {
            // Rounded off, the shapes overlap; both closest points meet halfway
            let mid = pa.lerp(pb, 0.5);
            pa = mid;
            pb = mid;
            distance = 0.0;
        }
    }
    else if distance <= params.tolerance {
        distance = 0.0;
    }

    if let Some(cache) = cache {
        cache.metric = simplex.metric();
        cache.count = simplex.len();
        for (i, v) in simplex.verts.iter().enumerate() {
            cache.ia[i] = v.ia;
            cache.ib[i] = v.ib;
        }
    }

    GjkResult{ a: pa, b: pb, distance, iterations, converged }
}

/// Just the distance between two world-space shapes, with default parameters.
pub fn distance(a: &Shape, b: &Shape) -> WorldUnit {
    gjk(a, b, &GjkParams::default(), None).distance
}
