use euclid::{Box2D, Point2D, Vector2D};
use num_traits::clamp;

/// Allowed rounding error when comparing whether two shapes are overlapping.
/// If they overlap (or are apart) by only this amount, they'll be considered touching.
pub const PRECISION: f32 = 1.0e-5;

pub type WorldUnit = f32;
pub struct WorldSpace;

pub type Point = Point2D<WorldUnit, WorldSpace>;
pub type Vector = Vector2D<WorldUnit, WorldSpace>;
/// Axis-aligned box stored as its min and max corners.
///
/// Invariant: `min.x <= max.x` and `min.y <= max.y`.  Use [`aabb`] when the corner order isn't
/// known up front.
pub type Aabb = Box2D<WorldUnit, WorldSpace>;

#[inline]
pub fn fudge_to_zero(n: WorldUnit) -> WorldUnit {
    if n.abs() <= PRECISION {
        0.0
    }
    else {
        n
    }
}

// Versions of the euclid helper functions pinned to world space
pub fn point2(x: WorldUnit, y: WorldUnit) -> Point {
    euclid::point2(x, y)
}
pub fn vec2(x: WorldUnit, y: WorldUnit) -> Vector {
    euclid::vec2(x, y)
}
/// Box spanning two arbitrary corners; the corners are sorted so the result is always valid.
pub fn aabb(x0: WorldUnit, y0: WorldUnit, x1: WorldUnit, y1: WorldUnit) -> Aabb {
    Box2D::new(
        point2(x0.min(x1), y0.min(y1)),
        point2(x0.max(x1), y0.max(y1)),
    )
}

pub trait VectorExt {
    /// Rotate a quarter turn counter-clockwise: `(x, y) -> (-y, x)`.
    fn skew(self) -> Self;
    /// Rotate a quarter turn clockwise: `(x, y) -> (y, -x)`.
    fn cw90(self) -> Self;
    /// 2D cross product (determinant of the two vectors as columns).
    fn det(self, other: Self) -> WorldUnit;
    /// Unit vector in the same direction, or `fallback` if this is too short to have one.
    fn norm_or(self, fallback: Self) -> Self;
    /// Unit vector in the same direction, or zero if this is too short to have one.
    fn norm_or_zero(self) -> Self;
}

impl VectorExt for Vector {
    #[inline]
    fn skew(self) -> Self {
        vec2(-self.y, self.x)
    }

    #[inline]
    fn cw90(self) -> Self {
        vec2(self.y, -self.x)
    }

    #[inline]
    fn det(self, other: Self) -> WorldUnit {
        self.x * other.y - self.y * other.x
    }

    #[inline]
    fn norm_or(self, fallback: Self) -> Self {
        let len = self.length();
        if len <= PRECISION || !len.is_finite() {
            fallback
        }
        else {
            self / len
        }
    }

    #[inline]
    fn norm_or_zero(self) -> Self {
        self.norm_or(Vector::zero())
    }
}

pub trait RectExt {
    fn touches(&self, other: &Self) -> bool;
    fn clamp_point(&self, point: Point) -> Point;
    fn corners(&self) -> [Point; 4];
}

impl RectExt for Aabb {
    /// Like `Box2D::intersects`, but also returns true if only the edges coincide.
    #[inline]
    fn touches(&self, other: &Self) -> bool {
        self.min.x <= other.max.x &&
       other.min.x <=  self.max.x &&
        self.min.y <= other.max.y &&
       other.min.y <=  self.max.y
    }

    /// Nearest point inside the box.
    #[inline]
    fn clamp_point(&self, point: Point) -> Point {
        point2(
            clamp(point.x, self.min.x, self.max.x),
            clamp(point.y, self.min.y, self.max.y),
        )
    }

    /// Corners in counter-clockwise order, starting from `min`.
    fn corners(&self) -> [Point; 4] {
        [
            self.min,
            point2(self.max.x, self.min.y),
            self.max,
            point2(self.min.x, self.max.y),
        ]
    }
}

/// A rotation, stored as the unit complex number `c + s·i`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rot {
    pub c: WorldUnit,
    pub s: WorldUnit,
}

impl Rot {
    pub const IDENTITY: Rot = Rot{ c: 1.0, s: 0.0 };

    pub fn from_angle(radians: WorldUnit) -> Rot {
        let (s, c) = radians.sin_cos();
        Rot{ c, s }
    }

    /// Rotation that takes the +x axis onto `dir`.  A zero `dir` gives the identity.
    pub fn from_direction(dir: Vector) -> Rot {
        let n = dir.norm_or(vec2(1.0, 0.0));
        Rot{ c: n.x, s: n.y }
    }

    pub fn angle(&self) -> WorldUnit {
        self.s.atan2(self.c)
    }

    /// Rotate `v` by this rotation.
    #[inline]
    pub fn apply(&self, v: Vector) -> Vector {
        vec2(self.c * v.x - self.s * v.y, self.s * v.x + self.c * v.y)
    }

    /// Rotate `v` by the inverse of this rotation (the transpose, since it's orthonormal).
    #[inline]
    pub fn apply_inv(&self, v: Vector) -> Vector {
        vec2(self.c * v.x + self.s * v.y, -self.s * v.x + self.c * v.y)
    }

    /// Rotation equivalent to applying `self` first and then `next`.
    #[inline]
    pub fn then(&self, next: &Rot) -> Rot {
        Rot{
            c: next.c * self.c - next.s * self.s,
            s: next.s * self.c + next.c * self.s,
        }
    }

    #[inline]
    pub fn inverse(&self) -> Rot {
        Rot{ c: self.c, s: -self.s }
    }
}

impl Default for Rot {
    fn default() -> Self {
        Rot::IDENTITY
    }
}

/// A 2x2 orthonormal basis, stored as its two columns.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Basis {
    pub x: Vector,
    pub y: Vector,
}

impl Basis {
    pub fn from_rot(r: Rot) -> Basis {
        Basis{ x: vec2(r.c, r.s), y: vec2(-r.s, r.c) }
    }

    /// Right-handed basis whose x column points along `dir`.
    pub fn from_x_axis(dir: Vector) -> Basis {
        let x = dir.norm_or(vec2(1.0, 0.0));
        Basis{ x, y: x.skew() }
    }

    #[inline]
    pub fn apply(&self, v: Vector) -> Vector {
        self.x * v.x + self.y * v.y
    }

    #[inline]
    pub fn apply_inv(&self, v: Vector) -> Vector {
        vec2(self.x.dot(v), self.y.dot(v))
    }
}

/// Rigid local-to-world transform: rotate, then translate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub p: Vector,
    pub r: Rot,
}

impl Transform {
    pub fn identity() -> Transform {
        Transform{ p: Vector::zero(), r: Rot::IDENTITY }
    }

    pub fn new(p: Vector, r: Rot) -> Transform {
        Transform{ p, r }
    }

    pub fn translation(p: Vector) -> Transform {
        Transform{ p, r: Rot::IDENTITY }
    }

    pub fn rotation(r: Rot) -> Transform {
        Transform{ p: Vector::zero(), r }
    }

    #[inline]
    pub fn apply_point(&self, point: Point) -> Point {
        (self.r.apply(point.to_vector()) + self.p).to_point()
    }

    #[inline]
    pub fn apply_point_inv(&self, point: Point) -> Point {
        self.r.apply_inv(point.to_vector() - self.p).to_point()
    }

    #[inline]
    pub fn apply_vector(&self, v: Vector) -> Vector {
        self.r.apply(v)
    }

    #[inline]
    pub fn apply_vector_inv(&self, v: Vector) -> Vector {
        self.r.apply_inv(v)
    }

    /// Transform equivalent to applying `self` first and then `next`.
    pub fn then(&self, next: &Transform) -> Transform {
        Transform{
            p: next.r.apply(self.p) + next.p,
            r: self.r.then(&next.r),
        }
    }

    pub fn inverse(&self) -> Transform {
        let r = self.r.inverse();
        Transform{ p: -r.apply(self.p), r }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Transform::identity()
    }
}
