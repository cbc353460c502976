//! Collision queries between 2D convex shapes.
//!
//! Shapes are plain values: circles, axis-aligned boxes, capsules, and small convex polygons,
//! wrapped in [`Shape`] when the kind doesn't matter.  On top of them sit three kinds of query:
//!
//! - boolean overlap tests ([`overlap`]),
//! - closest points and separating distance via GJK ([`gjk`]),
//! - ray intersection ([`raycast`]).
//!
//! Everything is a pure function over its arguments; nothing here allocates.

#[macro_use]
mod debug;

pub mod geom;
pub mod gjk;
pub mod hull;
pub mod overlap;
pub mod raycast;
pub mod shapes;

pub use crate::geom::{Aabb, Basis, Point, Rot, Transform, Vector, aabb, point2, vec2};
pub use crate::gjk::{GjkParams, GjkResult, Posed, SimplexCache, gjk};
pub use crate::hull::{Hull, hull};
pub use crate::overlap::collided;
pub use crate::raycast::{Ray, Raycast, raycast};
pub use crate::shapes::{Capsule, Circle, Polygon, Shape};

/// Most vertices a [`Polygon`] can hold.  The hull builder shares this limit.
pub const MAX_POLYGON_VERTS: usize = 8;

/// Most iterations GJK will take before settling for its current best guess.
pub const GJK_ITERATIONS: usize = 20;

/// Ways constructing a shape can fail.  Queries themselves never fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ShapeError {
    #[error("no points given")]
    Empty,
    #[error("{count} vertices won't fit in a polygon (max {max})")]
    TooManyVertices { count: usize, max: usize },
    #[error("coordinates must be finite")]
    NonFinite,
}
