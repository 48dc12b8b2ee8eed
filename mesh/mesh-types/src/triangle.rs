//! Concrete triangles resolved from polygon cells.

use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Three resolved corner positions of a triangle cell.
///
/// Winding is counter-clockwise when viewed from the front, so the normal
/// points toward the viewer.
///
/// # Example
///
/// ```
/// use mesh_types::{Point3, Triangle};
///
/// let tri = Triangle::new(
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// );
///
/// approx::assert_relative_eq!(tri.area(), 0.5, epsilon = 1e-12);
/// approx::assert_relative_eq!(tri.unit_normal().unwrap().z, 1.0, epsilon = 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Triangle {
    /// First corner.
    pub a: Point3<f64>,
    /// Second corner.
    pub b: Point3<f64>,
    /// Third corner.
    pub c: Point3<f64>,
}

impl Triangle {
    /// Create a triangle from three corners.
    #[inline]
    #[must_use]
    pub const fn new(a: Point3<f64>, b: Point3<f64>, c: Point3<f64>) -> Self {
        Self { a, b, c }
    }

    /// Cross product of the first two edges, `(b - a) x (c - b)`.
    ///
    /// Its length is twice the area; its direction follows the winding.
    #[inline]
    #[must_use]
    pub fn cross(&self) -> Vector3<f64> {
        (self.b - self.a).cross(&(self.c - self.b))
    }

    /// Unit normal, or `None` when the triangle has zero area.
    #[must_use]
    pub fn unit_normal(&self) -> Option<Vector3<f64>> {
        self.cross().try_normalize(0.0)
    }

    /// Area of the triangle.
    #[inline]
    #[must_use]
    pub fn area(&self) -> f64 {
        0.5 * self.cross().norm()
    }

    /// Centroid of the three corners.
    #[must_use]
    pub fn centroid(&self) -> Point3<f64> {
        Point3::from((self.a.coords + self.b.coords + self.c.coords) / 3.0)
    }
}
