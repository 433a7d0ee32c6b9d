use std::ops::{ Add, Sub, Neg, Mul };

use crate::feq;

/// A point in 3D space.
///
/// Points and vectors are kept as distinct types so that affine points can't
/// be accidentally summed or scaled like free vectors. Subtracting two points
/// yields the `Vector3D` between them; translating a point by a vector yields
/// another point.
#[derive(Debug, Default, Copy, Clone, PartialOrd)]
pub struct Point3D {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// A free vector in 3D space (a direction with a magnitude).
#[derive(Debug, Default, Copy, Clone, PartialOrd)]
pub struct Vector3D {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl PartialEq for Point3D {
    fn eq(&self, other: &Point3D) -> bool {
        feq(self.x, other.x) &&
            feq(self.y, other.y) &&
            feq(self.z, other.z)
    }
}

impl PartialEq for Vector3D {
    fn eq(&self, other: &Vector3D) -> bool {
        feq(self.x, other.x) &&
            feq(self.y, other.y) &&
            feq(self.z, other.z)
    }
}

/// Conversion from a slice of numbers to a `Point3D`.
///
/// Missing components default to `0.0`; extra components are ignored.
impl From<&[f64]> for Point3D {
    fn from(v: &[f64]) -> Point3D {
        let at = |i: usize| v.get(i).copied().unwrap_or(0.0);
        Point3D::new(at(0), at(1), at(2))
    }
}

/// Conversion from a slice of numbers to a `Vector3D`.
///
/// See the `Point3D` conversion; the same defaulting rules apply.
impl From<&[f64]> for Vector3D {
    fn from(v: &[f64]) -> Vector3D {
        let at = |i: usize| v.get(i).copied().unwrap_or(0.0);
        Vector3D::new(at(0), at(1), at(2))
    }
}

impl Point3D {
    pub fn new(x: f64, y: f64, z: f64) -> Point3D {
        Point3D { x, y, z }
    }

    /// The world-space origin.
    pub fn origin() -> Point3D {
        Point3D { x: 0.0, y: 0.0, z: 0.0 }
    }

    /// Moves a point along a vector.
    pub fn translate(&self, v: Vector3D) -> Point3D {
        *self + v
    }

    /// Distance between two points.
    pub fn distance(&self, other: &Point3D) -> f64 {
        (*self - *other).magnitude()
    }

    /// Reinterprets the point as the vector from the origin to it.
    pub fn as_vector(&self) -> Vector3D {
        Vector3D { x: self.x, y: self.y, z: self.z }
    }
}

impl Vector3D {
    pub fn new(x: f64, y: f64, z: f64) -> Vector3D {
        Vector3D { x, y, z }
    }

    pub fn zero() -> Vector3D {
        Vector3D { x: 0.0, y: 0.0, z: 0.0 }
    }

    pub fn magnitude(&self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Returns a unit vector with the same direction.
    ///
    /// The caller guarantees a non-zero magnitude. Zero vectors are rejected
    /// when a scene is built, so this never divides by zero while tracing.
    pub fn normalize(&self) -> Vector3D {
        *self * (1.0 / self.magnitude())
    }

    pub fn dot(&self, other: &Vector3D) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(&self, other: &Vector3D) -> Vector3D {
        Vector3D {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    /// Reflects a vector across a normal.
    pub fn reflect(&self, normal: &Vector3D) -> Vector3D {
        *self - (*normal * 2.0 * self.dot(normal))
    }

    /// Checks whether the vector has (approximately) no length.
    pub fn is_zero(&self) -> bool {
        feq(self.x, 0.0) && feq(self.y, 0.0) && feq(self.z, 0.0)
    }
}

impl Add<Vector3D> for Point3D {
    type Output = Point3D;

    fn add(self, other: Vector3D) -> Point3D {
        Point3D {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl Sub<Vector3D> for Point3D {
    type Output = Point3D;

    fn sub(self, other: Vector3D) -> Point3D {
        Point3D {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

impl Sub for Point3D {
    type Output = Vector3D;

    fn sub(self, other: Point3D) -> Vector3D {
        Vector3D {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

impl Add for Vector3D {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl Sub for Vector3D {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

impl Neg for Vector3D {
    type Output = Self;

    fn neg(self) -> Self {
        Self { x: -self.x, y: -self.y, z: -self.z }
    }
}

/// Implements scalar right-multiplication for a vector.
///
/// ```
/// use pov_tracer::tuple::Vector3D;
///
/// let v = Vector3D::new(1.0, 2.0, 3.0);
/// assert_eq!(v * 2.0, Vector3D::new(2.0, 4.0, 6.0));
/// ```
impl Mul<f64> for Vector3D {
    type Output = Self;

    fn mul(self, other: f64) -> Self {
        Self {
            x: self.x * other,
            y: self.y * other,
            z: self.z * other,
        }
    }
}

/// Implements scalar left-multiplication for a vector.
impl Mul<Vector3D> for f64 {
    type Output = Vector3D;

    fn mul(self, other: Vector3D) -> Vector3D {
        other * self
    }
}

/* Tests */

#[test]
fn sub_points() {
    let p1 = Point3D::new(3.0, 2.0, 1.0);
    let p2 = Point3D::new(5.0, 6.0, 7.0);

    assert_eq!(p1 - p2, Vector3D::new(-2.0, -4.0, -6.0));
}

#[test]
fn translate_point() {
    let p = Point3D::new(3.0, 2.0, 1.0);
    let v = Vector3D::new(5.0, 6.0, 7.0);

    assert_eq!(p.translate(v), Point3D::new(8.0, 8.0, 8.0));
    assert_eq!(p - v, Point3D::new(-2.0, -4.0, -6.0));
}

#[test]
fn sub_vectors() {
    let v1 = Vector3D::new(3.0, 2.0, 1.0);
    let v2 = Vector3D::new(5.0, 6.0, 7.0);

    assert_eq!(v1 - v2, Vector3D::new(-2.0, -4.0, -6.0));
}

#[test]
fn neg_vector() {
    let a = Vector3D::new(1.0, -2.0, 3.0);

    assert_eq!(-a, Vector3D::new(-1.0, 2.0, -3.0));
}

#[test]
fn mul_scalar() {
    let a = Vector3D::new(1.0, -2.0, 3.0);

    assert_eq!(a * 3.5, Vector3D::new(3.5, -7.0, 10.5));
    assert_eq!(0.5 * a, Vector3D::new(0.5, -1.0, 1.5));
}

#[test]
fn magnitude() {
    assert_eq!(Vector3D::new(1.0, 2.0, 3.0).magnitude(), f64::sqrt(14.0));
    assert_eq!(Vector3D::new(-1.0, -2.0, -3.0).magnitude(), f64::sqrt(14.0));
}

#[test]
fn normalize() {
    let v = Vector3D::new(1.0, 2.0, 3.0);
    let e = Vector3D::new(
        1.0 / f64::sqrt(14.0),
        2.0 / f64::sqrt(14.0),
        3.0 / f64::sqrt(14.0)
    );

    assert_eq!(Vector3D::new(4.0, 0.0, 0.0).normalize(),
        Vector3D::new(1.0, 0.0, 0.0));
    assert_eq!(v.normalize(), e);
    assert!(crate::feq(v.normalize().magnitude(), 1.0));
}

#[test]
fn dot_vectors() {
    let a = Vector3D::new(1.0, 2.0, 3.0);
    let b = Vector3D::new(2.0, 3.0, 4.0);

    assert_eq!(a.dot(&b), 20.0);
}

#[test]
fn cross_vectors() {
    let a = Vector3D::new(1.0, 2.0, 3.0);
    let b = Vector3D::new(2.0, 3.0, 4.0);

    assert_eq!(a.cross(&b), Vector3D::new(-1.0, 2.0, -1.0));
    assert_eq!(b.cross(&a), Vector3D::new(1.0, -2.0, 1.0));
}

#[test]
fn reflect_45() {
    let v = Vector3D::new(1.0, -1.0, 0.0);
    let n = Vector3D::new(0.0, 1.0, 0.0);

    assert_eq!(v.reflect(&n), Vector3D::new(1.0, 1.0, 0.0));
}

#[test]
fn distance_between_points() {
    let a = Point3D::new(0.0, 0.0, 5.0);

    assert_eq!(a.distance(&Point3D::origin()), 5.0);
}
