use crate::tuple::{ Point3D, Vector3D };
use crate::matrix::Matrix4D;

/// A ray with an origin and a direction.
///
/// Rays built with `new` or `between` always carry a unit-length direction.
/// Rays produced by `transform` do not: object-space intersection relies on
/// the transformed direction keeping its length, so that a root `t` found in
/// object space is the same parameter along the world-space ray.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Ray {
    pub origin: Point3D,
    pub direction: Vector3D,
}

impl Ray {
    /// Creates a ray, normalizing `direction`.
    pub fn new(origin: Point3D, direction: Vector3D) -> Ray {
        Ray { origin, direction: direction.normalize() }
    }

    /// Creates a ray starting at `from` and pointing towards `to`.
    pub fn between(from: Point3D, to: Point3D) -> Ray {
        Ray::new(from, to - from)
    }

    pub fn position(&self, t: f64) -> Point3D {
        self.origin + (self.direction * t)
    }

    /// Maps the ray through a matrix without renormalizing the direction.
    pub fn transform(&self, m: &Matrix4D) -> Ray {
        Ray {
            origin: *m * self.origin,
            direction: *m * self.direction,
        }
    }
}

#[test]
fn ray_position() {
    let r = Ray::new(Point3D::new(2.0, 3.0, 4.0), Vector3D::new(1.0, 0.0, 0.0));

    assert_eq!(r.position(0.0), Point3D::new(2.0, 3.0, 4.0));
    assert_eq!(r.position(1.0), Point3D::new(3.0, 3.0, 4.0));
    assert_eq!(r.position(-1.0), Point3D::new(1.0, 3.0, 4.0));
    assert_eq!(r.position(2.5), Point3D::new(4.5, 3.0, 4.0));
}

#[test]
fn builders_normalize() {
    let r = Ray::new(Point3D::origin(), Vector3D::new(0.0, 3.0, 4.0));
    assert_eq!(r.direction, Vector3D::new(0.0, 0.6, 0.8));

    let b = Ray::between(Point3D::new(1.0, 1.0, 1.0), Point3D::new(1.0, 1.0, -9.0));
    assert_eq!(b.direction, Vector3D::new(0.0, 0.0, -1.0));
}

#[test]
fn ray_translation() {
    let r = Ray::new(Point3D::new(1.0, 2.0, 3.0), Vector3D::new(0.0, 1.0, 0.0));
    let t = r.transform(&Matrix4D::translation(3.0, 4.0, 5.0));

    assert_eq!(t.origin, Point3D::new(4.0, 6.0, 8.0));
    assert_eq!(t.direction, Vector3D::new(0.0, 1.0, 0.0));
}

#[test]
fn ray_scaling_keeps_length() {
    let r = Ray::new(Point3D::new(1.0, 2.0, 3.0), Vector3D::new(0.0, 1.0, 0.0));
    let t = r.transform(&Matrix4D::scaling(2.0, 3.0, 4.0));

    assert_eq!(t.origin, Point3D::new(2.0, 6.0, 12.0));
    assert_eq!(t.direction, Vector3D::new(0.0, 3.0, 0.0));
}
