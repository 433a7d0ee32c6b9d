use crate::error::SceneError;
use crate::tuple::{ Point3D, Vector3D };
use crate::ray::Ray;
use crate::color::Color;
use crate::light::Finish;
use crate::matrix::Matrix4D;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShapeType {
    /// A sphere with a center and a radius, in object space.
    Sphere { center: Point3D, radius: f64 },

    /// An infinite plane: all points `P` with `normal . P == distance`.
    /// `normal` is unit length.
    Plane { normal: Vector3D, distance: f64 },
}

/// A renderable primitive.
///
/// Every shape answers the same four questions regardless of its kind: where
/// a ray first hits it (`hit`), what its surface normal is at a point
/// (`normal_at`), and what its pigment and finish are. The intersector and
/// the shader only ever go through these, so neither cares which variant of
/// `ShapeType` they are looking at.
///
/// `transform` maps object space to world space. Its inverse is computed once
/// when the transform is set, since every ray test needs it.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub ty: ShapeType,
    pub pigment: Color,
    pub finish: Finish,

    transform: Matrix4D,
    inverse: Matrix4D,
}

impl Shape {
    fn with_type(ty: ShapeType) -> Shape {
        Shape {
            ty,
            pigment: Color::black(),
            finish: Default::default(),
            transform: Matrix4D::identity(),
            inverse: Matrix4D::identity(),
        }
    }

    /// Creates a sphere with identity transform and default finish.
    pub fn sphere(center: Point3D, radius: f64) -> Shape {
        Shape::with_type(ShapeType::Sphere { center, radius })
    }

    /// Creates a plane `distance` units from the origin along `normal`.
    ///
    /// `normal` is normalized here. A zero normal is kept as-is so that
    /// `validate` can reject it.
    pub fn plane(normal: Vector3D, distance: f64) -> Shape {
        let normal = if normal.is_zero() { normal } else { normal.normalize() };
        Shape::with_type(ShapeType::Plane { normal, distance })
    }

    /// Returns a reference to the object-to-world transform.
    pub fn transform(&self) -> &Matrix4D {
        &self.transform
    }

    /// Sets the object-to-world transform.
    ///
    /// Fails if the matrix has no inverse, since a shape like that could never
    /// be intersected.
    pub fn set_transform(&mut self, transform: Matrix4D) -> Result<(), SceneError> {
        let inverse = transform.inverse().ok_or_else(|| {
            SceneError::DegenerateGeometry(
                "object transform is not invertible".into()
            )
        })?;

        self.transform = transform;
        self.inverse = inverse;
        Ok(())
    }

    /// Checks that the shape's own parameters are renderable.
    pub fn validate(&self) -> Result<(), SceneError> {
        match self.ty {
            ShapeType::Sphere { radius, .. } if !(radius > 0.0) => Err(
                SceneError::DegenerateGeometry(
                    format!("sphere radius must be positive, got {}", radius)
                )
            ),
            ShapeType::Plane { normal, .. } if normal.is_zero() => Err(
                SceneError::DegenerateGeometry("plane normal has zero length".into())
            ),
            _ => Ok(()),
        }
    }

    pub fn color(&self) -> Color {
        self.pigment
    }

    pub fn finish(&self) -> &Finish {
        &self.finish
    }

    /// Finds the nearest non-negative intersection of a world-space ray.
    ///
    /// The ray is mapped into object space by the inverse transform. Its
    /// direction is not renormalized there, so the returned `t` is directly
    /// usable with `ray.position(t)` on the original ray.
    pub fn hit(&self, ray: &Ray) -> Option<f64> {
        let local = ray.transform(&self.inverse);

        match self.ty {
            ShapeType::Sphere { center, radius }
                => Self::intersect_sphere(&local, center, radius),
            ShapeType::Plane { normal, distance }
                => Self::intersect_plane(&local, normal, distance),
        }
    }

    /// Obtains the world-space unit normal at a world-space point on the shape.
    pub fn normal_at(&self, at: Point3D) -> Vector3D {
        let local_point = self.inverse * at;

        let local_normal = match self.ty {
            ShapeType::Sphere { center, .. } => local_point - center,
            ShapeType::Plane { normal, .. } => normal,
        };

        // Normals go back to world space by the inverse transpose.
        (self.inverse.transposition() * local_normal).normalize()
    }

    /// Solves `|O + tD - C|^2 = r^2` for the nearest root.
    ///
    /// When both roots exist and the smaller one is negative, there is no
    /// hit: a ray starting inside (or past) the sphere doesn't see it.
    fn intersect_sphere(ray: &Ray, center: Point3D, radius: f64) -> Option<f64> {
        let sphere_to_ray = ray.origin - center;

        let a = ray.direction.dot(&ray.direction);
        let b = 2.0 * sphere_to_ray.dot(&ray.direction);
        let c = sphere_to_ray.dot(&sphere_to_ray) - radius.powi(2);

        let discriminant = b.powi(2) - 4.0 * a * c;

        if discriminant < 0.0 {
            return None;
        }

        let t = if discriminant == 0.0 {
            -b / (2.0 * a)
        } else {
            let sqrt = discriminant.sqrt();
            let t1 = (-b - sqrt) / (2.0 * a);
            let t2 = (-b + sqrt) / (2.0 * a);
            t1.min(t2)
        };

        if t < 0.0 {
            None
        } else {
            Some(t)
        }
    }

    fn intersect_plane(ray: &Ray, normal: Vector3D, distance: f64) -> Option<f64> {
        let denom = ray.direction.dot(&normal);

        // Parallel to the plane
        if denom == 0.0 {
            return None;
        }

        let t = -(ray.origin.as_vector().dot(&normal) - distance) / denom;
        if t > 0.0 {
            Some(t)
        } else {
            None
        }
    }
}

#[cfg(test)]
use crate::feq;

#[test]
fn ray_through_sphere_center() {
    let s = Shape::sphere(Point3D::origin(), 1.0);
    let r = Ray::new(Point3D::new(0.0, 0.0, -5.0), Vector3D::new(0.0, 0.0, 1.0));

    assert_eq!(s.hit(&r), Some(4.0));
}

#[test]
fn ray_through_offset_sphere_center() {
    let center = Point3D::new(1.0, 2.0, 3.0);
    let s = Shape::sphere(center, 2.0);
    let origin = Point3D::new(-3.0, 6.0, 10.0);
    let r = Ray::between(origin, center);

    let t = s.hit(&r).unwrap();
    assert!(feq(t, origin.distance(&center) - 2.0));
}

#[test]
fn tangent_ray_hits_once() {
    let s = Shape::sphere(Point3D::origin(), 1.0);
    let r = Ray::new(Point3D::new(0.0, 1.0, -5.0), Vector3D::new(0.0, 0.0, 1.0));

    assert_eq!(s.hit(&r), Some(5.0));
}

#[test]
fn ray_misses_sphere() {
    let s = Shape::sphere(Point3D::origin(), 1.0);
    let r = Ray::new(Point3D::new(0.0, 2.0, -5.0), Vector3D::new(0.0, 0.0, 1.0));

    assert_eq!(s.hit(&r), None);
}

#[test]
fn ray_from_inside_sphere_does_not_hit() {
    let s = Shape::sphere(Point3D::origin(), 1.0);
    let r = Ray::new(Point3D::origin(), Vector3D::new(0.0, 0.0, 1.0));

    assert_eq!(s.hit(&r), None);
}

#[test]
fn sphere_behind_ray() {
    let s = Shape::sphere(Point3D::origin(), 1.0);
    let r = Ray::new(Point3D::new(0.0, 0.0, 5.0), Vector3D::new(0.0, 0.0, 1.0));

    assert_eq!(s.hit(&r), None);
}

#[test]
fn translated_sphere() {
    let mut s = Shape::sphere(Point3D::origin(), 1.0);
    s.set_transform(Matrix4D::translation(5.0, 0.0, 0.0)).unwrap();

    let r = Ray::new(Point3D::new(5.0, 0.0, -5.0), Vector3D::new(0.0, 0.0, 1.0));
    assert_eq!(s.hit(&r), Some(4.0));

    let miss = Ray::new(Point3D::new(0.0, 0.0, -5.0), Vector3D::new(0.0, 0.0, 1.0));
    assert_eq!(s.hit(&miss), None);
}

#[test]
fn non_uniformly_scaled_sphere_reports_world_t() {
    let mut s = Shape::sphere(Point3D::origin(), 1.0);
    s.set_transform(Matrix4D::scaling(2.0, 1.0, 1.0)).unwrap();

    let r = Ray::new(Point3D::new(-5.0, 0.0, 0.0), Vector3D::new(1.0, 0.0, 0.0));
    let t = s.hit(&r).unwrap();

    assert!(feq(t, 3.0));
    assert_eq!(r.position(t), Point3D::new(-2.0, 0.0, 0.0));
}

#[test]
fn sphere_normals() {
    let s = Shape::sphere(Point3D::new(0.0, 0.0, 2.0), 1.0);
    assert_eq!(s.normal_at(Point3D::new(1.0, 0.0, 2.0)), Vector3D::new(1.0, 0.0, 0.0));

    let k = 3.0f64.sqrt() / 3.0;
    let u = Shape::sphere(Point3D::origin(), 1.0);
    assert_eq!(u.normal_at(Point3D::new(k, k, k)), Vector3D::new(k, k, k));
}

#[test]
fn normal_on_transformed_sphere() {
    let mut s = Shape::sphere(Point3D::origin(), 1.0);
    s.set_transform(Matrix4D::scaling(1.0, 0.5, 1.0)
        * Matrix4D::rotation_z(std::f64::consts::PI / 5.0)).unwrap();

    let k = 2.0f64.sqrt() / 2.0;
    let n = s.normal_at(Point3D::new(0.0, k, -k));
    assert_eq!(n, Vector3D::new(0.0, 0.97014, -0.24254));
}

#[test]
fn plane_parallel_ray_never_hits() {
    let p = Shape::plane(Vector3D::new(0.0, 1.0, 0.0), 0.0);
    let above = Ray::new(Point3D::new(0.0, 10.0, 0.0), Vector3D::new(1.0, 0.0, 0.0));
    let coplanar = Ray::new(Point3D::origin(), Vector3D::new(0.0, 0.0, 1.0));

    assert_eq!(p.hit(&above), None);
    assert_eq!(p.hit(&coplanar), None);
}

#[test]
fn plane_hit_from_above_and_below() {
    let p = Shape::plane(Vector3D::new(0.0, 1.0, 0.0), -1.0);
    let down = Ray::new(Point3D::new(0.0, 2.0, 0.0), Vector3D::new(0.0, -1.0, 0.0));
    let up = Ray::new(Point3D::new(0.0, -4.0, 0.0), Vector3D::new(0.0, 1.0, 0.0));

    assert_eq!(p.hit(&down), Some(3.0));
    assert_eq!(p.hit(&up), Some(3.0));
}

#[test]
fn plane_pointing_away_never_hits() {
    let p = Shape::plane(Vector3D::new(0.0, 1.0, 0.0), -1.0);
    let r = Ray::new(Point3D::new(0.0, 2.0, 0.0), Vector3D::new(0.0, 1.0, 0.0));

    assert_eq!(p.hit(&r), None);
}

#[test]
fn plane_normal_is_normalized_and_constant() {
    let p = Shape::plane(Vector3D::new(0.0, 0.0, 4.0), 2.0);
    let r = Ray::new(Point3D::origin(), Vector3D::new(0.0, 0.0, 1.0));

    assert_eq!(p.hit(&r), Some(2.0));
    assert_eq!(p.normal_at(Point3D::new(7.0, -3.0, 2.0)), Vector3D::new(0.0, 0.0, 1.0));
}

#[test]
fn rotated_plane() {
    let mut p = Shape::plane(Vector3D::new(0.0, 1.0, 0.0), 0.0);
    p.set_transform(Matrix4D::rotation_x(std::f64::consts::PI / 2.0)).unwrap();

    // The floor is now the z = 0 wall, facing +z.
    let r = Ray::new(Point3D::new(0.0, 0.0, -3.0), Vector3D::new(0.0, 0.0, 1.0));
    assert_eq!(p.hit(&r), Some(3.0));
    assert_eq!(p.normal_at(Point3D::origin()), Vector3D::new(0.0, 0.0, 1.0));
}

#[test]
fn degenerate_shapes_are_rejected() {
    assert!(Shape::sphere(Point3D::origin(), 0.0).validate().is_err());
    assert!(Shape::plane(Vector3D::zero(), 1.0).validate().is_err());
    assert!(Shape::sphere(Point3D::origin(), 1.0).validate().is_ok());

    let mut s = Shape::sphere(Point3D::origin(), 1.0);
    assert!(s.set_transform(Matrix4D::scaling(0.0, 1.0, 1.0)).is_err());
    assert_eq!(s.transform(), &Matrix4D::identity());
}
