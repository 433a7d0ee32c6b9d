use log::debug;

use crate::ray::Ray;
use crate::tuple::Point3D;
use crate::color::Color;
use crate::light::PointLight;
use crate::shape::Shape;
use crate::camera::Camera;
use crate::error::SceneError;
use crate::intersect::{ Intersection, Intersections };

/// A scene with a camera, lights and objects.
///
/// A scene is built once (by one of the loaders, or by hand) and is only ever
/// read while rendering. That is what lets every render worker share a plain
/// `&Scene` without any locking.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    pub camera: Camera,
    pub lights: Vec<PointLight>,
    pub objects: Vec<Shape>,

    /// Returned for rays that hit nothing.
    pub background: Color,
}

impl Default for Scene {
    fn default() -> Scene {
        Scene {
            camera: Default::default(),
            lights: Vec::new(),
            objects: Vec::new(),
            background: Color::black(),
        }
    }
}

impl Scene {
    /// Creates a scene, rejecting degenerate cameras and shapes.
    ///
    /// Empty light and object lists are fine: the image is then unlit or
    /// all background, respectively.
    pub fn new(camera: Camera, lights: Vec<PointLight>, objects: Vec<Shape>)
        -> Result<Scene, SceneError> {
        camera.validate()?;
        for obj in objects.iter() {
            obj.validate()?;
        }

        debug!("Scene has {} light(s) and {} object(s)",
            lights.len(), objects.len());

        Ok(Scene { camera, lights, objects, ..Default::default() })
    }

    /// Intersects a ray against all objects, skipping the one at `exclude`.
    ///
    /// Excluding an object keeps a ray that leaves a surface from hitting that
    /// same surface again at `t` of (almost) zero.
    pub fn intersect(&self, r: &Ray, exclude: Option<usize>) -> Intersections {
        self.objects.iter()
            .enumerate()
            .filter(|(index, _)| Some(*index) != exclude)
            .filter_map(|(index, obj)| obj.hit(r).map(|t| Intersection::new(t, index)))
            .collect()
    }

    /// Finds the nearest object hit by a ray, skipping the one at `exclude`.
    pub fn nearest_hit(&self, r: &Ray, exclude: Option<usize>) -> Option<Intersection> {
        self.intersect(r, exclude).hit()
    }

    /// Determines whether a point on object `self_index` is shadowed from
    /// `light`.
    ///
    /// The point is in shadow if the ray towards the light hits any *other*
    /// object, however far along the ray that hit is. Objects beyond the
    /// light still count. The object the point lies on is never tested, so a
    /// surface can't shadow itself.
    pub fn is_shadowed(&self, p: Point3D, light: &PointLight, self_index: usize) -> bool {
        // No direction to cast along
        if p.distance(&light.position) == 0.0 {
            return false;
        }

        let r = Ray::between(p, light.position);

        self.objects.iter()
            .enumerate()
            .filter(|(index, _)| *index != self_index)
            .any(|(_, obj)| obj.hit(&r).is_some())
    }
}

#[cfg(test)]
use crate::tuple::Vector3D;

#[cfg(test)]
fn two_spheres() -> Scene {
    let light = PointLight::new(Point3D::new(-10.0, 10.0, -10.0), Color::white());
    let s1 = Shape::sphere(Point3D::origin(), 1.0);
    let s2 = Shape::sphere(Point3D::new(0.0, 0.0, 4.0), 0.5);

    Scene::new(Default::default(), vec![light], vec![s1, s2]).unwrap()
}

#[test]
fn nearest_hit_over_all_objects() {
    let w = two_spheres();
    let r = Ray::new(Point3D::new(0.0, 0.0, -5.0), Vector3D::new(0.0, 0.0, 1.0));

    assert_eq!(w.intersect(&r, None).intersections.len(), 2);
    assert_eq!(w.nearest_hit(&r, None), Some(Intersection::new(4.0, 0)));
}

#[test]
fn excluded_object_is_skipped() {
    let w = two_spheres();
    let r = Ray::new(Point3D::new(0.0, 0.0, -5.0), Vector3D::new(0.0, 0.0, 1.0));

    assert_eq!(w.nearest_hit(&r, Some(0)), Some(Intersection::new(8.5, 1)));
    assert_eq!(w.nearest_hit(&r, Some(1)), Some(Intersection::new(4.0, 0)));
}

#[test]
fn no_objects_no_hit() {
    let w = Scene::new(Default::default(), Vec::new(), Vec::new()).unwrap();
    let r = Ray::new(Point3D::origin(), Vector3D::new(0.0, 0.0, 1.0));

    assert_eq!(w.nearest_hit(&r, None), None);
}

#[test]
fn shadow_collinear_point_and_light() {
    let w = two_spheres();
    assert!(!w.is_shadowed(Point3D::new(0.0, 10.0, 0.0), &w.lights[0], 1));
}

#[test]
fn shadow_object_between_point_and_light() {
    let w = two_spheres();
    assert!(w.is_shadowed(Point3D::new(10.0, -10.0, 10.0), &w.lights[0], 1));
}

#[test]
fn object_beyond_light_still_shadows() {
    let w = two_spheres();
    assert!(w.is_shadowed(Point3D::new(-20.0, 20.0, -20.0), &w.lights[0], 1));
}

#[test]
fn sphere_above_overhead_light_shadows_top_of_sphere() {
    let light = PointLight::new(Point3D::new(0.0, 10.0, 0.0), Color::white());
    let below = Shape::sphere(Point3D::origin(), 1.0);
    let above = Shape::sphere(Point3D::new(0.0, 20.0, 0.0), 1.0);
    let w = Scene::new(Default::default(), vec![light], vec![below, above]).unwrap();

    assert!(w.is_shadowed(Point3D::new(0.0, 1.0, 0.0), &w.lights[0], 0));
    assert!(w.is_shadowed(Point3D::new(0.0, 19.0, 0.0), &w.lights[0], 1));
}

#[test]
fn light_position_is_never_shadowed() {
    let w = two_spheres();
    assert!(!w.is_shadowed(w.lights[0].position, &w.lights[0], 1));
}

#[test]
fn shadow_object_behind_point() {
    let w = two_spheres();
    assert!(!w.is_shadowed(Point3D::new(-2.0, 2.0, -2.0), &w.lights[0], 1));
}

#[test]
fn surface_never_shadows_itself() {
    let w = two_spheres();

    // Points all over the unit sphere, including its far side from the light.
    let k = 3.0f64.sqrt() / 3.0;
    let points = [
        Point3D::new(1.0, 0.0, 0.0),
        Point3D::new(0.0, -1.0, 0.0),
        Point3D::new(0.0, 0.0, -1.0),
        Point3D::new(k, -k, k),
        Point3D::new(-k, k, -k),
    ];

    let only_sphere = Scene::new(Default::default(), w.lights.clone(),
        vec![w.objects[0].clone()]).unwrap();
    for p in points.iter() {
        assert!(!only_sphere.is_shadowed(*p, &only_sphere.lights[0], 0));
    }
}

#[test]
fn degenerate_objects_rejected() {
    let bad = Shape::sphere(Point3D::origin(), -1.0);
    assert!(Scene::new(Default::default(), Vec::new(), vec![bad]).is_err());
}
