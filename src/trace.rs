use crate::ray::Ray;
use crate::tuple::{ Point3D, Vector3D };
use crate::color::Color;
use crate::light::{ ambient, lighting };
use crate::scene::Scene;
use crate::intersect::Intersection;
use crate::consts::{ REFRACTION_EPSILON, VACUUM_RI };

/// Computes the direction of a ray refracted through a surface.
///
/// `normal` is the outward surface normal and `ior` the index of refraction
/// inside the surface. A ray travelling against the normal enters the surface;
/// one travelling with it leaves, and sees the indices swapped and the normal
/// flipped. Returns `None` on total internal reflection.
pub fn refracted_direction(incident: Vector3D, normal: Vector3D, ior: f64)
    -> Option<Vector3D> {
    let (n1, n2, normal) = if incident.dot(&normal) < 0.0 {
        (VACUUM_RI, ior, normal)
    } else {
        (ior, VACUUM_RI, -normal)
    };

    let cos_i = incident.dot(&normal);
    let sqrt_comp = n1.powi(2) * (1.0 - cos_i.powi(2)) / n2.powi(2);
    if sqrt_comp > 1.0 {
        return None;
    }

    let direction = (incident - normal * cos_i) * (n1 / n2)
        - normal * (1.0 - sqrt_comp).sqrt();

    Some(direction.normalize())
}

impl Scene {
    /// Traces a ray through the scene with a recursion budget of `depth`.
    ///
    /// Returns `None` when the budget is exhausted (`depth < 0`) or the ray
    /// hits nothing; the object at `exclude` is never hit. Every recursive
    /// ray is traced with `depth - 1`, so the recursion always terminates.
    pub fn trace(&self, r: &Ray, depth: i32, exclude: Option<usize>) -> Option<Color> {
        if depth < 0 {
            return None;
        }

        let hit = self.nearest_hit(r, exclude)?;
        Some(self.shade_hit(r, hit, depth))
    }

    /// Traces a ray, falling back to the background color when it hits
    /// nothing.
    pub fn color_at(&self, r: &Ray, depth: i32) -> Color {
        self.trace(r, depth, None).unwrap_or(self.background)
    }

    fn shade_hit(&self, r: &Ray, hit: Intersection, depth: i32) -> Color {
        let obj = &self.objects[hit.index];
        let finish = obj.finish();

        let point = r.position(hit.t);
        let normal = obj.normal_at(point);

        let mut color = Color::transparent();
        for light in self.lights.iter() {
            if self.is_shadowed(point, light, hit.index) {
                color = color + ambient(obj, light);
                continue;
            }

            color = color + lighting(obj, light, point, self.camera.location, false);

            if finish.reflection > 0.0 {
                let reflected = Ray::new(point, r.direction.reflect(&normal));
                if let Some(c) = self.trace(&reflected, depth - 1, Some(hit.index)) {
                    color = color + c * finish.reflection;
                }
            }

            if finish.refraction > 0.0 {
                if let Some(c) = self.refracted_color(r, point, normal, finish.ior, depth) {
                    color = color + c * finish.refraction;
                }
            }
        }

        // Partially transparent: blend with whatever lies behind this object.
        // The ray carries on from just past the hit so that nearer surfaces
        // aren't found again.
        if color.a < 1.0 {
            let past = Ray::new(point + r.direction * REFRACTION_EPSILON, r.direction);
            let behind = self.trace(&past, depth - 1, Some(hit.index))
                .unwrap_or(self.background);
            color = color * color.a + behind * (1.0 - color.a);
        }

        color
    }

    fn refracted_color(&self, r: &Ray, point: Point3D, normal: Vector3D, ior: f64,
        depth: i32) -> Option<Color> {
        let direction = refracted_direction(r.direction, normal, ior)?;

        // Nudge the origin through the surface so it isn't hit again at t = 0
        let refracted = Ray::new(point + direction * REFRACTION_EPSILON, direction);
        self.trace(&refracted, depth - 1, None)
    }
}

#[cfg(test)]
use crate::shape::Shape;
#[cfg(test)]
use crate::light::{ PointLight, Finish };
#[cfg(test)]
use crate::camera::Camera;

#[cfg(test)]
fn lit_sphere_scene(occluded: bool) -> Scene {
    let camera = Camera::new(Point3D::new(0.0, 0.0, 5.0), Vector3D::new(0.0, 1.0, 0.0),
        Vector3D::new(1.0, 0.0, 0.0), Point3D::new(0.0, 0.0, -1.0));
    let light = PointLight::new(Point3D::new(0.0, 5.0, -5.0), Color::white());

    let mut s = Shape::sphere(Point3D::origin(), 1.0);
    s.pigment = Color::white();
    s.finish.specular = 0.5;
    s.finish.roughness = 1.0;

    let mut objects = vec![s];
    if occluded {
        objects.push(Shape::sphere(Point3D::new(0.0, 2.5, -2.0), 1.0));
    }

    Scene::new(camera, vec![light], objects).unwrap()
}

#[cfg(test)]
fn facing_mirrors() -> Scene {
    let mirror = Finish {
        ambient: 0.1,
        diffuse: 0.0,
        specular: 0.0,
        reflection: 1.0,
        ..Default::default()
    };

    // Two mirrored balls whose poles face each other across the origin
    let mut below = Shape::sphere(Point3D::new(0.0, -2.0, 0.0), 1.0);
    below.pigment = Color::white();
    below.finish = mirror;

    let mut above = Shape::sphere(Point3D::new(0.0, 2.0, 0.0), 1.0);
    above.pigment = Color::white();
    above.finish = mirror;

    let light = PointLight::new(Point3D::new(10.0, 0.0, 0.0), Color::white());
    Scene::new(Default::default(), vec![light], vec![below, above]).unwrap()
}

#[test]
fn lit_sphere_has_highlight() {
    let w = lit_sphere_scene(false);
    let r = w.camera.ray_for_pixel(5, 4, 10, 10);

    // The near pole faces away from the light: no diffuse, but a highlight.
    let c = w.color_at(&r, 7);
    assert!(c.r > 0.1 + 0.01);
    assert_eq!(c.a, 1.0);
}

#[test]
fn occluded_sphere_is_ambient_only() {
    let w = lit_sphere_scene(true);
    let r = w.camera.ray_for_pixel(5, 4, 10, 10);

    assert_eq!(w.color_at(&r, 7), Color::rgb(0.1, 0.1, 0.1));
}

#[test]
fn miss_returns_background_at_every_depth() {
    let mut w = lit_sphere_scene(false);
    w.background = Color::rgb(0.2, 0.3, 0.4);
    let r = Ray::new(Point3D::new(0.0, 0.0, 5.0), Vector3D::new(0.0, 1.0, 0.0));

    for depth in -1..=7 {
        assert_eq!(w.trace(&r, depth, None), None);
        assert_eq!(w.color_at(&r, depth), Color::rgb(0.2, 0.3, 0.4));
    }
}

#[test]
fn exhausted_budget_returns_background() {
    let w = lit_sphere_scene(false);
    let r = Ray::new(Point3D::new(0.0, 0.0, 5.0), Vector3D::new(0.0, 0.0, -1.0));

    assert_eq!(w.trace(&r, -1, None), None);
    assert_eq!(w.color_at(&r, -1), Color::black());
}

#[test]
fn mirror_recursion_stops_at_depth() {
    let w = facing_mirrors();
    let r = Ray::new(Point3D::origin(), Vector3D::new(0.0, -1.0, 0.0));

    // Each bounce adds one ambient term; nothing beyond the budget is added.
    assert_eq!(w.color_at(&r, 0), Color::rgb(0.1, 0.1, 0.1));
    assert_eq!(w.color_at(&r, 3), Color::rgb(0.4, 0.4, 0.4));
    assert_eq!(w.color_at(&r, 7), Color::rgb(0.8, 0.8, 0.8));
}

#[test]
fn refraction_sees_through_sphere() {
    let mut glass = Shape::sphere(Point3D::origin(), 1.0);
    glass.finish = Finish {
        ambient: 0.0,
        diffuse: 0.0,
        refraction: 1.0,
        ior: 1.0,
        ..Default::default()
    };

    let mut back = Shape::sphere(Point3D::new(0.0, 0.0, -5.0), 1.0);
    back.pigment = Color::white();
    back.finish.ambient = 1.0;
    back.finish.diffuse = 0.0;

    let light = PointLight::new(Point3D::new(0.0, 0.0, 10.0), Color::white());
    let w = Scene::new(Default::default(), vec![light], vec![glass, back]).unwrap();
    let r = Ray::new(Point3D::new(0.0, 0.0, 5.0), Vector3D::new(0.0, 0.0, -1.0));

    assert_eq!(w.color_at(&r, 0), Color::black());
    assert_eq!(w.color_at(&r, 1), Color::white());
}

#[test]
fn translucent_shadowed_sphere_blends_background() {
    let mut s = Shape::sphere(Point3D::origin(), 1.0);
    s.pigment = Color::rgba(1.0, 0.0, 0.0, 0.5);
    s.finish.ambient = 1.0;

    let blocker = Shape::sphere(Point3D::new(0.0, 5.0, 0.0), 1.0);
    let light = PointLight::new(Point3D::new(0.0, 10.0, 0.0), Color::white());

    let mut w = Scene::new(Default::default(), vec![light], vec![s, blocker]).unwrap();
    w.background = Color::rgb(0.0, 0.0, 1.0);
    let r = Ray::new(Point3D::new(0.0, 0.0, 5.0), Vector3D::new(0.0, 0.0, -1.0));

    assert_eq!(w.color_at(&r, 3), Color::rgba(0.0625, 0.0, 0.5, 1.0));
}

#[test]
fn stacked_translucent_spheres_show_background() {
    let mut front = Shape::sphere(Point3D::origin(), 1.0);
    front.pigment = Color::rgba(1.0, 0.0, 0.0, 0.5);
    front.finish.ambient = 1.0;

    let mut back = Shape::sphere(Point3D::new(0.0, 0.0, -5.0), 1.0);
    back.pigment = Color::rgba(0.0, 1.0, 0.0, 0.5);
    back.finish.ambient = 1.0;

    // An opaque ceiling keeps both spheres in shadow
    let ceiling = Shape::plane(Vector3D::new(0.0, -1.0, 0.0), -3.0);
    let light = PointLight::new(Point3D::new(0.0, 10.0, 0.0), Color::white());

    let mut w = Scene::new(Default::default(), vec![light],
        vec![front, back, ceiling]).unwrap();
    w.background = Color::rgb(0.0, 0.0, 1.0);
    let r = Ray::new(Point3D::new(0.0, 0.0, 5.0), Vector3D::new(0.0, 0.0, -1.0));

    // Front over back over background
    assert_eq!(w.color_at(&r, 7), Color::rgba(0.0625, 0.03125, 0.25, 1.0));
}

#[test]
fn reflected_highlight_is_seen_from_the_camera() {
    let mut mirror = Shape::plane(Vector3D::new(-1.0, 0.0, 0.0), -4.0);
    mirror.finish = Finish {
        ambient: 0.0,
        diffuse: 0.0,
        reflection: 1.0,
        ..Default::default()
    };

    let mut shiny = Shape::sphere(Point3D::origin(), 1.0);
    shiny.pigment = Color::white();
    shiny.finish = Finish {
        ambient: 0.0,
        diffuse: 0.0,
        specular: 1.0,
        roughness: 0.05,
        ..Default::default()
    };

    let light = PointLight::new(Point3D::new(0.0, 0.0, 5.0), Color::white());
    let camera = Camera::new(Point3D::new(0.0, 0.0, 9.0), Vector3D::new(0.0, 1.0, 0.0),
        Vector3D::new(1.0, 0.0, 0.0), Point3D::new(4.0, 0.0, 5.0));
    let w = Scene::new(camera, vec![light], vec![mirror, shiny]).unwrap();

    // Off the mirror at (4, 0, 5) onto the sphere's pole at (0, 0, 1). Seen
    // from the camera, straight above the pole, the highlight is at full
    // strength; seen from the mirror it would be about 0.2.
    let r = Ray::new(w.camera.location, Vector3D::new(1.0, 0.0, -1.0));
    assert_eq!(w.color_at(&r, 1), Color::white());
}

#[test]
fn refraction_straight_through() {
    let d = refracted_direction(Vector3D::new(0.0, 0.0, -1.0),
        Vector3D::new(0.0, 0.0, 1.0), 1.5);
    assert_eq!(d, Some(Vector3D::new(0.0, 0.0, -1.0)));
}

#[test]
fn refraction_bends_towards_normal() {
    let k = 2.0f64.sqrt() / 2.0;
    let d = refracted_direction(Vector3D::new(k, 0.0, -k),
        Vector3D::new(0.0, 0.0, 1.0), 1.5).unwrap();

    // Snell: sin(t) = sin(45) / 1.5
    let sin_t = k / 1.5;
    assert_eq!(d, Vector3D::new(sin_t, 0.0, -(1.0 - sin_t * sin_t).sqrt()));
}

#[test]
fn total_internal_reflection() {
    // Leaving glass at 60 degrees: sin(t) = 1.5 * sin(60) > 1
    let d = Vector3D::new(3.0f64.sqrt() / 2.0, 0.0, 0.5);
    assert_eq!(refracted_direction(d, Vector3D::new(0.0, 0.0, 1.0), 1.5), None);
}
