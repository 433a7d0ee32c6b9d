use serde::{ Serialize, Deserialize };

use crate::color::Color;
use crate::tuple::Point3D;
use crate::shape::Shape;

/// A point light.
///
/// A very simple light source. Provides a color and a position where light is
/// produced from.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct PointLight {
    pub position: Point3D,
    pub color: Color,
}

impl PointLight {
    pub fn new(position: Point3D, color: Color) -> PointLight {
        PointLight { position, color }
    }
}

/// A finish (material) record.
///
/// Coefficients for the local illumination model (`ambient`, `diffuse`,
/// `specular` and `roughness`) plus the weights of the recursive rays
/// (`reflection`, `refraction`) and the index of refraction `ior`.
///
/// Smaller `roughness` gives a sharper highlight: the specular term is raised
/// to the power `1 / roughness`.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Finish {
    pub ambient: f64,
    pub diffuse: f64,
    pub specular: f64,
    pub roughness: f64,

    pub reflection: f64,
    pub refraction: f64,
    pub ior: f64,
}

impl Default for Finish {
    fn default() -> Finish {
        Finish {
            ambient: 0.1,
            diffuse: 0.6,
            specular: 0.0,
            roughness: 0.05,

            reflection: 0.0,
            refraction: 0.0,
            ior: 1.0,
        }
    }
}

/// The ambient contribution of a light on a shape.
///
/// This is all a light contributes to a point that is in its shadow.
pub fn ambient(obj: &Shape, light: &PointLight) -> Color {
    light.color * obj.color() * obj.finish().ambient
}

/// Calculates the color a light contributes to a point on a shape.
///
/// The model is Phong-style with a half-vector highlight:
///
/// ```text
/// diffuse  = light * pigment * diffuse  * clamp(N.L, 0, 1)
/// specular = light * pigment * specular * clamp(N.H, 0, 1) ^ (1 / roughness)
/// ambient  = light * pigment * ambient
/// ```
///
/// where `L` points from `point` to the light, `V` from `point` to `eye`, and
/// `H = normalize(L + V)`. The three terms are combined with the alpha-aware
/// color addition.
///
/// If this point is in a shadow (parameter `in_shadow`), only ambient light is
/// used; diffuse and specular are suppressed entirely.
pub fn lighting(obj: &Shape, light: &PointLight, point: Point3D, eye: Point3D,
    in_shadow: bool) -> Color {
    let ambient = ambient(obj, light);

    // If the point is in a shadow, only calculate ambient light
    if in_shadow {
        return ambient;
    }

    let finish = obj.finish();
    let effective_color = light.color * obj.color();

    let normalv = obj.normal_at(point);
    let eyev = (eye - point).normalize();
    let lightv = (light.position - point).normalize();

    let light_dot_normal = normalv.dot(&lightv).clamp(0.0, 1.0);
    let diffuse = effective_color * (finish.diffuse * light_dot_normal);

    // With the eye exactly opposite the light there is no half vector.
    let halfv = lightv + eyev;
    let factor = if halfv.is_zero() {
        0.0
    } else {
        let half_dot_normal = normalv.dot(&halfv.normalize()).clamp(0.0, 1.0);
        half_dot_normal.powf(1.0 / finish.roughness)
    };
    let specular = effective_color * (finish.specular * factor);

    diffuse + specular + ambient
}

#[cfg(test)]
fn shiny_sphere() -> Shape {
    let mut s = Shape::sphere(Point3D::origin(), 1.0);
    s.pigment = Color::white();
    s.finish = Finish {
        ambient: 0.1,
        diffuse: 0.9,
        specular: 0.9,
        roughness: 0.005,
        ..Default::default()
    };

    s
}

#[test]
fn eye_between_light_and_surface() {
    let s = shiny_sphere();
    let light = PointLight::new(Point3D::new(0.0, 0.0, -10.0), Color::white());

    let res = lighting(&s, &light, Point3D::new(0.0, 0.0, -1.0),
        Point3D::new(0.0, 0.0, -10.0), false);
    assert_eq!(res, Color::rgb(1.9, 1.9, 1.9));
}

#[test]
fn eye_offset_45_loses_highlight() {
    let s = shiny_sphere();
    let light = PointLight::new(Point3D::new(0.0, 0.0, -10.0), Color::white());

    // Far off to the side the half vector drifts away from the normal and the
    // 200th power of its cosine vanishes.
    let res = lighting(&s, &light, Point3D::new(0.0, 0.0, -1.0),
        Point3D::new(0.0, 100.0, -101.0), false);
    assert_eq!(res, Color::rgb(1.0, 1.0, 1.0));
}

#[test]
fn eye_across_surface_from_light() {
    let s = shiny_sphere();
    let light = PointLight::new(Point3D::new(0.0, 0.0, 10.0), Color::white());

    let res = lighting(&s, &light, Point3D::new(0.0, 0.0, -1.0),
        Point3D::new(0.0, 0.0, -10.0), false);
    assert_eq!(res, Color::rgb(0.1, 0.1, 0.1));
}

#[test]
fn shadowed_point_is_ambient_only() {
    let s = shiny_sphere();
    let light = PointLight::new(Point3D::new(0.0, 0.0, -10.0), Color::white());

    let res = lighting(&s, &light, Point3D::new(0.0, 0.0, -1.0),
        Point3D::new(0.0, 0.0, -10.0), true);
    assert_eq!(res, Color::rgb(0.1, 0.1, 0.1));
    assert_eq!(res, ambient(&s, &light));
}

#[test]
fn light_and_pigment_filter_each_other() {
    let mut s = shiny_sphere();
    s.pigment = Color::rgb(1.0, 0.5, 0.0);
    s.finish.specular = 0.0;
    let light = PointLight::new(Point3D::new(0.0, 0.0, -10.0),
        Color::rgb(0.5, 1.0, 1.0));

    let res = lighting(&s, &light, Point3D::new(0.0, 0.0, -1.0),
        Point3D::new(0.0, 0.0, -10.0), false);
    assert_eq!(res, Color::rgb(0.5, 0.5, 0.0));
}
