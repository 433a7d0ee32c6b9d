use std::convert::TryFrom;
use std::fs;
use std::path::Path;

use serde::{ Serialize, Deserialize };

use crate::tuple::{ Point3D, Vector3D };
use crate::color::Color;
use crate::matrix::Matrix4D;
use crate::light::{ PointLight, Finish };
use crate::shape::Shape;
use crate::camera::Camera;
use crate::scene::Scene;
use crate::error::SceneError;

/// Parses a JSON scene description into a validated `Scene`.
pub fn parse(input: &str) -> Result<Scene, SceneError> {
    let scene_json: SceneJson = serde_json::from_str(input)?;
    Scene::try_from(scene_json)
}

/// Reads and parses a JSON scene file.
pub fn load(path: &Path) -> Result<Scene, SceneError> {
    let input = fs::read_to_string(path)?;
    parse(&input)
}

impl TryFrom<SceneJson> for Scene {
    type Error = SceneError;

    fn try_from(scene_json: SceneJson) -> Result<Scene, SceneError> {
        let camera = scene_json.camera.map_or_else(Camera::default, Camera::from);

        let lights = scene_json.lights.iter()
            .map(|light| PointLight::new(
                light.location.as_slice().into(),
                light.color.as_slice().into()
            ))
            .collect();

        let objects = scene_json.objects.into_iter()
            .map(Shape::try_from)
            .collect::<Result<Vec<Shape>, SceneError>>()?;

        let mut scene = Scene::new(camera, lights, objects)?;
        if let Some(background) = scene_json.background {
            scene.background = background.as_slice().into();
        }

        Ok(scene)
    }
}

#[derive(Serialize, Deserialize)]
pub struct SceneJson {
    camera: Option<CameraJson>,
    background: Option<Vec<f64>>,

    #[serde(default)]
    lights: Vec<LightJson>,

    #[serde(default)]
    objects: Vec<ObjectJson>,
}

/// Camera settings; any left out keep their defaults.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct CameraJson {
    location: Option<Vec<f64>>,
    up: Option<Vec<f64>>,
    right: Option<Vec<f64>>,
    look_at: Option<Vec<f64>>,
}

impl From<CameraJson> for Camera {
    fn from(camera_json: CameraJson) -> Camera {
        let mut camera = Camera::default();

        if let Some(location) = camera_json.location {
            camera.location = location.as_slice().into();
        }
        if let Some(up) = camera_json.up {
            camera.up = up.as_slice().into();
        }
        if let Some(right) = camera_json.right {
            camera.right = right.as_slice().into();
        }
        if let Some(look_at) = camera_json.look_at {
            camera.look_at = look_at.as_slice().into();
        }

        camera
    }
}

#[derive(Clone, Serialize, Deserialize)]
struct LightJson {
    location: Vec<f64>,
    color: Vec<f64>,
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum PrimitiveJson {
    Sphere { center: Vec<f64>, radius: f64 },
    Plane { normal: Vec<f64>, distance: f64 },
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum TransformJson {
    Translate(Vec<f64>),
    Scale(Vec<f64>),
    Rotate(Vec<f64>),
}

#[derive(Clone, Serialize, Deserialize)]
struct ObjectJson {
    #[serde(flatten)]
    primitive: PrimitiveJson,

    pigment: Option<Vec<f64>>,

    #[serde(default)]
    finish: Finish,

    #[serde(default)]
    transforms: Vec<TransformJson>,
}

impl TryFrom<ObjectJson> for Shape {
    type Error = SceneError;

    fn try_from(object_json: ObjectJson) -> Result<Shape, SceneError> {
        let mut shape = match object_json.primitive {
            PrimitiveJson::Sphere { center, radius } => {
                let center: Point3D = center.as_slice().into();
                Shape::sphere(center, radius)
            },
            PrimitiveJson::Plane { normal, distance } => {
                let normal: Vector3D = normal.as_slice().into();
                Shape::plane(normal, distance)
            },
        };

        if let Some(pigment) = object_json.pigment {
            shape.pigment = Color::from(pigment.as_slice());
        }
        shape.finish = object_json.finish;

        // Same convention as the POV loader: each transform applies after
        // the ones listed before it.
        let transform = object_json.transforms.iter()
            .fold(Matrix4D::identity(), |acc, t| {
                let step = match t {
                    TransformJson::Translate(v) => {
                        let v: Vector3D = v.as_slice().into();
                        Matrix4D::translation(v.x, v.y, v.z)
                    },
                    TransformJson::Scale(v) => {
                        let v: Vector3D = v.as_slice().into();
                        Matrix4D::scaling(v.x, v.y, v.z)
                    },
                    TransformJson::Rotate(v) => Matrix4D::rotation_degrees(v.as_slice().into()),
                };

                step * acc
            });

        shape.set_transform(transform)?;
        Ok(shape)
    }
}

#[cfg(test)]
use crate::shape::ShapeType;

#[test]
fn full_scene() {
    let scene = parse(r#"{
        "camera": { "location": [0, 1, 6], "look_at": [0, 0, 0] },
        "background": [0.1, 0.1, 0.2],
        "lights": [ { "location": [-5, 8, 5], "color": [1, 1, 1] } ],
        "objects": [
            {
                "type": "sphere", "center": [0, 0, 0], "radius": 1.5,
                "pigment": [1, 0, 0, 0.5],
                "finish": { "specular": 0.4, "reflection": 0.25 },
                "transforms": [ { "scale": [1, 2, 1] }, { "translate": [0, 1, 0] } ]
            },
            { "type": "plane", "normal": [0, 2, 0], "distance": -1 }
        ]
    }"#).unwrap();

    assert_eq!(scene.camera.location, Point3D::new(0.0, 1.0, 6.0));
    assert_eq!(scene.camera.up, Vector3D::new(0.0, 1.0, 0.0));
    assert_eq!(scene.background, Color::rgb(0.1, 0.1, 0.2));
    assert_eq!(scene.lights.len(), 1);
    assert_eq!(scene.lights[0].color, Color::white());

    let sphere = &scene.objects[0];
    assert_eq!(sphere.ty, ShapeType::Sphere { center: Point3D::origin(), radius: 1.5 });
    assert_eq!(sphere.pigment, Color::rgba(1.0, 0.0, 0.0, 0.5));
    assert_eq!(sphere.finish, Finish { specular: 0.4, reflection: 0.25, ..Default::default() });
    assert_eq!(*sphere.transform() * Point3D::new(0.0, 1.0, 0.0),
        Point3D::new(0.0, 3.0, 0.0));

    assert_eq!(scene.objects[1].ty, ShapeType::Plane {
        normal: Vector3D::new(0.0, 1.0, 0.0), distance: -1.0
    });
}

#[test]
fn empty_scene() {
    let scene = parse("{}").unwrap();

    assert_eq!(scene.camera, Camera::default());
    assert!(scene.lights.is_empty());
    assert!(scene.objects.is_empty());
}

#[test]
fn unknown_primitive_is_an_error() {
    let err = parse(r#"{ "objects": [ { "type": "torus", "radius": 1 } ] }"#);
    assert!(matches!(err, Err(SceneError::Json(_))));
}

#[test]
fn degenerate_geometry_is_rejected() {
    let err = parse(r#"{ "objects": [
        { "type": "sphere", "center": [0, 0, 0], "radius": 1,
          "transforms": [ { "scale": [1, 0, 1] } ] }
    ] }"#);
    assert!(matches!(err, Err(SceneError::DegenerateGeometry(_))));
}

#[test]
fn loaders_agree() {
    let from_json = parse(r#"{
        "lights": [ { "location": [0, 10, 0], "color": [1, 1, 1] } ],
        "objects": [ { "type": "sphere", "center": [0, 0, -3], "radius": 1,
            "pigment": [0, 1, 0], "transforms": [ { "rotate": [0, 90, 0] } ] } ]
    }"#).unwrap();
    let from_pov = crate::pov::parse("
        light_source { <0, 10, 0> color rgb <1, 1, 1> }
        sphere { <0, 0, -3>, 1 pigment { color rgb <0, 1, 0> } rotate <0, 90, 0> }
    ").unwrap();

    assert_eq!(from_json, from_pov);
}
