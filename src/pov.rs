//! A parser for a small subset of the POV-Ray scene description language.
//!
//! Supported top-level items are `camera`, `light_source`, `background`,
//! `sphere` and `plane`. `box`, `cone` and `triangle` blocks are recognised
//! and skipped with a warning. Anything else at the top level is ignored.
//!
//! ```text
//! camera { location <0, 0, 5> look_at <0, 0, 0> }
//! light_source { <-10, 10, 10> color rgb <1, 1, 1> }
//! sphere { <0, 0, 0>, 1
//!     pigment { color rgbf <1, 0, 0, 0.3> }
//!     finish { ambient 0.2 diffuse 0.4 reflection 0.5 }
//!     scale <1, 2, 1> rotate <0, 0, 45> translate <0, 1, 0>
//! }
//! ```

use std::fs;
use std::path::Path;

use log::{ debug, warn };

use crate::tuple::{ Point3D, Vector3D };
use crate::color::Color;
use crate::matrix::Matrix4D;
use crate::light::{ PointLight, Finish };
use crate::shape::Shape;
use crate::camera::Camera;
use crate::scene::Scene;
use crate::error::SceneError;

/// Splits scene text into tokens.
///
/// Whitespace and commas separate tokens; `<`, `>`, `{` and `}` are tokens on
/// their own. `//` comments run to the end of the line.
pub fn tokenize(input: &str) -> Vec<&str> {
    let mut tokens = Vec::new();

    for line in input.lines() {
        let line = match line.find("//") {
            Some(comment) => &line[..comment],
            None => line,
        };

        let mut start = None;
        for (i, c) in line.char_indices() {
            let separator = c.is_whitespace() || c == ',';
            let single = matches!(c, '<' | '>' | '{' | '}');

            if separator || single {
                if let Some(s) = start.take() {
                    tokens.push(&line[s..i]);
                }
                if single {
                    tokens.push(&line[i..i + 1]);
                }
            } else if start.is_none() {
                start = Some(i);
            }
        }

        if let Some(s) = start {
            tokens.push(&line[s..]);
        }
    }

    tokens
}

/// Parses POV scene text into a validated `Scene`.
pub fn parse(input: &str) -> Result<Scene, SceneError> {
    Parser::new(tokenize(input)).scene()
}

/// Reads and parses a POV scene file.
pub fn load(path: &Path) -> Result<Scene, SceneError> {
    let input = fs::read_to_string(path)?;
    parse(&input)
}

struct Parser<'a> {
    tokens: std::vec::IntoIter<&'a str>,
}

impl<'a> Parser<'a> {
    fn new(tokens: Vec<&'a str>) -> Parser<'a> {
        Parser { tokens: tokens.into_iter() }
    }

    fn scene(&mut self) -> Result<Scene, SceneError> {
        let mut camera = Camera::default();
        let mut background = Color::black();
        let mut lights = Vec::new();
        let mut objects = Vec::new();

        while let Some(token) = self.tokens.next() {
            match token {
                "camera" => self.camera(&mut camera)?,
                "light_source" => lights.push(self.light()?),
                "background" => background = self.background()?,
                "sphere" => objects.push(self.sphere()?),
                "plane" => objects.push(self.plane()?),
                "box" | "cone" | "triangle" => {
                    warn!("Skipping unsupported primitive '{}'", token);
                    self.expect("{")?;
                    self.skip_block()?;
                },
                _ => debug!("Ignoring token '{}'", token),
            }
        }

        let mut scene = Scene::new(camera, lights, objects)?;
        scene.background = background;
        Ok(scene)
    }

    fn next(&mut self) -> Result<&'a str, SceneError> {
        self.tokens.next().ok_or(SceneError::UnexpectedEof)
    }

    fn expect(&mut self, expected: &str) -> Result<(), SceneError> {
        let found = self.next()?;
        if found != expected {
            return Err(unexpected(&format!("'{}'", expected), found));
        }

        Ok(())
    }

    /// Skips the rest of a block whose `{` was already consumed, including
    /// any nested blocks.
    fn skip_block(&mut self) -> Result<(), SceneError> {
        let mut depth = 1;
        while depth > 0 {
            match self.next()? {
                "{" => depth += 1,
                "}" => depth -= 1,
                _ => (),
            }
        }

        Ok(())
    }

    fn number(&mut self) -> Result<f64, SceneError> {
        number(self.next()?)
    }

    /// Parses `< a b c >`, returning the components.
    fn triple(&mut self) -> Result<[f64; 3], SceneError> {
        self.expect("<")?;
        let v = [self.number()?, self.number()?, self.number()?];
        self.expect(">")?;

        Ok(v)
    }

    fn point(&mut self) -> Result<Point3D, SceneError> {
        let [x, y, z] = self.triple()?;
        Ok(Point3D::new(x, y, z))
    }

    fn vector(&mut self) -> Result<Vector3D, SceneError> {
        let [x, y, z] = self.triple()?;
        Ok(Vector3D::new(x, y, z))
    }

    /// Parses `color rgb <r g b>` or `color rgbf <r g b f>`.
    ///
    /// The optional fourth component is a filter value; the color's alpha
    /// is `1 - f`.
    fn color(&mut self) -> Result<Color, SceneError> {
        self.expect("color")?;
        match self.next()? {
            "rgb" | "rgbf" => (),
            other => return Err(SceneError::UnsupportedFormat(other.to_string())),
        }

        self.expect("<")?;
        let (r, g, b) = (self.number()?, self.number()?, self.number()?);

        let alpha = match self.next()? {
            ">" => 1.0,
            filter => {
                let alpha = 1.0 - number(filter)?;
                self.expect(">")?;
                alpha
            }
        };

        Ok(Color::rgba(r, g, b, alpha))
    }

    fn camera(&mut self, camera: &mut Camera) -> Result<(), SceneError> {
        self.expect("{")?;

        loop {
            match self.next()? {
                "location" => camera.location = self.point()?,
                "up" => camera.up = self.vector()?,
                "right" => camera.right = self.vector()?,
                "look_at" => camera.look_at = self.point()?,
                "}" => return Ok(()),
                other => return Err(unexpected("camera setting", other)),
            }
        }
    }

    fn light(&mut self) -> Result<PointLight, SceneError> {
        self.expect("{")?;
        let position = self.point()?;

        // Lights are always opaque
        let Color { r, g, b, .. } = self.color()?;
        self.expect("}")?;

        Ok(PointLight::new(position, Color::rgb(r, g, b)))
    }

    fn background(&mut self) -> Result<Color, SceneError> {
        self.expect("{")?;
        let color = self.color()?;
        self.expect("}")?;

        Ok(color)
    }

    fn sphere(&mut self) -> Result<Shape, SceneError> {
        self.expect("{")?;
        let center = self.point()?;
        let radius = self.number()?;

        let mut sphere = Shape::sphere(center, radius);
        self.modifiers(&mut sphere)?;
        Ok(sphere)
    }

    fn plane(&mut self) -> Result<Shape, SceneError> {
        self.expect("{")?;
        let normal = self.vector()?;
        let distance = self.number()?;

        let mut plane = Shape::plane(normal, distance);
        self.modifiers(&mut plane)?;
        Ok(plane)
    }

    /// Parses object modifiers up to and including the object's closing `}`.
    ///
    /// Transforms are composed in the order they appear, each one applied
    /// after those before it.
    fn modifiers(&mut self, shape: &mut Shape) -> Result<(), SceneError> {
        let mut transform = Matrix4D::identity();

        loop {
            match self.next()? {
                "pigment" => {
                    self.expect("{")?;
                    shape.pigment = self.color()?;
                    self.expect("}")?;
                },
                "finish" => self.finish(&mut shape.finish)?,
                "translate" => {
                    let v = self.vector()?;
                    transform = Matrix4D::translation(v.x, v.y, v.z) * transform;
                },
                "scale" => {
                    let v = self.scale()?;
                    transform = Matrix4D::scaling(v.x, v.y, v.z) * transform;
                },
                "rotate" => {
                    let v = self.vector()?;
                    transform = Matrix4D::rotation_degrees(v) * transform;
                },
                "}" => break,
                other => return Err(unexpected("object modifier", other)),
            }
        }

        shape.set_transform(transform)
    }

    /// Parses a scale: either a vector, or one number for all three axes.
    fn scale(&mut self) -> Result<Vector3D, SceneError> {
        match self.next()? {
            "<" => {
                let v = Vector3D::new(self.number()?, self.number()?, self.number()?);
                self.expect(">")?;
                Ok(v)
            },
            token => {
                let s = number(token)?;
                Ok(Vector3D::new(s, s, s))
            }
        }
    }

    fn finish(&mut self, finish: &mut Finish) -> Result<(), SceneError> {
        self.expect("{")?;

        loop {
            let key = self.next()?;
            let slot = match key {
                "ambient" => &mut finish.ambient,
                "diffuse" => &mut finish.diffuse,
                "specular" => &mut finish.specular,
                "roughness" => &mut finish.roughness,
                "reflection" => &mut finish.reflection,
                "refraction" => &mut finish.refraction,
                "ior" => &mut finish.ior,
                "}" => return Ok(()),
                other => return Err(unexpected("finish setting", other)),
            };

            *slot = self.number()?;
        }
    }
}

fn number(token: &str) -> Result<f64, SceneError> {
    token.parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| SceneError::InvalidNumber { token: token.to_string() })
}

fn unexpected(expected: &str, found: &str) -> SceneError {
    SceneError::UnexpectedToken {
        expected: expected.to_string(),
        found: found.to_string(),
    }
}

#[cfg(test)]
use crate::shape::ShapeType;

#[test]
fn tokens_split_on_brackets_and_commas() {
    let tokens = tokenize("sphere{<1,-2.5 ,3>,0.5}// comment { <\nplane");

    assert_eq!(tokens, vec![
        "sphere", "{", "<", "1", "-2.5", "3", ">", "0.5", "}", "plane"
    ]);
}

#[test]
fn full_scene() {
    let scene = parse("
        // A test scene
        camera {
            location <0, 0, 14>
            up <0, 1, 0>
            right <1.33333, 0, 0>
            look_at <0, 0, 0>
        }

        light_source { <-100, 100, 100> color rgb <1.5, 1.5, 1.5> }

        sphere { <0, 0, 0>, 2
            pigment { color rgb <1.0, 0.0, 1.0> }
            finish { ambient 0.2 diffuse 0.4 specular 0.5 roughness 0.02 }
        }

        plane { <0, 1, 0>, -4
            pigment { color rgbf <0.2, 0.2, 0.8, 0.25> }
            finish { reflection 0.5 refraction 0.3 ior 1.33 }
        }
    ").unwrap();

    assert_eq!(scene.camera.location, Point3D::new(0.0, 0.0, 14.0));
    assert_eq!(scene.camera.right, Vector3D::new(1.33333, 0.0, 0.0));
    assert_eq!(scene.camera.look_at, Point3D::origin());

    assert_eq!(scene.lights, vec![
        PointLight::new(Point3D::new(-100.0, 100.0, 100.0), Color::rgb(1.5, 1.5, 1.5))
    ]);

    assert_eq!(scene.objects.len(), 2);
    let sphere = &scene.objects[0];
    assert_eq!(sphere.ty, ShapeType::Sphere { center: Point3D::origin(), radius: 2.0 });
    assert_eq!(sphere.pigment, Color::rgb(1.0, 0.0, 1.0));
    assert_eq!(sphere.finish, Finish {
        ambient: 0.2,
        diffuse: 0.4,
        specular: 0.5,
        roughness: 0.02,
        ..Default::default()
    });

    let plane = &scene.objects[1];
    assert_eq!(plane.ty, ShapeType::Plane {
        normal: Vector3D::new(0.0, 1.0, 0.0), distance: -4.0
    });
    assert_eq!(plane.pigment, Color::rgba(0.2, 0.2, 0.8, 0.75));
    assert_eq!(plane.finish.ambient, 0.1);
    assert_eq!(plane.finish.reflection, 0.5);
    assert_eq!(plane.finish.refraction, 0.3);
    assert_eq!(plane.finish.ior, 1.33);
}

#[test]
fn defaults_when_unspecified() {
    let scene = parse("sphere { <1, 2, 3>, 1 }").unwrap();

    assert_eq!(scene.camera, Camera::default());
    assert!(scene.lights.is_empty());
    assert_eq!(scene.background, Color::black());
    assert_eq!(scene.objects[0].pigment, Color::black());
    assert_eq!(scene.objects[0].finish, Finish::default());
    assert_eq!(*scene.objects[0].transform(), Matrix4D::identity());
}

#[test]
fn background_color() {
    let scene = parse("background { color rgb <0.1, 0.2, 0.3> }").unwrap();
    assert_eq!(scene.background, Color::rgb(0.1, 0.2, 0.3));
}

#[test]
fn unsupported_primitives_are_skipped() {
    let scene = parse("
        box { <-1, -1, -1>, <1, 1, 1> pigment { color rgb <1, 0, 0> } }
        cone { <0, 0, 0>, 1, <0, 2, 0>, 0 finish { ambient 0.3 } }
        triangle { <0, 0, 0>, <1, 0, 0>, <0, 1, 0> }
        sphere { <0, 0, 0>, 1 }
    ").unwrap();

    assert_eq!(scene.objects.len(), 1);
}

#[test]
fn transforms_apply_in_order() {
    let scene = parse("
        sphere { <0, 0, 0>, 1
            scale 2
            rotate <0, 0, 90>
            translate <5, 0, 0>
        }
    ").unwrap();

    // (1, 0, 0) -> (2, 0, 0) -> (0, 2, 0) -> (5, 2, 0)
    let m = scene.objects[0].transform();
    assert_eq!(*m * Point3D::new(1.0, 0.0, 0.0), Point3D::new(5.0, 2.0, 0.0));
}

#[test]
fn non_uniform_scale() {
    let scene = parse("sphere { <0, 0, 0>, 1 scale <1, 3, 1> }").unwrap();
    let m = scene.objects[0].transform();

    assert_eq!(*m * Point3D::new(0.0, 1.0, 0.0), Point3D::new(0.0, 3.0, 0.0));
}

#[test]
fn camera_rejects_unknown_keys() {
    let err = parse("camera { location <0, 0, 0> angle 60 }").unwrap_err();

    match err {
        SceneError::UnexpectedToken { found, .. } => assert_eq!(found, "angle"),
        e => panic!("unexpected error: {}", e),
    }
}

#[test]
fn finish_rejects_unknown_keys() {
    assert!(parse("sphere { <0, 0, 0>, 1 finish { phong 1 } }").is_err());
}

#[test]
fn bad_numbers() {
    let err = parse("sphere { <0, zero, 0>, 1 }").unwrap_err();

    match err {
        SceneError::InvalidNumber { token } => assert_eq!(token, "zero"),
        e => panic!("unexpected error: {}", e),
    }
}

#[test]
fn unterminated_blocks() {
    assert!(matches!(parse("sphere { <0, 0, 0>, 1"), Err(SceneError::UnexpectedEof)));
    assert!(matches!(parse("camera { location <0, 0"), Err(SceneError::UnexpectedEof)));
    assert!(matches!(parse("box { { }"), Err(SceneError::UnexpectedEof)));
}

#[test]
fn unsupported_color_format() {
    let err = parse("sphere { <0, 0, 0>, 1 pigment { color rgbt <1, 1, 1, 0> } }");
    assert!(matches!(err, Err(SceneError::UnsupportedFormat(_))));
}

#[test]
fn degenerate_geometry_is_rejected() {
    assert!(matches!(parse("sphere { <0, 0, 0>, 0 }"),
        Err(SceneError::DegenerateGeometry(_))));
    assert!(matches!(parse("plane { <0, 0, 0>, 1 }"),
        Err(SceneError::DegenerateGeometry(_))));
    assert!(matches!(parse("sphere { <0, 0, 0>, 1 scale 0 }"),
        Err(SceneError::DegenerateGeometry(_))));
    assert!(matches!(parse("camera { right <0, 0, 0> }"),
        Err(SceneError::DegenerateGeometry(_))));
}
