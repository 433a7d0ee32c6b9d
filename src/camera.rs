use log::debug;

use crate::ray::Ray;
use crate::tuple::{ Point3D, Vector3D };
use crate::canvas::Canvas;
use crate::config::RenderSettings;
use crate::error::{ SceneError, RenderError };
use crate::scene::Scene;

/// A camera record for generating a canvas.
///
/// The camera sits at `location` and looks towards `look_at`. The image plane
/// is two units in front of it, spanned by `right` horizontally and `up`
/// vertically; each of those reaches from the center of the image to its edge
/// at one unit of plane distance per unit of length. The magnitude of `right`
/// therefore sets both the horizontal field of view and the aspect ratio.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Camera {
    pub location: Point3D,
    pub up: Vector3D,
    pub right: Vector3D,
    pub look_at: Point3D,
}

impl Default for Camera {
    fn default() -> Camera {
        Camera {
            location: Point3D::origin(),
            up: Vector3D::new(0.0, 1.0, 0.0),
            right: Vector3D::new(1.333, 0.0, 0.0),
            look_at: Point3D::new(0.0, 0.0, -1.0),
        }
    }
}

impl Camera {
    pub fn new(location: Point3D, up: Vector3D, right: Vector3D,
        look_at: Point3D) -> Camera {
        Camera { location, up, right, look_at }
    }

    /// Checks that the image-plane basis is non-degenerate.
    pub fn validate(&self) -> Result<(), SceneError> {
        if self.up.is_zero() || self.right.is_zero() {
            return Err(SceneError::DegenerateGeometry(
                "camera up and right vectors must be non-zero".into()
            ));
        }

        if (self.look_at - self.location).is_zero() {
            return Err(SceneError::DegenerateGeometry(
                "camera look_at coincides with its location".into()
            ));
        }

        Ok(())
    }

    /// Computes the primary ray through the lower-left corner of pixel
    /// `(px, py)` of a `width` by `height` image. Row `0` is the top of the
    /// image, so its rays sit one row-step below the top edge.
    pub fn ray_for_pixel(&self, px: usize, py: usize, width: usize,
        height: usize) -> Ray {
        // Offsets of the pixel's corner from the image center, in [-1, 1)
        let u = 2.0 * (px as f64) / (width as f64) - 1.0;
        let v = 1.0 - 2.0 * (py as f64 + 1.0) / (height as f64);

        let forward = (self.look_at - self.location).normalize() * 2.0;
        let direction = forward + self.right * u + self.up * v;

        Ray::new(self.location, direction)
    }

    /// Renders a scene on the calling thread, one pixel at a time.
    ///
    /// Produces exactly the same canvas as `parallel::render`; this is the
    /// reference the parallel dispatcher is checked against.
    pub fn render(&self, scene: &Scene, settings: &RenderSettings)
        -> Result<Canvas, RenderError> {
        let mut image = Canvas::new(settings.width, settings.height)?;
        debug!("Rendering {}x{} sequentially", settings.width, settings.height);

        for y in 0..settings.height {
            for x in 0..settings.width {
                let ray = self.ray_for_pixel(x, y, settings.width, settings.height);
                let color = scene.color_at(&ray, settings.max_depth);
                image.write_pixel(x, y, &color);
            }
        }

        Ok(image)
    }
}

#[test]
fn ray_through_center() {
    let c = Camera::new(Point3D::new(0.0, 0.0, 5.0), Vector3D::new(0.0, 1.0, 0.0),
        Vector3D::new(1.0, 0.0, 0.0), Point3D::new(0.0, 0.0, -1.0));
    let r = c.ray_for_pixel(5, 4, 10, 10);

    assert_eq!(r.origin, Point3D::new(0.0, 0.0, 5.0));
    assert_eq!(r.direction, Vector3D::new(0.0, 0.0, -1.0));
}

#[test]
fn ray_through_corner() {
    let c = Camera::new(Point3D::origin(), Vector3D::new(0.0, 1.0, 0.0),
        Vector3D::new(2.0, 0.0, 0.0), Point3D::new(0.0, 0.0, -1.0));

    // Top-left pixel of a 2x2 image: its lower-left corner is the middle
    // of the image's left edge.
    let r = c.ray_for_pixel(0, 0, 2, 2);
    let e = Vector3D::new(-2.0, 0.0, -2.0).normalize();
    assert_eq!(r.direction, e);

    // The bottom row reaches the bottom edge
    let r = c.ray_for_pixel(0, 1, 2, 2);
    let e = Vector3D::new(-2.0, -1.0, -2.0).normalize();
    assert_eq!(r.direction, e);
}

#[test]
fn rays_step_evenly_across_the_image() {
    let c = Camera::default();
    let (width, height) = (4, 4);

    // Successive columns move by 2·right/width and rows by 2·up/height,
    // measured on the unnormalized plane two units ahead of the camera.
    let on_plane = |px, py| {
        let d = c.ray_for_pixel(px, py, width, height).direction;
        d * (2.0 / d.dot(&Vector3D::new(0.0, 0.0, -1.0)))
    };

    assert_eq!(on_plane(1, 3) - on_plane(0, 3), c.right * 0.5);
    assert_eq!(on_plane(0, 2) - on_plane(0, 3), c.up * 0.5);
}

#[test]
fn ray_when_camera_turned() {
    let c = Camera::new(Point3D::new(1.0, 0.0, 0.0), Vector3D::new(0.0, 1.0, 0.0),
        Vector3D::new(0.0, 0.0, -1.0), Point3D::new(5.0, 0.0, 0.0));
    let r = c.ray_for_pixel(1, 0, 2, 2);

    assert_eq!(r.direction, Vector3D::new(1.0, 0.0, 0.0));
}

#[test]
fn degenerate_cameras_are_rejected() {
    let mut c = Camera::default();
    assert!(c.validate().is_ok());

    c.right = Vector3D::zero();
    assert!(c.validate().is_err());

    let same = Camera { look_at: Point3D::origin(), ..Default::default() };
    assert!(same.validate().is_err());
}
