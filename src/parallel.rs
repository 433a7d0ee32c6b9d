use std::thread;

use crossbeam_channel::bounded;
use log::{ debug, info };

use crate::ray::Ray;
use crate::color::Color;
use crate::canvas::Canvas;
use crate::config::RenderSettings;
use crate::error::RenderError;
use crate::scene::Scene;

/// One unit of work: a primary ray and the framebuffer cell its color goes in.
///
/// Every cell is handed out exactly once, so workers write their results
/// without any locking.
struct PixelTask<'a> {
    ray: Ray,
    cell: &'a mut Color,
}

/// Renders a scene on a pool of worker threads.
///
/// The calling thread produces one task per pixel in raster order and feeds
/// them through a bounded queue of `settings.queue_capacity` tasks; it blocks
/// whenever the queue is full. `settings.workers` threads take tasks off the
/// queue until it is closed and drained, then exit. All workers have been
/// joined by the time this returns.
///
/// Each pixel's color depends only on the scene and its own ray, so the
/// result is identical to `Camera::render` regardless of worker count or
/// scheduling.
pub fn render(scene: &Scene, settings: &RenderSettings) -> Result<Canvas, RenderError> {
    let mut image = Canvas::new(settings.width, settings.height)?;

    let (width, height) = (settings.width, settings.height);
    let max_depth = settings.max_depth;
    let workers = settings.workers.max(1);
    let capacity = settings.queue_capacity.max(1);

    info!("Rendering {}x{} using {} worker(s), depth {}",
        width, height, workers, max_depth);

    let pixels = image.pixels_mut();
    let counts = thread::scope(|s| -> Result<Vec<usize>, RenderError> {
        let (sender, receiver) = bounded::<PixelTask>(capacity);

        let mut handles = Vec::with_capacity(workers);
        for id in 0..workers {
            let receiver = receiver.clone();
            let handle = thread::Builder::new()
                .name(format!("render-{}", id))
                .spawn_scoped(s, move || {
                    let mut done = 0usize;
                    for task in receiver.iter() {
                        *task.cell = scene.color_at(&task.ray, max_depth);
                        done += 1;
                    }

                    done
                })?;

            handles.push(handle);
        }

        // Only the workers hold receivers now
        drop(receiver);

        for (i, cell) in pixels.into_iter().enumerate() {
            let ray = scene.camera.ray_for_pixel(i % width, i / width, width, height);

            // Fails only once every worker has gone away
            if sender.send(PixelTask { ray, cell }).is_err() {
                break;
            }
        }

        // Closing the queue lets the workers drain it and exit
        drop(sender);

        handles.into_iter()
            .map(|handle| handle.join().map_err(|_| RenderError::WorkerPanicked))
            .collect()
    })?;

    for (id, count) in counts.iter().enumerate() {
        debug!("Worker {} traced {} pixel(s)", id, count);
    }

    Ok(image)
}

#[cfg(test)]
use crate::tuple::{ Point3D, Vector3D };
#[cfg(test)]
use crate::shape::Shape;
#[cfg(test)]
use crate::light::PointLight;
#[cfg(test)]
use crate::camera::Camera;
#[cfg(test)]
use crate::matrix::Matrix4D;

#[cfg(test)]
fn busy_scene() -> Scene {
    let camera = Camera::new(Point3D::new(0.0, 1.0, 6.0), Vector3D::new(0.0, 1.0, 0.0),
        Vector3D::new(1.333, 0.0, 0.0), Point3D::new(0.0, 0.5, 0.0));
    let light = PointLight::new(Point3D::new(-5.0, 8.0, 5.0), Color::white());

    let mut floor = Shape::plane(Vector3D::new(0.0, 1.0, 0.0), -1.0);
    floor.pigment = Color::rgb(0.6, 0.6, 0.6);
    floor.finish.reflection = 0.3;

    let mut glass = Shape::sphere(Point3D::origin(), 1.0);
    glass.pigment = Color::rgba(0.2, 0.4, 1.0, 0.6);
    glass.finish.specular = 0.8;
    glass.finish.refraction = 0.7;
    glass.finish.ior = 1.5;

    let mut egg = Shape::sphere(Point3D::origin(), 1.0);
    egg.pigment = Color::rgb(1.0, 0.3, 0.1);
    egg.finish.reflection = 0.5;
    egg.set_transform(Matrix4D::translation(2.0, 0.0, -1.0)
        * Matrix4D::scaling(0.5, 1.0, 0.5)).unwrap();

    let mut w = Scene::new(camera, vec![light], vec![floor, glass, egg]).unwrap();
    w.background = Color::rgb(0.1, 0.1, 0.3);
    w
}

#[cfg(test)]
fn small_settings(workers: usize, queue_capacity: usize) -> RenderSettings {
    RenderSettings {
        width: 32,
        height: 24,
        max_depth: 5,
        workers,
        queue_capacity,
    }
}

#[test]
fn parallel_matches_sequential() {
    let w = busy_scene();
    let reference = w.camera.render(&w, &small_settings(1, 1)).unwrap();

    for &(workers, capacity) in [(1, 1), (2, 1), (4, 16), (7, 3)].iter() {
        let image = render(&w, &small_settings(workers, capacity)).unwrap();
        assert_eq!(image.to_rgba8(), reference.to_rgba8());
        assert_eq!(image, reference);
    }
}

#[test]
fn repeated_renders_are_identical() {
    let w = busy_scene();
    let settings = small_settings(4, 4);

    let first = render(&w, &settings).unwrap();
    let second = render(&w, &settings).unwrap();
    assert_eq!(first.to_rgba8(), second.to_rgba8());
}

#[test]
fn more_workers_than_pixels() {
    let w = busy_scene();
    let settings = RenderSettings { width: 2, height: 1, ..small_settings(8, 1) };

    let image = render(&w, &settings).unwrap();
    assert_eq!(image, w.camera.render(&w, &settings).unwrap());
}

#[test]
fn empty_scene_is_all_background() {
    let mut w = Scene::new(Default::default(), Vec::new(), Vec::new()).unwrap();
    w.background = Color::rgb(0.0, 0.5, 0.0);

    let image = render(&w, &small_settings(3, 2)).unwrap();
    for y in 0..24 {
        for x in 0..32 {
            assert_eq!(image.read_pixel(x, y), Some(Color::rgb(0.0, 0.5, 0.0)));
        }
    }
}

#[test]
fn empty_image_is_an_error() {
    let w = busy_scene();
    let settings = RenderSettings { width: 0, ..small_settings(2, 2) };

    assert!(render(&w, &settings).is_err());
}
