//! Render settings and worker-count resolution.

use std::num::NonZeroUsize;
use std::thread;

use log::warn;

use crate::consts::{ CANVAS_WIDTH, CANVAS_HEIGHT, MAX_DEPTH, QUEUE_TASKS_PER_WORKER, WORKERS_ENV };
use crate::error::ConfigError;

/// Everything about a render that isn't part of the scene itself.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RenderSettings {
    /// Image width, in pixels.
    pub width: usize,

    /// Image height, in pixels.
    pub height: usize,

    /// Recursion budget of the tracer. `0` allows primary rays only.
    pub max_depth: i32,

    /// Number of render worker threads.
    pub workers: usize,

    /// Capacity of the pixel task queue between the producer and workers.
    pub queue_capacity: usize,
}

impl Default for RenderSettings {
    fn default() -> RenderSettings {
        RenderSettings::with_workers(default_workers())
    }
}

impl RenderSettings {
    /// Default settings with a given worker count. The queue capacity scales
    /// with it.
    pub fn with_workers(workers: usize) -> RenderSettings {
        let workers = workers.max(1);

        RenderSettings {
            width: CANVAS_WIDTH,
            height: CANVAS_HEIGHT,
            max_depth: MAX_DEPTH,
            workers,
            queue_capacity: workers * QUEUE_TASKS_PER_WORKER,
        }
    }
}

/// The number of hardware threads, or `1` if that can't be determined.
pub fn default_workers() -> usize {
    thread::available_parallelism().map_or(1, NonZeroUsize::get)
}

/// Parses a worker count. Only positive integers are accepted.
pub fn parse_workers(value: &str) -> Result<usize, ConfigError> {
    match value.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ConfigError::InvalidWorkerCount { value: value.to_string() }),
    }
}

/// Picks the worker count: an explicit request first, then the
/// `POV_TRACER_WORKERS` environment variable, then the hardware default.
///
/// An unparsable environment value is reported and skipped.
pub fn resolve_workers(requested: Option<usize>) -> usize {
    let from_env = std::env::var(WORKERS_ENV).ok();
    resolve_workers_from(requested, from_env.as_deref())
}

fn resolve_workers_from(requested: Option<usize>, env: Option<&str>) -> usize {
    if let Some(n) = requested.filter(|n| *n > 0) {
        return n;
    }

    if let Some(value) = env {
        match parse_workers(value) {
            Ok(n) => return n,
            Err(e) => warn!("{}: {}; using the default", WORKERS_ENV, e),
        }
    }

    default_workers()
}

#[test]
fn default_settings() {
    let s = RenderSettings::with_workers(3);

    assert_eq!(s.width, 640);
    assert_eq!(s.height, 480);
    assert_eq!(s.max_depth, 7);
    assert_eq!(s.workers, 3);
    assert_eq!(s.queue_capacity, 12);
}

#[test]
fn zero_workers_means_one() {
    assert_eq!(RenderSettings::with_workers(0).workers, 1);
}

#[test]
fn parse_worker_counts() {
    assert_eq!(parse_workers("8"), Ok(8));
    assert_eq!(parse_workers(" 2 "), Ok(2));
    assert_eq!(parse_workers("0"),
        Err(ConfigError::InvalidWorkerCount { value: "0".into() }));
    assert!(parse_workers("many").is_err());
    assert!(parse_workers("-4").is_err());
}

#[test]
fn worker_resolution_order() {
    assert_eq!(resolve_workers_from(Some(5), Some("3")), 5);
    assert_eq!(resolve_workers_from(None, Some("3")), 3);
    assert_eq!(resolve_workers_from(None, Some("bogus")), default_workers());
    assert_eq!(resolve_workers_from(Some(0), None), default_workers());
    assert_eq!(resolve_workers_from(None, None), default_workers());
}
