// Floating point comparisons
pub const FEQ_EPSILON: f64 = 0.0001;

// Default image size
pub const CANVAS_WIDTH: usize = 640;
pub const CANVAS_HEIGHT: usize = 480;
pub const OUT_FILE: &str = "trace.png";

// Maximum recursion depth for reflection, refraction and pass-through rays
pub const MAX_DEPTH: i32 = 7;

// Offset along a refracted ray before it is cast again
pub const REFRACTION_EPSILON: f64 = 0.01;

// Pending pixel tasks per worker before the producer blocks
pub const QUEUE_TASKS_PER_WORKER: usize = 4;

// Environment variable overriding the worker pool size
pub const WORKERS_ENV: &str = "POV_TRACER_WORKERS";

// Index of refraction outside every object
pub const VACUUM_RI: f64 = 1.0;
