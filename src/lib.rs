pub mod consts;
pub mod error;
pub mod config;

pub mod tuple;
pub mod matrix;
pub mod ray;

pub mod color;
pub mod light;
pub mod shape;
pub mod intersect;
pub mod camera;
pub mod scene;
pub mod trace;

pub mod canvas;
pub mod parallel;

pub mod pov;
pub mod json;

use consts::FEQ_EPSILON;

/// Approximate floating point equality, used by the `PartialEq` impls of
/// tuples, colors and matrices.
pub fn feq(left: f64, right: f64) -> bool {
    (left - right).abs() < FEQ_EPSILON
}
