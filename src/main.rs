use std::path::Path;
use std::time::Instant;

use anyhow::{ Context, Result };
use clap::Parser;
use log::info;

use pov_tracer::{ json, pov, parallel };
use pov_tracer::config::{ RenderSettings, resolve_workers };
use pov_tracer::error::SceneError;
use pov_tracer::scene::Scene;

mod cli;
mod logger;

use cli::Args;
use logger::init_logger;

/// Loads a scene, picking the parser from the file extension.
fn load_scene(path: &Path) -> Result<Scene, SceneError> {
    let is_json = path.extension()
        .map_or(false, |ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        json::load(path)
    } else {
        pov::load(path)
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logger(args.log_level.clone().into());

    let scene = load_scene(&args.scene)
        .with_context(|| format!("failed to load scene {}", args.scene.display()))?;
    info!("Loaded {} with {} object(s) and {} light(s)",
        args.scene.display(), scene.objects.len(), scene.lights.len());

    let settings = RenderSettings {
        width: args.width,
        height: args.height,
        max_depth: args.depth,
        ..RenderSettings::with_workers(resolve_workers(args.workers))
    };

    let start = Instant::now();
    let image = parallel::render(&scene, &settings).context("render failed")?;
    info!("Rendered in {:.2?}", start.elapsed());

    image.save(&args.output)
        .with_context(|| format!("failed to save {}", args.output.display()))?;
    info!("Saved render to {}", args.output.display());

    Ok(())
}
