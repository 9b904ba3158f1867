//! CLI host shell: loads a scene file, renders it with a fixed thread pool and an
//! `indicatif` progress bar, and writes the result to an image file.

use std::time::Instant;

use clap::Parser;
use dae_raytracer::renderer;
use dae_raytracer::scene_file;

/// A CPU ray tracer: BVH/SAH mesh acceleration, microfacet shading, soft shadows, GI.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Path to a scene YAML file describing the camera, materials, lights and geometry.
    scene: String,

    /// Output image path; the format is inferred from the extension (bmp or png).
    #[arg(short, long, default_value = "raytrace_output.bmp")]
    output: String,

    /// Overrides the scene file's thread count.
    #[arg(short, long)]
    threads: Option<u32>,
}

fn main() {
    let args = Args::parse();

    let scene_file::SceneFile { world, mut settings } = match scene_file::load(&args.scene) {
        Ok(scene) => scene,
        Err(err) => {
            eprintln!("failed to load scene '{}': {err}", args.scene);
            std::process::exit(1);
        }
    };

    if let Some(threads) = args.threads {
        settings.thread_count = threads;
    }

    println!(
        "rendering {}x{} ({} lights, shading={:?}, shadows={:?}, gi={}) on {} threads",
        settings.width,
        settings.height,
        world.lights.len(),
        settings.shading_mode,
        settings.shadow_mode,
        settings.global_illumination,
        settings.thread_count,
    );

    let start = Instant::now();
    let buffer = renderer::render(&world, &settings);
    println!("render finished in {:.2}s", start.elapsed().as_secs_f64());

    if let Err(err) = buffer.save(&args.output) {
        eprintln!("failed to save '{}': {err}", args.output);
        std::process::exit(1);
    }

    println!("wrote {}", args.output);
}
