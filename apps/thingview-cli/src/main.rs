use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use glam::Vec3;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thingview_assets::ObjFile;
use thingview_kernel::Bounds3;
use thingview_render::{
    CoverageMap, CoverageRenderer, DebugTextRenderer, DomPatch, DomRenderer, DomRendererConfig,
    Renderer, Viewport,
};
use tracing_subscriber::EnvFilter;

mod frame_loop;
mod scene;

use frame_loop::run_loop;
use scene::Scene;

#[derive(Parser)]
#[command(name = "thingview", about = "Project Things onto a DOM surface")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Standalone HTML document of clip-path face elements
    Html,
    /// Human-readable frame dump
    Text,
    /// Ray-cast coverage preview
    Coverage,
}

#[derive(clap::Args)]
struct SceneArgs {
    /// JSON scene file
    #[arg(long, conflicts_with = "obj")]
    scene: Option<PathBuf>,
    /// Single .obj model to frame and render
    #[arg(long)]
    obj: Option<PathBuf>,
    /// Viewport width in pixels
    #[arg(long, default_value = "800")]
    width: u32,
    /// Viewport height in pixels
    #[arg(long, default_value = "600")]
    height: u32,
}

impl SceneArgs {
    fn scene(&self) -> anyhow::Result<Scene> {
        match (&self.scene, &self.obj) {
            (Some(path), _) => Scene::from_file(path),
            (None, Some(path)) => Scene::from_obj(path),
            (None, None) => Scene::demo(),
        }
    }

    fn viewport(&self) -> Viewport {
        Viewport::new(self.width, self.height)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Render a single frame
    Render {
        #[command(flatten)]
        scene: SceneArgs,
        /// Output format
        #[arg(short, long, value_enum, default_value = "html")]
        format: Format,
        /// Write to this file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Move the camera down one unit per frame on a timer
    Animate {
        #[command(flatten)]
        scene: SceneArgs,
        /// Number of frames to render
        #[arg(long, default_value = "10")]
        frames: u64,
        /// Time between frames in milliseconds
        #[arg(long, default_value = "100")]
        interval_ms: u64,
        /// CSS transition duration in milliseconds
        #[arg(long, default_value = "500")]
        speed_ms: u32,
        /// Write the last frame as HTML to this file
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Summarize an .obj model
    Inspect {
        /// Path to the .obj file
        obj: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Info => {
            println!("thingview v{}", env!("CARGO_PKG_VERSION"));
            println!("common: {}", thingview_common::crate_info());
            println!("assets: {}", thingview_assets::crate_info());
            println!("render: {}", thingview_render::crate_info());
        }
        Commands::Render { scene, format, out } => {
            let viewport = scene.viewport();
            let Scene { world, camera } = scene.scene()?;
            let output = match format {
                Format::Html => DomRenderer::new(viewport).render(&world, &camera)?.to_html(),
                Format::Text => DebugTextRenderer::new(viewport).render(&world, &camera)?,
                Format::Coverage => {
                    coverage_preview(&CoverageRenderer::new(viewport).render(&world, &camera)?, 80)
                }
            };
            emit(&output, out.as_deref())?;
        }
        Commands::Animate {
            scene,
            frames,
            interval_ms,
            speed_ms,
            out,
        } => {
            let viewport = scene.viewport();
            let Scene { world, mut camera } = scene.scene()?;
            let mut renderer = DomRenderer::with_config(
                viewport,
                DomRendererConfig {
                    speed_ms,
                    ..DomRendererConfig::default()
                },
            );
            let mut last = None;
            let ran = run_loop(Duration::from_millis(interval_ms), Some(frames), |n| {
                camera.translate(Vec3::new(0.0, -1.0, 0.0));
                let frame = renderer.render(&world, &camera)?;
                let (created, updated, removed) = patch_counts(&frame.patches);
                tracing::info!(frame = n, created, updated, removed, "frame");
                last = Some(frame);
                Ok(())
            })?;
            println!("Rendered {ran} frames");
            if let (Some(frame), Some(path)) = (last, out) {
                emit(&frame.to_html(), Some(path.as_path()))?;
            }
        }
        Commands::Inspect { obj } => {
            let file = ObjFile::load(&obj).with_context(|| format!("loading {}", obj.display()))?;
            println!("{}: {} model(s)", obj.display(), file.models.len());
            if !file.material_libraries.is_empty() {
                println!("  material libraries: {}", file.material_libraries.join(", "));
            }
            for model in &file.models {
                println!(
                    "  {} vertices={} faces={} normals={} uvs={}",
                    model.name,
                    model.vertices.len(),
                    model.faces.len(),
                    model.vertex_normals.len(),
                    model.texture_coords.len()
                );
                if let Some(b) = Bounds3::from_points(model.vertices.iter().copied()) {
                    println!(
                        "    bounds min=({:.2}, {:.2}, {:.2}) max=({:.2}, {:.2}, {:.2})",
                        b.min.x, b.min.y, b.min.z, b.max.x, b.max.y, b.max.z
                    );
                }
            }
        }
    }

    Ok(())
}

fn emit(output: &str, out: Option<&Path>) -> anyhow::Result<()> {
    match out {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
            std::fs::write(path, output).with_context(|| format!("writing {}", path.display()))?;
            tracing::info!(path = %path.display(), "frame written");
        }
        None => print!("{output}"),
    }
    Ok(())
}

fn patch_counts(patches: &[DomPatch]) -> (usize, usize, usize) {
    patches.iter().fold((0, 0, 0), |(c, u, r), p| match p {
        DomPatch::Create(_) => (c + 1, u, r),
        DomPatch::Update(_) => (c, u + 1, r),
        DomPatch::Remove { .. } => (c, u, r + 1),
    })
}

/// ASCII preview of a coverage map, at most `max_cols` characters wide.
/// Each character shows the painter rank (mod 10) of the face hit at that
/// sample, or `.` for empty pixels.
fn coverage_preview(map: &CoverageMap, max_cols: u32) -> String {
    let mut out = format!(
        "covered {} px in {}x{} region at ({}, {})\n",
        map.covered(),
        map.width,
        map.height,
        map.x,
        map.y
    );
    if map.width == 0 || map.height == 0 {
        return out;
    }
    let step = map.width.div_ceil(max_cols.max(1)).max(1);
    // Terminal cells are roughly twice as tall as wide.
    for row in (0..map.height).step_by((step * 2) as usize) {
        for col in (0..map.width).step_by(step as usize) {
            let c = match map.get(map.x + col, map.y + row) {
                Some(hit) => char::from_digit((hit.rank % 10) as u32, 10).unwrap_or('#'),
                None => '.',
            };
            out.push(c);
        }
        out.push('\n');
    }
    out
}
