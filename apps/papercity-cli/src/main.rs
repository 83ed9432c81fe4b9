use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use papercity_layout::{City, CityPlanner, LayoutError};
use papercity_procgen::{Facade, Generator};
use papercity_render::{Canvas, FrameStats, Pipeline, RecordingCanvas, SvgCanvas};
use papercity_scene::Scene;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod config;

use config::PassConfig;

#[derive(Parser)]
#[command(name = "papercity", about = "Procedural city sketch generator")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Svg,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Print crate versions
    Info,
    /// Print the default pass configuration as JSON
    Config,
    /// Generate a city and render it once
    Render {
        /// RNG seed; the same seed always yields the same city
        #[arg(short, long, default_value = "42")]
        seed: u64,
        /// Viewport width in pixels
        #[arg(long, default_value = "1600")]
        width: f64,
        /// Viewport height in pixels
        #[arg(long, default_value = "900")]
        height: f64,
        /// Output file
        #[arg(short, long, default_value = "city.svg")]
        out: PathBuf,
        /// Output format
        #[arg(short, long, value_enum, default_value = "svg")]
        format: Format,
        /// JSON pass configuration
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Generate a city and print layout statistics
    Stats {
        #[arg(short, long, default_value = "42")]
        seed: u64,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

/// Lay out and generate a city into a fresh scene.
fn generate(config: &PassConfig, seed: u64, width: f64, height: f64) -> Result<City, LayoutError> {
    let scene = Scene::new(width, height)?;
    let planner = CityPlanner::new(&config.layout, Generator::new(&config.palette));
    let mut rng = Xoshiro256StarStar::seed_from_u64(seed);
    planner.build(scene, &mut rng)
}

/// Project, sort and emit a generated city onto `canvas`.
fn render<C: Canvas + ?Sized>(config: &PassConfig, city: &mut City, canvas: &mut C) -> FrameStats {
    Pipeline::new(config.camera, config.stroke).run(&mut city.scene, canvas)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("papercity v{}", env!("CARGO_PKG_VERSION"));
            println!("render: {}", papercity_render::crate_info());
        }
        Commands::Config => {
            println!("{}", serde_json::to_string_pretty(&PassConfig::default())?);
        }
        Commands::Render {
            seed,
            width,
            height,
            out,
            format,
            config,
        } => {
            let config = PassConfig::load_or_default(config.as_deref())?;
            let mut city = generate(&config, seed, width, height)
                .with_context(|| format!("generating city with seed {seed}"))?;

            let stats = match format {
                Format::Svg => {
                    let mut canvas = SvgCanvas::new(width, height, config.palette.background);
                    let stats = render(&config, &mut city, &mut canvas);
                    canvas
                        .write_to(&out)
                        .with_context(|| format!("writing {}", out.display()))?;
                    stats
                }
                Format::Json => {
                    let mut canvas = RecordingCanvas::new();
                    let stats = render(&config, &mut city, &mut canvas);
                    std::fs::write(&out, canvas.to_json()?)
                        .with_context(|| format!("writing {}", out.display()))?;
                    stats
                }
            };

            tracing::info!(
                buildings = city.buildings.len(),
                shapes = stats.shapes,
                emitted = stats.emitted,
                culled = stats.culled,
                elapsed_ms = stats.elapsed.as_secs_f64() * 1000.0,
                out = %out.display(),
                "render complete"
            );
        }
        Commands::Stats { seed, config } => {
            let config = PassConfig::load_or_default(config.as_deref())?;
            let city = generate(&config, seed, 1600.0, 900.0)
                .with_context(|| format!("generating city with seed {seed}"))?;

            let windows = city
                .buildings
                .iter()
                .filter(|b| matches!(b.facade, Facade::Windows(_)))
                .count();
            let chimneys: u32 = city.buildings.iter().map(|b| b.chimneys).sum();
            let tallest = city
                .buildings
                .iter()
                .map(|b| b.height)
                .fold(0.0_f64, f64::max);

            println!("City: seed={seed}");
            println!(
                "Layout: placed={} attempts={} rejected={} cells={}",
                city.stats.placed,
                city.stats.attempts,
                city.stats.rejected,
                city.stats.occupied_cells
            );
            println!(
                "Buildings: window_facades={} panel_facades={} chimneys={} tallest={:.2}",
                windows,
                city.buildings.len() - windows,
                chimneys,
                tallest
            );
            println!("Shapes: {}", city.scene.len());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use papercity_render::DrawCommand;

    fn small_config() -> PassConfig {
        let mut cfg = PassConfig::default();
        cfg.layout.target = 40;
        cfg
    }

    #[test]
    fn cli_parses_render_flags() {
        let cli = Cli::parse_from([
            "papercity", "-v", "render", "--seed", "7", "--format", "json", "--out", "x.json",
        ]);
        assert!(cli.verbose);
        match cli.command {
            Commands::Render {
                seed, format, out, ..
            } => {
                assert_eq!(seed, 7);
                assert_eq!(format, Format::Json);
                assert_eq!(out, PathBuf::from("x.json"));
            }
            _ => panic!("expected render command"),
        }
    }

    #[test]
    fn full_pass_emits_back_to_front() {
        let cfg = small_config();
        let mut city = generate(&cfg, 3, 1600.0, 900.0).unwrap();
        let total = city.scene.len();

        let mut canvas = RecordingCanvas::new();
        let stats = render(&cfg, &mut city, &mut canvas);

        assert_eq!(stats.shapes, total);
        assert_eq!(stats.emitted + stats.culled, total);
        assert_eq!(canvas.commands().len(), stats.emitted);
        assert!(stats.emitted > 0);

        let keys: Vec<f64> = city.scene.shapes().iter().filter_map(|s| s.sort_key()).collect();
        assert_eq!(keys.len(), total);
        assert!(keys.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn same_seed_renders_identically() {
        let cfg = small_config();
        let run = || {
            let mut city = generate(&cfg, 11, 800.0, 600.0).unwrap();
            let mut canvas = RecordingCanvas::new();
            render(&cfg, &mut city, &mut canvas);
            canvas.into_commands()
        };
        let a: Vec<DrawCommand> = run();
        assert_eq!(a, run());
    }

    #[test]
    fn bad_viewport_is_rejected() {
        let err = generate(&small_config(), 1, 0.0, 600.0).unwrap_err();
        assert!(matches!(err, LayoutError::Scene(_)));
    }

    #[test]
    fn svg_pass_writes_file() {
        let cfg = small_config();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("city.svg");

        let mut city = generate(&cfg, 5, 640.0, 480.0).unwrap();
        let mut canvas = SvgCanvas::new(640.0, 480.0, cfg.palette.background);
        let stats = render(&cfg, &mut city, &mut canvas);
        canvas.write_to(&path).unwrap();

        let svg = std::fs::read_to_string(&path).unwrap();
        assert_eq!(canvas.element_count(), stats.emitted);
        let drawn = svg.matches("<polygon").count() + svg.matches("<polyline").count();
        assert_eq!(drawn, stats.emitted);
    }
}
