#![deny(unsafe_code)]
//! CLI binary for flowtubes.
//!
//! Subcommands:
//! - `build` assembles the tube scene and reports buffer totals
//! - `follow` runs the elastic light toward a fixed target
//! - `preview` writes a CPU-rendered PNG of the streamlines

mod error;

use clap::{Parser, Subcommand};
use error::CliError;
use flowtubes_core::{DVec2, SceneSeed};
use flowtubes_scene::{FrameDriver, PreviewStyle, SceneAssembler, Srgb};
use std::path::{Path, PathBuf};
use std::process;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "flowtubes", about = "Curl-noise flow tubes with an elastic light")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Assemble every tube and print scene totals.
    Build {
        /// Scene configuration as a JSON file; missing keys use defaults.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Seed-point PRNG seed (overrides the config).
        #[arg(long)]
        seed: Option<u64>,

        /// Number of tubes (overrides the config).
        #[arg(long)]
        tubes: Option<usize>,
    },
    /// Drive the elastic light toward a fixed target and print its path.
    Follow {
        /// Target on the z = 0 plane as `X,Y`.
        #[arg(long, allow_hyphen_values = true)]
        target: String,

        /// Number of frames to simulate.
        #[arg(short, long, default_value_t = 60)]
        frames: usize,
    },
    /// Render the streamlines on the CPU and write a PNG.
    Preview {
        /// Scene configuration as a JSON file; missing keys use defaults.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output file path.
        #[arg(short, long, default_value = "preview.png")]
        output: PathBuf,

        /// Image width in pixels.
        #[arg(short = 'W', long, default_value_t = 800)]
        width: u32,

        /// Image height in pixels.
        #[arg(short = 'H', long, default_value_t = 600)]
        height: u32,

        /// Seed-point PRNG seed (overrides the config).
        #[arg(long)]
        seed: Option<u64>,

        /// Number of tubes (overrides the config).
        #[arg(long)]
        tubes: Option<usize>,

        /// Light position on the z = 0 plane as `X,Y`.
        #[arg(long, default_value = "0,0", allow_hyphen_values = true)]
        light: String,

        /// Light color as `#rrggbb`.
        #[arg(long)]
        light_color: Option<String>,

        /// Background color as `#rrggbb`.
        #[arg(long)]
        background: Option<String>,
    },
}

/// Parses `"X,Y"` into a point.
fn parse_pair(s: &str) -> Result<DVec2, CliError> {
    let bad = || CliError::Input(format!("expected X,Y but got '{s}'"));
    let (x, y) = s.split_once(',').ok_or_else(bad)?;
    let x: f64 = x.trim().parse().map_err(|_| bad())?;
    let y: f64 = y.trim().parse().map_err(|_| bad())?;
    if !(x.is_finite() && y.is_finite()) {
        return Err(bad());
    }
    Ok(DVec2::new(x, y))
}

/// Reads a [`SceneSeed`] from `path`, or the defaults when absent.
fn load_seed(path: Option<&Path>) -> Result<SceneSeed, CliError> {
    let Some(path) = path else {
        return Ok(SceneSeed::default());
    };
    let text = std::fs::read_to_string(path)
        .map_err(|e| CliError::Io(format!("cannot read {}: {e}", path.display())))?;
    serde_json::from_str(&text)
        .map_err(|e| CliError::Input(format!("invalid config {}: {e}", path.display())))
}

/// Applies `--seed` / `--tubes` on top of a loaded config.
fn apply_overrides(mut scene_seed: SceneSeed, seed: Option<u64>, tubes: Option<usize>) -> SceneSeed {
    if let Some(seed) = seed {
        scene_seed.seed = seed;
    }
    if let Some(tubes) = tubes {
        scene_seed.tubes = tubes;
    }
    scene_seed
}

/// Default preview style with any colors given on the command line.
fn preview_style(
    light_color: Option<&str>,
    background: Option<&str>,
) -> Result<PreviewStyle, CliError> {
    let mut style = PreviewStyle::default();
    if let Some(hex) = light_color {
        style.light_color = Srgb::from_hex(hex)?;
    }
    if let Some(hex) = background {
        style.background = Srgb::from_hex(hex)?;
    }
    Ok(style)
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Build {
            config,
            seed,
            tubes,
        } => {
            let scene_seed = apply_overrides(load_seed(config.as_deref())?, seed, tubes);

            let scene = SceneAssembler::new(scene_seed)?.assemble()?;
            let stats = scene.stats();

            if cli.json {
                let info = serde_json::json!({
                    "seed": scene.seed(),
                    "stats": stats,
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("tubes:    {}", stats.tubes);
                println!("points:   {}", stats.points);
                println!("vertices: {}", stats.vertices);
                println!("indices:  {}", stats.indices);
            }
        }
        Command::Follow { target, frames } => {
            let target = parse_pair(&target)?;
            let mut driver = FrameDriver::new(1, 1);
            driver.set_target(target);

            let path: Vec<[f64; 2]> = (0..frames)
                .map(|i| {
                    let light = driver.tick(i as f64 / 60.0).light();
                    [light.x, light.y]
                })
                .collect();

            if cli.json {
                let info = serde_json::json!({
                    "target": [target.x, target.y],
                    "frames": frames,
                    "path": path,
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                for (i, [x, y]) in path.iter().enumerate() {
                    println!("{i:4} {x:+.6} {y:+.6}");
                }
            }
        }
        Command::Preview {
            config,
            output,
            width,
            height,
            seed,
            tubes,
            light,
            light_color,
            background,
        } => {
            let light = parse_pair(&light)?;
            let style = preview_style(light_color.as_deref(), background.as_deref())?;
            if width == 0 || height == 0 {
                return Err(CliError::Input(format!(
                    "image size must be non-zero, got {width}x{height}"
                )));
            }
            let scene_seed = apply_overrides(load_seed(config.as_deref())?, seed, tubes);
            let paths = SceneAssembler::new(scene_seed)?.streamlines()?;
            info!(paths = paths.len(), "rendering preview");

            flowtubes_scene::snapshot::write_preview_png(
                &paths,
                light.extend(0.0),
                width,
                height,
                &style,
                &output,
            )?;

            if cli.json {
                let info = serde_json::json!({
                    "width": width,
                    "height": height,
                    "light": [light.x, light.y],
                    "style": style,
                    "output": output.display().to_string(),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                eprintln!(
                    "rendered {} streamlines ({width}x{height}) -> {}",
                    paths.len(),
                    output.display()
                );
            }
        }
    }

    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}
