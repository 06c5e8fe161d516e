#![deny(unsafe_code)]
//! CLI for the voicefx canvas effects.
//!
//! Subcommands:
//! - `render <effect>`: run an effect for N frames through the frame driver
//!   and write the last frame as a PNG
//! - `list`: print available effects and their parameter schemas

mod error;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use error::CliError;
use tracing::info;
use tracing_subscriber::EnvFilter;
use voicefx_core::{Effect, FrameDriver, FxError, ManualScheduler, PointerReader};
use voicefx_effects::raster::RasterSurface;
use voicefx_effects::EffectKind;
use voicefx_site::Theme;

#[derive(Parser)]
#[command(name = "voicefx", about = "Render voicefx canvas effects offline")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run an effect for N frames and write the final frame as PNG.
    Render {
        /// Effect name ("particles" or "waves").
        effect: String,

        /// Surface width in device pixels.
        #[arg(short = 'W', long, default_value_t = 960)]
        width: usize,

        /// Surface height in device pixels.
        #[arg(short = 'H', long, default_value_t = 540)]
        height: usize,

        /// Number of frames to simulate.
        #[arg(short, long, default_value_t = 240, value_parser = clap::value_parser!(u64).range(1..))]
        frames: u64,

        /// PRNG seed for the initial point layout.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Pointer x position held for the whole run.
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        pointer_x: f64,

        /// Pointer y position held for the whole run.
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        pointer_y: f64,

        /// Page theme providing the background color (dark, light).
        #[arg(long, default_value = "dark")]
        theme: String,

        /// Output file path.
        #[arg(short, long, default_value = "frame.png")]
        output: PathBuf,

        /// Effect parameters as a JSON string.
        #[arg(long, default_value = "{}")]
        params: String,
    },
    /// List available effects and their parameters.
    List,
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::List => {
            let effects = EffectKind::list_effects();
            if cli.json {
                let mut schemas = serde_json::Map::new();
                for name in effects {
                    let effect = EffectKind::from_name(name, 1, 1, 0, &serde_json::json!({}))?;
                    schemas.insert(name.to_string(), effect.param_schema());
                }
                println!("{}", serde_json::to_string_pretty(&schemas)?);
            } else {
                println!("Effects:");
                for name in effects {
                    println!("  {name}");
                }
            }
        }
        Command::Render {
            effect,
            width,
            height,
            frames,
            seed,
            pointer_x,
            pointer_y,
            theme,
            output,
            params,
        } => {
            let params: serde_json::Value = serde_json::from_str(&params)
                .map_err(|e| CliError::Input(format!("invalid --params JSON: {e}")))?;
            let theme: Theme = theme
                .parse()
                .map_err(|e: FxError| CliError::Input(e.to_string()))?;
            if !EffectKind::is_known(&effect) {
                return Err(FxError::UnknownEffect(effect).into());
            }

            let mut surface = RasterSurface::with_background(width, height, theme.background_rgb())?;
            let mut driver = FrameDriver::new(
                ManualScheduler::new(),
                PointerReader::fixed(pointer_x, pointer_y),
                EffectKind::factory(&effect, seed, params),
            );
            driver.start(width, height)?;
            for _ in 0..frames {
                driver.on_frame(&mut surface)?;
            }
            driver.stop();

            voicefx_effects::snapshot::write_png(&surface, &output)?;
            info!(state = %driver.describe(), "render finished");

            if cli.json {
                let info = serde_json::json!({
                    "effect": effect,
                    "width": width,
                    "height": height,
                    "frames": frames,
                    "seed": seed,
                    "theme": theme.as_str(),
                    "output": output.display().to_string(),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                eprintln!(
                    "rendered {effect} ({width}x{height}, {frames} frames, seed {seed}) -> {}",
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
            let j = serde_json::json!({
                "error": e.to_string(),
                "kind": e.kind(),
                "exit_code": e.exit_code(),
            });
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}
