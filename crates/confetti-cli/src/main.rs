//! Confetti CLI - headless runner for confetti parties

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{presets, simulate, validate};

#[derive(Parser)]
#[command(name = "confetti")]
#[command(about = "Simulate and validate confetti effects without a renderer", long_about = None)]
#[command(version)]
struct Cli {
    /// Verbosity level (repeat for emitter and per-tick detail)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run parties through a fixed-rate frame loop and print the frames
    Simulate {
        /// Party file ([[party]] tables)
        file: Option<String>,

        /// Built-in preset to run instead of a file
        #[arg(long, conflicts_with = "file")]
        preset: Option<String>,

        /// Draw area width in pixels
        #[arg(long, default_value = "1080")]
        width: f32,

        /// Draw area height in pixels
        #[arg(long, default_value = "1920")]
        height: f32,

        /// Frames per second of the simulated host
        #[arg(long, default_value = "60")]
        fps: f32,

        /// Number of frames; runs until every party ended when omitted
        #[arg(long)]
        frames: Option<u32>,

        /// Pixel density of the simulated display
        #[arg(long, default_value = "1.0")]
        density: f32,

        /// Seed for reproducible runs
        #[arg(long)]
        seed: Option<u64>,

        /// Random frame timing jitter as a fraction of the frame interval (0..1)
        #[arg(long, default_value = "0.0")]
        jitter: f32,

        /// Frame index that arrives late
        #[arg(long, requires = "stall_ms")]
        stall_frame: Option<u32>,

        /// Extra milliseconds the stalled frame takes
        #[arg(long, requires = "stall_frame")]
        stall_ms: Option<f64>,

        /// Output format (text or json)
        #[arg(long, default_value = "text", value_parser = parse_format)]
        format: String,
    },

    /// Load a party file and report whether every party is valid
    Validate {
        /// Party file ([[party]] tables)
        file: String,
    },

    /// List the built-in presets
    Presets,
}

fn parse_format(s: &str) -> Result<String, String> {
    match s {
        "text" | "json" => Ok(s.to_string()),
        _ => Err(format!("unknown format '{}'; valid values: text, json", s)),
    }
}

fn init_logging(verbose: u8) {
    let default_filter = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Simulate {
            file,
            preset,
            width,
            height,
            fps,
            frames,
            density,
            seed,
            jitter,
            stall_frame,
            stall_ms,
            format,
        } => simulate::run(simulate::SimulateArgs {
            file,
            preset,
            width,
            height,
            fps,
            frames,
            density,
            seed,
            jitter,
            stall: stall_frame.zip(stall_ms),
            format,
        }),
        Commands::Validate { file } => validate::run(&file),
        Commands::Presets => presets::run(),
    }
}
