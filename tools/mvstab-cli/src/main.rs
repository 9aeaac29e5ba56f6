//! mvstab CLI: run the temporal motion-vector stabilizer outside a renderer.
//!
//! Usage:
//!   mvstab simulate [OPTIONS]        Stabilize a seeded synthetic sequence
//!   mvstab stabilize <INPUT>         Stabilize a field sequence file
//!   mvstab info <INPUT>              Show field sequence information
//!   mvstab config                    Show or initialize the configuration

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use mvstab_common::config::AppConfig;

mod commands;
mod synthetic;

#[derive(Parser)]
#[command(
    name = "mvstab",
    about = "Temporal stabilization of per-pixel motion vector fields",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a synthetic noisy sequence and stabilize it
    Simulate {
        /// Field width in pixels
        #[arg(long, default_value = "64")]
        width: usize,

        /// Field height in pixels
        #[arg(long, default_value = "36")]
        height: usize,

        /// Number of frames
        #[arg(long, default_value = "30")]
        frames: usize,

        /// RNG seed
        #[arg(long, default_value = "7")]
        seed: u64,

        /// Motion noise amplitude (pixels)
        #[arg(long, default_value = "0.35")]
        noise: f32,

        /// Object velocity along x (pixels per frame)
        #[arg(long, default_value = "3.0", allow_hyphen_values = true)]
        velocity_x: f32,

        /// Object velocity along y (pixels per frame)
        #[arg(long, default_value = "0.0", allow_hyphen_values = true)]
        velocity_y: f32,

        /// Frame index of a scene cut
        #[arg(long)]
        cut_at: Option<usize>,

        /// Run with stabilization disabled
        #[arg(long)]
        disable: bool,

        /// Use the low-flicker text preservation preset
        #[arg(long)]
        text_preservation: bool,

        /// Write the stabilized sequence to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Stabilize a motion field sequence file
    Stabilize {
        /// Input sequence (JSON)
        input: PathBuf,

        /// Output file path
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Reset history every N frames (0 = never)
        #[arg(long, default_value = "0")]
        reset_every: usize,

        /// History weight [0.0, 0.99]
        #[arg(long)]
        history_weight: Option<f32>,

        /// Confidence influence [0.0, 1.0]
        #[arg(long)]
        conf_influence: Option<f32>,

        /// Use the low-flicker text preservation preset
        #[arg(long)]
        text_preservation: bool,
    },

    /// Show field sequence information
    Info {
        /// Input sequence (JSON)
        input: PathBuf,
    },

    /// Show the effective configuration
    Config {
        /// Write the default configuration file
        #[arg(long)]
        init: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load();

    let mut logging = config.logging.clone();
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    mvstab_common::logging::init_logging(&logging);

    match cli.command {
        Commands::Simulate {
            width,
            height,
            frames,
            seed,
            noise,
            velocity_x,
            velocity_y,
            cut_at,
            disable,
            text_preservation,
            output,
        } => {
            let scene = synthetic::SceneConfig {
                width,
                height,
                frames,
                seed,
                noise,
                velocity: mvstab_field_model::Vec2::new(velocity_x, velocity_y),
                cut_at,
                ..Default::default()
            };
            let mut defaults = config.stabilizer.clone();
            defaults.text_preservation |= text_preservation;
            defaults.enabled &= !disable;
            commands::simulate::run(scene, &defaults, output)
        }
        Commands::Stabilize {
            input,
            output,
            reset_every,
            history_weight,
            conf_influence,
            text_preservation,
        } => {
            let mut defaults = config.stabilizer.clone();
            if let Some(weight) = history_weight {
                defaults.history_weight = weight;
            }
            if let Some(influence) = conf_influence {
                defaults.conf_influence = influence;
            }
            defaults.text_preservation |= text_preservation;
            commands::stabilize::run(input, output, reset_every, &defaults)
        }
        Commands::Info { input } => commands::info::run(input),
        Commands::Config { init } => commands::config::run(&config, init),
    }
}
