//! FocusFlow CLI: drive the focus pipeline outside the browser.
//!
//! Usage:
//!   focusflow replay <FILE>      Replay a recorded landmark stream
//!   focusflow simulate           Run a synthetic session
//!   focusflow map <SCORE>        Show feedback for a score
//!   focusflow config             Show or initialize configuration

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use focusflow_common::config::{AbsencePolicyKind, AppConfig, AudioModeKind};

mod commands;

#[derive(Parser)]
#[command(
    name = "focusflow",
    about = "Webcam focus inference with visual and audio feedback",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to the standard location)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a JSONL landmark stream through the pipeline
    Replay {
        /// Path to the landmark stream
        file: PathBuf,

        /// Audio feedback strategy
        #[arg(long)]
        audio_mode: Option<AudioModeArg>,

        /// Score policy for ticks without a face
        #[arg(long)]
        absence: Option<AbsenceArg>,

        /// Print every Nth tick
        #[arg(long, default_value = "1")]
        every: u64,

        /// Emit one JSON object per line
        #[arg(long)]
        json: bool,
    },

    /// Run synthetic faces through the pipeline
    Simulate {
        /// Behavior to simulate
        #[arg(long, value_enum, default_value = "mixed")]
        scenario: Scenario,

        /// Number of frames to generate
        #[arg(long, default_value = "300")]
        ticks: u64,

        /// Audio feedback strategy
        #[arg(long)]
        audio_mode: Option<AudioModeArg>,

        /// Print every Nth tick
        #[arg(long, default_value = "10")]
        every: u64,
    },

    /// Show the visual and audio mapping for a score
    Map {
        /// Focus score in [0, 1]
        score: f64,

        /// Score one tick earlier (selects the transition)
        #[arg(long)]
        previous: Option<f64>,

        /// Audio feedback strategy
        #[arg(long)]
        audio_mode: Option<AudioModeArg>,

        /// Emit JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the effective configuration
    Config {
        /// Write the defaults to the config file
        #[arg(long)]
        init: bool,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum AudioModeArg {
    DualTrack,
    Drone,
}

impl From<AudioModeArg> for AudioModeKind {
    fn from(arg: AudioModeArg) -> Self {
        match arg {
            AudioModeArg::DualTrack => AudioModeKind::DualTrack,
            AudioModeArg::Drone => AudioModeKind::Drone,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum AbsenceArg {
    SlowDecay,
    InstantPenalty,
}

impl From<AbsenceArg> for AbsencePolicyKind {
    fn from(arg: AbsenceArg) -> Self {
        match arg {
            AbsenceArg::SlowDecay => AbsencePolicyKind::SlowDecay,
            AbsenceArg::InstantPenalty => AbsencePolicyKind::InstantPenalty,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Scenario {
    Focused,
    Drowsy,
    Distracted,
    Away,
    Mixed,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from(path)
            .map_err(|e| anyhow::anyhow!("Failed to load config {}: {e}", path.display()))?,
        None => AppConfig::load(),
    };

    // Initialize logging
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    focusflow_common::logging::init_logging(&config.logging);
    tracing::debug!(?config, "Configuration loaded");

    match cli.command {
        Commands::Replay {
            file,
            audio_mode,
            absence,
            every,
            json,
        } => {
            if let Some(mode) = audio_mode {
                config.feedback.audio_mode = mode.into();
            }
            if let Some(policy) = absence {
                config.detection.absence_policy = policy.into();
            }
            config.validate()?;
            commands::replay::run(file, config, every, json).await
        }
        Commands::Simulate {
            scenario,
            ticks,
            audio_mode,
            every,
        } => {
            if let Some(mode) = audio_mode {
                config.feedback.audio_mode = mode.into();
            }
            config.validate()?;
            commands::simulate::run(scenario, ticks, config, every).await
        }
        Commands::Map {
            score,
            previous,
            audio_mode,
            json,
        } => {
            if let Some(mode) = audio_mode {
                config.feedback.audio_mode = mode.into();
            }
            commands::map::run(score, previous, &config, json)
        }
        Commands::Config { init } => commands::config::run(&config, cli.config, init),
    }
}
