//! handwave: headless host for the gesture pipeline
//!
//! Usage:
//!   handwave replay frames.jsonl        # run a recorded landmark stream
//!   handwave scenario pinch             # run a built-in synthetic stream
//!   handwave config --profile sensitive # print the effective configuration
//!   handwave keys                       # keyboard fallback in the terminal

mod commands;
mod keys;
mod report;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use handwave_core::synthetic::Scenario;
use handwave_core::{HandwaveConfig, Profile, Viewport};

#[derive(Debug, Parser)]
#[command(name = "handwave", version, about = "Webcam hand-gesture pipeline host")]
struct Cli {
    /// Configuration file (default: <config dir>/handwave/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Recognizer preset: standard or sensitive
    #[arg(long, global = true)]
    profile: Option<Profile>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Replay newline-delimited JSON hand frames
    Replay(ReplayArgs),
    /// Run a synthetic gesture stream
    Scenario(ScenarioArgs),
    /// Print the effective configuration as TOML
    Config,
    /// Drive the action layer from the keyboard
    Keys,
}

#[derive(Debug, Args)]
struct ViewportArgs {
    #[arg(long, default_value_t = 1280.0)]
    width: f32,
    #[arg(long, default_value_t = 720.0)]
    height: f32,
}

impl ViewportArgs {
    fn viewport(&self) -> Viewport {
        Viewport::new(self.width, self.height)
    }
}

#[derive(Debug, Args)]
struct ReplayArgs {
    /// Input file, one frame per line
    path: PathBuf,
    #[command(flatten)]
    viewport: ViewportArgs,
    /// Emit every intent as a JSON line instead of a table
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Args)]
struct ScenarioArgs {
    /// wake, pinch, scroll, summon or dismiss
    name: Scenario,
    /// Frame interval in milliseconds
    #[arg(long, default_value_t = 33.0)]
    frame_ms: f64,
    #[command(flatten)]
    viewport: ViewportArgs,
    #[arg(long)]
    json: bool,
    /// Write the generated frames as JSON lines and exit
    #[arg(long)]
    dump: bool,
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "info",
        1 => "handwave_core=debug,handwave=debug,info",
        _ => "handwave_core=trace,handwave=trace,info",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<HandwaveConfig> {
    let mut config = HandwaveConfig::load_or_default(cli.config.as_deref())
        .context("Failed to load configuration")?;
    if let Some(profile) = cli.profile {
        config.recognizer = profile.recognizer();
        tracing::debug!("Using {} recognizer profile", profile.name());
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(&cli)?;

    match cli.command {
        Commands::Replay(args) => {
            let frames = commands::read_frames_file(&args.path).await?;
            let report = commands::replay(config, args.viewport.viewport(), &frames);
            report::print(&report, args.json)?;
        }
        Commands::Scenario(args) => {
            let frames = args.name.frames(args.frame_ms);
            if args.dump {
                report::dump_frames(&frames)?;
                return Ok(());
            }
            tracing::info!("Running {} scenario ({} frames)", args.name, frames.len());
            let report = commands::replay(config, args.viewport.viewport(), &frames);
            report::print(&report, args.json)?;
        }
        Commands::Config => {
            print!("{}", config.to_toml().context("Failed to render configuration")?);
        }
        Commands::Keys => keys::run(config).await?,
    }

    Ok(())
}
