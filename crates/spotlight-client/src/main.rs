//! Spotlight client — headless demo entry point.
//!
//! Connects to a relay and runs one session end to end. In presentation
//! mode it renders received pointer updates to the log; in controller mode
//! it synthesises a slow tilt sweep, shows the pointer, and publishes the
//! resulting movement. Run one of each against the same relay to watch the
//! full pipeline work:
//!
//! ```text
//! spotlight-relay &
//! spotlight-client --role presentation &
//! spotlight-client --role controller
//! ```
//!
//! The log level is controlled by `RUST_LOG` (e.g. `RUST_LOG=debug`).

use std::time::Duration;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use spotlight_client::{
    run, LogRenderSink, PointerSession, RelayLink, SessionCommand, SessionConfig, SyntheticSensor,
};
use spotlight_core::{DisplayBounds, MotionSample, OrientationSample};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Which role the demo client starts in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum RoleArg {
    Presentation,
    Controller,
}

/// Spotlight remote pointer client (headless demo).
#[derive(Debug, Parser)]
#[command(
    name = "spotlight-client",
    about = "Headless demo client for the Spotlight remote pointer",
    version
)]
struct Cli {
    /// WebSocket URL of the relay.
    #[arg(long, default_value = "ws://127.0.0.1:3001", env = "SPOTLIGHT_RELAY_URL")]
    relay_url: String,

    /// Role to start in.
    #[arg(long, value_enum, default_value_t = RoleArg::Presentation)]
    role: RoleArg,

    /// Logical display width in pixels.
    #[arg(long, default_value_t = 800.0)]
    width: f64,

    /// Logical display height in pixels.
    #[arg(long, default_value_t = 600.0)]
    height: f64,
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    info!(role = ?cli.role, url = %cli.relay_url, "spotlight client starting");

    let bounds = DisplayBounds::new(cli.width, cli.height)
        .context("invalid display dimensions")?;
    let session = PointerSession::new(SessionConfig::new(bounds))?;

    let link = RelayLink::connect(&cli.relay_url).await?;
    let sensor = SyntheticSensor::new(tilt_sweep(), Duration::from_millis(40)).looping();

    let (commands_tx, commands_rx) = mpsc::channel(8);

    // Controller mode: switch role, then show the pointer (which arms
    // calibration against the first sweep sample).
    if cli.role == RoleArg::Controller {
        commands_tx
            .send(SessionCommand::ToggleRole)
            .await
            .context("failed to queue role toggle")?;
        let tx = commands_tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(500)).await;
            tx.send(SessionCommand::SetVisibility(true)).await.ok();
        });
    }

    // Ctrl+C requests a clean shutdown through the command channel.
    let tx = commands_tx.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("received Ctrl+C — shutting down");
            tx.send(SessionCommand::Shutdown).await.ok();
        }
    });

    run(session, link, sensor, LogRenderSink, commands_rx).await
}

/// A gentle back-and-forth tilt: beta sweeps up then down while gamma
/// wobbles, producing a visible pointer orbit on the presentation side.
fn tilt_sweep() -> Vec<MotionSample> {
    let mut script = Vec::new();
    for step in 0..40 {
        let phase = f64::from(step) / 40.0 * std::f64::consts::TAU;
        let beta = 10.0 + 8.0 * phase.sin();
        let gamma = 5.0 + 8.0 * phase.cos();
        script.push(MotionSample::Orientation(OrientationSample::new(
            0.0, beta, gamma,
        )));
    }
    script
}
