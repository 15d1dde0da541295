//! Spotlight relay — entry point.
//!
//! Runs the stateless WebSocket broadcast relay that controller and
//! presentation clients meet at. The relay holds no state beyond the set of
//! open connections: every valid message from one link is forwarded verbatim
//! to all the others, and nothing is persisted or replayed.
//!
//! # Usage
//!
//! ```text
//! spotlight-relay [OPTIONS]
//!
//! Options:
//!   --bind <ADDR>    IP address to bind [default: 0.0.0.0]
//!   --port <PORT>    TCP port to listen on [default: 3001]
//!   --config <PATH>  Optional TOML config file
//! ```
//!
//! Flags override the config file, which overrides the built-in defaults.
//! The log level is controlled by `RUST_LOG` (e.g. `RUST_LOG=debug`).

use std::path::PathBuf;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use spotlight_relay::{Relay, RelayConfig};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Spotlight WebSocket broadcast relay.
#[derive(Debug, Parser)]
#[command(
    name = "spotlight-relay",
    about = "Stateless broadcast relay for the Spotlight remote pointer",
    version
)]
struct Cli {
    /// IP address to bind the WebSocket listener to.
    ///
    /// `0.0.0.0` accepts connections from any interface; use `127.0.0.1`
    /// to accept only local connections.
    #[arg(long, env = "SPOTLIGHT_RELAY_BIND")]
    bind: Option<String>,

    /// TCP port to listen on.
    #[arg(long, env = "SPOTLIGHT_RELAY_PORT")]
    port: Option<u16>,

    /// Path to an optional TOML config file.
    #[arg(long, env = "SPOTLIGHT_RELAY_CONFIG")]
    config: Option<PathBuf>,
}

impl Cli {
    /// Resolves the effective configuration: flags > file > defaults.
    fn into_relay_config(self) -> anyhow::Result<RelayConfig> {
        let base = match &self.config {
            Some(path) => RelayConfig::from_file(path)
                .with_context(|| format!("failed to load config file {}", path.display()))?,
            None => RelayConfig::default(),
        };

        let ip = match self.bind {
            Some(bind) => bind
                .parse()
                .with_context(|| format!("invalid bind address: '{bind}'"))?,
            None => base.bind_addr.ip(),
        };
        let port = self.port.unwrap_or(base.bind_addr.port());

        Ok(RelayConfig {
            bind_addr: (ip, port).into(),
        })
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Cli::parse().into_relay_config()?;
    info!("spotlight relay starting on {}", config.bind_addr);

    // Ctrl+C clears the running flag; the accept loop polls it and exits.
    let running = Arc::new(AtomicBool::new(true));
    let running_clone = Arc::clone(&running);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("received Ctrl+C — shutting down");
                running_clone.store(false, Ordering::Relaxed);
            }
            Err(e) => {
                tracing::error!("failed to listen for Ctrl+C signal: {e}");
            }
        }
    });

    let relay = Relay::bind(&config).await?;
    relay.run(running).await;

    info!("spotlight relay stopped");
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_no_flags_or_file() {
        let cli = Cli::parse_from(["spotlight-relay"]);
        let config = cli.into_relay_config().unwrap();
        assert_eq!(config, RelayConfig::default());
    }

    #[test]
    fn test_bind_flag_overrides_default() {
        let cli = Cli::parse_from(["spotlight-relay", "--bind", "127.0.0.1"]);
        let config = cli.into_relay_config().unwrap();
        assert_eq!(config.bind_addr.ip().to_string(), "127.0.0.1");
        assert_eq!(config.bind_addr.port(), 3001);
    }

    #[test]
    fn test_port_flag_overrides_default() {
        let cli = Cli::parse_from(["spotlight-relay", "--port", "8080"]);
        let config = cli.into_relay_config().unwrap();
        assert_eq!(config.bind_addr.port(), 8080);
    }

    #[test]
    fn test_invalid_bind_flag_is_an_error() {
        let cli = Cli {
            bind: Some("not.an.ip".to_string()),
            port: None,
            config: None,
        };
        assert!(cli.into_relay_config().is_err());
    }

    #[test]
    fn test_flags_override_config_file() {
        let dir = std::env::temp_dir();
        let path = dir.join("spotlight-relay-main-test.toml");
        std::fs::write(&path, "bind_address = \"127.0.0.1\"\nport = 4000\n").unwrap();

        let cli = Cli {
            bind: None,
            port: Some(5000),
            config: Some(path.clone()),
        };
        let config = cli.into_relay_config().unwrap();
        // Port comes from the flag, address from the file.
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:5000");

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let cli = Cli {
            bind: None,
            port: None,
            config: Some(PathBuf::from("/no/such/file.toml")),
        };
        assert!(cli.into_relay_config().is_err());
    }
}
