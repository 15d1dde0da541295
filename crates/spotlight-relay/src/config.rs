//! Relay configuration.
//!
//! [`RelayConfig`] is the single source of truth for runtime settings. It is
//! built from CLI arguments, an optional TOML file, or defaults; the
//! precedence (flags over file over defaults) is resolved in `main.rs` so
//! this module stays free of argument-parsing concerns.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Default listen port, shared with the original deployment.
pub const DEFAULT_PORT: u16 = 3001;

/// Errors raised while loading a config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A file system I/O error occurred.
    #[error("I/O error reading config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The bind address in the file is not a valid IP address.
    #[error("invalid bind address in config: '{0}'")]
    InvalidAddress(String),
}

/// All runtime configuration for the relay.
#[derive(Debug, Clone, PartialEq)]
pub struct RelayConfig {
    /// The address and port the WebSocket listener binds to.
    ///
    /// `0.0.0.0` accepts connections from any interface, which is the normal
    /// deployment: the controller phone and the presentation machine reach
    /// the relay over the LAN.
    pub bind_addr: SocketAddr,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            // Compile-time-known valid socket address string.
            bind_addr: format!("0.0.0.0:{DEFAULT_PORT}").parse().unwrap(),
        }
    }
}

/// On-disk TOML schema. Fields absent from the file fall back to defaults,
/// so a partial (or empty) file is valid.
#[derive(Debug, Deserialize)]
struct RelayFileConfig {
    #[serde(default = "default_bind_address")]
    bind_address: String,
    #[serde(default = "default_port")]
    port: u16,
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

impl RelayConfig {
    /// Loads configuration from a TOML file.
    ///
    /// ```toml
    /// bind_address = "0.0.0.0"
    /// port = 3001
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read, is not valid
    /// TOML, or names an unparseable bind address.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file: RelayFileConfig = toml::from_str(&text)?;

        let addr = format!("{}:{}", file.bind_address, file.port);
        let bind_addr = addr
            .parse()
            .map_err(|_| ConfigError::InvalidAddress(addr))?;
        Ok(Self { bind_addr })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
