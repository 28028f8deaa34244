//! Configuration for the `taskdesk` binary
//!
//! Loaded from environment variables, after reading an optional `.env` file.
//!
//! # Environment Variables
//!
//! - `TASKDESK_DATA_DIR`: store directory (default: `.taskdesk`)
//! - `TASKDESK_SEED_SOURCE`: seed URL or file path
//!   (default: `assets/data/tareas-iniciales.json`)
//! - `TASKDESK_SEED_TIMEOUT_SECS`: HTTP seed timeout (default: none)
//! - `TASKDESK_AUTH_LATENCY_MS`: register/login delay (default: 500)
//! - `TASKDESK_PASSWORD_HASHING`: `plaintext` or `argon2` (default: plaintext)
//! - `RUST_LOG`: log filter (default: `taskdesk=info`)
//!
//! # Example
//!
//! ```no_run
//! use taskdesk_cli::config::Config;
//!
//! # fn example() -> anyhow::Result<()> {
//! let config = Config::from_env()?;
//! println!("Data lives in {}", config.data_dir.display());
//! # Ok(())
//! # }
//! ```

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use taskdesk_shared::auth::{AuthSettings, PasswordHashing};

pub const DEFAULT_DATA_DIR: &str = ".taskdesk";
pub const DEFAULT_SEED_SOURCE: &str = "assets/data/tareas-iniciales.json";

/// Complete application configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory of the file-backed store
    pub data_dir: PathBuf,

    /// Seed source configuration
    pub seed: SeedConfig,

    /// Authentication configuration
    pub auth: AuthSettings,
}

/// Seed source configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedConfig {
    /// `http(s)://` URL or file path
    pub location: String,

    /// HTTP request timeout; `None` waits indefinitely
    pub timeout: Option<Duration>,
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set to an unparseable value.
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let data_dir = lookup("TASKDESK_DATA_DIR").unwrap_or_else(|| DEFAULT_DATA_DIR.to_string());

        let location =
            lookup("TASKDESK_SEED_SOURCE").unwrap_or_else(|| DEFAULT_SEED_SOURCE.to_string());

        let timeout = lookup("TASKDESK_SEED_TIMEOUT_SECS")
            .map(|raw| raw.parse::<u64>())
            .transpose()
            .map_err(|e| anyhow::anyhow!("TASKDESK_SEED_TIMEOUT_SECS must be an integer: {e}"))?
            .map(Duration::from_secs);

        let mut auth = AuthSettings::default();

        if let Some(raw) = lookup("TASKDESK_AUTH_LATENCY_MS") {
            let millis = raw
                .parse::<u64>()
                .map_err(|e| anyhow::anyhow!("TASKDESK_AUTH_LATENCY_MS must be an integer: {e}"))?;
            auth.latency = Duration::from_millis(millis);
        }

        if let Some(raw) = lookup("TASKDESK_PASSWORD_HASHING") {
            auth.hashing = raw.parse::<PasswordHashing>().map_err(anyhow::Error::msg)?;
        }

        Ok(Self {
            data_dir: PathBuf::from(data_dir),
            seed: SeedConfig { location, timeout },
            auth,
        })
    }
}
