//! Resolution of the daemon's network coordinates and storage location.
//!
//! Environment is read exactly once, at construction; everything downstream
//! works from the resulting struct so callers stay testable and reentrant.

use std::env;
use std::fmt;
use std::path::PathBuf;

pub const DEFAULT_DAEMON_HOST: &str = "localhost";
pub const DEFAULT_DAEMON_PORT: u16 = 20431;

const ENV_DAEMON_HOST: &str = "KACHERY_DAEMON_HOST";
const ENV_DAEMON_PORT: &str = "KACHERY_DAEMON_PORT";
const ENV_STORAGE_DIR: &str = "KACHERY_STORAGE_DIR";

const DEFAULT_STORAGE_DIR_NAME: &str = "kachery-storage";
const CLIENT_AUTH_FILE: &str = "client-auth";

/// Network coordinates the daemon binds to, resolved once per launch attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
}

impl Endpoint {
    pub fn probe_url(&self) -> String {
        format!("http://{}:{}/probe", self.host, self.port)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    pub host: String,
    pub port: u16,
    pub storage_dir: PathBuf,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

impl ConnectionConfig {
    /// Read host/port/storage-dir from the environment, falling back to the
    /// fixed defaults. Always produces a usable config, even if the endpoint
    /// turns out to be unreachable.
    pub fn from_env() -> Self {
        Self {
            host: env::var(ENV_DAEMON_HOST)
                .ok()
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_DAEMON_HOST.to_string()),
            port: env::var(ENV_DAEMON_PORT)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_DAEMON_PORT),
            storage_dir: env::var(ENV_STORAGE_DIR)
                .ok()
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(default_storage_dir),
        }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_storage_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.storage_dir = dir.into();
        self
    }

    pub fn endpoint(&self) -> Endpoint {
        Endpoint {
            host: self.host.clone(),
            port: self.port,
        }
    }

    /// Location of the credential file the daemon rotates for local clients.
    pub fn client_auth_path(&self) -> PathBuf {
        self.storage_dir.join(CLIENT_AUTH_FILE)
    }
}

fn default_storage_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_STORAGE_DIR_NAME)
}
