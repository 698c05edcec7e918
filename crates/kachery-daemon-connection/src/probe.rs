//! Liveness/identity probe against the daemon API.

use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::config::Endpoint;

/// Upper bound on a single probe round trip. Callers decide whether to retry.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(3);

/// Identity information a running daemon reports from its `/probe` route.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DaemonInfo {
    pub success: bool,
    pub daemon_version: String,
    pub node_id: String,
    #[serde(default)]
    pub kachery_storage_dir: Option<String>,
}

pub trait DaemonProber {
    /// Single bounded-time liveness check. `None` covers every expected
    /// failure: connection refused, timeout, malformed response.
    fn probe(&self, endpoint: &Endpoint) -> Option<DaemonInfo>;
}

pub struct HttpProber {
    client: reqwest::blocking::Client,
}

impl HttpProber {
    pub fn new() -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
        }
    }
}

impl Default for HttpProber {
    fn default() -> Self {
        Self::new()
    }
}

impl DaemonProber for HttpProber {
    fn probe(&self, endpoint: &Endpoint) -> Option<DaemonInfo> {
        let response = match self
            .client
            .get(endpoint.probe_url())
            .timeout(PROBE_TIMEOUT)
            .send()
        {
            Ok(response) => response,
            Err(err) => {
                debug!(%endpoint, error = %err, "daemon probe failed");
                return None;
            }
        };

        if !response.status().is_success() {
            debug!(%endpoint, status = %response.status(), "daemon probe rejected");
            return None;
        }

        match response.json::<DaemonInfo>() {
            Ok(info) if info.success => Some(info),
            Ok(_) => None,
            Err(err) => {
                debug!(%endpoint, error = %err, "daemon probe response malformed");
                None
            }
        }
    }
}
