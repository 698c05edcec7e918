//! Node identity and client authorization introspection.
//!
//! The daemon rotates a per-user credential file under its storage
//! directory. Absence of that file is the normal "not authorized" state,
//! never an error.

use std::fmt;
use std::fs;

use crate::config::ConnectionConfig;
use crate::error::ConnectionError;
use crate::probe::DaemonProber;

/// Secret token granting local-client access to a running daemon.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthCode(String);

impl AuthCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AuthCode {
    // keep the secret out of logs
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthCode(..)")
    }
}

/// Stable identifier of the node a daemon serves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeId(String);

impl NodeId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone)]
pub struct NodeStatus {
    pub node_id: NodeId,
    pub has_access: bool,
}

/// Read the per-user credential file, exactly as stored.
///
/// Returns `None` when the file is absent or unreadable.
pub fn read_client_auth_code(config: &ConnectionConfig) -> Option<AuthCode> {
    fs::read_to_string(config.client_auth_path())
        .ok()
        .map(AuthCode)
}

/// Identity of the node served by the daemon at the configured endpoint.
///
/// Identity is foundational, so an unreachable daemon is an error here,
/// unlike in [`DaemonProber::probe`].
pub fn node_id<P: DaemonProber>(
    prober: &P,
    config: &ConnectionConfig,
) -> Result<NodeId, ConnectionError> {
    let endpoint = config.endpoint();
    let info = prober
        .probe(&endpoint)
        .ok_or(ConnectionError::DaemonUnreachable { endpoint })?;
    Ok(NodeId(info.node_id))
}

/// The info query: node identity plus whether the current user holds a
/// credential for the daemon. Performs no mutation.
pub fn node_status<P: DaemonProber>(
    prober: &P,
    config: &ConnectionConfig,
) -> Result<NodeStatus, ConnectionError> {
    let node_id = node_id(prober, config)?;
    let has_access = read_client_auth_code(config).is_some();
    Ok(NodeStatus {
        node_id,
        has_access,
    })
}
