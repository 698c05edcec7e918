#![deny(clippy::all)]

//! Connection-side view of a kachery daemon: where it should listen, whether
//! it is alive, and whether the current user is authorized against it.

mod auth;
mod config;
mod error;
mod probe;

pub use auth::read_client_auth_code;
pub use auth::AuthCode;
pub use auth::NodeId;
pub use auth::NodeStatus;
pub use auth::{node_id, node_status};
pub use config::ConnectionConfig;
pub use config::Endpoint;
pub use config::{DEFAULT_DAEMON_HOST, DEFAULT_DAEMON_PORT};
pub use error::ConnectionError;
pub use probe::DaemonInfo;
pub use probe::DaemonProber;
pub use probe::HttpProber;
pub use probe::PROBE_TIMEOUT;

pub type Result<T> = std::result::Result<T, ConnectionError>;
