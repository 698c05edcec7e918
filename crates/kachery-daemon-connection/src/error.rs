use kachery_daemon_common::error_codes::ErrorCategory;
use thiserror::Error;

use crate::config::Endpoint;

#[derive(Error, Debug)]
pub enum ConnectionError {
    #[error("unable to connect to kachery daemon at {endpoint}")]
    DaemonUnreachable { endpoint: Endpoint },
}

impl ConnectionError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ConnectionError::DaemonUnreachable { .. } => ErrorCategory::NotFound,
        }
    }

    /// Returns a helpful suggestion for resolving the error.
    pub fn suggestion(&self) -> String {
        match self {
            ConnectionError::DaemonUnreachable { .. } => {
                "Start a daemon with `kachery-daemon start --label <label>`, or point \
                 KACHERY_DAEMON_HOST/KACHERY_DAEMON_PORT at a running one."
                    .to_string()
            }
        }
    }

    pub fn is_retryable(&self) -> bool {
        false
    }

    /// Converts to a UNIX sysexits.h-compliant exit code.
    pub fn exit_code(&self) -> i32 {
        self.category().exit_code()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConnectionConfig;

    #[test]
    fn test_unreachable_maps_to_unavailable_exit_code() {
        let endpoint = ConnectionConfig::from_env().endpoint();
        let err = ConnectionError::DaemonUnreachable { endpoint };
        assert_eq!(err.category(), ErrorCategory::NotFound);
        assert_eq!(err.exit_code(), 69);
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_unreachable_message_names_the_endpoint() {
        let endpoint = ConnectionConfig::from_env()
            .with_host("localhost")
            .with_port(20431)
            .endpoint();
        let err = ConnectionError::DaemonUnreachable { endpoint };
        assert!(err.to_string().contains("localhost:20431"));
    }
}
