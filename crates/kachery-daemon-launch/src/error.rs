//! Launch-side error taxonomy.
//!
//! Probe misses and a missing credential file are normal states, not errors;
//! everything here is a real fault that should stop the start attempt.
//! Nothing is retried automatically — retry policy belongs to the caller.

use std::io;
use std::path::PathBuf;

use kachery_daemon_common::error_codes::ErrorCategory;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LaunchError {
    #[error("cannot start daemon: already running (node {node_id})")]
    AlreadyRunning { node_id: String },

    #[error("missing prerequisite ({what}): {detail}")]
    PrerequisiteMissing { what: &'static str, detail: String },

    #[error("daemon artifact not found: {}", .path.display())]
    ArtifactMissing { path: PathBuf },

    #[error("invalid method for starting daemon: {given} (expected `packaged` or `source`)")]
    InvalidMethod { given: String },

    #[error("invalid startup options: {reason}")]
    InvalidOptions { reason: String },

    #[error("provisioning step `{step}` exited with code {code}")]
    StepFailed { step: &'static str, code: i32 },

    #[error("daemon exited with code {code}")]
    DaemonExited { code: i32 },

    #[error("interrupted while waiting for the daemon")]
    Interrupted,

    #[error("process error: {0}")]
    Io(#[from] io::Error),
}

impl LaunchError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            LaunchError::AlreadyRunning { .. } => ErrorCategory::Busy,
            LaunchError::PrerequisiteMissing { .. } | LaunchError::ArtifactMissing { .. } => {
                ErrorCategory::NotFound
            }
            LaunchError::InvalidMethod { .. } | LaunchError::InvalidOptions { .. } => {
                ErrorCategory::InvalidInput
            }
            LaunchError::StepFailed { .. }
            | LaunchError::DaemonExited { .. }
            | LaunchError::Io(_) => ErrorCategory::External,
            LaunchError::Interrupted => ErrorCategory::Timeout,
        }
    }

    /// Returns a helpful suggestion for resolving the error, if one exists.
    pub fn suggestion(&self) -> Option<String> {
        match self {
            LaunchError::AlreadyRunning { .. } => Some(
                "Stop the running daemon first; only one daemon may serve an endpoint at a time."
                    .to_string(),
            ),
            LaunchError::PrerequisiteMissing { what, .. } => Some(format!(
                "Install the {what} and retry. The packaged method needs nodejs >=12 on PATH."
            )),
            LaunchError::ArtifactMissing { .. } => Some(
                "Reinstall kachery-daemon; the daemon package ships alongside the controller binary."
                    .to_string(),
            ),
            LaunchError::InvalidMethod { .. } => {
                Some("Use --method packaged or --method source.".to_string())
            }
            LaunchError::StepFailed { .. } => {
                Some("Re-run with KACHERY_DAEMON_LOG set to capture the step output.".to_string())
            }
            LaunchError::InvalidOptions { .. }
            | LaunchError::DaemonExited { .. }
            | LaunchError::Interrupted
            | LaunchError::Io(_) => None,
        }
    }

    /// Whether the same invocation might succeed if simply repeated.
    pub fn is_retryable(&self) -> bool {
        matches!(self, LaunchError::StepFailed { .. })
    }

    /// Converts to a UNIX sysexits.h-compliant exit code. A daemon that ran
    /// and exited non-zero propagates its own code unchanged.
    pub fn exit_code(&self) -> i32 {
        match self {
            LaunchError::DaemonExited { code } => *code,
            other => other.category().exit_code(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_by_kind() {
        let already = LaunchError::AlreadyRunning {
            node_id: "abc".to_string(),
        };
        assert_eq!(already.exit_code(), 73);

        let method = LaunchError::InvalidMethod {
            given: "docker".to_string(),
        };
        assert_eq!(method.exit_code(), 64);

        let artifact = LaunchError::ArtifactMissing {
            path: PathBuf::from("/opt/kachery-daemon-node-0.1.0.tgz"),
        };
        assert_eq!(artifact.exit_code(), 69);
    }

    #[test]
    fn test_daemon_exit_code_propagates() {
        let err = LaunchError::DaemonExited { code: 3 };
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn test_only_step_failures_are_retryable() {
        assert!(LaunchError::StepFailed {
            step: "npm install",
            code: 1
        }
        .is_retryable());
        assert!(!LaunchError::Interrupted.is_retryable());
        assert!(!LaunchError::AlreadyRunning {
            node_id: "abc".to_string()
        }
        .is_retryable());
    }

    #[test]
    fn test_messages_name_the_culprit() {
        let err = LaunchError::ArtifactMissing {
            path: PathBuf::from("/opt/pkg.tgz"),
        };
        assert!(err.to_string().contains("/opt/pkg.tgz"));

        let err = LaunchError::InvalidMethod {
            given: "dev".to_string(),
        };
        assert!(err.to_string().contains("dev"));
    }
}
