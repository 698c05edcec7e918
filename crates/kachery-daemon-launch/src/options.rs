//! Startup options and the daemon's `start` argument list.

use std::fmt;
use std::str::FromStr;

use crate::error::LaunchError;

pub const DEFAULT_KACHERY_HUB_URL: &str = "https://kacheryhub.org";

/// How the daemon is provisioned before it is started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchMethod {
    /// Install the released artifact through the runtime's package manager.
    Packaged,
    /// Run straight from a local development tree.
    Source,
}

impl LaunchMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            LaunchMethod::Packaged => "packaged",
            LaunchMethod::Source => "source",
        }
    }
}

impl fmt::Display for LaunchMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LaunchMethod {
    type Err = LaunchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "packaged" => Ok(LaunchMethod::Packaged),
            "source" => Ok(LaunchMethod::Source),
            _ => Err(LaunchError::InvalidMethod {
                given: s.to_string(),
            }),
        }
    }
}

/// Everything a single start request carries. Built once, then immutable.
#[derive(Debug, Clone)]
pub struct StartupOptions {
    pub label: String,
    pub owner: String,
    pub verbose: u32,
    pub method: LaunchMethod,
    pub node_args: Vec<String>,
    pub auth_group: String,
    pub hub_url: String,
}

impl StartupOptions {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            owner: String::new(),
            verbose: 0,
            method: LaunchMethod::Packaged,
            node_args: Vec::new(),
            auth_group: String::new(),
            hub_url: DEFAULT_KACHERY_HUB_URL.to_string(),
        }
    }

    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = owner.into();
        self
    }

    pub fn with_verbose(mut self, verbose: u32) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_method(mut self, method: LaunchMethod) -> Self {
        self.method = method;
        self
    }

    pub fn with_node_args(mut self, node_args: Vec<String>) -> Self {
        self.node_args = node_args;
        self
    }

    pub fn with_auth_group(mut self, auth_group: impl Into<String>) -> Self {
        self.auth_group = auth_group.into();
        self
    }

    pub fn with_hub_url(mut self, hub_url: impl Into<String>) -> Self {
        self.hub_url = hub_url.into();
        self
    }

    pub fn validate(&self) -> Result<(), LaunchError> {
        if self.label.trim().is_empty() {
            return Err(LaunchError::InvalidOptions {
                reason: "label must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

/// Assemble the argument list for the daemon's own `start` entry point.
///
/// The order is fixed: verbosity first, optional flags only when non-empty,
/// then the label, then the optional owner. Flags and their values are
/// separate argv elements; nothing here ever passes through a shell.
pub fn daemon_start_args(options: &StartupOptions) -> Vec<String> {
    let mut args = vec!["--verbose".to_string(), options.verbose.to_string()];
    if !options.auth_group.is_empty() {
        args.push("--auth-group".to_string());
        args.push(options.auth_group.clone());
    }
    if !options.hub_url.is_empty() {
        args.push("--kachery-hub-url".to_string());
        args.push(options.hub_url.clone());
    }
    args.push("--label".to_string());
    args.push(options.label.clone());
    if !options.owner.is_empty() {
        args.push("--owner".to_string());
        args.push(options.owner.clone());
    }
    args
}
