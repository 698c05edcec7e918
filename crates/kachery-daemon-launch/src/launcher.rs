//! Provisioning and launching of the daemon subprocess.
//!
//! The original installer concatenated a `set -ex` shell script; here each
//! step is a discrete subprocess with an explicit argv and environment, run
//! in sequence and aborted on the first failure. Executed command lines are
//! logged at `info` so a failing launch stays diagnosable.

use std::env;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::info;

use kachery_daemon_connection::Endpoint;

use crate::error::LaunchError;
use crate::handle::DaemonProcessHandle;
use crate::options::{daemon_start_args, LaunchMethod, StartupOptions};

/// Minimum major version of the nodejs runtime the packaged daemon needs.
pub const MIN_NODE_MAJOR: u32 = 12;

const NODE_RUNTIME: &str = "node";
const NPM: &str = "npm";
const DAEMON_PACKAGE: &str = "kachery-daemon-node";

const ENV_DAEMON_PORT: &str = "KACHERY_DAEMON_PORT";
const ENV_DAEMON_HOST: &str = "KACHERY_DAEMON_HOST";

pub trait DaemonLauncher {
    fn launch(
        &self,
        endpoint: &Endpoint,
        options: &StartupOptions,
    ) -> Result<DaemonProcessHandle, LaunchError>;
}

/// Filesystem locations the launcher depends on.
#[derive(Debug, Clone)]
pub struct LauncherConfig {
    /// Directory holding the versioned installable artifact.
    pub artifact_dir: PathBuf,
    /// Local development tree used by the source method.
    pub source_dir: PathBuf,
}

impl LauncherConfig {
    /// Default locations relative to the controller executable: the artifact
    /// ships alongside the binary, the development tree sits at `../daemon`.
    pub fn resolve() -> io::Result<Self> {
        let exe = env::current_exe()?;
        let exe_dir = exe
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let source_dir = exe_dir.join("..").join("daemon");
        Ok(Self {
            artifact_dir: exe_dir,
            source_dir,
        })
    }

    pub fn with_artifact_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.artifact_dir = dir.into();
        self
    }

    pub fn with_source_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.source_dir = dir.into();
        self
    }
}

/// Name of the installable daemon package matching this controller version.
pub fn artifact_file_name() -> String {
    format!("{DAEMON_PACKAGE}-{}.tgz", env!("CARGO_PKG_VERSION"))
}

pub struct SubprocessLauncher {
    config: LauncherConfig,
}

impl SubprocessLauncher {
    pub fn new(config: LauncherConfig) -> Self {
        Self { config }
    }

    fn launch_packaged(
        &self,
        endpoint: &Endpoint,
        options: &StartupOptions,
    ) -> Result<DaemonProcessHandle, LaunchError> {
        verify_node_runtime()?;

        let artifact = self.config.artifact_dir.join(artifact_file_name());
        if !artifact.exists() {
            return Err(LaunchError::ArtifactMissing { path: artifact });
        }

        let mut install = Command::new(NPM);
        install.args(["install", "-g", "-y"]).arg(&artifact);
        apply_daemon_env(&mut install, endpoint);
        run_step("npm install", &mut install)?;

        let mut args = vec!["start".to_string()];
        args.extend(daemon_start_args(options));
        // pass-through runtime arguments are packaged-only: the installed
        // entry point relays each one to the node invocation it wraps
        for node_arg in &options.node_args {
            args.push(format!("--node-arg={node_arg}"));
        }

        let mut start = Command::new(DAEMON_PACKAGE);
        start.args(&args);
        apply_daemon_env(&mut start, endpoint);
        spawn_daemon(&mut start)
    }

    fn launch_source(
        &self,
        endpoint: &Endpoint,
        options: &StartupOptions,
    ) -> Result<DaemonProcessHandle, LaunchError> {
        if !self.config.source_dir.is_dir() {
            return Err(LaunchError::PrerequisiteMissing {
                what: "daemon source tree",
                detail: format!("no such directory: {}", self.config.source_dir.display()),
            });
        }

        let mut args = options.node_args.clone();
        args.extend(
            [
                "-r",
                "ts-node/register",
                "-r",
                "tsconfig-paths/register",
                "./src/cli.ts",
                "start",
            ]
            .map(String::from),
        );
        args.extend(daemon_start_args(options));

        let mut start = Command::new(NODE_RUNTIME);
        start.args(&args).current_dir(&self.config.source_dir);
        apply_daemon_env(&mut start, endpoint);
        spawn_daemon(&mut start)
    }
}

impl DaemonLauncher for SubprocessLauncher {
    fn launch(
        &self,
        endpoint: &Endpoint,
        options: &StartupOptions,
    ) -> Result<DaemonProcessHandle, LaunchError> {
        match options.method {
            LaunchMethod::Packaged => self.launch_packaged(endpoint, options),
            LaunchMethod::Source => self.launch_source(endpoint, options),
        }
    }
}

/// Every step shares the same endpoint context the daemon will bind to.
fn apply_daemon_env(command: &mut Command, endpoint: &Endpoint) {
    command.env(ENV_DAEMON_PORT, endpoint.port.to_string());
    command.env(ENV_DAEMON_HOST, &endpoint.host);
}

fn verify_node_runtime() -> Result<(), LaunchError> {
    if which::which(NODE_RUNTIME).is_err() {
        return Err(LaunchError::PrerequisiteMissing {
            what: "nodejs runtime",
            detail: format!(
                "`{NODE_RUNTIME}` not found on PATH; version >={MIN_NODE_MAJOR} is required to run a kachery daemon"
            ),
        });
    }

    let output = Command::new(NODE_RUNTIME).arg("--version").output()?;
    if !output.status.success() {
        return Err(LaunchError::PrerequisiteMissing {
            what: "nodejs runtime",
            detail: "`node --version` failed".to_string(),
        });
    }

    let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
    let major = parse_node_major(&version).ok_or_else(|| LaunchError::PrerequisiteMissing {
        what: "nodejs runtime",
        detail: format!("unrecognized `node --version` output: {version}"),
    })?;
    if major < MIN_NODE_MAJOR {
        return Err(LaunchError::PrerequisiteMissing {
            what: "nodejs runtime",
            detail: format!("found nodejs {version}, need version >={MIN_NODE_MAJOR}"),
        });
    }
    Ok(())
}

fn parse_node_major(version: &str) -> Option<u32> {
    version
        .trim()
        .trim_start_matches('v')
        .split('.')
        .next()?
        .parse()
        .ok()
}

/// Run one provisioning step to completion, inheriting stdio so its output
/// reaches the user. Non-zero exit aborts the whole launch.
fn run_step(step: &'static str, command: &mut Command) -> Result<(), LaunchError> {
    info!(command = %render_command(command), step, "running provisioning step");
    let status = command.status()?;
    if !status.success() {
        return Err(LaunchError::StepFailed {
            step,
            code: status.code().unwrap_or(1),
        });
    }
    Ok(())
}

fn spawn_daemon(command: &mut Command) -> Result<DaemonProcessHandle, LaunchError> {
    info!(command = %render_command(command), "starting daemon");
    let child = command.spawn()?;
    Ok(DaemonProcessHandle::new(child))
}

fn render_command(command: &Command) -> String {
    std::iter::once(command.get_program())
        .chain(command.get_args())
        .map(|part| part.to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}
