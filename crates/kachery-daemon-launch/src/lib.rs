#![deny(clippy::all)]

//! Launch side of the controller: assembles startup options, provisions the
//! daemon (released artifact or local source tree), and supervises the
//! resulting subprocess until it exits or the caller is interrupted.

mod error;
mod handle;
mod launcher;
mod options;
mod orchestrator;
pub mod process;

pub use error::LaunchError;
pub use handle::DaemonProcessHandle;
pub use handle::HandleState;
pub use handle::STOP_GRACE_PERIOD;
pub use launcher::artifact_file_name;
pub use launcher::DaemonLauncher;
pub use launcher::LauncherConfig;
pub use launcher::SubprocessLauncher;
pub use launcher::MIN_NODE_MAJOR;
pub use options::daemon_start_args;
pub use options::LaunchMethod;
pub use options::StartupOptions;
pub use options::DEFAULT_KACHERY_HUB_URL;
pub use orchestrator::start_daemon;

pub type Result<T> = std::result::Result<T, LaunchError>;
