//! Top-level start use case: probe, launch, supervise.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use tracing::info;

use kachery_daemon_connection::{ConnectionConfig, DaemonProber};

use crate::error::LaunchError;
use crate::launcher::DaemonLauncher;
use crate::options::StartupOptions;

/// Start the daemon and block until it exits.
///
/// Refuses to start while a live daemon answers the probe — the probe is the
/// admission check for the endpoint, not a lock; a race between two
/// simultaneous starts is accepted. On SIGINT/SIGTERM the subprocess is
/// stopped then killed before the interruption surfaces. Returns the
/// daemon's own exit code.
pub fn start_daemon<P, L>(
    prober: &P,
    launcher: &L,
    config: &ConnectionConfig,
    options: &StartupOptions,
) -> Result<i32, LaunchError>
where
    P: DaemonProber,
    L: DaemonLauncher,
{
    options.validate()?;
    let endpoint = config.endpoint();

    if let Some(running) = prober.probe(&endpoint) {
        return Err(LaunchError::AlreadyRunning {
            node_id: running.node_id,
        });
    }

    let mut handle = launcher.launch(&endpoint, options)?;
    info!(pid = handle.pid(), %endpoint, label = %options.label, "daemon launched");

    let cancelled = Arc::new(AtomicBool::new(false));
    let registrations = register_cancellation(&cancelled)?;
    let outcome = handle.wait_interruptible(&cancelled);
    for registration in registrations {
        signal_hook::low_level::unregister(registration);
    }
    outcome
}

fn register_cancellation(flag: &Arc<AtomicBool>) -> Result<Vec<signal_hook::SigId>, LaunchError> {
    use signal_hook::consts::{SIGINT, SIGTERM};

    let mut registrations = Vec::with_capacity(2);
    for signal in [SIGINT, SIGTERM] {
        registrations.push(signal_hook::flag::register(signal, Arc::clone(flag))?);
    }
    Ok(registrations)
}
