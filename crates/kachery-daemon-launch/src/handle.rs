//! Scoped ownership of the launched daemon subprocess.
//!
//! The handle guarantees stop-then-kill on every exit path, including drop,
//! so no daemon subprocess outlives the controller that spawned it.

use std::io;
use std::process::{Child, ExitStatus};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{info, warn};

use crate::error::LaunchError;
use crate::process::{ProcessSignaller, StopSignal, UnixSignaller};

const WAIT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// How long a stopped daemon gets to exit before it is killed.
pub const STOP_GRACE_PERIOD: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleState {
    Running,
    /// The daemon exited on its own with the given code.
    Exited(i32),
    /// The daemon exited after a graceful stop request.
    Stopped,
    /// The daemon had to be force-terminated.
    Killed,
}

impl HandleState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, HandleState::Running)
    }
}

#[derive(Debug)]
pub struct DaemonProcessHandle<S: ProcessSignaller = UnixSignaller> {
    child: Child,
    signaller: S,
    state: HandleState,
}

impl DaemonProcessHandle<UnixSignaller> {
    pub fn new(child: Child) -> Self {
        Self::with_signaller(child, UnixSignaller)
    }
}

impl<S: ProcessSignaller> DaemonProcessHandle<S> {
    pub fn with_signaller(child: Child, signaller: S) -> Self {
        Self {
            child,
            signaller,
            state: HandleState::Running,
        }
    }

    pub fn pid(&self) -> u32 {
        self.child.id()
    }

    pub fn state(&self) -> HandleState {
        self.state
    }

    /// Block until the daemon exits on its own.
    pub fn wait(&mut self) -> io::Result<i32> {
        let status = self.child.wait()?;
        let code = exit_code(status);
        self.state = HandleState::Exited(code);
        Ok(code)
    }

    /// Block until the daemon exits or `cancelled` is raised.
    ///
    /// On cancellation the subprocess is stopped then killed before the
    /// interruption is surfaced, so the caller never leaks a daemon.
    pub fn wait_interruptible(&mut self, cancelled: &AtomicBool) -> Result<i32, LaunchError> {
        loop {
            if let Some(status) = self.child.try_wait()? {
                let code = exit_code(status);
                self.state = HandleState::Exited(code);
                return Ok(code);
            }
            if cancelled.load(Ordering::SeqCst) {
                self.shutdown();
                return Err(LaunchError::Interrupted);
            }
            thread::sleep(WAIT_POLL_INTERVAL);
        }
    }

    /// Request graceful termination.
    pub fn stop(&mut self) -> io::Result<()> {
        self.signaller.signal(self.child.id(), StopSignal::Term)
    }

    /// Force termination.
    pub fn kill(&mut self) -> io::Result<()> {
        self.signaller.signal(self.child.id(), StopSignal::Kill)
    }

    /// Stop, wait out the grace period, kill, reap.
    ///
    /// Idempotent: once the handle reached a terminal state this is a no-op,
    /// so stop and kill are each issued at most once.
    pub fn shutdown(&mut self) {
        if self.state.is_terminal() {
            return;
        }
        let pid = self.child.id();
        info!(pid, "shutting down daemon subprocess");

        if let Err(err) = self.stop() {
            warn!(pid, error = %err, "stop signal failed");
        }

        let deadline = Instant::now() + STOP_GRACE_PERIOD;
        let mut exited = false;
        while Instant::now() < deadline {
            match self.child.try_wait() {
                Ok(Some(_)) => {
                    exited = true;
                    break;
                }
                Ok(None) => thread::sleep(WAIT_POLL_INTERVAL),
                Err(_) => break,
            }
        }

        if let Err(err) = self.kill() {
            warn!(pid, error = %err, "kill signal failed");
        }

        if exited {
            self.state = HandleState::Stopped;
        } else {
            // reap so the kill does not leave a zombie behind
            let _ = self.child.wait();
            self.state = HandleState::Killed;
        }
    }
}

impl<S: ProcessSignaller> Drop for DaemonProcessHandle<S> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn exit_code(status: ExitStatus) -> i32 {
    status
        .code()
        .unwrap_or(if status.success() { 0 } else { 1 })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::mock::RecordingSignaller;
    use std::process::Command;

    fn spawn_sh(script: &str) -> Child {
        Command::new("sh")
            .arg("-c")
            .arg(script)
            .spawn()
            .expect("spawn test subprocess")
    }

    #[test]
    fn test_wait_reports_exit_code() {
        let mut handle = DaemonProcessHandle::new(spawn_sh("exit 7"));
        assert_eq!(handle.wait().unwrap(), 7);
        assert_eq!(handle.state(), HandleState::Exited(7));
    }

    #[test]
    fn test_wait_interruptible_completes_without_cancellation() {
        let mut handle = DaemonProcessHandle::new(spawn_sh("exit 0"));
        let cancelled = AtomicBool::new(false);
        assert_eq!(handle.wait_interruptible(&cancelled).unwrap(), 0);
    }

    #[test]
    fn test_cancellation_stops_then_kills_exactly_once() {
        let signaller = RecordingSignaller::new();
        let mut handle = DaemonProcessHandle::with_signaller(spawn_sh("sleep 1"), signaller.clone());
        let pid = handle.pid();

        let cancelled = AtomicBool::new(true);
        let result = handle.wait_interruptible(&cancelled);
        assert!(matches!(result, Err(LaunchError::Interrupted)));

        assert_eq!(
            signaller.sent(),
            vec![(pid, StopSignal::Term), (pid, StopSignal::Kill)]
        );

        // Dropping after a terminal state must not signal again.
        drop(handle);
        assert_eq!(signaller.sent().len(), 2);
    }

    #[test]
    fn test_shutdown_is_idempotent() {
        let signaller = RecordingSignaller::new();
        let mut handle = DaemonProcessHandle::with_signaller(spawn_sh("sleep 1"), signaller.clone());

        handle.shutdown();
        handle.shutdown();

        assert_eq!(signaller.sent().len(), 2);
        assert!(handle.state().is_terminal());
    }

    #[test]
    fn test_real_shutdown_terminates_a_sleeping_child() {
        let start = Instant::now();
        let mut handle = DaemonProcessHandle::new(spawn_sh("sleep 30"));
        handle.shutdown();

        assert!(handle.state().is_terminal());
        assert!(start.elapsed() < STOP_GRACE_PERIOD + Duration::from_secs(2));
    }
}
