//! Unix signal delivery to the launched daemon subprocess.

use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopSignal {
    /// Graceful termination request (SIGTERM).
    Term,
    /// Forced termination (SIGKILL).
    Kill,
}

pub trait ProcessSignaller: Send + Sync {
    fn signal(&self, pid: u32, signal: StopSignal) -> io::Result<()>;
}

#[derive(Debug)]
pub struct UnixSignaller;

impl ProcessSignaller for UnixSignaller {
    fn signal(&self, pid: u32, signal: StopSignal) -> io::Result<()> {
        let pid_t: libc::pid_t = pid
            .try_into()
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "PID out of range"))?;

        let sig = match signal {
            StopSignal::Term => libc::SIGTERM,
            StopSignal::Kill => libc::SIGKILL,
        };

        let result = unsafe { libc::kill(pid_t, sig) };
        if result == 0 {
            return Ok(());
        }

        let err = io::Error::last_os_error();
        // ESRCH: the process is already gone, which is the outcome we wanted
        if err.raw_os_error() == Some(libc::ESRCH) {
            Ok(())
        } else {
            Err(err)
        }
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Records signals instead of delivering them.
    #[derive(Clone, Default)]
    pub struct RecordingSignaller {
        sent: Arc<Mutex<Vec<(u32, StopSignal)>>>,
    }

    impl RecordingSignaller {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn sent(&self) -> Vec<(u32, StopSignal)> {
            self.sent.lock().unwrap().clone()
        }
    }

    impl ProcessSignaller for RecordingSignaller {
        fn signal(&self, pid: u32, signal: StopSignal) -> io::Result<()> {
            self.sent.lock().unwrap().push((pid, signal));
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::RecordingSignaller;
    use super::*;

    #[test]
    fn test_recording_signaller_keeps_order() {
        let signaller = RecordingSignaller::new();
        signaller.signal(42, StopSignal::Term).unwrap();
        signaller.signal(42, StopSignal::Kill).unwrap();
        assert_eq!(
            signaller.sent(),
            vec![(42, StopSignal::Term), (42, StopSignal::Kill)]
        );
    }

    #[test]
    fn test_unix_signaller_tolerates_missing_process() {
        // Far beyond pid_max, so no process can hold it.
        let result = UnixSignaller.signal(999_999_999, StopSignal::Term);
        assert!(result.is_ok());
    }
}
