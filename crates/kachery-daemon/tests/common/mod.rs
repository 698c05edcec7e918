pub mod mock_daemon;

pub use mock_daemon::MockDaemon;
pub use mock_daemon::TEST_NODE_ID;
