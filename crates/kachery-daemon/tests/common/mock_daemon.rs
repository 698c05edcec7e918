//! Minimal HTTP daemon stand-in for CLI tests.
//!
//! Listens on an ephemeral TCP port and answers every request with the
//! configured probe body, the way a live daemon answers `/probe`. Runs until
//! dropped.

#![allow(dead_code)]

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

pub const TEST_NODE_ID: &str = "f00dfeed0123456789abcdef";

pub struct MockDaemon {
    port: u16,
    shutdown: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl MockDaemon {
    /// Start a daemon that reports a healthy probe with [`TEST_NODE_ID`].
    pub fn start() -> Self {
        let body = serde_json::json!({
            "success": true,
            "daemonVersion": "0.1.0",
            "nodeId": TEST_NODE_ID,
            "kacheryStorageDir": null,
        })
        .to_string();
        Self::with_body(body)
    }

    pub fn with_body(body: String) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind mock daemon");
        listener
            .set_nonblocking(true)
            .expect("set mock daemon nonblocking");
        let port = listener.local_addr().expect("mock daemon addr").port();

        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_flag = Arc::clone(&shutdown);
        let handle = std::thread::spawn(move || {
            while !shutdown_flag.load(Ordering::SeqCst) {
                match listener.accept() {
                    Ok((stream, _)) => serve(stream, &body),
                    Err(ref err) if err.kind() == std::io::ErrorKind::WouldBlock => {
                        std::thread::sleep(Duration::from_millis(10));
                    }
                    Err(_) => break,
                }
            }
        });

        Self {
            port,
            shutdown,
            handle: Some(handle),
        }
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn host(&self) -> &'static str {
        "127.0.0.1"
    }
}

impl Drop for MockDaemon {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn serve(mut stream: TcpStream, body: &str) {
    let mut request = [0u8; 2048];
    let _ = stream.read(&mut request);
    let response = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        body.len(),
        body
    );
    let _ = stream.write_all(response.as_bytes());
}
