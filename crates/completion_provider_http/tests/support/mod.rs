//! Blocking scripted HTTP server for provider-level tests.
//!
//! The provider drives its own tokio runtime, so the server here runs on a
//! plain thread and never shares a runtime with the code under test.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use std::time::Duration;

pub struct Reply {
    pub status: u16,
    pub body: &'static str,
}

pub fn reply(status: u16, body: &'static str) -> Reply {
    Reply { status, body }
}

pub struct ScriptedServer {
    pub base_url: String,
    request_count: Arc<AtomicUsize>,
    request_bodies: Arc<Mutex<Vec<String>>>,
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl ScriptedServer {
    pub fn start(script: Vec<Reply>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("local TCP listener should bind");
        listener
            .set_nonblocking(true)
            .expect("listener should switch to non-blocking mode");
        let addr = listener.local_addr().expect("resolved local listener address");

        let request_count = Arc::new(AtomicUsize::new(0));
        let request_bodies = Arc::new(Mutex::new(Vec::new()));
        let stop = Arc::new(AtomicBool::new(false));

        let handle = thread::spawn({
            let request_count = Arc::clone(&request_count);
            let request_bodies = Arc::clone(&request_bodies);
            let stop = Arc::clone(&stop);
            move || {
                while !stop.load(Ordering::Acquire) {
                    match listener.accept() {
                        Ok((socket, _)) => {
                            let index = request_count.fetch_add(1, Ordering::AcqRel);
                            let body = serve_one(socket, script.get(index));
                            lock_unpoisoned(&request_bodies).push(body);
                        }
                        Err(error) if error.kind() == std::io::ErrorKind::WouldBlock => {
                            thread::sleep(Duration::from_millis(5));
                        }
                        Err(_) => break,
                    }
                }
            }
        });

        Self {
            base_url: format!("http://{addr}/v1"),
            request_count,
            request_bodies,
            stop,
            handle: Some(handle),
        }
    }

    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::Acquire)
    }

    pub fn request_bodies(&self) -> Vec<String> {
        lock_unpoisoned(&self.request_bodies).clone()
    }
}

impl Drop for ScriptedServer {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn serve_one(mut socket: TcpStream, reply: Option<&Reply>) -> String {
    let _ = socket.set_nonblocking(false);
    let _ = socket.set_read_timeout(Some(Duration::from_secs(5)));
    let body = read_body(&mut socket).unwrap_or_default();

    let (status, payload) = match reply {
        Some(reply) => (reply.status, reply.body),
        None => (500, r#"{"error":{"message":"unexpected request"}}"#),
    };
    let head = format!(
        "HTTP/1.1 {status} Scripted\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        payload.len(),
    );
    let _ = socket.write_all(head.as_bytes());
    let _ = socket.write_all(payload.as_bytes());
    let _ = socket.flush();

    body
}

fn read_body(socket: &mut TcpStream) -> std::io::Result<String> {
    let mut request = Vec::new();
    let mut buffer = [0_u8; 4096];

    let header_end = loop {
        let n = socket.read(&mut buffer)?;
        if n == 0 {
            return Ok(String::new());
        }
        request.extend_from_slice(&buffer[..n]);
        if let Some(position) = request.windows(4).position(|window| window == b"\r\n\r\n") {
            break position + 4;
        }
    };

    let head = String::from_utf8_lossy(&request[..header_end]).to_ascii_lowercase();
    let content_length = head
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .and_then(|value| value.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while request.len() < header_end + content_length {
        let n = socket.read(&mut buffer)?;
        if n == 0 {
            break;
        }
        request.extend_from_slice(&buffer[..n]);
    }

    Ok(String::from_utf8_lossy(&request[header_end..]).into_owned())
}

fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
