//! Loopback stand-ins for speakers on the network

use std::io::{Read, Write};
use std::net::{Ipv4Addr, SocketAddr, TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

/// A tiny HTTP server that answers every request with a fixed body
pub struct FakeSpeaker {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<String>>>,
}

impl FakeSpeaker {
    /// Serve `body` on an ephemeral port of `ip`
    pub fn start(ip: Ipv4Addr, body: &str) -> Self {
        Self::start_on(ip, 0, body)
    }

    /// Serve `body` on `ip:port`
    pub fn start_on(ip: Ipv4Addr, port: u16, body: &str) -> Self {
        let listener = TcpListener::bind((ip, port)).expect("bind fake speaker");
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));

        let body = body.to_string();
        let log = Arc::clone(&requests);
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                let body = body.clone();
                let log = Arc::clone(&log);
                thread::spawn(move || serve(stream, &body, &log));
            }
        });

        Self { addr, requests }
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    /// Request lines received so far (port probes send nothing and are not listed)
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

fn serve(mut stream: TcpStream, body: &str, log: &Mutex<Vec<String>>) {
    stream.set_read_timeout(Some(Duration::from_secs(2))).ok();

    let mut request = Vec::new();
    let mut buf = [0u8; 1024];
    loop {
        match stream.read(&mut buf) {
            Ok(0) | Err(_) => break,
            Ok(n) => {
                request.extend_from_slice(&buf[..n]);
                if request.windows(4).any(|w| w == b"\r\n\r\n") {
                    break;
                }
            }
        }
    }

    // A bare connect from the port prober
    if request.is_empty() {
        return;
    }

    let text = String::from_utf8_lossy(&request);
    if let Some(line) = text.lines().next() {
        log.lock().unwrap().push(line.to_string());
    }

    let response = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        body.len(),
        body
    );
    stream.write_all(response.as_bytes()).ok();
    stream.flush().ok();
}

/// A port on `ip` with nothing listening
pub fn closed_port(ip: Ipv4Addr) -> u16 {
    let listener = TcpListener::bind((ip, 0)).unwrap();
    listener.local_addr().unwrap().port()
}
