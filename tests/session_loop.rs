//! Drives a live server over loopback with blocking clients.

use keepframe::{Hero, Server, ServerConfig, page::bootstrap_document};
use keepframe_common::{
    DEPTH, FrameEncoding, InputVector, KeyCode,
    wire::{content_length, head_end},
};
use std::{
    io::{Read, Write},
    net::{Shutdown, SocketAddr, TcpStream},
    sync::mpsc,
    thread,
    time::{Duration, Instant},
};

const WIDTH: usize = 32;
const HEIGHT: usize = 16;

fn test_config() -> ServerConfig {
    ServerConfig {
        addr: "127.0.0.1:0".parse().unwrap(),
        pacing: Duration::from_millis(50),
        width: WIDTH,
        height: HEIGHT,
        backlog: 4,
        ..ServerConfig::default()
    }
}

fn spawn_server(config: ServerConfig) -> SocketAddr {
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        let mut runtime = monoio::RuntimeBuilder::<monoio::FusionDriver>::new()
            .enable_timer()
            .build()
            .unwrap();

        runtime
            .block_on(async move {
                let scene = Hero::centered(config.width, config.height);
                let server = Server::bind(config, scene)?;
                tx.send(server.local_addr()?).unwrap();
                server.serve().await
            })
            .unwrap();
    });

    rx.recv_timeout(Duration::from_secs(5)).unwrap()
}

/// Blocking stand-in for the page.
struct TestClient {
    stream: TcpStream,
    buf: Vec<u8>,
}

impl TestClient {
    fn connect(addr: SocketAddr) -> Self {
        let stream = TcpStream::connect(addr).unwrap();
        stream
            .set_read_timeout(Some(Duration::from_secs(5)))
            .unwrap();
        Self {
            stream,
            buf: Vec::new(),
        }
    }

    fn send(&mut self, raw: &[u8]) {
        self.stream.write_all(raw).unwrap();
    }

    /// Read one response, returning its head and body.
    fn recv(&mut self) -> (Vec<u8>, Vec<u8>) {
        let mut chunk = [0; 4096];

        loop {
            if let Some(end) = head_end(&self.buf) {
                let len = content_length(&self.buf[..end]).unwrap();
                if self.buf.len() >= end + len {
                    let rest = self.buf.split_off(end + len);
                    let mut head = std::mem::replace(&mut self.buf, rest);
                    let body = head.split_off(end);
                    return (head, body);
                }
            }

            let n = self.stream.read(&mut chunk).unwrap();
            assert_ne!(n, 0, "server closed the connection");
            self.buf.extend_from_slice(&chunk[..n]);
        }
    }

    /// True once the server has closed its side.
    fn closed_by_server(&mut self) -> bool {
        let mut buf = [0; 16];
        matches!(self.stream.read(&mut buf), Ok(0) | Err(_))
    }
}

fn post_request(keys: &[KeyCode]) -> Vec<u8> {
    let body = InputVector::encode(keys);
    let mut raw = format!(
        "POST / HTTP/1.1\r\nHost: localhost\r\nContent-Length: {}\r\n\r\n",
        body.len()
    )
    .into_bytes();
    raw.extend_from_slice(&body);
    raw
}

#[test]
fn serves_page_then_frames() {
    let addr = spawn_server(test_config());
    let mut client = TestClient::connect(addr);

    client.send(b"GET / HTTP/1.1\r\nHost: localhost\r\n\r\n");
    let (head, body) = client.recv();
    assert!(head.starts_with(b"HTTP/1.1 200 OK\r\n"));
    assert!(
        head.windows(25).any(|w| w == b"Content-Type: text/html\r\n"),
        "missing content type"
    );
    assert_eq!(
        body,
        bootstrap_document(WIDTH, HEIGHT, FrameEncoding::Raw).as_bytes()
    );

    let held: [&[KeyCode]; 3] = [
        &[],
        &[KeyCode::ArrowLeft],
        &[KeyCode::ArrowUp, KeyCode::ArrowRight],
    ];
    for keys in held {
        client.send(&post_request(keys));
        let (_, body) = client.recv();
        assert_eq!(body.len(), WIDTH * HEIGHT * DEPTH);
    }

    client.send(b"GET /missing HTTP/1.1\r\n\r\n");
    let (head, body) = client.recv();
    assert!(body.is_empty());
    assert_eq!(content_length(&head), Some(0));
}

#[test]
fn responses_are_paced() {
    let config = test_config();
    let interval = config.pacing;
    let addr = spawn_server(config);
    let mut client = TestClient::connect(addr);

    let mut arrivals = Vec::new();
    for _ in 0..4 {
        client.send(&post_request(&[]));
        client.recv();
        arrivals.push(Instant::now());
    }

    for pair in arrivals.windows(2) {
        let gap = pair[1] - pair[0];
        assert!(
            gap + Duration::from_millis(5) >= interval,
            "responses {gap:?} apart"
        );
    }
}

#[test]
fn accepts_again_after_peer_shutdown() {
    let addr = spawn_server(test_config());

    for _ in 0..3 {
        let mut client = TestClient::connect(addr);
        client.send(&post_request(&[]));
        let (_, body) = client.recv();
        assert_eq!(body.len(), WIDTH * HEIGHT * DEPTH);
        client.stream.shutdown(Shutdown::Both).unwrap();
    }
}

#[test]
fn simulation_survives_reconnects() {
    let addr = spawn_server(test_config());

    let mut first = TestClient::connect(addr);
    first.send(&post_request(&[KeyCode::ArrowLeft]));
    let (_, moved_once) = first.recv();
    drop(first);

    let mut second = TestClient::connect(addr);
    second.send(&post_request(&[]));
    let (_, after_reconnect) = second.recv();
    assert_eq!(moved_once, after_reconnect);
}

#[test]
fn reassembles_split_requests() {
    let addr = spawn_server(test_config());
    let mut client = TestClient::connect(addr);
    client.stream.set_nodelay(true).unwrap();

    let raw = post_request(&[KeyCode::ArrowDown]);
    for piece in raw.chunks(7) {
        client.send(piece);
        thread::sleep(Duration::from_millis(2));
    }

    let (_, body) = client.recv();
    assert_eq!(body.len(), WIDTH * HEIGHT * DEPTH);
}

#[test]
fn pipelined_requests_answered_in_order() {
    let addr = spawn_server(test_config());
    let mut client = TestClient::connect(addr);

    let mut burst = b"GET / HTTP/1.1\r\n\r\n".to_vec();
    burst.extend_from_slice(&post_request(&[]));
    client.send(&burst);

    let (_, page) = client.recv();
    assert_eq!(
        page,
        bootstrap_document(WIDTH, HEIGHT, FrameEncoding::Raw).as_bytes()
    );
    let (_, frame) = client.recv();
    assert_eq!(frame.len(), WIDTH * HEIGHT * DEPTH);
}

#[test]
fn oversized_request_ends_only_that_session() {
    let addr = spawn_server(test_config());

    let mut greedy = TestClient::connect(addr);
    greedy.send(b"POST / HTTP/1.1\r\nContent-Length: 999999999\r\n\r\n");
    assert!(greedy.closed_by_server());

    let mut polite = TestClient::connect(addr);
    polite.send(&post_request(&[]));
    let (_, body) = polite.recv();
    assert_eq!(body.len(), WIDTH * HEIGHT * DEPTH);
}

#[test]
fn idle_connection_times_out() {
    let config = ServerConfig {
        read_timeout: Some(Duration::from_millis(100)),
        ..test_config()
    };
    let addr = spawn_server(config);

    let mut idle = TestClient::connect(addr);
    assert!(idle.closed_by_server());

    let mut next = TestClient::connect(addr);
    next.send(&post_request(&[]));
    let (_, body) = next.recv();
    assert_eq!(body.len(), WIDTH * HEIGHT * DEPTH);
}
