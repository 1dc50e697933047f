#[macro_use]
extern crate tracing;

use itertools::{Itertools, MinMaxResult};
use keepframe_common::{
    DEPTH, FrameEncoding, InputVector, KeyCode,
    wire::{content_length, head_end},
};
use std::{
    io::{Read, Write},
    net::{IpAddr, Ipv4Addr, SocketAddr, TcpStream},
    path::PathBuf,
    time::{Duration, Instant},
};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

const LOCAL_SERVER: SocketAddr = SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 8080);

#[derive(argh::FromArgs)]
/// headless page stand-in: polls a keepframe server and reports frame timing
struct Args {
    #[argh(option, default = "LOCAL_SERVER")]
    /// address of the server
    addr: SocketAddr,

    #[argh(option, default = "20")]
    /// number of frames to request
    frames: usize,

    #[argh(option)]
    /// key held for every frame (left, up, right, down), repeatable
    key: Vec<KeyCode>,

    #[argh(option, default = "256")]
    /// frame width the server was started with
    width: u32,

    #[argh(option, default = "256")]
    /// frame height the server was started with
    height: u32,

    #[argh(option, default = "FrameEncoding::Raw")]
    /// frame payload encoding the server was started with
    encoding: FrameEncoding,

    #[argh(option)]
    /// write the last frame to this image file
    output: Option<PathBuf>,
}

/// Read exactly one response off `conn`.
fn read_response(conn: &mut TcpStream, buf: &mut Vec<u8>) -> anyhow::Result<Vec<u8>> {
    let mut chunk = [0; 4096];

    loop {
        if let Some(end) = head_end(buf) {
            let head = &buf[..end];
            anyhow::ensure!(
                head.starts_with(b"HTTP/1.1 200 OK\r\n"),
                "unexpected status line"
            );

            let len = content_length(head)
                .ok_or_else(|| anyhow::anyhow!("response without Content-Length"))?;
            if buf.len() >= end + len {
                let body = buf[end..end + len].to_vec();
                buf.drain(..end + len);
                return Ok(body);
            }
        }

        let n = conn.read(&mut chunk)?;
        anyhow::ensure!(n != 0, "server closed the connection");
        buf.extend_from_slice(&chunk[..n]);
    }
}

fn request(path_line: &str, body: &[u8]) -> Vec<u8> {
    let mut num_buf = itoa::Buffer::new();
    let mut raw = Vec::with_capacity(body.len() + 96);
    raw.extend_from_slice(path_line.as_bytes());
    raw.extend_from_slice(b"\r\nHost: keepframe\r\nContent-Length: ");
    raw.extend_from_slice(num_buf.format(body.len()).as_bytes());
    raw.extend_from_slice(b"\r\n\r\n");
    raw.extend_from_slice(body);
    raw
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let args: Args = argh::from_env();

    let frame_len = args.width as usize * args.height as usize * DEPTH;
    let input = InputVector::encode(&args.key);

    info!(addr = %args.addr, "connecting");
    let mut conn = TcpStream::connect(args.addr)?;
    conn.set_nodelay(true)?;
    let mut buf = Vec::new();

    conn.write_all(&request("GET / HTTP/1.1", &[]))?;
    let page = read_response(&mut conn, &mut buf)?;
    info!(bytes = page.len(), "received page");

    let post = request("POST / HTTP/1.1", &input);
    let mut arrivals = Vec::with_capacity(args.frames);
    let mut last_frame = Vec::new();

    for idx in 0..args.frames {
        conn.write_all(&post)?;
        let body = read_response(&mut conn, &mut buf)?;
        arrivals.push(Instant::now());

        let frame = args.encoding.decode(&body)?;
        anyhow::ensure!(
            frame.len() == frame_len,
            "frame {idx} holds {} bytes, expected {frame_len}",
            frame.len()
        );
        debug!(idx, bytes = body.len(), "frame");
        last_frame = frame;
    }

    let gaps: Vec<Duration> = arrivals
        .iter()
        .tuple_windows()
        .map(|(prev, next)| *next - *prev)
        .collect();

    match gaps.iter().minmax() {
        MinMaxResult::NoElements => info!("not enough frames to measure pacing"),
        MinMaxResult::OneElement(gap) => info!(?gap, "frame gap"),
        MinMaxResult::MinMax(min, max) => {
            let mean = gaps.iter().sum::<Duration>() / gaps.len() as u32;
            info!(?min, ?max, ?mean, frames = args.frames, "frame gaps");
        }
    }

    if let Some(output) = args.output {
        anyhow::ensure!(!last_frame.is_empty(), "no frame to write");
        let image = image::RgbaImage::from_raw(args.width, args.height, last_frame)
            .ok_or_else(|| anyhow::anyhow!("frame does not fit {}x{}", args.width, args.height))?;
        image.save(&output)?;
        info!(path = %output.display(), "wrote last frame");
    }

    Ok(())
}
