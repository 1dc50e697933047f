use keepframe_common::FrameEncoding;
use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    time::Duration,
};

pub const DEFAULT_ADDR: SocketAddr = SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 8080);
pub const DEFAULT_PACING: Duration = Duration::from_millis(100);
pub const DEFAULT_WIDTH: usize = 256;
pub const DEFAULT_HEIGHT: usize = 256;
pub const DEFAULT_BACKLOG: i32 = 1;
pub const DEFAULT_MAX_REQUEST_SIZE: usize = 64 * 1024;
pub const MAX_DIMENSION: usize = 4096;

/// Bytes asked for per receive call.
pub const RECV_CHUNK_SIZE: usize = 4096;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    /// Minimum spacing between two responses on one connection.
    pub pacing: Duration,
    pub width: usize,
    pub height: usize,
    pub encoding: FrameEncoding,
    pub backlog: i32,
    pub max_request_size: usize,
    /// Give up on a connection that stays silent this long. `None` waits forever.
    pub read_timeout: Option<Duration>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: DEFAULT_ADDR,
            pacing: DEFAULT_PACING,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            encoding: FrameEncoding::Raw,
            backlog: DEFAULT_BACKLOG,
            max_request_size: DEFAULT_MAX_REQUEST_SIZE,
            read_timeout: None,
        }
    }
}

impl ServerConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            (1..=MAX_DIMENSION).contains(&self.width) && (1..=MAX_DIMENSION).contains(&self.height),
            "frame dimensions {}x{} outside 1..={MAX_DIMENSION}",
            self.width,
            self.height,
        );
        anyhow::ensure!(self.backlog >= 1, "backlog must be at least 1");
        anyhow::ensure!(
            self.max_request_size >= RECV_CHUNK_SIZE,
            "max request size must be at least {RECV_CHUNK_SIZE} bytes"
        );

        Ok(())
    }

    /// Byte length of one serialized raw frame.
    pub fn frame_len(&self) -> usize {
        self.width * self.height * keepframe_common::DEPTH
    }
}
