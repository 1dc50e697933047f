#[macro_use]
extern crate tracing;

use keepframe::{
    Hero, Server, ServerConfig,
    config::{DEFAULT_ADDR, DEFAULT_BACKLOG, DEFAULT_MAX_REQUEST_SIZE},
};
use keepframe_common::FrameEncoding;
use std::{net::SocketAddr, time::Duration};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(argh::FromArgs)]
/// Serve a steerable frame loop to a browser over plain HTTP keep-alive
struct Args {
    #[argh(option, default = "DEFAULT_ADDR")]
    /// address to listen on
    addr: SocketAddr,

    #[argh(option, default = "100")]
    /// minimum milliseconds between two frames on one connection
    interval_ms: u64,

    #[argh(option, default = "256")]
    /// frame width in pixels
    width: usize,

    #[argh(option, default = "256")]
    /// frame height in pixels
    height: usize,

    #[argh(option, default = "FrameEncoding::Raw")]
    /// frame payload encoding (raw or json)
    encoding: FrameEncoding,

    #[argh(option)]
    /// drop a connection that sends nothing for this many milliseconds
    read_timeout_ms: Option<u64>,

    #[argh(option, default = "DEFAULT_MAX_REQUEST_SIZE")]
    /// largest request accepted, in bytes
    max_request_size: usize,

    #[argh(option, default = "DEFAULT_BACKLOG")]
    /// listen backlog
    backlog: i32,
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        Self {
            addr: args.addr,
            pacing: Duration::from_millis(args.interval_ms),
            width: args.width,
            height: args.height,
            encoding: args.encoding,
            backlog: args.backlog,
            max_request_size: args.max_request_size,
            read_timeout: args.read_timeout_ms.map(Duration::from_millis),
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let args: Args = argh::from_env();
    let config = ServerConfig::from(args);

    let mut runtime = monoio::RuntimeBuilder::<monoio::FusionDriver>::new()
        .enable_timer()
        .build()?;

    runtime.block_on(async move {
        let scene = Hero::centered(config.width, config.height);
        let server = Server::bind(config.clone(), scene)?;

        info!(
            addr = %server.local_addr()?,
            pacing = ?config.pacing,
            width = config.width,
            height = config.height,
            encoding = %config.encoding,
            "listening"
        );

        server.serve().await
    })
}
