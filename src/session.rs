use crate::{
    config::{RECV_CHUNK_SIZE, ServerConfig},
    handler::FrameCycle,
    pacing::Pacer,
    request::{Request, RequestAssembler},
    scene::Scene,
};
use anyhow::Context;
use monoio::{
    io::{AsyncReadRent, AsyncWriteRentExt},
    net::TcpStream,
};
use std::time::{Duration, Instant};

/// Read the next chunk into `chunk`, which comes back holding just the new bytes.
async fn receive(
    conn: &mut TcpStream,
    chunk: Vec<u8>,
    read_timeout: Option<Duration>,
) -> anyhow::Result<Vec<u8>> {
    let read = conn.read(chunk);
    let (result, chunk) = match read_timeout {
        Some(limit) => monoio::time::timeout(limit, read)
            .await
            .with_context(|| format!("no bytes from peer within {limit:?}"))?,
        None => read.await,
    };

    result.context("receive failed")?;
    Ok(chunk)
}

/// Serve one connection until the peer shuts down.
///
/// Each request is answered before the next is read. Responses leave on
/// the connection's fixed-rate schedule and always in full. Returns `Ok`
/// on an orderly shutdown and `Err` on any I/O failure.
pub async fn run_session<S: Scene>(
    conn: &mut TcpStream,
    cycle: &mut FrameCycle<S>,
    config: &ServerConfig,
) -> anyhow::Result<()> {
    let mut pacer = Pacer::new(config.pacing);
    let mut assembler = RequestAssembler::new(config.max_request_size);
    let mut chunk = Vec::with_capacity(RECV_CHUNK_SIZE);
    let mut out = Vec::new();

    loop {
        let raw = loop {
            if let Some(raw) = assembler.next_request()? {
                break raw;
            }

            chunk.clear();
            chunk = receive(conn, chunk, config.read_timeout).await?;
            if chunk.is_empty() {
                if assembler.buffered() != 0 {
                    debug!(
                        dropped = assembler.buffered(),
                        "peer shut down mid-request"
                    );
                }
                return Ok(());
            }

            assembler.push(&chunk);
        };

        out.clear();
        let request = Request::decode(&raw);
        let route = cycle.respond(&request, &mut out);
        debug!(?route, request = raw.len(), response = out.len(), "cycle");

        let delay = pacer.delay(Instant::now());
        if !delay.is_zero() {
            monoio::time::sleep(delay).await;
        }

        out = attempt!(conn.write_all(out).await);
        pacer.advance();
    }
}
