use crate::{config::ServerConfig, handler::FrameCycle, scene::Scene, session::run_session};
use anyhow::Context;
use monoio::net::{ListenerOpts, TcpListener};
use std::{io, net::SocketAddr};

/// Bound listener plus the one simulation every connection drives.
pub struct Server<S> {
    listener: TcpListener,
    cycle: FrameCycle<S>,
    config: ServerConfig,
}

impl<S: Scene> Server<S> {
    /// Validate `config` and start listening. Must be called on a monoio runtime.
    pub fn bind(config: ServerConfig, scene: S) -> anyhow::Result<Self> {
        config.validate()?;

        let opts = ListenerOpts::new()
            .reuse_port(false)
            .reuse_addr(true)
            .backlog(config.backlog);
        let listener = TcpListener::bind_with_config(config.addr, &opts)
            .with_context(|| format!("failed to listen on {}", config.addr))?;

        let cycle = FrameCycle::new(scene, config.width, config.height, config.encoding);

        Ok(Self {
            listener,
            cycle,
            config,
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accept and serve connections one after another.
    ///
    /// A connection is served to completion before the next accept, so
    /// anyone else waits in the backlog. Returns once accepting fails.
    pub async fn serve(mut self) -> anyhow::Result<()> {
        loop {
            let (mut conn, peer) = match self.listener.accept().await {
                Ok(accepted) => accepted,
                Err(error) => {
                    error!(?error, "accept failed, shutting down");
                    return Ok(());
                }
            };

            info!(%peer, "client connected");
            if let Err(error) = conn.set_nodelay(true) {
                warn!(%peer, ?error, "failed to set TCP_NODELAY");
            }

            match run_session(&mut conn, &mut self.cycle, &self.config).await {
                Ok(()) => info!(%peer, "peer shutdown"),
                Err(error) => warn!(%peer, ?error, "session ended"),
            }
        }
    }
}
