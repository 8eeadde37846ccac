//! TCP accept loop.
//!
//! Every accepted connection runs as its own task; the loop itself never
//! waits on session work. A failing session is logged and dropped without
//! touching the listener or any other session.
//!
//! Session tasks live in a `JoinSet` owned by the loop. On shutdown every
//! remaining session is aborted and awaited before [`Server::run`] returns,
//! so no session touches the store afterwards.

use kdtreed::Store;
use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::config::DEFAULT_MAX_LINE_LENGTH;
use crate::handler::Handler;
use crate::protocol::ProtocolCodec;
use crate::session::{Closed, Session};

const ACCEPT_BACKOFF: Duration = Duration::from_millis(50);

#[derive(Debug)]
pub struct Server {
    listener: TcpListener,
    handler: Handler,
    max_line_length: usize,
}

impl Server {
    pub fn new(listener: TcpListener, store: Arc<Store>) -> Self {
        Self {
            listener,
            handler: Handler::new(store),
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
        }
    }

    pub fn max_line_length(mut self, max_line_length: usize) -> Self {
        self.max_line_length = max_line_length;
        self
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accept connections until `shutdown` completes, then close every
    /// session still open.
    pub async fn run(self, shutdown: impl Future<Output = ()>) -> anyhow::Result<()> {
        info!("kdtreed listening on {}", self.listener.local_addr()?);

        tokio::pin!(shutdown);
        let mut sessions = JoinSet::new();

        loop {
            tokio::select! {
                accept_result = self.listener.accept() => {
                    match accept_result {
                        Ok((socket, peer)) => self.spawn_session(&mut sessions, socket, peer),
                        Err(e) => {
                            error!("Accept error: {}", e);
                            // Persistent errors such as EMFILE would otherwise spin.
                            tokio::time::sleep(ACCEPT_BACKOFF).await;
                        }
                    }
                }
                Some(joined) = sessions.join_next(), if !sessions.is_empty() => {
                    if let Err(e) = joined {
                        error!("session task failed: {}", e);
                    }
                }
                _ = &mut shutdown => {
                    info!("Shutdown signal received, stopping server...");
                    break;
                }
            }
        }

        let open = sessions.len();
        sessions.shutdown().await;
        info!("closed {} open session(s)", open);

        Ok(())
    }

    fn spawn_session(
        &self,
        sessions: &mut JoinSet<()>,
        socket: tokio::net::TcpStream,
        peer: SocketAddr,
    ) {
        info!("accepted connection from {}", peer);

        let codec = ProtocolCodec::with_max_line_length(self.max_line_length);
        let session = Session::new(socket, self.handler.clone(), codec);

        sessions.spawn(async move {
            match session.run().await {
                Ok(Closed::Bye) => debug!("{} said bye", peer),
                Ok(Closed::Eof) => debug!("{} disconnected", peer),
                Err(e) => warn!("session with {} ended: {}", peer, e),
            }
        });
    }
}

/// Run the TCP server with default limits.
pub async fn run_server(
    listener: TcpListener,
    store: Arc<Store>,
    shutdown: impl Future<Output = ()>,
) -> anyhow::Result<()> {
    Server::new(listener, store).run(shutdown).await
}
