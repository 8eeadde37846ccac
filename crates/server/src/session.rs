//! Per-connection request loop.
//!
//! A session greets the client, then reads one line at a time, hands it to
//! the [`Handler`] and writes the response back, until the client sends
//! `END`, closes the connection, or the connection fails.
//!
//! Malformed commands are answered with `INVALID COMMAND` and the session
//! keeps going. Read failures end the session: lines that cannot be framed
//! (too long, not UTF-8) get a best-effort `READ ERROR` first, transport
//! errors just close. Neither ever reaches the accept loop.

use futures::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::codec::Framed;
use tracing::{debug, warn};

use crate::handler::Handler;
use crate::protocol::{ProtocolCodec, ProtocolError, Response};

/// Why a session ended without error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Closed {
    /// The client sent `END`.
    Bye,
    /// The client closed its end of the connection.
    Eof,
}

pub struct Session<S> {
    framed: Framed<S, ProtocolCodec>,
    handler: Handler,
}

impl<S> Session<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, handler: Handler, codec: ProtocolCodec) -> Self {
        Self {
            framed: Framed::new(stream, codec),
            handler,
        }
    }

    pub async fn run(mut self) -> Result<Closed, ProtocolError> {
        self.framed.send(Response::Greeting).await?;

        while let Some(frame) = self.framed.next().await {
            let line = match frame {
                Ok(line) => line,
                Err(e) if e.is_decode_error() => {
                    warn!("unreadable request: {}", e);
                    if let Err(send_err) = self.framed.send(Response::ReadError).await {
                        debug!("failed to report read error: {}", send_err);
                    }
                    return Err(e);
                }
                Err(e) => return Err(e),
            };

            let response = self.handler.handle_line(&line);
            let terminal = response.is_terminal();
            self.framed.send(response).await?;

            if terminal {
                return Ok(Closed::Bye);
            }
        }

        Ok(Closed::Eof)
    }
}
