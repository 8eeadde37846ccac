#![allow(dead_code)]

use kdtreed::{Command, Record, Store};
use kdtreed_server::run_server;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};

pub const GREETING: &str = "Connected to kdtreed...";

/// Bind an ephemeral port and serve a fresh store on it in the background.
pub async fn start_server() -> anyhow::Result<(SocketAddr, Arc<Store>)> {
    tracing_subscriber::fmt::try_init().ok();

    let store = Arc::new(Store::new());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let bound_addr = listener.local_addr()?;

    let server_store = Arc::clone(&store);
    tokio::spawn(async move {
        let _ = run_server(listener, server_store, futures::future::pending()).await;
    });

    Ok((bound_addr, store))
}

/// Minimal line client speaking the wire protocol.
pub struct TestClient {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
}

impl TestClient {
    /// Connect and consume the greeting.
    pub async fn connect(addr: SocketAddr) -> anyhow::Result<Self> {
        let stream = TcpStream::connect(addr).await?;
        let (read, writer) = stream.into_split();
        let mut client = Self {
            reader: BufReader::new(read),
            writer,
        };
        let greeting = client.recv().await?;
        anyhow::ensure!(greeting == GREETING, "unexpected greeting {greeting:?}");
        Ok(client)
    }

    pub async fn send_raw(&mut self, bytes: &[u8]) -> anyhow::Result<()> {
        self.writer.write_all(bytes).await?;
        Ok(())
    }

    /// Next response line without its `\r\n`, or an empty string at EOF.
    pub async fn recv(&mut self) -> anyhow::Result<String> {
        let mut line = String::new();
        self.reader.read_line(&mut line).await?;
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    pub async fn request(&mut self, line: &str) -> anyhow::Result<String> {
        self.send_raw(format!("{line}\n").as_bytes()).await?;
        self.recv().await
    }

    /// Issue a KNN request and decode the returned records.
    pub async fn knn(&mut self, x: u32, y: u32, k: u64) -> anyhow::Result<Vec<Record>> {
        let response = self.request(&format!("KNN {{{x}, {y}}} {k}")).await?;
        parse_neighbors(&response)
    }

    /// Whether the server has closed the connection.
    pub async fn is_closed(&mut self) -> bool {
        let mut line = String::new();
        matches!(self.reader.read_line(&mut line).await, Ok(0) | Err(_))
    }
}

/// Decode `[{x, y} p, {x, y} p]` by feeding each record back through the
/// command parser as an ADD line.
pub fn parse_neighbors(response: &str) -> anyhow::Result<Vec<Record>> {
    let inner = response
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .ok_or_else(|| anyhow::anyhow!("not a neighbour list: {response:?}"))?;
    if inner.is_empty() {
        return Ok(Vec::new());
    }

    inner
        .split(", {")
        .enumerate()
        .map(|(i, part)| -> anyhow::Result<Record> {
            let text = if i == 0 {
                part.to_string()
            } else {
                format!("{{{part}")
            };
            match format!("ADD {text}").parse::<Command>()? {
                Command::Add { point, payload } => Ok(Record::new(point, payload)),
                other => anyhow::bail!("unexpected record {other}"),
            }
        })
        .collect()
}
