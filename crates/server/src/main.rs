use anyhow::Context;
use clap::Parser;
use kdtreed::Store;
use kdtreed_server::{Server, ServerConfig};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the TOML file holding `Host` and `Port`
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kdtreed_server=info,kdtreed=info,info".into()),
        )
        .init();

    let args = Args::parse();

    let config = ServerConfig::load(&args.config)
        .with_context(|| format!("failed to load {}", args.config.display()))?;

    let listener = TcpListener::bind(config.address())
        .await
        .with_context(|| format!("failed to bind {}", config.address()))?;
    info!("Started kdtreed on HOST: {} PORT: {}", config.host, config.port);

    let store = Arc::new(Store::new());

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for ctrl_c signal: {}", e);
            std::future::pending::<()>().await;
        }
    };

    Server::new(listener, Arc::clone(&store))
        .max_line_length(config.max_line_length)
        .run(shutdown)
        .await?;

    let stats = store.stats();
    info!(
        records = stats.records,
        inserts = stats.inserts,
        deletes = stats.deletes,
        queries = stats.queries,
        "store statistics at shutdown"
    );
    let drained = store.clear();
    info!("drained {} record(s)", drained);

    Ok(())
}
