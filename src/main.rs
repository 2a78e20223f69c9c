use anyhow::Context;
use autocomplete::autocomplete::{router, AutocompleteService, ServiceConfig};
use autocomplete::storage::{FileWordStore, MemoryWordStore, WordStore};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

const DEFAULT_PORT: u16 = 5000;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        // .with_max_level(tracing::Level::DEBUG)
        .with_max_level(tracing::Level::INFO)
        .init();

    let args: Vec<String> = std::env::args().collect();

    let mut bind_addr: Option<SocketAddr> = None;
    let mut store_path: Option<PathBuf> = std::env::var("WORDS_FILE").ok().map(PathBuf::from);

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--bind" => {
                let value = args.get(i + 1).context("--bind needs <addr:port>")?;
                bind_addr = Some(value.parse().context("invalid --bind address")?);
                i += 2;
            }
            "--store" => {
                let value = args.get(i + 1).context("--store needs <path>")?;
                store_path = Some(PathBuf::from(value));
                i += 2;
            }
            "--help" | "-h" => {
                eprintln!("Usage: {} [--bind <addr:port>] [--store <words.json>]", args[0]);
                eprintln!("Example: {} --bind 127.0.0.1:5000 --store ./words.json", args[0]);
                return Ok(());
            }
            other => {
                tracing::warn!("Ignoring unknown argument {}", other);
                i += 1;
            }
        }
    }

    let bind_addr = match bind_addr {
        Some(addr) => addr,
        None => default_bind_addr()?,
    };
    let config = ServiceConfig::from_env()?;
    tracing::info!("Service config: {:?}", config);

    // 1. Word store:
    let store: Arc<dyn WordStore> = match &store_path {
        Some(path) => Arc::new(FileWordStore::open(path).await?),
        None => {
            tracing::warn!("No --store given, words will not survive a restart");
            Arc::new(MemoryWordStore::new())
        }
    };

    // 2. Service, hydrated before anything can reach it:
    let service = AutocompleteService::new(store, config);
    let report = service
        .hydrate()
        .await
        .context("startup aborted: index could not be hydrated")?;
    if report.degraded {
        tracing::warn!("Serving with an empty index, store contents were not loaded");
    }

    // 3. HTTP server:
    let app = router(service.clone());

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    tracing::info!("Server is running on {}", bind_addr);
    tracing::info!("Press Ctrl+C to shutdown");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // 4. Drain pending store writes:
    tracing::info!("Shutting down, flushing pending store writes...");
    service.flush().await?;
    let stats = service.stats().await;
    if stats.persistence.unpersisted() > 0 {
        tracing::warn!(
            "{} recorded occurrences never reached the store",
            stats.persistence.unpersisted()
        );
    }

    Ok(())
}

fn default_bind_addr() -> anyhow::Result<SocketAddr> {
    if let Ok(addr) = std::env::var("AUTOCOMPLETE_BIND") {
        return addr.parse().context("invalid AUTOCOMPLETE_BIND");
    }
    let port = match std::env::var("PORT") {
        Ok(port) => port.parse().context("invalid PORT")?,
        Err(_) => DEFAULT_PORT,
    };
    Ok(SocketAddr::from(([0, 0, 0, 0], port)))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}
