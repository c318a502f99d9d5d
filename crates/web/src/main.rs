use anyhow::anyhow;
use deckhand_core::DeckService;
use deckhand_web::{serve, WebConfig};
use tiny_http::Server;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = WebConfig::from_env()?;
    let documents = config.open_store()?;
    let service = DeckService::with_rng(documents, config.rng());

    let server = Server::http(config.addr.as_str())
        .map_err(|err| anyhow!("start server on {}: {err}", config.addr))?;
    tracing::info!(
        addr = %config.addr,
        store = ?config.store,
        data_dir = %config.data_dir.display(),
        "deckhand server listening"
    );

    serve(&server, &service);

    drop(service.into_store());
    tracing::info!("server stopped");
    Ok(())
}
