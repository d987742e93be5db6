use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use civicbot::{
    api::{self, AppState},
    classifier::{ComplaintClassifier, RemoteClassifier},
    config::AppConfig,
    store::ComplaintStore,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;

    // -----------------------------
    // Logging
    // -----------------------------
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // -----------------------------
    // Shared state / Dependencies
    // -----------------------------
    let store = ComplaintStore::open(&config.store).await?;
    let classifier = match &config.remote {
        Some(remote) => {
            info!(url = %remote.url, "remote classifier enabled");
            ComplaintClassifier::with_remote(RemoteClassifier::new(remote)?)
        }
        None => ComplaintClassifier::local(),
    };
    info!(backend = store.backend_name(), "complaint store ready");

    let state = AppState::new(store, classifier, config.ping_message.as_str());
    let app = api::app(state);

    let listener = TcpListener::bind(&config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;
    info!(addr = %config.addr, "civicbot listening");

    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
