mod api;
mod middleware;

use std::sync::Arc;

use cforge_db::Store;
use cforge_generator::{OpenAiClient, OpenAiConfig};
use cforge_publisher::WebhookPublisher;
use tracing_subscriber::EnvFilter;

use crate::api::{build_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = cforge_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let store = cforge_db::open_store(&config).await?;
    let generator = OpenAiClient::new(OpenAiConfig::from_app_config(&config))?;
    let publisher = WebhookPublisher::from_app_config(&config)?;

    if config.openai_api_key.is_none() {
        tracing::warn!("OPENAI_API_KEY not set; generation endpoints will answer 503");
    }
    tracing::info!(
        env = %config.env,
        store = store.backend(),
        webhook = %config.webhook_url,
        "starting content forge server"
    );

    let app = build_app(AppState {
        store,
        generator: Arc::new(generator),
        publisher: Arc::new(publisher),
    });

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
