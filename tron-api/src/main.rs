use std::net::SocketAddr;

use anyhow::Context;
use tron_api::{app, AppState};
use tron_editor::EditorSession;
use tron_offer::CampaignGenerator;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "tron_api=debug,tron_editor=debug,tower_http=debug,axum::rejection=trace".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = tron_store::Config::load().context("Failed to load config")?;
    tracing::info!("Starting TRON campaign editor on port {}", config.server.port);

    let mut session = EditorSession::new(CampaignGenerator::new(config.generator.clone()));

    // A broken preload file should not keep the editor from starting
    if let Some(path) = &config.session.preload {
        match tron_store::load_file(&mut session, path) {
            Ok(report) => tracing::info!(
                offers = report.offers,
                skipped = report.skipped.len(),
                "Preloaded campaign"
            ),
            Err(err) => tracing::warn!(path = %path.display(), error = %err, "Preload failed"),
        }
    }

    let app = app(AppState::new(session));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
