mod config;

use std::sync::Arc;

use tracing::info;

use wedfund_api::auth::{AppState, AppStateInner, Sessions};
use wedfund_store::{MemoryStore, Repository, seed};

use crate::config::Config;

const DEFAULT_LOG_FILTER: &str =
    "wedfund=debug,wedfund_api=debug,wedfund_store=debug,tower_http=debug";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .init();

    let config = Config::from_env()?;
    config.warn_if_insecure();

    let repo: Arc<dyn Repository> = if config.seed {
        Arc::new(MemoryStore::seeded())
    } else {
        let store = MemoryStore::new();
        store.insert_user(seed::admin())?;
        info!("Starting with an empty store and a single admin account");
        Arc::new(store)
    };

    let state: AppState = Arc::new(AppStateInner {
        repo,
        sessions: Sessions::default(),
        jwt_secret: config.jwt_secret.clone(),
        session_days: config.session_days,
        target_per_person: config.target_per_person,
    });

    let app = wedfund_api::router(state);

    let addr = config.addr()?;
    info!("Wedfund server listening on {}", addr);
    info!("Per-person contribution target: {}", config.target_per_person);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
