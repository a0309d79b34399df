use std::sync::Arc;

use course_launch::api::router;
use course_launch::config::AppConfig;
use course_launch::services::RefreshScheduler;
use course_launch::state::AppState;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "course_launch=debug".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;
    let state = AppState::from_config(&config).await?;

    match state.courses.reload().await {
        Ok(count) => info!("loaded {} courses", count),
        Err(e) => warn!("initial course load failed, edits wait for the store: {}", e),
    }

    if config.refresh_interval_secs > 0 {
        let scheduler = RefreshScheduler::new(Arc::clone(&state.courses), config.refresh_interval_secs);
        tokio::spawn(scheduler.start());
    }

    let app = router(state);

    info!("listening on http://{}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
