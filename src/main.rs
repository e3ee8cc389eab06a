use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use studygrid::client::{ScheduleApiConfig, ScheduleHttpClient};
use studygrid::clock::SystemClock;
use studygrid::config::AppConfig;
use studygrid::routes::router;
use studygrid::services::{BrowserOpener, NoopOpener, ResourceOpener};
use studygrid::state::AppState;
use studygrid::view::ScheduleView;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "studygrid=debug".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;

    let api_config = ScheduleApiConfig::new(config.api_url.clone())
        .with_token(config.session.access_token.clone());
    let api = Arc::new(ScheduleHttpClient::new(api_config)?);
    let opener: Arc<dyn ResourceOpener> = if config.open_links {
        Arc::new(BrowserOpener)
    } else {
        Arc::new(NoopOpener)
    };

    let view = Arc::new(ScheduleView::new(
        config.session.clone(),
        api,
        Arc::new(SystemClock),
        opener,
        config.grid,
    ));

    if let Err(e) = view.load().await {
        warn!("Initial load failed, serving error state: {}", e);
    }

    let timers = view.mount(config.tick);

    let app = router(AppState { view: view.clone() });

    info!("listening on http://{}", config.bind);
    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
        })
        .await?;

    timers.unmount();
    Ok(())
}
