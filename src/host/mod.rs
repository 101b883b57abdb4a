use crate::{Result, config::HostConfig};
use axum::Router;
use std::net::SocketAddr;
use tower_http::{limit::RequestBodyLimitLayer, services::ServeDir, trace::TraceLayer};
use tracing::{info, warn};

/// Static files from `static_dir`, with `index.html` served for directories.
/// Requests declaring a body larger than `body_limit` bytes get a 413.
pub fn router(config: &HostConfig) -> Router {
    let static_files = ServeDir::new(&config.static_dir).append_index_html_on_directories(true);

    Router::new()
        .fallback_service(static_files)
        .layer(RequestBodyLimitLayer::new(config.body_limit))
        .layer(TraceLayer::new_for_http())
}

pub async fn run(config: HostConfig) -> Result<()> {
    if !config.static_dir.is_dir() {
        warn!(
            "Static directory {} does not exist; every request will 404",
            config.static_dir.display()
        );
    }

    let app = router(&config);

    let addr = SocketAddr::new(config.host.parse()?, config.port);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Frontend server running on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
