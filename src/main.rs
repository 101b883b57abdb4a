use anyhow::Result;
use textgen_demo::{config, host, logging};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (before logging setup)
    let config = match config::load().await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let log_level = logging::resolve_level(&config.host.logs.level);
    if let Err(e) = logging::validate_log_level(&log_level) {
        eprintln!("{}", e);
        std::process::exit(1);
    }
    logging::init_json(&log_level);

    info!(
        "Starting static asset host with log level: {}, serving {}",
        log_level,
        config.host.static_dir.display()
    );

    host::run(config.host).await?;

    Ok(())
}
