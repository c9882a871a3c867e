use std::sync::Arc;

use media_extract_gateway::{config::Config, extract::YtDlp, router};
use tower_http::trace::TraceLayer;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    if let Err(e) = run().await {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;
    let engine = Arc::new(YtDlp::new(config.ytdlp_program.clone(), config.extract_timeout));

    let app = router(engine).layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(&config.addr).await?;
    tracing::info!(
        ytdlp = %config.ytdlp_program,
        timeout_secs = config.extract_timeout.as_secs(),
        "listening on {}",
        listener.local_addr()?
    );
    axum::serve(listener, app).await?;
    Ok(())
}
