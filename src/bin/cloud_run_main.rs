use anyhow::Result;
use salesclean::{config::Config, handler::BatchHandler, store};
use std::{convert::Infallible, sync::Arc};
use tracing::{info, Level};
use tracing_subscriber::{fmt, EnvFilter};
use warp::{http::StatusCode, hyper::body::Bytes, reply::Reply, Filter};

/// Largest trigger payload accepted on `/process`.
const MAX_EVENT_BYTES: u64 = 256 * 1024;

async fn health_check() -> Result<impl Reply, Infallible> {
    Ok(warp::reply::json(&serde_json::json!({
        "status": "healthy",
        "service": "sales-order-cleaner"
    })))
}

async fn process_event(body: Bytes, handler: Arc<BatchHandler>) -> Result<impl Reply, Infallible> {
    let result = handler.handle(&body).await;
    let status =
        StatusCode::from_u16(result.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    Ok(warp::reply::with_status(warp::reply::json(&result), status))
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;
    fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive(config.log_level.parse().unwrap_or(Level::INFO.into())),
        )
        .init();

    info!("Starting sales-order cleaning service");

    let store = store::from_config(&config).await?;
    let handler = Arc::new(BatchHandler::new(store, config.output_bucket.clone()));
    let with_handler = warp::any().map(move || handler.clone());

    // Health check endpoint
    let health = warp::path("health").and(warp::get()).and_then(health_check);

    // One batch per storage event
    let process = warp::path("process")
        .and(warp::post())
        .and(warp::body::content_length_limit(MAX_EVENT_BYTES))
        .and(warp::body::bytes())
        .and(with_handler)
        .and_then(process_event);

    let routes = health.or(process);

    info!("Server starting on port {}", config.port);
    info!("Health check: http://localhost:{}/health", config.port);
    info!("Process endpoint: POST http://localhost:{}/process", config.port);
    info!("Writing cleaned output to bucket {}", config.output_bucket);

    warp::serve(routes).run(([0, 0, 0, 0], config.port)).await;

    Ok(())
}
