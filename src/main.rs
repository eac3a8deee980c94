use anyhow::{Context, Result};
use salesclean::{config::Config, handler::BatchHandler, store};
use std::{
    env, fs,
    io::{self, Read},
};
use tracing::{info, Level};
use tracing_subscriber::{fmt, EnvFilter};

/// Run one batch from a trigger payload read from the file named by the
/// first argument, or from stdin.
#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) config + logging ─────────────────────────────────────────
    let config = Config::from_env()?;
    fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive(config.log_level.parse().unwrap_or(Level::INFO.into())),
        )
        .with_writer(io::stderr)
        .init();

    // ─── 2) read the trigger payload ─────────────────────────────────
    let payload = match env::args().nth(1) {
        Some(path) => fs::read(&path).with_context(|| format!("reading event file {}", path))?,
        None => {
            let mut buf = Vec::new();
            io::stdin()
                .read_to_end(&mut buf)
                .context("reading event from stdin")?;
            buf
        }
    };

    // ─── 3) run the batch ────────────────────────────────────────────
    info!(backend = ?config.store_backend, output_bucket = %config.output_bucket, "startup");
    let store = store::from_config(&config).await?;
    let handler = BatchHandler::new(store, config.output_bucket.clone());
    let result = handler.handle(&payload).await;

    println!("{}", serde_json::to_string_pretty(&result)?);
    if !result.is_success() {
        std::process::exit(1);
    }
    Ok(())
}
