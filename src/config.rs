use anyhow::{bail, Context, Result};
use std::{env, path::PathBuf, str::FromStr};

pub const DEFAULT_OUTPUT_BUCKET: &str = "bucket-json-clear";
pub const DEFAULT_PORT: u16 = 8080;

/// Where objects are read from and written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// One directory per bucket under `STORE_ROOT`.
    Fs,
    /// Google Cloud Storage.
    Gcs,
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "fs" | "local" => Ok(StoreBackend::Fs),
            "gcs" => Ok(StoreBackend::Gcs),
            other => bail!("unknown STORE_BACKEND {:?} (expected fs or gcs)", other),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Bucket that receives the cleaned JSON, whatever the source bucket.
    pub output_bucket: String,
    pub store_backend: StoreBackend,
    pub store_root: PathBuf,
    pub port: u16,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from any variable source; unset and empty values take defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let port = match var("PORT") {
            Some(p) => p
                .trim()
                .parse()
                .with_context(|| format!("PORT {:?} is not a valid port", p))?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            output_bucket: var("OUTPUT_BUCKET").unwrap_or_else(|| DEFAULT_OUTPUT_BUCKET.into()),
            store_backend: var("STORE_BACKEND")
                .map(|b| b.parse::<StoreBackend>())
                .transpose()?
                .unwrap_or(StoreBackend::Fs),
            store_root: var("STORE_ROOT")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("data")),
            port,
            log_level: var("LOG_LEVEL").unwrap_or_else(|| "info".into()),
        })
    }
}
