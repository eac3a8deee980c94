// src/store/mod.rs
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

pub mod fs;
pub mod gcs;
pub mod memory;

pub use fs::LocalObjectStore;
pub use gcs::GcsObjectStore;
pub use memory::MemoryObjectStore;

use crate::config::{Config, StoreBackend};

/// Blob storage addressed by bucket and key. Each batch makes exactly one
/// `get` and, on success, one `put`.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>>;

    async fn put(&self, bucket: &str, key: &str, body: Vec<u8>, content_type: &str)
        -> Result<()>;
}

/// Build the store selected by `config`.
pub async fn from_config(config: &Config) -> Result<Arc<dyn ObjectStore>> {
    let store: Arc<dyn ObjectStore> = match config.store_backend {
        StoreBackend::Fs => Arc::new(LocalObjectStore::new(&config.store_root)),
        StoreBackend::Gcs => Arc::new(GcsObjectStore::connect().await?),
    };
    Ok(store)
}
