use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tracing::debug;

use super::ObjectStore;

/// Buckets are directories under `root`; keys are relative paths inside them.
#[derive(Debug, Clone)]
pub struct LocalObjectStore {
    root: PathBuf,
}

impl LocalObjectStore {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Resolve `bucket`/`key` to a path, refusing anything that would step
    /// outside the bucket directory.
    fn object_path(&self, bucket: &str, key: &str) -> Result<PathBuf> {
        for (what, part) in [("bucket", bucket), ("key", key)] {
            let path = Path::new(part);
            if part.is_empty()
                || !path
                    .components()
                    .all(|c| matches!(c, Component::Normal(_)))
            {
                bail!("invalid {} {:?}", what, part);
            }
        }
        Ok(self.root.join(bucket).join(key))
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    async fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        let path = self.object_path(bucket, key)?;
        fs::read(&path)
            .await
            .with_context(|| format!("reading {}", path.display()))
    }

    async fn put(&self, bucket: &str, key: &str, body: Vec<u8>, content_type: &str) -> Result<()> {
        let path = self.object_path(bucket, key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        fs::write(&path, &body)
            .await
            .with_context(|| format!("writing {}", path.display()))?;
        debug!(path = %path.display(), bytes = body.len(), content_type, "stored object");
        Ok(())
    }
}
