use anyhow::{Context, Result};
use async_trait::async_trait;
use google_cloud_storage::{
    client::{Client, ClientConfig},
    http::objects::{
        download::Range,
        get::GetObjectRequest,
        upload::{Media, UploadObjectRequest, UploadType},
    },
};
use tracing::info;

use super::ObjectStore;

/// Google Cloud Storage, authenticated with application default credentials.
pub struct GcsObjectStore {
    client: Client,
}

impl GcsObjectStore {
    pub async fn connect() -> Result<Self> {
        let config = ClientConfig::default()
            .with_auth()
            .await
            .context("loading GCS credentials")?;
        Ok(Self {
            client: Client::new(config),
        })
    }
}

#[async_trait]
impl ObjectStore for GcsObjectStore {
    async fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        let request = GetObjectRequest {
            bucket: bucket.to_string(),
            object: key.to_string(),
            ..Default::default()
        };
        self.client
            .download_object(&request, &Range::default())
            .await
            .with_context(|| format!("Failed to download gs://{}/{}", bucket, key))
    }

    async fn put(&self, bucket: &str, key: &str, body: Vec<u8>, content_type: &str) -> Result<()> {
        let mut media = Media::new(key.to_string());
        media.content_type = content_type.to_string().into();
        let upload_type = UploadType::Simple(media);
        let request = UploadObjectRequest {
            bucket: bucket.to_string(),
            ..Default::default()
        };

        self.client
            .upload_object(&request, body, &upload_type)
            .await
            .with_context(|| format!("Failed to upload {} to GCS bucket {}", key, bucket))?;

        info!("Successfully uploaded gs://{}/{}", bucket, key);
        Ok(())
    }
}
