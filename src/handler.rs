use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{sync::Arc, time::Instant};
use tracing::{error, info};

use crate::{
    event::{parse_event, ObjectRef},
    process::{clean_csv, BatchStats},
    store::ObjectStore,
};

pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Outcome reported back to whatever triggered the batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchResult {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<BatchStats>,
}

impl BatchResult {
    pub fn success(report: &BatchReport) -> Self {
        Self {
            status_code: 200,
            body: format!("Archivo procesado exitosamente: {}", report.output_key),
            stats: Some(report.stats.clone()),
        }
    }

    pub fn failure(err: &anyhow::Error) -> Self {
        Self {
            status_code: 500,
            body: format!("Error al procesar archivos: {:#}", err),
            stats: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status_code == 200
    }
}

/// What a successful batch read and wrote.
#[derive(Debug, Clone)]
pub struct BatchReport {
    pub source: ObjectRef,
    pub output_bucket: String,
    pub output_key: String,
    pub stats: BatchStats,
}

/// Output key for `input_key`: the extension of the last path segment is
/// replaced with `.json` (or `.json` is appended when there is none).
pub fn output_key(input_key: &str) -> String {
    let (dir, file) = match input_key.rfind('/') {
        Some(i) => input_key.split_at(i + 1),
        None => ("", input_key),
    };
    let stem = file.rfind('.').map_or(file, |i| &file[..i]);
    format!("{}{}.json", dir, stem)
}

/// Runs one batch per trigger: read the object, clean it, write the JSON.
pub struct BatchHandler {
    store: Arc<dyn ObjectStore>,
    output_bucket: String,
}

impl BatchHandler {
    pub fn new(store: Arc<dyn ObjectStore>, output_bucket: impl Into<String>) -> Self {
        Self {
            store,
            output_bucket: output_bucket.into(),
        }
    }

    /// Handle a raw trigger payload. Never fails; errors become a 500 result
    /// and no output object is written.
    pub async fn handle(&self, payload: &[u8]) -> BatchResult {
        let start = Instant::now();
        match self.run(payload).await {
            Ok(report) => {
                info!(
                    "✅ {}/{} → {}/{} ({} records) in {:.3}s",
                    report.source.bucket,
                    report.source.key,
                    report.output_bucket,
                    report.output_key,
                    report.stats.accepted,
                    start.elapsed().as_secs_f64()
                );
                BatchResult::success(&report)
            }
            Err(e) => {
                error!(
                    "❌ batch failed after {:.3}s: {:#}",
                    start.elapsed().as_secs_f64(),
                    e
                );
                BatchResult::failure(&e)
            }
        }
    }

    pub async fn run(&self, payload: &[u8]) -> Result<BatchReport> {
        let source = parse_event(payload)?;
        self.process_object(source).await
    }

    #[tracing::instrument(level = "info", skip(self, source), fields(bucket = %source.bucket, key = %source.key))]
    pub async fn process_object(&self, source: ObjectRef) -> Result<BatchReport> {
        let body = self
            .store
            .get(&source.bucket, &source.key)
            .await
            .with_context(|| format!("fetching {}/{}", source.bucket, source.key))?;

        let batch = clean_csv(&body)
            .with_context(|| format!("cleaning {}/{}", source.bucket, source.key))?;
        let json = batch.to_json()?;

        let key = output_key(&source.key);
        self.store
            .put(&self.output_bucket, &key, json, JSON_CONTENT_TYPE)
            .await
            .with_context(|| format!("storing {}/{}", self.output_bucket, key))?;

        Ok(BatchReport {
            source,
            output_bucket: self.output_bucket.clone(),
            output_key: key,
            stats: batch.stats,
        })
    }
}
