use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

/// The object a batch processes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectRef {
    pub bucket: String,
    pub key: String,
}

#[derive(Deserialize)]
struct S3Notification {
    #[serde(rename = "Records")]
    records: Vec<S3Record>,
}

#[derive(Deserialize)]
struct S3Record {
    s3: S3Entity,
}

#[derive(Deserialize)]
struct S3Entity {
    bucket: S3Bucket,
    object: S3Object,
}

#[derive(Deserialize)]
struct S3Bucket {
    name: String,
}

#[derive(Deserialize)]
struct S3Object {
    key: String,
}

/// Cloud Storage object notification (only the fields we need).
#[derive(Deserialize)]
struct GcsNotification {
    bucket: String,
    name: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TriggerPayload {
    S3(S3Notification),
    Gcs(GcsNotification),
    Direct(ObjectRef),
}

/// Extract the single object a trigger payload points at. Only the first
/// record of a multi-record S3 notification is used.
pub fn parse_event(payload: &[u8]) -> Result<ObjectRef> {
    let parsed: TriggerPayload = serde_json::from_slice(payload)
        .context("trigger payload is not an S3, GCS or {bucket, key} event")?;

    let object = match parsed {
        TriggerPayload::S3(n) => {
            let Some(first) = n.records.into_iter().next() else {
                bail!("S3 notification carries no records");
            };
            ObjectRef {
                bucket: first.s3.bucket.name,
                key: first.s3.object.key,
            }
        }
        TriggerPayload::Gcs(n) => ObjectRef {
            bucket: n.bucket,
            key: n.name,
        },
        TriggerPayload::Direct(o) => o,
    };

    if object.bucket.is_empty() || object.key.is_empty() {
        bail!("trigger payload has an empty bucket or key");
    }
    Ok(object)
}
