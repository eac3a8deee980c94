use anyhow::{Context, Result};
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};

use crate::process::record::CleanRecord;

/// Deterministic text form of a record: every output field, keys in
/// lexical order, values rendered as compact JSON.
pub fn canonical_signature(record: &CleanRecord) -> Result<String> {
    let value = serde_json::to_value(record).context("serializing record for signature")?;
    let Value::Object(fields) = value else {
        anyhow::bail!("record did not serialize to a JSON object");
    };
    let ordered: BTreeMap<String, Value> = fields.into_iter().collect();
    serde_json::to_string(&ordered).context("encoding record signature")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observation {
    Unique,
    Duplicate,
}

/// Signatures of every record accepted so far in one batch.
#[derive(Debug, Default)]
pub struct DedupTracker {
    seen: HashSet<String>,
}

impl DedupTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember `record` and report whether an identical one was already seen.
    pub fn observe(&mut self, record: &CleanRecord) -> Result<Observation> {
        let signature = canonical_signature(record)?;
        Ok(if self.seen.insert(signature) {
            Observation::Unique
        } else {
            Observation::Duplicate
        })
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
