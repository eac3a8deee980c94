// src/process/mod.rs
use anyhow::{Context, Result};
use csv::{ReaderBuilder, StringRecord};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info};

pub mod date_parser;
pub mod dedup;
pub mod normalize;
pub mod record;
pub mod sanitize;
pub mod territory;
pub mod utils;

use dedup::{DedupTracker, Observation};
use normalize::{normalize_record, Rejection};
use record::{CleanRecord, RawRecord};

/// Per-batch counters. `rejected` is keyed by [`Rejection::as_str`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchStats {
    pub rows_read: u64,
    pub accepted: u64,
    pub duplicates: u64,
    pub rejected: BTreeMap<String, u64>,
}

impl BatchStats {
    fn reject(&mut self, reason: Rejection) {
        *self.rejected.entry(reason.as_str().to_string()).or_default() += 1;
    }

    pub fn rejected_total(&self) -> u64 {
        self.rejected.values().sum()
    }
}

/// The accepted records of one file, in file order, plus counters.
#[derive(Debug, Clone, Default)]
pub struct CleanBatch {
    pub records: Vec<CleanRecord>,
    pub stats: BatchStats,
}

impl CleanBatch {
    /// Pretty-printed JSON array of the accepted records.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(&self.records).context("serializing cleaned records")
    }
}

/// Run the record rules and duplicate suppression over `rows`, in order.
pub fn clean_records<I>(rows: I) -> Result<CleanBatch>
where
    I: IntoIterator<Item = Result<RawRecord>>,
{
    let mut batch = CleanBatch::default();
    let mut tracker = DedupTracker::new();

    for row in rows {
        let raw = row?;
        batch.stats.rows_read += 1;

        let record = match normalize_record(&raw) {
            Ok(r) => r,
            Err(reason) => {
                batch.stats.reject(reason);
                continue;
            }
        };

        match tracker.observe(&record)? {
            Observation::Duplicate => batch.stats.duplicates += 1,
            Observation::Unique => {
                batch.stats.accepted += 1;
                batch.records.push(record);
            }
        }
    }

    debug!(signatures = tracker.len(), "dedup pass done");
    Ok(batch)
}

/// Iterate the data rows of a headed CSV document as [`RawRecord`]s.
/// Short rows are padded with empty cells; cells past the header are ignored.
pub fn read_raw_records(text: &str) -> Result<impl Iterator<Item = Result<RawRecord>> + '_> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: StringRecord = rdr.headers().context("reading CSV header row")?.clone();
    debug!(columns = headers.len(), "read CSV header");

    Ok(rdr
        .into_records()
        .enumerate()
        .map(move |(idx, result)| -> Result<RawRecord> {
            let record =
                result.with_context(|| format!("CSV parse error at data row {}", idx + 1))?;
            Ok(headers
                .iter()
                .enumerate()
                .map(|(i, name)| (name, record.get(i).unwrap_or("")))
                .collect())
        }))
}

/// Decode, parse and clean one uploaded file.
#[tracing::instrument(level = "info", skip(body), fields(bytes = body.len()))]
pub fn clean_csv(body: &[u8]) -> Result<CleanBatch> {
    let text = utils::decode_body(body);
    let batch = clean_records(read_raw_records(&text)?)?;

    info!(
        rows = batch.stats.rows_read,
        accepted = batch.stats.accepted,
        rejected = batch.stats.rejected_total(),
        duplicates = batch.stats.duplicates,
        "cleaned batch"
    );
    Ok(batch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use tracing_subscriber::{EnvFilter, FmtSubscriber};

    fn init_test_logging() {
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new("info,salesclean::process=debug")),
            )
            .with_test_writer()
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    }

    const HEADER: &str = "ORDERNUMBER,QUANTITYORDERED,PRICEEACH,ORDERLINENUMBER,SALES,ORDERDATE,STATUS,PRODUCTLINE,MSRP,PRODUCTCODE,CUSTOMERNAME,PHONE,CITY,STATE,POSTALCODE,COUNTRY,TERRITORY,CONTACTLASTNAME,CONTACTFIRSTNAME,DEALSIZE,NUMERICCODE";

    fn sample_csv() -> String {
        let rows = [
            // accepted, status fixed, sales recomputed
            r#"10107,30,95.70,2,999.00,2/24/2003 0:00,dleivered,Motorcycles,95,S10_1678,Land of Toys Inc.,2125557818,NYC,NY,10022,USA,,Yu,Kwai,Small,042"#,
            // quantity zero
            r#"10121,0,81.35,5,0,5/7/2003 0:00,Shipped,Motorcycles,95,S10_1678,Reims Collectables,26.47.1555,Reims,,51100,France,EMEA,Henriot,Paul,Small,"#,
            // impossible date
            r#"10134,41,94.74,2,3884.34,31/02/2003,Shipped,Motorcycles,95,S10_1678,Lyon Souveniers,+33 1 46 62 7555,Paris,,75508,France,EMEA,Da Cunha,Daniel,Medium,"#,
            // accepted, no city, French territory resolved
            r#"10145,45,83.26,6,3746.7,8/25/2003 0:00,Shipped,Motorcycles,95,S10_1678,"Toys4GrownUps.com",6265557265,,CA,90003,France,,Young,Julie,Medium,"#,
            // exact repeat of the previous row
            r#"10145,45,83.26,6,3746.7,8/25/2003 0:00,Shipped,Motorcycles,95,S10_1678,"Toys4GrownUps.com",6265557265,,CA,90003,France,,Young,Julie,Medium,"#,
            // repeat once normalized (city blank vs spaces, status case)
            r#"10145,45,83.26,6,3746.7,2003-08-25,SHIPPED,Motorcycles,95,S10_1678,"Toys4GrownUps.com",626-555-7265,   ,CA,90003,France,,Young,Julie,Medium,"#,
            // bad order number
            r#"A10159,49,100,14,5205.27,10/10/2003 0:00,Shipped,Motorcycles,95,S10_1678,Corporate Gift Ideas Co.,6505551386,San Francisco,CA,,USA,NA,Brown,Julie,Medium,"#,
        ];
        format!("{}\n{}\n", HEADER, rows.join("\n"))
    }

    #[test]
    fn cleans_sample_export() -> Result<()> {
        init_test_logging();
        let batch = clean_csv(sample_csv().as_bytes())?;

        assert_eq!(batch.stats.rows_read, 7);
        assert_eq!(batch.stats.accepted, 2);
        assert_eq!(batch.stats.duplicates, 2);
        assert_eq!(batch.stats.rejected.get("quantity"), Some(&1));
        assert_eq!(batch.stats.rejected.get("order_date"), Some(&1));
        assert_eq!(batch.stats.rejected.get("order_number"), Some(&1));
        assert_eq!(batch.stats.rejected_total(), 3);

        let first = &batch.records[0];
        assert_eq!(first.order_number, "10107");
        assert_eq!(first.status, "DELIVERED");
        assert_eq!(first.sales, 2871.0);
        assert_eq!(first.order_date, "2003-02-24");
        assert_eq!(first.territory, "NA");
        assert!(first.msrp_issue);
        assert_eq!(first.numeric_code.as_deref(), Some("042"));

        let second = &batch.records[1];
        assert_eq!(second.city, "SIN CIUDAD");
        assert_eq!(second.territory, "EMEA");
        assert_eq!(second.phone.as_deref(), Some("6265557265"));
        assert_eq!(
            second.passthrough.get("CUSTOMERNAME").map(String::as_str),
            Some("Toys4GrownUps.com")
        );
        Ok(())
    }

    #[test]
    fn accepted_records_hold_invariants() -> Result<()> {
        let batch = clean_csv(sample_csv().as_bytes())?;
        for r in &batch.records {
            assert!(r.quantity_ordered > 0);
            assert!(r.price_each >= 0.0);
            assert!((r.sales - f64::from(r.quantity_ordered) * r.price_each).abs() <= 0.1);
            assert_eq!(r.order_date.len(), 10);
            assert!(r.order_number.bytes().all(|b| b.is_ascii_digit()));
            assert!(r.order_line_number.bytes().all(|b| b.is_ascii_digit()));
        }
        Ok(())
    }

    #[test]
    fn output_is_idempotent_json_array() -> Result<()> {
        let a = clean_csv(sample_csv().as_bytes())?.to_json()?;
        let b = clean_csv(sample_csv().as_bytes())?.to_json()?;
        assert_eq!(a, b);

        let parsed: Value = serde_json::from_slice(&a)?;
        let rows = parsed.as_array().expect("array");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["QUANTITYORDERED"], Value::from(30));
        assert_eq!(rows[0]["MSRP"], Value::from(95.0));
        assert_eq!(rows[1]["NUMERICCODE"], Value::Null);
        assert_eq!(rows[1]["POSTALCODE"], Value::from("90003"));
        assert!(String::from_utf8(a)?.contains("\n  {\n    \""));
        Ok(())
    }

    #[test]
    fn empty_file_and_header_only_file() -> Result<()> {
        let batch = clean_csv(b"")?;
        assert!(batch.records.is_empty());
        assert_eq!(batch.to_json()?, b"[]");

        let batch = clean_csv(format!("{HEADER}\n").as_bytes())?;
        assert_eq!(batch.stats.rows_read, 0);
        Ok(())
    }

    #[test]
    fn latin1_bytes_are_decoded() -> Result<()> {
        let mut body = b"QUANTITYORDERED,PRICEEACH,SALES,ORDERDATE,ORDERNUMBER,ORDERLINENUMBER,CITY,COUNTRY\n".to_vec();
        body.extend_from_slice(b"1,5,5,2024-01-05,1,1,M\xfcnchen,Germany\n");
        let batch = clean_csv(&body)?;
        assert_eq!(batch.records.len(), 1);
        assert_eq!(batch.records[0].city, "München");
        assert_eq!(batch.records[0].territory, "EMEA");
        Ok(())
    }

    #[test]
    fn ragged_rows_are_padded_and_truncated() -> Result<()> {
        let text = "QUANTITYORDERED,PRICEEACH,SALES,ORDERDATE,ORDERNUMBER,ORDERLINENUMBER,PHONE\n\
                    1,5,5,2024-01-05,1,1\n\
                    2,5,10,2024-01-05,1,2,5551234,surplus\n";
        let batch = clean_csv(text.as_bytes())?;
        assert_eq!(batch.records.len(), 2);
        assert_eq!(batch.records[0].phone, None);
        assert_eq!(batch.records[1].phone.as_deref(), Some("5551234"));
        assert!(batch.records[1].passthrough.is_empty());
        Ok(())
    }

    #[test]
    fn parse_errors_abort_the_batch() {
        let rows = vec![
            Ok(RawRecord::new()),
            Err(anyhow::anyhow!("truncated object")),
        ];
        assert!(clean_records(rows).is_err());
    }
}
