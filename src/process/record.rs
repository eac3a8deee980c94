use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Column names of the sales-order export. Case-sensitive.
pub mod columns {
    pub const ORDERNUMBER: &str = "ORDERNUMBER";
    pub const QUANTITYORDERED: &str = "QUANTITYORDERED";
    pub const PRICEEACH: &str = "PRICEEACH";
    pub const ORDERLINENUMBER: &str = "ORDERLINENUMBER";
    pub const SALES: &str = "SALES";
    pub const ORDERDATE: &str = "ORDERDATE";
    pub const STATUS: &str = "STATUS";
    pub const PRODUCTLINE: &str = "PRODUCTLINE";
    pub const MSRP: &str = "MSRP";
    pub const MSRP_ISSUE: &str = "MSRP_ISSUE";
    pub const PRODUCTCODE: &str = "PRODUCTCODE";
    pub const PHONE: &str = "PHONE";
    pub const CITY: &str = "CITY";
    pub const STATE: &str = "STATE";
    pub const POSTALCODE: &str = "POSTALCODE";
    pub const COUNTRY: &str = "COUNTRY";
    pub const TERRITORY: &str = "TERRITORY";
    pub const CONTACTLASTNAME: &str = "CONTACTLASTNAME";
    pub const CONTACTFIRSTNAME: &str = "CONTACTFIRSTNAME";
    pub const DEALSIZE: &str = "DEALSIZE";
    pub const NUMERICCODE: &str = "NUMERICCODE";

    /// Columns owned by [`super::CleanRecord`]'s typed fields. Any other
    /// input column is passed through untouched.
    pub const TYPED: [&str; 21] = [
        ORDERNUMBER,
        QUANTITYORDERED,
        PRICEEACH,
        ORDERLINENUMBER,
        SALES,
        ORDERDATE,
        STATUS,
        PRODUCTLINE,
        MSRP,
        MSRP_ISSUE,
        PRODUCTCODE,
        PHONE,
        CITY,
        STATE,
        POSTALCODE,
        COUNTRY,
        TERRITORY,
        CONTACTLASTNAME,
        CONTACTFIRSTNAME,
        DEALSIZE,
        NUMERICCODE,
    ];
}

/// One CSV data row keyed by header name. Values are kept verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    fields: HashMap<String, String>,
}

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `column`, replacing any earlier value (a repeated header keeps the
    /// last cell).
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(column.into(), value.into());
    }

    /// Raw cell for `column`; a column missing from the header reads as `""`.
    pub fn get(&self, column: &str) -> &str {
        self.fields.get(column).map(String::as_str).unwrap_or("")
    }

    /// Columns outside [`columns::TYPED`], sorted by name.
    pub fn passthrough(&self) -> BTreeMap<String, String> {
        self.fields
            .iter()
            .filter(|(k, _)| !columns::TYPED.contains(&k.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut raw = RawRecord::new();
        for (k, v) in iter {
            raw.insert(k, v);
        }
        raw
    }
}

/// A validated, typed order line. Serializes under the input column
/// names; `None` values are written as `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CleanRecord {
    #[serde(rename = "ORDERNUMBER")]
    pub order_number: String,
    #[serde(rename = "QUANTITYORDERED")]
    pub quantity_ordered: u32,
    #[serde(rename = "PRICEEACH")]
    pub price_each: f64,
    #[serde(rename = "ORDERLINENUMBER")]
    pub order_line_number: String,
    #[serde(rename = "SALES")]
    pub sales: f64,
    #[serde(rename = "ORDERDATE")]
    pub order_date: String,
    #[serde(rename = "STATUS")]
    pub status: String,
    #[serde(rename = "PRODUCTLINE")]
    pub product_line: String,
    #[serde(rename = "MSRP")]
    pub msrp: Option<f64>,
    #[serde(rename = "MSRP_ISSUE")]
    pub msrp_issue: bool,
    #[serde(rename = "PRODUCTCODE")]
    pub product_code: String,
    #[serde(rename = "PHONE")]
    pub phone: Option<String>,
    #[serde(rename = "CITY")]
    pub city: String,
    #[serde(rename = "STATE")]
    pub state: String,
    #[serde(rename = "POSTALCODE")]
    pub postal_code: Option<String>,
    #[serde(rename = "COUNTRY")]
    pub country: String,
    #[serde(rename = "TERRITORY")]
    pub territory: String,
    #[serde(rename = "CONTACTLASTNAME")]
    pub contact_last_name: String,
    #[serde(rename = "CONTACTFIRSTNAME")]
    pub contact_first_name: String,
    #[serde(rename = "DEALSIZE")]
    pub deal_size: String,
    #[serde(rename = "NUMERICCODE")]
    pub numeric_code: Option<String>,

    /// Input columns the rules do not touch (customer name, address lines…).
    #[serde(flatten)]
    pub passthrough: BTreeMap<String, String>,
}
