use thiserror::Error;

use crate::process::{
    date_parser::normalize_date,
    record::{columns, CleanRecord, RawRecord},
    sanitize::{sanitize_phone, sanitize_text},
    territory::resolve_territory,
    utils::{is_integer, parse_numeric, round_cents, truncate_chars},
};

pub const PRODUCT_CODE_MAX_CHARS: usize = 15;
pub const PRODUCT_LINE_MAX_CHARS: usize = 60;
/// Largest gap between stated and computed `SALES` that is left alone.
pub const SALES_TOLERANCE: f64 = 0.1;
pub const CITY_PLACEHOLDER: &str = "SIN CIUDAD";
pub const UNKNOWN: &str = "UNKNOWN";

const MISSPELLED_DELIVERED: &str = "DLEIVERED";
const DELIVERED: &str = "DELIVERED";

/// Why a row was dropped. Only rules that can reject have a variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Error)]
pub enum Rejection {
    #[error("QUANTITYORDERED is missing, zero or not a whole number")]
    Quantity,
    #[error("PRICEEACH is not numeric or is negative")]
    Price,
    #[error("ORDERDATE matches no known date layout")]
    OrderDate,
    #[error("SALES is not numeric")]
    Sales,
    #[error("ORDERNUMBER is missing or not all digits")]
    OrderNumber,
    #[error("ORDERLINENUMBER is missing or not all digits")]
    OrderLineNumber,
}

impl Rejection {
    /// Stable short name, used as the counter key in batch stats.
    pub fn as_str(&self) -> &'static str {
        match self {
            Rejection::Quantity => "quantity",
            Rejection::Price => "price",
            Rejection::OrderDate => "order_date",
            Rejection::Sales => "sales",
            Rejection::OrderNumber => "order_number",
            Rejection::OrderLineNumber => "order_line_number",
        }
    }
}

/// Run every field rule over `raw`, in order. The first rule that rejects
/// ends processing of the row.
pub fn normalize_record(raw: &RawRecord) -> Result<CleanRecord, Rejection> {
    let quantity_ordered = parse_quantity(raw.get(columns::QUANTITYORDERED))?;

    let price_each = parse_numeric(raw.get(columns::PRICEEACH))
        .filter(|p| *p >= 0.0)
        .ok_or(Rejection::Price)?;

    let status = normalize_status(raw.get(columns::STATUS));

    let order_date = normalize_date(raw.get(columns::ORDERDATE)).ok_or(Rejection::OrderDate)?;

    let stated_sales = parse_numeric(raw.get(columns::SALES)).ok_or(Rejection::Sales)?;
    let sales = reconcile_sales(stated_sales, quantity_ordered, price_each);

    let msrp = parse_numeric(raw.get(columns::MSRP));
    let msrp_issue = msrp.is_some_and(|m| price_each > m);

    let product_code = truncate_chars(raw.get(columns::PRODUCTCODE), PRODUCT_CODE_MAX_CHARS);

    let order_number = digit_string(raw.get(columns::ORDERNUMBER)).ok_or(Rejection::OrderNumber)?;
    let order_line_number =
        digit_string(raw.get(columns::ORDERLINENUMBER)).ok_or(Rejection::OrderLineNumber)?;

    let product_line = truncate_chars(raw.get(columns::PRODUCTLINE), PRODUCT_LINE_MAX_CHARS);

    let country = sanitize_text(raw.get(columns::COUNTRY));

    let city = match raw.get(columns::CITY).trim() {
        "" => CITY_PLACEHOLDER.to_string(),
        c => c.to_string(),
    };

    let territory = match raw.get(columns::TERRITORY) {
        "" => resolve_territory(&country).unwrap_or_default().to_string(),
        t => t.to_string(),
    };

    let postal_code = Some(raw.get(columns::POSTALCODE))
        .filter(|p| p.chars().any(|c| c.is_ascii_digit()))
        .map(str::to_string);

    let state = match raw.get(columns::STATE) {
        "" if country == "USA" => UNKNOWN.to_string(),
        s => s.to_string(),
    };

    let phone = sanitize_phone(raw.get(columns::PHONE));

    let contact_first_name = sanitize_text(raw.get(columns::CONTACTFIRSTNAME));
    let contact_last_name = sanitize_text(raw.get(columns::CONTACTLASTNAME));
    let deal_size = sanitize_text(raw.get(columns::DEALSIZE));

    let numeric_code = digit_string(raw.get(columns::NUMERICCODE).trim());

    Ok(CleanRecord {
        order_number,
        quantity_ordered,
        price_each,
        order_line_number,
        sales,
        order_date,
        status,
        product_line,
        msrp,
        msrp_issue,
        product_code,
        phone,
        city,
        state,
        postal_code,
        country,
        territory,
        contact_last_name,
        contact_first_name,
        deal_size,
        numeric_code,
        passthrough: raw.passthrough(),
    })
}

/// A strictly positive whole number that fits a `u32`.
fn parse_quantity(raw: &str) -> Result<u32, Rejection> {
    let qty = raw.trim();
    if !is_integer(qty) {
        return Err(Rejection::Quantity);
    }
    qty.parse::<u32>()
        .ok()
        .filter(|q| *q > 0)
        .ok_or(Rejection::Quantity)
}

fn normalize_status(raw: &str) -> String {
    match raw.trim().to_uppercase().as_str() {
        MISSPELLED_DELIVERED => DELIVERED.to_string(),
        "" => UNKNOWN.to_string(),
        s => s.to_string(),
    }
}

/// Keep the stated amount unless it is further than [`SALES_TOLERANCE`]
/// from `quantity × price`, in which case the computed amount wins.
fn reconcile_sales(stated: f64, quantity: u32, price_each: f64) -> f64 {
    let computed = f64::from(quantity) * price_each;
    if (stated - computed).abs() > SALES_TOLERANCE {
        round_cents(computed).unwrap_or(computed)
    } else {
        stated
    }
}

fn digit_string(raw: &str) -> Option<String> {
    is_integer(raw).then(|| raw.to_string())
}
