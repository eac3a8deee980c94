use chrono::{Datelike, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

/// How a layout is handed to chrono. Layouts with a time of day are parsed
/// as full timestamps so the trailing time must be well formed too.
#[derive(Debug, Clone, Copy)]
enum DatePattern {
    Date(&'static str),
    DateTime(&'static str),
}

impl DatePattern {
    fn parse(self, s: &str) -> Option<NaiveDate> {
        match self {
            DatePattern::Date(fmt) => NaiveDate::parse_from_str(s, fmt).ok(),
            DatePattern::DateTime(fmt) => NaiveDateTime::parse_from_str(s, fmt)
                .ok()
                .map(|dt| dt.date()),
        }
    }
}

/// One accepted `ORDERDATE` layout. `shape` must match the whole input
/// before chrono sees it: chrono alone tolerates signed years, padding
/// inside fields and a missing space before `AM`/`PM`.
struct DateLayout {
    shape: Regex,
    pattern: DatePattern,
}

impl DateLayout {
    fn new(shape: &str, pattern: DatePattern) -> Self {
        Self {
            shape: Regex::new(shape).expect("valid date shape"),
            pattern,
        }
    }

    fn parse(&self, s: &str) -> Option<NaiveDate> {
        if self.shape.is_match(s) {
            self.pattern.parse(s)
        } else {
            None
        }
    }
}

/// Tried in order; the first full match wins. `M/D/Y` sits before `D/M/Y`,
/// so a date like `03/04/2024` is always read month-first.
static DATE_LAYOUTS: Lazy<[DateLayout; 7]> = Lazy::new(|| {
    [
        DateLayout::new(r"^[0-9]{4}-[0-9]{1,2}-[0-9]{1,2}$", DatePattern::Date("%Y-%m-%d")),
        DateLayout::new(r"^[0-9]{4}/[0-9]{1,2}/[0-9]{1,2}$", DatePattern::Date("%Y/%m/%d")),
        DateLayout::new(r"^[0-9]{1,2}/[0-9]{1,2}/[0-9]{4}$", DatePattern::Date("%m/%d/%Y")),
        DateLayout::new(r"^[0-9]{1,2}/[0-9]{1,2}/[0-9]{4}$", DatePattern::Date("%d/%m/%Y")),
        DateLayout::new(
            r"^[0-9]{1,2}/[0-9]{1,2}/[0-9]{4}\s+[0-9]{1,2}:[0-9]{1,2}$",
            DatePattern::DateTime("%m/%d/%Y %H:%M"),
        ),
        DateLayout::new(
            r"^[0-9]{1,2}/[0-9]{1,2}/[0-9]{4}\s+[0-9]{1,2}:[0-9]{1,2}:[0-9]{1,2}$",
            DatePattern::DateTime("%m/%d/%Y %H:%M:%S"),
        ),
        DateLayout::new(
            r"^[0-9]{1,2}/[0-9]{1,2}/[0-9]{4}\s+[0-9]{1,2}:[0-9]{1,2}\s+(?i:am|pm)$",
            DatePattern::DateTime("%m/%d/%Y %I:%M %p"),
        ),
    ]
});

/// Normalize a raw order date to `YYYY-MM-DD`, or `None` when no layout
/// matches the trimmed input or the calendar date does not exist.
pub fn normalize_date(raw: &str) -> Option<String> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    DATE_LAYOUTS
        .iter()
        // four-digit years only
        .find_map(|l| l.parse(s).filter(|d| (1000..=9999).contains(&d.year())))
        .map(|d| d.format("%Y-%m-%d").to_string())
}
