// src/specs/labels.rs
//! Label-mapped tables: each body row is `<th>label</th><td>value</td>`.
//!
//! Every record type that is read this way names its labels as a closed enum
//! implementing [`FieldLabel`]. Unknown labels are an error (or a warning in
//! lenient mode); a label seen twice is always an error.

use std::fmt::Debug;
use std::hash::Hash;

use chrono::{NaiveDate, NaiveDateTime};
use indexmap::IndexMap;
use scraper::ElementRef;
use tracing::warn;

use crate::config::ExtractOptions;
use crate::config::consts::{DATE_FORMAT, DATETIME_FORMAT};
use crate::core::html::{self, only};
use crate::core::sanitize::{clean_text, normalize_nbsp};
use crate::error::{Result, ScrapeError};

pub trait FieldLabel: Copy + Eq + Hash + Debug {
    /// Record name used in error messages.
    const RECORD: &'static str;

    fn from_label(label: &str) -> Option<Self>;
}

/// Values of one fragment keyed by recognized label, in row order.
#[derive(Debug)]
pub struct LabeledFields<L> {
    values: IndexMap<L, String>,
}

impl<L: FieldLabel> LabeledFields<L> {
    pub fn get(&self, label: L) -> Option<&str> {
        self.values.get(&label).map(String::as_str)
    }

    pub fn take(&mut self, label: L) -> Option<String> {
        self.values.shift_remove(&label)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Map every `tbody tr` of `table` through `L`.
pub fn collect<L: FieldLabel>(table: ElementRef<'_>, opts: &ExtractOptions) -> Result<LabeledFields<L>> {
    collect_rows(table.select(sel!("tbody tr")), opts)
}

pub fn collect_rows<'a, L: FieldLabel>(
    rows: impl Iterator<Item = ElementRef<'a>>,
    opts: &ExtractOptions,
) -> Result<LabeledFields<L>> {
    let mut values: IndexMap<L, String> = IndexMap::new();

    for row in rows {
        let raw_label = html::text(only(row, sel!("th"), "th")?);
        let label = raw_label.trim_end_matches(':').trim_end();
        let value = normalize_nbsp(&only(row, sel!("td"), "td")?.text().collect::<String>())
            .trim()
            .to_string();

        let Some(key) = L::from_label(label) else {
            if opts.is_lenient() {
                warn!(record = L::RECORD, label, "skipping unrecognized label");
                continue;
            }
            return Err(ScrapeError::UnrecognizedField { record: L::RECORD, label: s!(label) });
        };

        if values.contains_key(&key) {
            return Err(ScrapeError::DuplicateField { record: L::RECORD, label: s!(label) });
        }
        values.insert(key, value);
    }

    Ok(LabeledFields { values })
}

pub fn parse_date(record: &'static str, text: &str) -> Result<NaiveDate> {
    let text = clean_text(text);
    NaiveDate::parse_from_str(&text, DATE_FORMAT)
        .map_err(|_| ScrapeError::InvalidDate { record, text })
}

/// Full timestamp, or a bare date taken as midnight.
pub fn parse_datetime(record: &'static str, text: &str) -> Result<NaiveDateTime> {
    let text = clean_text(text);
    if let Ok(dt) = NaiveDateTime::parse_from_str(&text, DATETIME_FORMAT) {
        return Ok(dt);
    }
    NaiveDate::parse_from_str(&text, DATE_FORMAT)
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or(ScrapeError::InvalidDate { record, text })
}

/// "Tak"/"Nie" cells.
pub fn parse_yes_no(record: &'static str, label: &str, text: &str) -> Result<bool> {
    match clean_text(text).to_lowercase().as_str() {
        "tak" => Ok(true),
        "nie" => Ok(false),
        _ => Err(ScrapeError::MalformedCell {
            record,
            position: s!(label),
            text: s!(text),
            reason: "expected Tak/Nie",
        }),
    }
}
