// src/config/options.rs
use chrono::{Local, NaiveDate};

/// What to do when the portal shows a label or cell we don't understand.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Strictness {
    /// Fail the extraction call.
    #[default]
    Strict,
    /// Log a warning and keep going without the offending label/cell.
    Lenient,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtractOptions {
    pub strictness: Strictness,
    /// "Now" for the announcement date sanity check.
    pub reference_date: NaiveDate,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            strictness: Strictness::default(),
            reference_date: Local::now().date_naive(),
        }
    }
}

impl ExtractOptions {
    pub fn lenient() -> Self {
        Self { strictness: Strictness::Lenient, ..Self::default() }
    }

    pub fn with_reference_date(mut self, date: NaiveDate) -> Self {
        self.reference_date = date;
        self
    }

    pub fn is_lenient(&self) -> bool {
        self.strictness == Strictness::Lenient
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_strict() {
        let opts = ExtractOptions::default();
        assert_eq!(opts.strictness, Strictness::Strict);
        assert!(!opts.is_lenient());
        assert!(ExtractOptions::lenient().is_lenient());
    }

    #[test]
    fn reference_date_override() {
        let d = NaiveDate::from_ymd_opt(2023, 9, 1).unwrap();
        assert_eq!(ExtractOptions::default().with_reference_date(d).reference_date, d);
    }
}
