// src/specs/grades.rs
//! Extraction of the per-grade rows on `/przegladaj_oceny/uczen`.
//!
//! Each subject expands into a `table.detail-grades`; body rows are read by
//! column position:
//!
//! ```text
//! 0 grade | 1 comment | 2 title | 3 added | 4 teacher | 5 correction | 6 added by
//! ```
//!
//! The semester summary on the same page lives in `semesters`.

use scraper::{ElementRef, Html};
use tracing::{info, warn};

use super::labels::parse_date;
use crate::config::ExtractOptions;
use crate::config::consts::{GRADES_PATH, GRADE_ROW_CELLS};
use crate::core::Transport;
use crate::core::html::{self, cells};
use crate::core::sanitize::{is_placeholder, non_placeholder};
use crate::error::{Result, ScrapeError};
use crate::models::Grade;
use crate::session::Session;

const RECORD: &str = "Grade";

pub fn fetch<T: Transport>(session: &Session<T>) -> Result<Vec<Grade>> {
    let page = session.get(GRADES_PATH)?;
    let out = parse_page(&page.html, session.options())?;
    info!(count = out.len(), "grades");
    Ok(out)
}

pub fn parse_page(doc: &Html, opts: &ExtractOptions) -> Result<Vec<Grade>> {
    let mut out = Vec::new();
    for (i, row) in doc.select(sel!("table.detail-grades tbody tr")).enumerate() {
        match parse_row(row) {
            Ok(Some(grade)) => out.push(grade),
            Ok(None) => {}
            Err(e) if opts.is_lenient() && e.is_recoverable() => {
                warn!(row = i, error = %e, "skipping grade row");
            }
            Err(e) => return Err(e),
        }
    }
    Ok(out)
}

/// `None` for the single-cell "no grades" filler row.
pub fn parse_row(row: ElementRef<'_>) -> Result<Option<Grade>> {
    let cols: Vec<String> = cells(row).into_iter().map(html::text).collect();

    if cols.len() == 1 && is_placeholder(&cols[0]) {
        return Ok(None);
    }
    if cols.len() != GRADE_ROW_CELLS {
        return Err(ScrapeError::MalformedCell {
            record: RECORD,
            position: format!("{} cells", cols.len()),
            text: cols.join(" | "),
            reason: "unexpected column count",
        });
    }

    let required = |i: usize, what: &'static str| -> Result<String> {
        non_placeholder(&cols[i]).ok_or_else(|| ScrapeError::MalformedCell {
            record: RECORD,
            position: format!("column {i}"),
            text: cols[i].clone(),
            reason: what,
        })
    };

    Ok(Some(Grade {
        grade: required(0, "missing grade")?,
        comment: non_placeholder(&cols[1]),
        title: required(2, "missing title")?,
        added_date: parse_date(RECORD, &cols[3])?,
        teacher: required(4, "missing teacher")?,
        correction_grade: non_placeholder(&cols[5]),
        added_by: required(6, "missing author")?,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn page(rows: &str) -> Html {
        Html::parse_document(&format!(
            r#"<table class="decorated detail-grades"><thead><tr><th>Ocena</th></tr></thead><tbody>{rows}</tbody></table>"#
        ))
    }

    #[test]
    fn reads_columns_by_position() {
        let doc = page(
            r#"<tr><td><span class="grade-box"><a>5</a></span></td><td>-</td><td>Sprawdzian: funkcje</td>
                   <td>2023-10-12</td><td>Anna Nowak</td><td>&nbsp;</td><td>Anna Nowak</td></tr>
               <tr><td>2</td><td>poprawić</td><td>Kartkówka</td>
                   <td>2023-10-20</td><td>Anna Nowak</td><td>4</td><td>Jan Kowalski</td></tr>"#,
        );
        let out = parse_page(&doc, &ExtractOptions::default()).unwrap();
        assert_eq!(
            out,
            vec![
                Grade {
                    grade: s!("5"),
                    comment: None,
                    title: s!("Sprawdzian: funkcje"),
                    added_date: NaiveDate::from_ymd_opt(2023, 10, 12).unwrap(),
                    teacher: s!("Anna Nowak"),
                    correction_grade: None,
                    added_by: s!("Anna Nowak"),
                },
                Grade {
                    grade: s!("2"),
                    comment: Some(s!("poprawić")),
                    title: s!("Kartkówka"),
                    added_date: NaiveDate::from_ymd_opt(2023, 10, 20).unwrap(),
                    teacher: s!("Anna Nowak"),
                    correction_grade: Some(s!("4")),
                    added_by: s!("Jan Kowalski"),
                },
            ]
        );
    }

    #[test]
    fn filler_row_is_skipped() {
        let doc = page(r#"<tr><td colspan="7">Brak ocen</td></tr>"#);
        assert!(parse_page(&doc, &ExtractOptions::default()).unwrap().is_empty());
    }

    #[test]
    fn short_row_fails_strict_skipped_lenient() {
        let doc = page(
            "<tr><td>5</td><td>-</td><td>T</td></tr>
             <tr><td>3</td><td>-</td><td>T</td><td>2023-10-01</td><td>N</td><td>-</td><td>N</td></tr>",
        );
        assert!(matches!(
            parse_page(&doc, &ExtractOptions::default()),
            Err(ScrapeError::MalformedCell { reason: "unexpected column count", .. })
        ));
        let out = parse_page(&doc, &ExtractOptions::lenient()).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].grade, "3");
    }

    #[test]
    fn bad_date_is_not_recoverable() {
        let doc = page("<tr><td>3</td><td>-</td><td>T</td><td>wczoraj</td><td>N</td><td>-</td><td>N</td></tr>");
        assert!(matches!(
            parse_page(&doc, &ExtractOptions::lenient()),
            Err(ScrapeError::InvalidDate { .. })
        ));
    }
}
