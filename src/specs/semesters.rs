// src/specs/semesters.rs
//! Extraction of the subject summary on `/przegladaj_oceny/uczen`.
//!
//! A summary row has exactly ten cells:
//!
//! ```text
//! 0 expander | 1 subject
//! 2 sem. I grades  | 3 sem. I predicted  | 4 sem. I final
//! 5 sem. II grades | 6 sem. II predicted | 7 sem. II final
//! 8 year predicted | 9 year final
//! ```
//!
//! Anything else on the page (headers, expanded detail tables, spacer rows)
//! simply doesn't qualify and is skipped without error.

use scraper::{ElementRef, Html};
use tracing::{debug, info};

use crate::config::consts::{GRADES_PATH, SEMESTER_HEADER_SENTINELS, SEMESTER_ROW_CELLS};
use crate::core::Transport;
use crate::core::html::{self, cells};
use crate::core::sanitize::{is_placeholder, non_placeholder};
use crate::error::Result;
use crate::models::{SemesterGrades, SubjectSemesterInfo};
use crate::session::Session;

pub fn fetch<T: Transport>(session: &Session<T>) -> Result<Vec<SubjectSemesterInfo>> {
    let page = session.get(GRADES_PATH)?;
    let out = parse_page(&page.html);
    info!(count = out.len(), "subjects");
    Ok(out)
}

pub fn parse_page(doc: &Html) -> Vec<SubjectSemesterInfo> {
    doc.select(sel!("tr")).filter_map(parse_row).collect()
}

/// `Some` only for qualifying summary rows.
pub fn parse_row(row: ElementRef<'_>) -> Option<SubjectSemesterInfo> {
    let cols = cells(row);
    if cols.len() != SEMESTER_ROW_CELLS {
        return None;
    }
    let subject = html::text(cols[1]);
    if SEMESTER_HEADER_SENTINELS.contains(&subject.as_str()) {
        return None;
    }
    debug!(%subject, "semester summary row");

    let semester = |base: usize| SemesterGrades {
        grades: grade_list(cols[base]),
        predicted: non_placeholder(&html::text(cols[base + 1])),
        final_grade: non_placeholder(&html::text(cols[base + 2])),
    };

    Some(SubjectSemesterInfo {
        subject,
        semesters: [semester(2), semester(5)],
        predicted: non_placeholder(&html::text(cols[8])),
        final_grade: non_placeholder(&html::text(cols[9])),
    })
}

/// Grades in a cell: the `grade-box` badges, or plain whitespace-separated text.
fn grade_list(cell: ElementRef<'_>) -> Vec<String> {
    let boxes: Vec<String> = cell
        .select(sel!("span.grade-box"))
        .map(html::text)
        .filter(|g| !is_placeholder(g))
        .collect();
    if !boxes.is_empty() {
        return boxes;
    }

    let text = html::text(cell);
    if is_placeholder(&text) {
        return Vec::new();
    }
    text.split_whitespace().map(str::to_string).collect()
}
