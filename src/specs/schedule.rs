// src/specs/schedule.rs
//! Extraction of `/przegladaj_plan_lekcji` (weekly timetable).
//!
//! The timetable is the page's second `table`. A period row starts with a
//! `<th>` holding the hours (`08:00 - 08:45`), then `td[0]` = lesson number
//! and `td[1..=5]` = Monday..Friday. A lesson cell reads
//! `[zastępstwo|odwołane] Subject - Teacher [s. Room]`.

use chrono::NaiveTime;
use scraper::{ElementRef, Html};
use tracing::{info, warn};

use crate::config::ExtractOptions;
use crate::config::consts::{
    CANCELED_PREFIX, LESSON_SEPARATOR, ROOM_MARKER, SCHEDULE_PATH, SCHOOL_DAYS, SUBSTITUTION_PREFIX,
};
use crate::core::Transport;
use crate::core::html::{self, data_cells};
use crate::core::sanitize::{clean_text, strip_prefix_ci};
use crate::error::{Result, ScrapeError};
use crate::models::{Lesson, TimeSpan, Timetable};
use crate::session::Session;

const RECORD: &str = "Lesson";

pub fn fetch<T: Transport>(session: &Session<T>) -> Result<Timetable> {
    let page = session.get(SCHEDULE_PATH)?;
    let timetable = parse_page(&page.html, session.options())?;
    info!(periods = timetable.periods.len(), lessons = timetable.lessons.len(), "timetable");
    Ok(timetable)
}

pub fn parse_page(doc: &Html, opts: &ExtractOptions) -> Result<Timetable> {
    let tables: Vec<ElementRef<'_>> = doc.select(sel!("table")).collect();
    let table = *tables
        .get(1)
        .ok_or(ScrapeError::MissingElement { selector: "table", count: tables.len() })?;
    parse_table(table, opts)
}

pub fn parse_table(table: ElementRef<'_>, opts: &ExtractOptions) -> Result<Timetable> {
    let mut tt = Timetable::default();

    for row in table.select(sel!("tr")) {
        let Some(span) = row.select(sel!("th")).next().and_then(|th| parse_span(&html::text(th))) else {
            continue; // separator / header row
        };
        let period = tt.periods.len();
        tt.periods.push(span);

        let tds = data_cells(row);
        for (day, cell) in tds.iter().skip(1).take(SCHOOL_DAYS).enumerate() {
            let text = html::text(*cell);
            if text.is_empty() {
                continue;
            }
            match LessonCell::parse(&text) {
                Some(c) => tt.lessons.push(Lesson {
                    day,
                    period,
                    subject: c.subject,
                    span,
                    teacher: c.teacher,
                    classroom: c.classroom,
                    substitution: c.substitution,
                    canceled: c.canceled,
                }),
                None if opts.is_lenient() => {
                    warn!(day, period, %text, "skipping unreadable lesson cell");
                }
                None => {
                    return Err(ScrapeError::MalformedCell {
                        record: RECORD,
                        position: format!("day {day}, period {period}"),
                        text,
                        reason: "expected 'Subject - Teacher'",
                    });
                }
            }
        }
    }

    tt.lessons.sort_by_key(|l| (l.day, l.period));
    Ok(tt)
}

/// `08:00 - 08:45` (any nbsp/whitespace around the dash).
pub fn parse_span(text: &str) -> Option<TimeSpan> {
    let text = clean_text(text);
    let (start, end) = text.split_once('-')?;
    Some(TimeSpan {
        start: NaiveTime::parse_from_str(start.trim(), "%H:%M").ok()?,
        end: NaiveTime::parse_from_str(end.trim(), "%H:%M").ok()?,
    })
}

/// One composite lesson cell split into its fields.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LessonCell {
    pub subject: String,
    pub teacher: String,
    pub classroom: Option<String>,
    pub substitution: bool,
    pub canceled: bool,
}

impl LessonCell {
    /// `None` when there is no subject/teacher separator or either side is empty.
    pub fn parse(raw: &str) -> Option<Self> {
        let mut text = clean_text(raw);
        let mut substitution = false;
        let mut canceled = false;

        // Status prefixes may stack ("odwołane zastępstwo …").
        loop {
            if let Some(rest) = strip_prefix_ci(&text, SUBSTITUTION_PREFIX) {
                substitution = true;
                text = rest.trim_start().to_string();
            } else if let Some(rest) = strip_prefix_ci(&text, CANCELED_PREFIX) {
                canceled = true;
                text = rest.trim_start().to_string();
            } else {
                break;
            }
        }

        let (subject, rest) = text.split_once(LESSON_SEPARATOR)?;
        let subject = subject.trim();
        let rest = rest.trim();

        let (teacher, classroom) = split_room(rest);

        if subject.is_empty() || teacher.is_empty() {
            return None;
        }
        Some(Self { subject: s!(subject), teacher: s!(teacher), classroom, substitution, canceled })
    }
}

/// Teacher and room from `Teacher [s. Room]`. The marker only counts as a
/// whole word, so titles ending in it (`ks. Jan`) stay part of the name.
fn split_room(rest: &str) -> (&str, Option<String>) {
    let marker = rest
        .match_indices(ROOM_MARKER)
        .map(|(i, _)| i)
        .filter(|&i| i == 0 || rest[..i].ends_with(char::is_whitespace))
        .last();

    if let Some(i) = marker {
        let room = rest[i + ROOM_MARKER.len()..].trim();
        if !room.is_empty() {
            return (rest[..i].trim(), Some(s!(room)));
        }
    }
    (rest, None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn cell(subject: &str, teacher: &str, classroom: Option<&str>) -> LessonCell {
        LessonCell {
            subject: s!(subject),
            teacher: s!(teacher),
            classroom: classroom.map(String::from),
            substitution: false,
            canceled: false,
        }
    }

    #[test]
    fn splits_teacher_and_room() {
        assert_eq!(LessonCell::parse("Math - Smith s. 204"), Some(cell("Math", "Smith", Some("204"))));
        assert_eq!(LessonCell::parse("Math - Smith"), Some(cell("Math", "Smith", None)));
    }

    #[test]
    fn priest_title_is_not_a_room() {
        assert_eq!(
            LessonCell::parse("Religia - ks. Jan Kowalski"),
            Some(cell("Religia", "ks. Jan Kowalski", None))
        );
        assert_eq!(
            LessonCell::parse("Religia - ks. Jan Kowalski s. 12"),
            Some(cell("Religia", "ks. Jan Kowalski", Some("12")))
        );
    }

    #[test]
    fn handles_nbsp_and_newlines() {
        assert_eq!(
            LessonCell::parse("Język polski\n-\u{a0}Anna Nowak s.\u{a0}12"),
            Some(cell("Język polski", "Anna Nowak", Some("12")))
        );
    }

    #[test]
    fn status_prefixes() {
        let c = LessonCell::parse("zastępstwo Fizyka - Jan Kowalski s. 3").unwrap();
        assert!(c.substitution && !c.canceled);
        assert_eq!(c.subject, "Fizyka");
        let c = LessonCell::parse("odwołane Chemia - Ewa Wiśniewska").unwrap();
        assert!(c.canceled && !c.substitution);
        assert_eq!(c.subject, "Chemia");
    }

    #[test]
    fn missing_separator_or_teacher() {
        assert_eq!(LessonCell::parse("Math"), None);
        assert_eq!(LessonCell::parse("Math - "), None);
        assert_eq!(LessonCell::parse(" - Smith"), None);
    }

    #[test]
    fn spans() {
        let span = parse_span("08:00\u{a0}-\u{a0}08:45").unwrap();
        assert_eq!(span.to_string(), "08:00-08:45");
        assert_eq!(parse_span("Nr"), None);
    }

    fn timetable(rows: &str) -> Html {
        Html::parse_document(&format!(
            r#"<table id="nav"><tr><td>menu</td></tr></table>
               <table class="decorated plan-lekcji">
                 <thead><tr><td></td><td>Godziny</td><th>Poniedziałek</th><th>Wtorek</th><th>Środa</th><th>Czwartek</th><th>Piątek</th></tr></thead>
                 <tbody>{rows}</tbody>
               </table>"#
        ))
    }

    #[test]
    fn reads_grid_sorted_by_day_then_period() {
        let doc = timetable(
            r#"<tr class="line1"><th>07:10&nbsp;-&nbsp;07:55</th><td>0</td>
                 <td>&nbsp;</td><td>Religia - Piotr Zieliński</td><td></td><td></td><td></td></tr>
               <tr class="line0"><td colspan="7"></td></tr>
               <tr class="line1"><th>08:00&nbsp;-&nbsp;08:45</th><td>1</td>
                 <td>Matematyka - Anna Nowak s. 204</td><td></td><td></td><td></td><td>Fizyka - Jan Kowalski</td></tr>"#,
        );
        let tt = parse_page(&doc, &ExtractOptions::default()).unwrap();
        assert_eq!(tt.periods.len(), 2);
        let keys: Vec<(usize, usize, &str)> =
            tt.lessons.iter().map(|l| (l.day, l.period, l.subject.as_str())).collect();
        assert_eq!(keys, vec![(0, 1, "Matematyka"), (1, 0, "Religia"), (4, 1, "Fizyka")]);
        assert_eq!(tt.lessons[0].classroom.as_deref(), Some("204"));
        assert_eq!(tt.lessons[0].span, tt.periods[1]);
    }

    #[test]
    fn malformed_cell_strict_vs_lenient() {
        let doc = timetable(
            r#"<tr><th>08:00 - 08:45</th><td>1</td><td>Matematyka</td><td>Fizyka - Jan Kowalski</td></tr>"#,
        );
        assert!(matches!(
            parse_page(&doc, &ExtractOptions::default()),
            Err(ScrapeError::MalformedCell { record: "Lesson", .. })
        ));
        let tt = parse_page(&doc, &ExtractOptions::lenient()).unwrap();
        assert_eq!(tt.lessons.len(), 1);
        assert_eq!(tt.lessons[0].day, 1);
    }

    #[test]
    fn missing_timetable_table() {
        let doc = Html::parse_document("<table><tr><td>x</td></tr></table>");
        assert!(matches!(
            parse_page(&doc, &ExtractOptions::default()),
            Err(ScrapeError::MissingElement { selector: "table", count: 1 })
        ));
    }
}
