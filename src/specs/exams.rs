// src/specs/exams.rs
//! Extraction of `/terminarz` (exam calendar) and its detail pages.
//!
//! The calendar only links to `/terminarz/szczegoly/<id>`; every exam is read
//! from its own detail page, a label-mapped `table.decorated`.

use std::sync::LazyLock;

use regex::Regex;
use scraper::ElementRef;
use tracing::debug;

use super::detail::{self, DetailPages};
use super::labels::{self, FieldLabel};
use crate::config::ExtractOptions;
use crate::config::consts::{EXAMS_PATH, EXAM_DETAIL_PREFIX, ONLINE_LESSON_MARKER};
use crate::core::Transport;
use crate::core::html::{absolute_links, only};
use crate::error::Result;
use crate::models::Exam;
use crate::session::Session;

static DETAIL_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/terminarz/szczegoly/(\d+)").expect("static regex")
});

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExamLabel {
    Date,
    Lesson,
    Teacher,
    Category,
    Subject,
    Classroom,
    Specification,
    PublishDate,
    Interval,
}

impl FieldLabel for ExamLabel {
    const RECORD: &'static str = "Exam";

    fn from_label(label: &str) -> Option<Self> {
        match label {
            "Data" => Some(Self::Date),
            "Nr lekcji" => Some(Self::Lesson),
            "Nauczyciel" => Some(Self::Teacher),
            "Rodzaj" => Some(Self::Category),
            "Przedmiot" => Some(Self::Subject),
            "Sala" => Some(Self::Classroom),
            "Opis" => Some(Self::Specification),
            "Data dodania" => Some(Self::PublishDate),
            "Przedział czasu" => Some(Self::Interval),
            _ => None,
        }
    }
}

/// Lazily walk every exam linked from the calendar; one request per item.
pub fn fetch<T: Transport>(session: &Session<T>) -> Result<DetailPages<'_, T, Exam>> {
    let listing = session.get(EXAMS_PATH)?;
    let ids = detail::detail_ids(&listing.html, &DETAIL_ID);
    debug!(count = ids.len(), "exam detail ids");
    Ok(DetailPages::new(session, EXAM_DETAIL_PREFIX, ids, parse_detail_page))
}

/// Detail page root → the one label-mapped table on it.
pub fn parse_detail_page(root: ElementRef<'_>, opts: &ExtractOptions) -> Result<Exam> {
    parse_exam(only(root, sel!("table.decorated"), "table.decorated")?, opts)
}

pub fn parse_exam(table: ElementRef<'_>, opts: &ExtractOptions) -> Result<Exam> {
    use ExamLabel::*;
    let rec = ExamLabel::RECORD;
    let mut f = labels::collect::<ExamLabel>(table, opts)?;

    let date = f.take(Date).map(|t| labels::parse_date(rec, &t)).transpose()?;
    let publish_date = f.take(PublishDate).map(|t| labels::parse_datetime(rec, &t)).transpose()?;
    let online_link = online_link(table, f.get(Category));

    Ok(Exam {
        date,
        lesson: f.take(Lesson),
        teacher: f.take(Teacher),
        category: f.take(Category),
        subject: f.take(Subject),
        classroom: f.take(Classroom),
        specification: f.take(Specification),
        publish_date,
        interval: f.take(Interval),
        online_link,
    })
}

/// Meeting link for online lessons, only when it is unambiguous.
fn online_link(table: ElementRef<'_>, category: Option<&str>) -> Option<String> {
    let category = category?.to_lowercase();
    if !category.contains(ONLINE_LESSON_MARKER) {
        return None;
    }
    let mut links = absolute_links(table);
    if links.len() == 1 {
        links.pop()
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScrapeError;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use scraper::Html;

    fn page(rows: &str) -> Html {
        Html::parse_document(&format!(
            r#"<div id="body"><table class="decorated small center"><thead><tr><td colspan="2">Szczegóły</td></tr></thead>
               <tbody>{rows}</tbody></table></div>"#
        ))
    }

    #[test]
    fn maps_every_label() {
        let doc = page(
            "<tr><th>Data</th><td>2023-10-12</td></tr>
             <tr><th>Nr lekcji</th><td>3</td></tr>
             <tr><th>Nauczyciel</th><td>Anna Nowak</td></tr>
             <tr><th>Rodzaj</th><td>sprawdzian</td></tr>
             <tr><th>Przedmiot</th><td>Matematyka</td></tr>
             <tr><th>Sala</th><td>204</td></tr>
             <tr><th>Opis</th><td>Funkcje liniowe</td></tr>
             <tr><th>Data dodania</th><td>2023-09-28 12:02:11</td></tr>
             <tr><th>Przedział czasu</th><td>09:50 - 10:35</td></tr>",
        );
        let exam = parse_detail_page(doc.root_element(), &ExtractOptions::default()).unwrap();
        assert_eq!(
            exam,
            Exam {
                date: NaiveDate::from_ymd_opt(2023, 10, 12),
                lesson: Some(s!("3")),
                teacher: Some(s!("Anna Nowak")),
                category: Some(s!("sprawdzian")),
                subject: Some(s!("Matematyka")),
                classroom: Some(s!("204")),
                specification: Some(s!("Funkcje liniowe")),
                publish_date: NaiveDate::from_ymd_opt(2023, 9, 28).and_then(|d| d.and_hms_opt(12, 2, 11)),
                interval: Some(s!("09:50 - 10:35")),
                online_link: None,
            }
        );
    }

    #[test]
    fn online_lesson_gets_single_link() {
        let doc = page(
            r#"<tr><th>Rodzaj</th><td>Lekcja online</td></tr>
               <tr><th>Opis</th><td>Spotkanie: <a href="https://meet.example.com/abc-def">link</a></td></tr>"#,
        );
        let exam = parse_detail_page(doc.root_element(), &ExtractOptions::default()).unwrap();
        assert_eq!(exam.online_link.as_deref(), Some("https://meet.example.com/abc-def"));
        assert_eq!(exam.specification.as_deref(), Some("Spotkanie: link"));
    }

    #[test]
    fn no_link_when_ambiguous_or_not_online() {
        let two = page(
            r#"<tr><th>Rodzaj</th><td>Lekcja online</td></tr>
               <tr><th>Opis</th><td><a href="https://a.example">a</a> <a href="https://b.example">b</a></td></tr>"#,
        );
        let exam = parse_detail_page(two.root_element(), &ExtractOptions::default()).unwrap();
        assert_eq!(exam.online_link, None);

        let offline = page(
            r#"<tr><th>Rodzaj</th><td>kartkówka</td></tr>
               <tr><th>Opis</th><td><a href="https://a.example">a</a></td></tr>"#,
        );
        let exam = parse_detail_page(offline.root_element(), &ExtractOptions::default()).unwrap();
        assert_eq!(exam.online_link, None);
    }

    #[test]
    fn unknown_label_strict_and_lenient() {
        let doc = page("<tr><th>Przedmiot</th><td>Fizyka</td></tr><tr><th>Waga</th><td>2</td></tr>");
        let err = parse_detail_page(doc.root_element(), &ExtractOptions::default()).unwrap_err();
        assert!(matches!(err, ScrapeError::UnrecognizedField { record: "Exam", .. }));

        let exam = parse_detail_page(doc.root_element(), &ExtractOptions::lenient()).unwrap();
        assert_eq!(exam.subject.as_deref(), Some("Fizyka"));
    }

    #[test]
    fn bad_date_is_an_error() {
        let doc = page("<tr><th>Data</th><td>jutro</td></tr>");
        let err = parse_detail_page(doc.root_element(), &ExtractOptions::default()).unwrap_err();
        assert!(matches!(err, ScrapeError::InvalidDate { record: "Exam", .. }));
    }
}
