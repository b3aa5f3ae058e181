// src/specs/announcements.rs
//! Extraction of `/ogloszenia` (school announcements).
//!
//! Each announcement is its own `table.decorated.big`: the title sits in the
//! `thead`, body rows are label-mapped (`Dodał`, `Treść`, `Data publikacji`).

use chrono::{Datelike, NaiveDate};
use scraper::{ElementRef, Html};
use tracing::{debug, info};

use super::labels::{self, FieldLabel};
use crate::config::ExtractOptions;
use crate::config::consts::{ANNOUNCEMENTS_PATH, ANNOUNCEMENT_MAX_AGE_YEARS};
use crate::core::Transport;
use crate::core::html::{self, only};
use crate::error::{Result, ScrapeError};
use crate::models::Announcement;
use crate::session::Session;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AnnouncementLabel {
    Author,
    Content,
    Date,
}

impl FieldLabel for AnnouncementLabel {
    const RECORD: &'static str = "Announcement";

    fn from_label(label: &str) -> Option<Self> {
        match label {
            "Dodał" => Some(Self::Author),
            "Treść" => Some(Self::Content),
            "Data publikacji" => Some(Self::Date),
            _ => None,
        }
    }
}

pub fn fetch<T: Transport>(session: &Session<T>) -> Result<Vec<Announcement>> {
    let page = session.get(ANNOUNCEMENTS_PATH)?;
    let out = parse_page(&page.html, session.options())?;
    info!(count = out.len(), "announcements");
    Ok(out)
}

pub fn parse_page(doc: &Html, opts: &ExtractOptions) -> Result<Vec<Announcement>> {
    doc.select(sel!("table.decorated.big"))
        .map(|table| parse_announcement(table, opts))
        .collect()
}

pub fn parse_announcement(table: ElementRef<'_>, opts: &ExtractOptions) -> Result<Announcement> {
    let title = html::text(only(table, sel!("thead"), "thead")?);
    let mut fields = labels::collect::<AnnouncementLabel>(table, opts)?;

    let date = fields
        .take(AnnouncementLabel::Date)
        .map(|text| labels::parse_date(AnnouncementLabel::RECORD, &text))
        .transpose()?;
    if let Some(date) = date {
        check_plausible(date, opts.reference_date)?;
    }

    debug!(%title, "announcement");
    Ok(Announcement {
        title,
        content: fields.take(AnnouncementLabel::Content),
        author: fields.take(AnnouncementLabel::Author),
        date,
    })
}

/// Publication year must fall within the last couple of years of `reference`.
fn check_plausible(date: NaiveDate, reference: NaiveDate) -> Result<()> {
    let year = reference.year();
    if (year - ANNOUNCEMENT_MAX_AGE_YEARS..=year).contains(&date.year()) {
        Ok(())
    } else {
        Err(ScrapeError::ImplausibleDate { date, reference })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn opts() -> ExtractOptions {
        ExtractOptions::default().with_reference_date(NaiveDate::from_ymd_opt(2023, 10, 1).unwrap())
    }

    fn table(rows: &str) -> String {
        format!(
            r#"<table class="decorated big center">
                 <thead><tr><td colspan="2">Wycieczka do&nbsp;muzeum</td></tr></thead>
                 <tbody>{rows}</tbody>
               </table>"#
        )
    }

    #[test]
    fn parses_all_known_labels() {
        let doc = Html::parse_document(&table(
            "<tr><th>Dodał</th><td>A</td></tr>
             <tr><th>Treść</th><td>B</td></tr>
             <tr><th>Data publikacji</th><td>2023-09-01</td></tr>",
        ));
        let out = parse_page(&doc, &opts()).unwrap();
        assert_eq!(
            out,
            vec![Announcement {
                title: s!("Wycieczka do muzeum"),
                content: Some(s!("B")),
                author: Some(s!("A")),
                date: NaiveDate::from_ymd_opt(2023, 9, 1),
            }]
        );
    }

    #[test]
    fn absent_labels_stay_unset() {
        let doc = Html::parse_document(&table("<tr><th>Treść</th><td>Tylko treść</td></tr>"));
        let a = &parse_page(&doc, &opts()).unwrap()[0];
        assert_eq!(a.content.as_deref(), Some("Tylko treść"));
        assert_eq!(a.author, None);
        assert_eq!(a.date, None);
    }

    #[test]
    fn unknown_label_fails() {
        let doc = Html::parse_document(&table(
            "<tr><th>Dodał</th><td>A</td></tr><tr><th>Załącznik</th><td>x.pdf</td></tr>",
        ));
        let err = parse_page(&doc, &opts()).unwrap_err();
        assert!(matches!(err, ScrapeError::UnrecognizedField { record: "Announcement", .. }));
    }

    #[test]
    fn duplicate_author_fails() {
        let doc = Html::parse_document(&table(
            "<tr><th>Dodał</th><td>A</td></tr><tr><th>Dodał</th><td>B</td></tr>",
        ));
        assert!(matches!(parse_page(&doc, &opts()), Err(ScrapeError::DuplicateField { .. })));
    }

    #[test]
    fn implausible_dates_rejected() {
        for d in ["2020-12-31", "2024-01-01"] {
            let doc = Html::parse_document(&table(&format!(
                "<tr><th>Data publikacji</th><td>{d}</td></tr>"
            )));
            assert!(matches!(parse_page(&doc, &opts()), Err(ScrapeError::ImplausibleDate { .. })), "{d}");
        }
        let doc = Html::parse_document(&table("<tr><th>Data publikacji</th><td>2021-01-01</td></tr>"));
        assert!(parse_page(&doc, &opts()).is_ok());
    }

    #[test]
    fn reextraction_is_idempotent() {
        let doc = Html::parse_document(&table("<tr><th>Dodał</th><td>A</td></tr>"));
        assert_eq!(parse_page(&doc, &opts()).unwrap(), parse_page(&doc, &opts()).unwrap());
    }
}
