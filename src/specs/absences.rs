// src/specs/absences.rs
//! Extraction of `/przegladaj_nb/uczen` (attendance) and absence detail pages.
//!
//! Same shape as exams: the attendance grid only carries
//! `/przegladaj_nb/szczegoly/<id>` targets in `onclick` handlers.

use std::sync::LazyLock;

use regex::Regex;
use scraper::ElementRef;
use tracing::{debug, warn};

use super::detail::{self, DetailPages};
use super::labels::{self, FieldLabel};
use crate::config::ExtractOptions;
use crate::config::consts::{ABSENCES_PATH, ABSENCE_DETAIL_PREFIX};
use crate::core::Transport;
use crate::core::html::only;
use crate::error::Result;
use crate::models::Absence;
use crate::session::Session;

static DETAIL_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/przegladaj_nb/szczegoly/(\d+)").expect("static regex")
});

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AbsenceLabel {
    Category,
    Date,
    Subject,
    Topic,
    Lesson,
    Teacher,
    SchoolTrip,
    AddedBy,
}

impl FieldLabel for AbsenceLabel {
    const RECORD: &'static str = "Absence";

    fn from_label(label: &str) -> Option<Self> {
        match label {
            "Rodzaj" => Some(Self::Category),
            "Data" => Some(Self::Date),
            "Lekcja" => Some(Self::Subject),
            "Temat zajęć" => Some(Self::Topic),
            "Godzina lekcyjna" => Some(Self::Lesson),
            "Nauczyciel" => Some(Self::Teacher),
            "Czy wycieczka" => Some(Self::SchoolTrip),
            "Dodał" => Some(Self::AddedBy),
            _ => None,
        }
    }
}

pub fn fetch<T: Transport>(session: &Session<T>) -> Result<DetailPages<'_, T, Absence>> {
    let listing = session.get(ABSENCES_PATH)?;
    let ids = detail::detail_ids(&listing.html, &DETAIL_ID);
    debug!(count = ids.len(), "absence detail ids");
    Ok(DetailPages::new(session, ABSENCE_DETAIL_PREFIX, ids, parse_detail_page))
}

pub fn parse_detail_page(root: ElementRef<'_>, opts: &ExtractOptions) -> Result<Absence> {
    parse_absence(only(root, sel!("table.decorated"), "table.decorated")?, opts)
}

pub fn parse_absence(table: ElementRef<'_>, opts: &ExtractOptions) -> Result<Absence> {
    use AbsenceLabel::*;
    let rec = AbsenceLabel::RECORD;
    let mut f = labels::collect::<AbsenceLabel>(table, opts)?;

    let date = f.take(Date).map(|t| labels::parse_date(rec, &t)).transpose()?;
    let school_trip = match f.take(SchoolTrip).map(|t| labels::parse_yes_no(rec, "Czy wycieczka", &t)) {
        Some(Ok(flag)) => Some(flag),
        Some(Err(e)) if opts.is_lenient() && e.is_recoverable() => {
            warn!(error = %e, "skipping unreadable school trip flag");
            None
        }
        Some(Err(e)) => return Err(e),
        None => None,
    };

    Ok(Absence {
        date,
        lesson: f.take(Lesson),
        teacher: f.take(Teacher),
        category: f.take(Category),
        subject: f.take(Subject),
        topic: f.take(Topic),
        school_trip,
        added_by: f.take(AddedBy),
    })
}
