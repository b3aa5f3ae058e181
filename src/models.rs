// src/models.rs
//! Record types produced by the page specs.
//!
//! Every record is a plain value built once from one page fragment. Fields that
//! come from an optional label or cell are `Option`s and stay `None` when the
//! portal didn't show them.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::config::consts::{DATE_FORMAT, DATETIME_FORMAT};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Announcement {
    pub title: String,
    pub content: Option<String>,
    pub author: Option<String>,
    pub date: Option<NaiveDate>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Exam {
    pub date: Option<NaiveDate>,
    pub lesson: Option<String>,
    pub teacher: Option<String>,
    pub category: Option<String>,
    pub subject: Option<String>,
    pub classroom: Option<String>,
    pub specification: Option<String>,
    pub publish_date: Option<NaiveDateTime>,
    pub interval: Option<String>,
    /// Meeting link, only for online lessons whose page carries exactly one link.
    pub online_link: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Absence {
    pub date: Option<NaiveDate>,
    pub lesson: Option<String>,
    pub teacher: Option<String>,
    pub category: Option<String>,
    pub subject: Option<String>,
    pub topic: Option<String>,
    pub school_trip: Option<bool>,
    pub added_by: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grade {
    pub grade: String,
    pub comment: Option<String>,
    pub title: String,
    pub added_date: NaiveDate,
    pub teacher: String,
    pub correction_grade: Option<String>,
    pub added_by: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SemesterGrades {
    pub grades: Vec<String>,
    pub predicted: Option<String>,
    pub final_grade: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubjectSemesterInfo {
    pub subject: String,
    pub semesters: [SemesterGrades; 2],
    pub predicted: Option<String>,
    pub final_grade: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeSpan {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl fmt::Display for TimeSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start.format("%H:%M"), self.end.format("%H:%M"))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Lesson {
    /// 0 = Monday.
    pub day: usize,
    /// Row index of the period in the timetable, from 0.
    pub period: usize,
    pub subject: String,
    pub span: TimeSpan,
    pub teacher: String,
    pub classroom: Option<String>,
    pub substitution: bool,
    pub canceled: bool,
}

/// Weekly timetable: lessons sorted by (day, period) plus every period's hours.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Timetable {
    pub periods: Vec<TimeSpan>,
    pub lessons: Vec<Lesson>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    /// Opaque portal token; used to build the detail URL.
    pub id: String,
    pub sender: String,
    pub subject: String,
    pub sent: NaiveDateTime,
    pub is_read: bool,
    /// Only filled when content was requested.
    pub content: Option<String>,
}

/* ---------------- Flat table view (export) ---------------- */

/// Headers + one row of strings per record, for CSV/TSV export.
pub trait Tabular {
    fn headers() -> &'static [&'static str];
    fn row(&self) -> Vec<String>;
}

fn opt(v: &Option<String>) -> String {
    v.clone().unwrap_or_default()
}

fn opt_date(v: &Option<NaiveDate>) -> String {
    v.map(|d| d.format(DATE_FORMAT).to_string()).unwrap_or_default()
}

fn opt_datetime(v: &Option<NaiveDateTime>) -> String {
    v.map(|d| d.format(DATETIME_FORMAT).to_string()).unwrap_or_default()
}

fn yes_no(v: bool) -> String {
    s!(if v { "yes" } else { "no" })
}

impl Tabular for Announcement {
    fn headers() -> &'static [&'static str] {
        &["Title", "Author", "Date", "Content"]
    }
    fn row(&self) -> Vec<String> {
        vec![self.title.clone(), opt(&self.author), opt_date(&self.date), opt(&self.content)]
    }
}

impl Tabular for Exam {
    fn headers() -> &'static [&'static str] {
        &[
            "Date", "Lesson", "Teacher", "Category", "Subject", "Classroom",
            "Specification", "Published", "Interval", "Online link",
        ]
    }
    fn row(&self) -> Vec<String> {
        vec![
            opt_date(&self.date),
            opt(&self.lesson),
            opt(&self.teacher),
            opt(&self.category),
            opt(&self.subject),
            opt(&self.classroom),
            opt(&self.specification),
            opt_datetime(&self.publish_date),
            opt(&self.interval),
            opt(&self.online_link),
        ]
    }
}

impl Tabular for Absence {
    fn headers() -> &'static [&'static str] {
        &["Date", "Lesson", "Teacher", "Category", "Subject", "Topic", "School trip", "Added by"]
    }
    fn row(&self) -> Vec<String> {
        vec![
            opt_date(&self.date),
            opt(&self.lesson),
            opt(&self.teacher),
            opt(&self.category),
            opt(&self.subject),
            opt(&self.topic),
            self.school_trip.map(yes_no).unwrap_or_default(),
            opt(&self.added_by),
        ]
    }
}

impl Tabular for Grade {
    fn headers() -> &'static [&'static str] {
        &["Grade", "Comment", "Title", "Added", "Teacher", "Correction", "Added by"]
    }
    fn row(&self) -> Vec<String> {
        vec![
            self.grade.clone(),
            opt(&self.comment),
            self.title.clone(),
            self.added_date.format(DATE_FORMAT).to_string(),
            self.teacher.clone(),
            opt(&self.correction_grade),
            self.added_by.clone(),
        ]
    }
}

impl Tabular for SubjectSemesterInfo {
    fn headers() -> &'static [&'static str] {
        &[
            "Subject",
            "Semester 1", "Predicted 1", "Final 1",
            "Semester 2", "Predicted 2", "Final 2",
            "Predicted", "Final",
        ]
    }
    fn row(&self) -> Vec<String> {
        let mut row = vec![self.subject.clone()];
        for sem in &self.semesters {
            row.push(sem.grades.join(" "));
            row.push(opt(&sem.predicted));
            row.push(opt(&sem.final_grade));
        }
        row.push(opt(&self.predicted));
        row.push(opt(&self.final_grade));
        row
    }
}

impl Tabular for Lesson {
    fn headers() -> &'static [&'static str] {
        &["Day", "Period", "Hours", "Subject", "Teacher", "Classroom", "Substitution", "Canceled"]
    }
    fn row(&self) -> Vec<String> {
        vec![
            self.day.to_string(),
            self.period.to_string(),
            self.span.to_string(),
            self.subject.clone(),
            self.teacher.clone(),
            opt(&self.classroom),
            yes_no(self.substitution),
            yes_no(self.canceled),
        ]
    }
}

impl Tabular for Message {
    fn headers() -> &'static [&'static str] {
        &["Id", "Sender", "Subject", "Sent", "Read", "Content"]
    }
    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.sender.clone(),
            self.subject.clone(),
            self.sent.format(DATETIME_FORMAT).to_string(),
            yes_no(self.is_read),
            opt(&self.content),
        ]
    }
}
