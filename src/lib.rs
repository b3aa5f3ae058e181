// src/lib.rs
//! Scraper client for the Librus Synergia school portal.
//!
//! Log in with a [`Session`], then pull records page by page through the
//! [`specs`] modules (announcements, grades, semester summary, exams,
//! absences, timetable, messages).

#[macro_use]
pub mod macros;

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod log;
pub mod models;
pub mod session;
pub mod specs;

pub use config::{Config, ExtractOptions, Strictness};
pub use error::{Result, ScrapeError};
pub use session::Session;
