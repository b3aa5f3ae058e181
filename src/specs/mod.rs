// src/specs/mod.rs
//! # Scraping "specs" module
//!
//! This module hosts the **page-specific extraction specifications** for the
//! portal. Each module focuses on a single page (plus its detail pages) and
//! encodes *where the data lives in the HTML* and *how to read it strictly*.
//!
//! ## What lives here
//! - **Pure parsing** (`parse_*`) over an already-parsed `scraper::Html` /
//!   `ElementRef`; no network, testable against captured markup.
//! - A thin **`fetch`** per page that takes the explicit [`Session`] handle,
//!   requests the page(s) and hands them to the parser.
//! - Two row-reading styles:
//!   - **label-mapped** tables (`labels`): `<th>label</th><td>value</td>`, labels
//!     mapped through a closed enum per record (announcements, exams, absences);
//!   - **fixed-position** rows: meaning by column index (grades, semesters,
//!     schedule, message listing).
//!
//! ## What does **not** live here
//! - **Transport / cookies / redirects** – `core::net`.
//! - **Login** – `session`.
//! - **Export formatting** – `models::Tabular` + `cli`.
//!
//! ## Typical call chain
//! ```text
//! cli → specs::<page>::fetch(&session) → session.get(path) → Page
//!                                      ↘ specs::<page>::parse_page(&page.html, opts)
//! ```
//!
//! ## Conventions & invariants
//! - Unexpected markup **fails loudly** with a `ScrapeError` naming the label
//!   or position. `Strictness::Lenient` downgrades unknown labels and malformed
//!   cells to a `warn!` and skips them; duplicate labels stay fatal.
//! - Optional fields (classroom, online link, message body) are `Option`s and
//!   never an error when absent.
//! - Exams and absences come back as a **lazy** [`detail::DetailPages`]: one
//!   detail request per item pulled.
//!
//! [`Session`]: crate::session::Session
pub mod labels;
pub mod detail;

pub mod announcements;
pub mod exams;
pub mod absences;
pub mod grades;
pub mod semesters;
pub mod schedule;
pub mod messages;
