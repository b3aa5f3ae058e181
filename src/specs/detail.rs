// src/specs/detail.rs
//! Listing → detail-page walk shared by exams and absences.
//!
//! The listing only carries detail ids (inside `href`/`onclick` targets); each
//! record needs its own request. [`DetailPages`] fetches one page per `next()`,
//! so a caller that stops early never pays for the rest. Calling a page's
//! `fetch` again starts over from a fresh listing.

use indexmap::IndexSet;
use regex::Regex;
use scraper::{ElementRef, Html};
use tracing::debug;

use crate::config::ExtractOptions;
use crate::core::Transport;
use crate::core::html::attr;
use crate::error::Result;
use crate::session::Session;

pub type DetailParser<R> = fn(ElementRef<'_>, &ExtractOptions) -> Result<R>;

/// Detail ids referenced from `doc`, in first-seen document order.
/// `pattern` must capture the id in group 1.
pub fn detail_ids(doc: &Html, pattern: &Regex) -> IndexSet<String> {
    let mut ids = IndexSet::new();
    for el in doc.select(sel!("[href], [onclick]")) {
        for target in [attr(el, "href"), attr(el, "onclick")].into_iter().flatten() {
            for caps in pattern.captures_iter(target) {
                ids.insert(s!(&caps[1]));
            }
        }
    }
    ids
}

pub struct DetailPages<'s, T: Transport, R> {
    session: &'s Session<T>,
    prefix: &'static str,
    ids: indexmap::set::IntoIter<String>,
    remaining: usize,
    parse: DetailParser<R>,
    failed: bool,
}

impl<'s, T: Transport, R> DetailPages<'s, T, R> {
    pub fn new(
        session: &'s Session<T>,
        prefix: &'static str,
        ids: IndexSet<String>,
        parse: DetailParser<R>,
    ) -> Self {
        Self {
            session,
            prefix,
            remaining: ids.len(),
            ids: ids.into_iter(),
            parse,
            failed: false,
        }
    }

    /// Detail pages not fetched yet.
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    fn load(&self, id: &str) -> Result<R> {
        let path = format!("{}{}", self.prefix, id);
        debug!(%path, "detail page");
        let page = self.session.get(&path)?;
        (self.parse)(page.root(), self.session.options())
    }
}

impl<T: Transport, R> Iterator for DetailPages<'_, T, R> {
    type Item = Result<R>;

    fn next(&mut self) -> Option<Self::Item> {
        // One failure ends the walk.
        if self.failed {
            return None;
        }
        let id = self.ids.next()?;
        self.remaining -= 1;
        let item = self.load(&id);
        self.failed = item.is_err();
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.failed {
            (0, Some(0))
        } else {
            (0, Some(self.remaining))
        }
    }
}

impl<T: Transport, R> std::iter::FusedIterator for DetailPages<'_, T, R> {}
