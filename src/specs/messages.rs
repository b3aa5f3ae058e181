// src/specs/messages.rs
//! Extraction of `/wiadomosci` (inbox).
//!
//! Listing rows (`table.decorated.stretch tbody tr`), by position:
//! `td[2]` sender, `td[3]` subject with the link to the message, `td[4]` sent at.
//! An unread message has `font-weight: bold` on its subject cell.
//! Bodies are only fetched on request, one extra GET per message.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html};
use tracing::{debug, info, warn};

use super::labels::parse_datetime;
use crate::config::ExtractOptions;
use crate::config::consts::{MESSAGES_PATH, UNREAD_MARKER};
use crate::core::Transport;
use crate::core::html::{self, attr, data_cells, only};
use crate::core::sanitize::{clean_text, is_placeholder, normalize_nbsp};
use crate::error::{Result, ScrapeError};
use crate::models::Message;
use crate::session::Session;

const RECORD: &str = "Message";
const MIN_CELLS: usize = 5;

static MESSAGE_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/wiadomosci/\d+/\d+/(\d+)").expect("static regex")
});

/// Inbox listing; `with_content` also fetches every message body.
pub fn fetch<T: Transport>(session: &Session<T>, with_content: bool) -> Result<Vec<Message>> {
    let page = session.get(MESSAGES_PATH)?;
    let mut out = parse_page(&page.html, session.options())?;
    if with_content {
        for msg in &mut out {
            msg.content = Some(fetch_content(session, &msg.id)?);
        }
    }
    info!(count = out.len(), unread = out.iter().filter(|m| !m.is_read).count(), "messages");
    Ok(out)
}

/// Path of a message's detail page.
pub fn content_path(id: &str) -> String {
    format!("{MESSAGES_PATH}/1/5/{id}/f0")
}

pub fn fetch_content<T: Transport>(session: &Session<T>, id: &str) -> Result<String> {
    let page = session.get(&content_path(id))?;
    parse_content(page.root())
}

pub fn parse_content(root: ElementRef<'_>) -> Result<String> {
    let body = only(root, sel!("div.container-message-content"), "div.container-message-content")?;
    Ok(normalize_nbsp(&body.text().collect::<String>()).trim().to_string())
}

pub fn parse_page(doc: &Html, opts: &ExtractOptions) -> Result<Vec<Message>> {
    let mut out = Vec::new();
    for (i, row) in doc.select(sel!("table.decorated.stretch tbody tr")).enumerate() {
        match parse_row(row) {
            Ok(Some(msg)) => out.push(msg),
            Ok(None) => {}
            Err(e) if opts.is_lenient() && e.is_recoverable() => {
                warn!(row = i, error = %e, "skipping message row");
            }
            Err(e) => return Err(e),
        }
    }
    Ok(out)
}

/// `None` for the single-cell "no messages" filler row.
pub fn parse_row(row: ElementRef<'_>) -> Result<Option<Message>> {
    let tds = data_cells(row);
    if tds.len() == 1 {
        return Ok(None);
    }
    if tds.len() < MIN_CELLS {
        return Err(malformed(row, format!("{} cells", tds.len()), "too few columns"));
    }

    let subject_cell = tds[3];
    let href = subject_cell
        .select(sel!("a[href]"))
        .find_map(|a| attr(a, "href"))
        .ok_or_else(|| malformed(subject_cell, s!("column 3"), "subject without link"))?;
    let id = MESSAGE_ID
        .captures(href)
        .map(|c| s!(&c[1]))
        .ok_or_else(|| malformed(subject_cell, s!("column 3"), "link without message id"))?;

    let sender = html::text(tds[2]);
    if is_placeholder(&sender) {
        return Err(malformed(tds[2], s!("column 2"), "missing sender"));
    }

    let msg = Message {
        id,
        sender,
        subject: html::text(subject_cell),
        sent: parse_datetime(RECORD, &html::text(tds[4]))?,
        is_read: !is_bold(subject_cell),
        content: None,
    };
    debug!(id = %msg.id, read = msg.is_read, "message");
    Ok(Some(msg))
}

fn is_bold(cell: ElementRef<'_>) -> bool {
    let marker: String = UNREAD_MARKER.split_whitespace().collect();
    attr(cell, "style")
        .map(|style| style.split_whitespace().collect::<String>().contains(&marker))
        .unwrap_or(false)
}

fn malformed(el: ElementRef<'_>, position: String, reason: &'static str) -> ScrapeError {
    ScrapeError::MalformedCell {
        record: RECORD,
        position,
        text: clean_text(&el.text().collect::<String>()),
        reason,
    }
}
