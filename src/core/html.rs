// src/core/html.rs
//! Small traversal helpers over `scraper` element trees.

use scraper::{ElementRef, Selector};

use super::sanitize::clean_text;
use crate::error::{Result, ScrapeError};

/// Visible text of an element: all descendant text nodes, nbsp-normalized,
/// whitespace-collapsed and trimmed.
pub fn text(el: ElementRef<'_>) -> String {
    clean_text(&el.text().collect::<String>())
}

/// The single descendant matching `selector`; anything else is a layout error.
pub fn only<'a>(
    el: ElementRef<'a>,
    selector: &Selector,
    css: &'static str,
) -> Result<ElementRef<'a>> {
    let mut found = el.select(selector);
    match (found.next(), found.next()) {
        (Some(one), None) => Ok(one),
        (None, _) => Err(ScrapeError::MissingElement { selector: css, count: 0 }),
        (Some(_), Some(_)) => Err(ScrapeError::MissingElement {
            selector: css,
            count: 2 + found.count(),
        }),
    }
}

/// Direct `td`/`th` children of a row, in column order.
pub fn cells(row: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    row.children()
        .filter_map(ElementRef::wrap)
        .filter(|c| matches!(c.value().name(), "td" | "th"))
        .collect()
}

/// Direct `td` children only.
pub fn data_cells(row: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    cells(row)
        .into_iter()
        .filter(|c| c.value().name() == "td")
        .collect()
}

pub fn attr<'a>(el: ElementRef<'a>, name: &str) -> Option<&'a str> {
    el.value().attr(name)
}

pub fn is_absolute_href(href: &str) -> bool {
    let lc = href.trim_start().to_ascii_lowercase();
    lc.starts_with("http://") || lc.starts_with("https://")
}

/// Every absolute `href` below `el`.
pub fn absolute_links(el: ElementRef<'_>) -> Vec<String> {
    el.select(sel!("a[href]"))
        .filter_map(|a| attr(a, "href"))
        .filter(|h| is_absolute_href(h))
        .map(|h| h.trim().to_string())
        .collect()
}
