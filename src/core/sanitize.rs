// src/core/sanitize.rs

/// Non-breaking space variants the portal mixes into cell text.
const NBSP_VARIANTS: &[&str] = &["\u{a0}", "&nbsp;", "&nbsp"];

pub fn normalize_nbsp(s: &str) -> String {
    let mut out = s.to_string();
    for v in NBSP_VARIANTS {
        if out.contains(v) {
            out = out.replace(v, " ");
        }
    }
    out
}

pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space { out.push(' '); prev_space = true; }
        } else { out.push(ch); prev_space = false; }
    }
    out.trim().to_string()
}

/// nbsp → space, then collapse runs of whitespace (incl. newlines) and trim.
pub fn clean_text(s: &str) -> String {
    normalize_ws(&normalize_nbsp(s))
}

/// Cells that stand for "nothing here" in grade tables.
pub fn is_placeholder(s: &str) -> bool {
    matches!(s.trim(), "" | "-" | "Brak ocen")
}

/// `Some(cleaned)` unless the cell is a placeholder.
pub fn non_placeholder(s: &str) -> Option<String> {
    let s = clean_text(s);
    if is_placeholder(&s) { None } else { Some(s) }
}

/// Strip `prefix` case-insensitively, returning the remainder if it matched.
pub fn strip_prefix_ci<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    if head.to_lowercase() == prefix.to_lowercase() {
        Some(&s[prefix.len()..])
    } else {
        None
    }
}
