//! Address formatting and minimal addr-spec extraction.
//!
//! This module never validates local-part/domain syntax; it only decides
//! how to quote or encode a display name, and how to pull the bare
//! `addr-spec` out of a `"name <addr>"` form for envelope purposes.

use crate::encodeword::{encode_words, is_plain_ascii, WordEncoder};

const ADDRESS_SPECIALS: &[char] = &['"', '(', ')', ',', ':', ';', '<', '>', '@', '[', ']', '\\'];

fn has_address_specials(s: &str) -> bool {
    s.chars().any(|c| ADDRESS_SPECIALS.contains(&c))
}

fn quote_display_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 2);
    out.push('"');
    for c in name.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

/// Formats a single address with an optional display name per §4.1.
pub fn format_address(addr: &str, display: Option<&str>, charset: &str) -> String {
    match display {
        None | Some("") => addr.to_string(),
        Some(display) => {
            let rendered = if is_plain_ascii(display) && !has_address_specials(display) {
                display.to_string()
            } else if display.is_ascii() {
                quote_display_name(display)
            } else {
                encode_words(display, charset, WordEncoder::for_charset(charset))
            };
            format!("{rendered} <{addr}>")
        }
    }
}

/// Joins multiple formatted addresses with `", "`.
pub fn join_addresses<I: IntoIterator<Item = String>>(addrs: I) -> String {
    addrs.into_iter().collect::<Vec<_>>().join(", ")
}

/// Extracts the bare `addr-spec` from a single `"name <addr>"` or bare
/// `addr` header value. No validation of local-part/domain is performed.
pub fn extract_addr_spec(value: &str) -> Option<String> {
    let value = value.trim();
    if let Some(start) = value.rfind('<') {
        if let Some(end) = value[start..].find('>') {
            let inner = &value[start + 1..start + end];
            if !inner.is_empty() {
                return Some(inner.trim().to_string());
            }
        }
    }
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Splits a comma-joined address-list header value into its bare
/// addr-specs, in order. Used to build the SMTP envelope.
pub fn extract_addr_specs(value: &str) -> Vec<String> {
    split_address_list(value)
        .iter()
        .filter_map(|chunk| extract_addr_spec(chunk))
        .collect()
}

/// Splits a header value on commas that are not inside a quoted display
/// name or an angle-bracket address.
fn split_address_list(value: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut in_angle = false;
    for c in value.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                current.push(c);
            }
            '<' if !in_quotes => {
                in_angle = true;
                current.push(c);
            }
            '>' if !in_quotes => {
                in_angle = false;
                current.push(c);
            }
            ',' if !in_quotes && !in_angle => {
                parts.push(std::mem::take(&mut current));
            }
            _ => current.push(c),
        }
    }
    if !current.trim().is_empty() {
        parts.push(current);
    }
    parts
}
