//! This module handles conversion between iCal files and internal representations
//!
//! Parsing relies on the `ical` crate. Output is written by hand, because calendar clients expect a very specific layout (line order, `\n` separators, no folding) that generic iCal writers do not produce.

mod parser;
pub use parser::parse;
mod builder;
pub use builder::{build_alarms, build_calendar, build_todo};
pub mod duration;
pub mod time;

use ical::property::Property;

/// The value of the first property with this name
pub(crate) fn property_value<'a>(properties: &'a [Property], name: &str) -> Option<&'a str> {
    properties.iter()
        .find(|prop| prop.name.eq_ignore_ascii_case(name))
        .and_then(|prop| prop.value.as_deref())
}

/// The first value of a property parameter, without surrounding quotes
pub(crate) fn param_value<'a>(property: &'a Property, name: &str) -> Option<&'a str> {
    property.params.as_ref()?
        .iter()
        .find(|(param_name, _)| param_name.eq_ignore_ascii_case(name))
        .and_then(|(_, values)| values.first())
        .map(|value| value.trim().trim_matches('"'))
}

/// Escape a `TEXT` value. Only backslashes, commas and line breaks are escaped, this is what clients round-trip reliably.
pub(crate) fn escape_text(text: &str) -> String {
    text.replace("\r\n", "\n")
        .replace('\\', "\\\\")
        .replace(',', "\\,")
        .replace('\n', "\\n")
}

/// Reverse of [`escape_text`], also accepting the other escapes of RFC5545
pub(crate) fn unescape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') | Some('N') => out.push('\n'),
            Some(',') => out.push(','),
            Some(';') => out.push(';'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            },
            None => out.push('\\'),
        }
    }
    out
}

/// Split a list of `TEXT` values (e.g. `CATEGORIES`) on unescaped commas, and unescape each item
pub(crate) fn split_text_list(value: &str) -> Vec<String> {
    let mut items = Vec::new();
    let mut current = String::new();
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                current.push(c);
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            },
            ',' => items.push(unescape_text(&std::mem::take(&mut current))),
            _ => current.push(c),
        }
    }
    items.push(unescape_text(&current));
    items
}
