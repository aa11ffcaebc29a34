//! Splits a raw endpoint URI into scheme, path part and query part.
//!
//! Never fails: text without a `:` is a scheme still being typed.

use super::types::TextRange;

/// The top-level pieces of a raw URI, with absolute ranges.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Tokens<'a> {
    pub scheme: &'a str,
    pub scheme_range: TextRange,
    /// Whether the `:` after the scheme is present.
    pub scheme_separator: bool,
    pub path: &'a str,
    pub path_start: usize,
    /// `None` when there is no `?`.
    pub query: Option<(&'a str, usize)>,
}

pub(crate) fn tokenize(raw: &str, base: usize) -> Tokens<'_> {
    let Some(colon) = raw.find(':') else {
        return Tokens {
            scheme: raw,
            scheme_range: TextRange::new(base, base + raw.len()),
            scheme_separator: false,
            path: "",
            path_start: base + raw.len(),
            query: None,
        };
    };

    let remainder = &raw[colon + 1..];
    let remainder_start = base + colon + 1;

    let (path, query) = match remainder.find('?') {
        Some(question) => (
            &remainder[..question],
            Some((&remainder[question + 1..], remainder_start + question + 1)),
        ),
        None => (remainder, None),
    };

    Tokens {
        scheme: &raw[..colon],
        scheme_range: TextRange::new(base, base + colon),
        scheme_separator: true,
        path,
        path_start: remainder_start,
        query,
    }
}
