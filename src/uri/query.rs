//! Splits the query part into key/value instances.
//!
//! Both `&` and the XML-escaped `&amp;` separate parameters. Values wrapped in
//! `RAW(...)` or `RAW{...}` are opaque: separators inside them do not split.

use super::types::{QueryParamInstance, QuerySeparator, TextRange};

const XML_AMPERSAND: &str = "&amp;";

/// Parses `query` (starting at absolute offset `start`). An empty query has no
/// parameter; a trailing separator keeps a trailing empty one.
pub(crate) fn segment_query(query: &str, start: usize) -> Vec<QueryParamInstance> {
    if query.is_empty() {
        return Vec::new();
    }

    chunks(query)
        .into_iter()
        .map(|(chunk_start, chunk, separator)| parse_chunk(chunk, start + chunk_start, separator))
        .collect()
}

fn chunks(query: &str) -> Vec<(usize, &str, Option<QuerySeparator>)> {
    let mut chunks = Vec::new();
    let mut chunk_start = 0;
    let mut separator = None;
    let mut skip_until = 0;

    for (i, c) in query.char_indices() {
        if i < skip_until {
            continue;
        }

        if query[..i].ends_with('=') {
            if let Some(len) = raw_value_len(&query[i..]) {
                skip_until = i + len;
                continue;
            }
        }

        if c == '&' {
            let (next, width) = if query[i..].starts_with(XML_AMPERSAND) {
                (QuerySeparator::XmlAmpersand, XML_AMPERSAND.len())
            } else {
                (QuerySeparator::Ampersand, 1)
            };
            chunks.push((chunk_start, &query[chunk_start..i], separator));
            separator = Some(next);
            skip_until = i + width;
            chunk_start = i + width;
        }
    }

    chunks.push((chunk_start, &query[chunk_start..], separator));
    chunks
}

/// Length of a `RAW(...)` / `RAW{...}` value at the start of `rest`, up to the end
/// of the text when the wrapper is never closed.
fn raw_value_len(rest: &str) -> Option<usize> {
    let close = if rest.starts_with("RAW(") {
        ')'
    } else if rest.starts_with("RAW{") {
        '}'
    } else {
        return None;
    };

    Some(
        rest[4..]
            .find(close)
            .map(|position| 4 + position + 1)
            .unwrap_or(rest.len()),
    )
}

fn parse_chunk(chunk: &str, start: usize, separator: Option<QuerySeparator>) -> QueryParamInstance {
    match chunk.find('=') {
        Some(equals) => QueryParamInstance {
            key: chunk[..equals].to_string(),
            value: chunk[equals + 1..].to_string(),
            key_range: TextRange::new(start, start + equals),
            value_range: TextRange::new(start + equals + 1, start + chunk.len()),
            assignment: true,
            separator,
        },
        None => QueryParamInstance {
            key: chunk.to_string(),
            value: String::new(),
            key_range: TextRange::new(start, start + chunk.len()),
            value_range: TextRange::empty(start + chunk.len()),
            assignment: false,
            separator,
        },
    }
}
