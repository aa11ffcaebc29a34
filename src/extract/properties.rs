//! Endpoint URIs in `.properties` files, e.g. Kafka connector configurations:
//!
//! ```properties
//! camel.source.url=timer:tick?period=1000
//! camel.sink.url=direct:orders
//! ```

use crate::uri::TextRange;

use super::{ExtractionError, Extractor, NodeId, Occurrence};

/// One `key=value` (or `key:value`, `key value`) line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyEntry {
    pub key: String,
    pub value: String,
    pub key_range: TextRange,
    pub value_range: TextRange,
    pub line_range: TextRange,
}

/// Parses every entry of a properties text, skipping blank and `#`/`!` comment lines.
///
/// Line continuations are not joined; a continued line is read as its own entry.
pub fn parse_entries(text: &str) -> Vec<PropertyEntry> {
    let mut line_start = 0;
    let mut entries = Vec::new();

    for line in text.split_inclusive('\n') {
        let start = line_start;
        line_start += line.len();

        let content = line.trim_end_matches(['\n', '\r']);
        let key_start = content.len() - content.trim_start().len();
        let body = &content[key_start..];
        if body.is_empty() || body.starts_with('#') || body.starts_with('!') {
            continue;
        }

        let key_len = body
            .find(|c: char| c == '=' || c == ':' || c.is_whitespace())
            .unwrap_or(body.len());
        let after_key = &body[key_len..];
        let separator_len = after_key.len()
            - after_key
                .trim_start()
                .strip_prefix(['=', ':'])
                .unwrap_or(after_key.trim_start())
                .trim_start()
                .len();
        let value_start = key_start + key_len + separator_len;
        let value = content[value_start..].trim_end();

        entries.push(PropertyEntry {
            key: body[..key_len].to_string(),
            value: value.to_string(),
            key_range: TextRange::new(start + key_start, start + key_start + key_len),
            value_range: TextRange::new(start + value_start, start + value_start + value.len()),
            line_range: TextRange::new(start, start + content.len()),
        });
    }

    entries
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PropertiesExtractor;

impl PropertiesExtractor {
    /// Any `*.url` or `*.uri` value, including one still being typed.
    fn holds_uri(entry: &PropertyEntry) -> bool {
        entry.key.ends_with(".url") || entry.key.ends_with(".uri")
    }
}

impl Extractor for PropertiesExtractor {
    fn extract(&self, text: &str) -> Vec<Result<Occurrence, ExtractionError>> {
        parse_entries(text)
            .into_iter()
            .filter(PropertiesExtractor::holds_uri)
            .map(|entry| {
                Ok(Occurrence {
                    node: NodeId(entry.line_range.start),
                    node_kind: entry.key,
                    node_range: entry.line_range,
                    raw_text: entry.value,
                    offset: entry.value_range.start,
                })
            })
            .collect()
    }
}
