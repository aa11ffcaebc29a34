//! `uri` attributes of XML route definitions.
//!
//! ```xml
//! <route>
//!   <from uri="timer:foo?period=500"/>
//!   <camel:to uri="direct:orders"/>
//! </route>
//! ```
//!
//! This is a tag scanner, not an XML parser: it tolerates the half-written
//! markup an editor buffer usually holds.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::uri::TextRange;

use super::{ExtractionError, Extractor, NodeId, Occurrence};

static TAG_START: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<(?<name>[A-Za-z_][\w.\-]*(?::[A-Za-z_][\w.\-]*)?)").unwrap());

static COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<!--.*?(?:-->|$)").unwrap());

const URI_ATTRIBUTE: &str = "uri";

#[derive(Debug, Clone, Copy, Default)]
pub struct XmlExtractor;

impl Extractor for XmlExtractor {
    fn extract(&self, text: &str) -> Vec<Result<Occurrence, ExtractionError>> {
        let comments: Vec<TextRange> = COMMENT
            .find_iter(text)
            .map(|comment| TextRange::new(comment.start(), comment.end()))
            .collect();

        TAG_START
            .captures_iter(text)
            .filter_map(|captures| {
                let tag = captures.get(0)?;
                let name = captures.name("name")?;
                (!comments.iter().any(|comment| comment.contains(tag.start())))
                    .then(|| scan_tag(text, tag.start(), name.as_str(), name.end()))
            })
            .flatten()
            .collect()
    }
}

/// `camel:to` -> `to`
fn local_name(name: &str) -> &str {
    name.rsplit_once(':').map(|(_, local)| local).unwrap_or(name)
}

/// Scans the attributes of the tag opened at `tag_start`.
fn scan_tag(
    text: &str,
    tag_start: usize,
    name: &str,
    attributes_start: usize,
) -> Vec<Result<Occurrence, ExtractionError>> {
    let node_kind = local_name(name);
    let mut found: Vec<(usize, &str)> = Vec::new();
    let mut errors = Vec::new();
    let mut cursor = attributes_start;

    let tag_end = loop {
        cursor = skip_whitespace(text, cursor);
        let rest = &text[cursor..];

        if rest.is_empty() || rest.starts_with('<') {
            break cursor;
        }
        if rest.starts_with('>') {
            break cursor + 1;
        }
        if rest.starts_with("/>") {
            break cursor + 2;
        }

        let name_len = rest
            .find(|c: char| c.is_whitespace() || matches!(c, '=' | '>' | '/' | '<'))
            .unwrap_or(rest.len())
            .max(1);
        let attribute = &rest[..name_len.min(rest.len())];
        cursor = skip_whitespace(text, cursor + attribute.len());

        if !text[cursor..].starts_with('=') {
            continue;
        }
        cursor = skip_whitespace(text, cursor + 1);

        let Some(quote) = text[cursor..].chars().next().filter(|c| matches!(c, '"' | '\'')) else {
            // Unquoted value
            let len = text[cursor..]
                .find(|c: char| c.is_whitespace() || matches!(c, '>' | '<'))
                .unwrap_or(text.len() - cursor);
            if attribute == URI_ATTRIBUTE {
                found.push((cursor, &text[cursor..cursor + len]));
            }
            cursor += len;
            continue;
        };

        let value_start = cursor + 1;
        let closing = text[value_start..]
            .find(|c: char| c == quote || c == '<')
            .filter(|position| text[value_start + position..].starts_with(quote));

        match closing {
            Some(len) => {
                if attribute == URI_ATTRIBUTE {
                    found.push((value_start, &text[value_start..value_start + len]));
                }
                cursor = value_start + len + 1;
            }
            None => {
                if attribute == URI_ATTRIBUTE {
                    errors.push(Err(ExtractionError::Unterminated {
                        node_kind: node_kind.to_string(),
                        attribute: attribute.to_string(),
                        offset: value_start,
                    }));
                }
                break text[value_start..]
                    .find('<')
                    .map(|position| value_start + position)
                    .unwrap_or(text.len());
            }
        }
    };

    found
        .into_iter()
        .map(|(offset, raw_text)| {
            Ok(Occurrence {
                node: NodeId(tag_start),
                node_kind: node_kind.to_string(),
                node_range: TextRange::new(tag_start, tag_end),
                raw_text: raw_text.to_string(),
                offset,
            })
        })
        .chain(errors)
        .collect()
}

fn skip_whitespace(text: &str, from: usize) -> usize {
    text[from..]
        .find(|c: char| !c.is_whitespace())
        .map(|position| from + position)
        .unwrap_or(text.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn occurrences(text: &str) -> Vec<Occurrence> {
        XmlExtractor
            .extract(text)
            .into_iter()
            .filter_map(Result::ok)
            .collect()
    }

    #[test]
    fn test_extracts_uri_attributes_in_document_order() {
        let text = r#"<route>
  <from uri="timer:foo?period=500"/>
  <to uri='direct:orders'/>
</route>"#;
        let found = occurrences(text);

        assert_eq!(found.len(), 2);
        assert_eq!(found[0].node_kind, "from");
        assert_eq!(found[0].raw_text, "timer:foo?period=500");
        assert_eq!(&text[found[0].offset..found[0].offset + 20], "timer:foo?period=500");
        assert_eq!(found[1].node_kind, "to");
        assert_eq!(found[1].raw_text, "direct:orders");
        assert!(found[0].node < found[1].node);
    }

    #[test]
    fn test_node_range_spans_the_start_tag() {
        let text = r#"<to id="x" uri="direct:a" />"#;
        let found = occurrences(text);
        assert_eq!(found[0].node_range, TextRange::new(0, text.len()));
    }

    #[test]
    fn test_namespace_prefix_is_stripped() {
        let found = occurrences(r#"<camel:from uri="direct:a"/>"#);
        assert_eq!(found[0].node_kind, "from");
    }

    #[test]
    fn test_tags_in_comments_are_ignored() {
        let found = occurrences(
            r#"<!-- <to uri="direct:old"/> -->
<to uri="direct:new"/>"#,
        );
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].raw_text, "direct:new");
    }

    #[test]
    fn test_other_attributes_are_ignored() {
        let found = occurrences(r#"<to id="a>b" ref="x" uri="log:x"/>"#);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].raw_text, "log:x");
    }

    #[test]
    fn test_escaped_ampersand_is_kept_verbatim() {
        let found = occurrences(r#"<to uri="log:x?a=1&amp;b=2"/>"#);
        assert_eq!(found[0].raw_text, "log:x?a=1&amp;b=2");
    }

    #[test]
    fn test_unterminated_uri_is_reported_and_following_tags_survive() {
        let results = XmlExtractor.extract(
            r#"<to uri="direct:a
<from uri="direct:b"/>"#,
        );

        assert_eq!(results.len(), 2);
        assert!(matches!(
            &results[0],
            Err(ExtractionError::Unterminated { node_kind, .. }) if node_kind == "to"
        ));
        assert!(matches!(&results[1], Ok(o) if o.raw_text == "direct:b"));
    }

    #[test]
    fn test_empty_uri_value() {
        let found = occurrences(r#"<to uri=""/>"#);
        assert_eq!(found[0].raw_text, "");
        assert_eq!(found[0].offset, 9);
    }

    #[test]
    fn test_non_ascii_text_around_tags() {
        let found = occurrences("<!-- é --><to uri=\"direct:ü\"/>");
        assert_eq!(found[0].raw_text, "direct:ü");
    }
}
