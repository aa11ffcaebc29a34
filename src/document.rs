//! Immutable text snapshots and LSP coordinate conversion.

use std::path::Path;

use ropey::Rope;
use tower_lsp::lsp_types::{Position, Range, Url};

use crate::uri::TextRange;

/// How endpoint URIs are embedded in a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// `uri` attributes of XML route elements
    Xml,
    /// `.properties` entries
    Properties,
    /// Anything else; only modeline comments are understood
    Modeline,
}

impl DocumentKind {
    pub fn from_path(path: &Path) -> DocumentKind {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("xml") => DocumentKind::Xml,
            Some("properties") => DocumentKind::Properties,
            _ => DocumentKind::Modeline,
        }
    }

    pub fn from_url(url: &Url) -> DocumentKind {
        DocumentKind::from_path(Path::new(url.path()))
    }
}

#[derive(Debug, Clone)]
pub struct Document {
    url: Url,
    text: String,
    rope: Rope,
    kind: DocumentKind,
    version: i32,
}

impl Document {
    pub fn new(url: Url, text: impl Into<String>, version: i32) -> Document {
        let text = text.into();
        Document {
            kind: DocumentKind::from_url(&url),
            rope: Rope::from_str(&text),
            url,
            text,
            version,
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    pub fn version(&self) -> i32 {
        self.version
    }

    /// Byte offset of an LSP position; `None` past the end of its line.
    pub fn offset_at(&self, position: Position) -> Option<usize> {
        let line_start = self.rope.try_line_to_char(position.line as usize).ok()?;
        let line = self.rope.get_line(position.line as usize)?;
        let character = position.character as usize;
        if character > line.len_chars() {
            return None;
        }
        self.rope.try_char_to_byte(line_start + character).ok()
    }

    /// LSP position of a byte offset, clamped to the end of the text.
    pub fn position_at(&self, offset: usize) -> Position {
        let char_index = self.rope.byte_to_char(offset.min(self.text.len()));
        let line = self.rope.char_to_line(char_index);
        let character = char_index - self.rope.line_to_char(line);

        Position {
            line: line as u32,
            character: character as u32,
        }
    }

    pub fn lsp_range(&self, range: TextRange) -> Range {
        Range {
            start: self.position_at(range.start),
            end: self.position_at(range.end),
        }
    }

    pub fn text_range(&self, range: Range) -> Option<TextRange> {
        let start = self.offset_at(range.start)?;
        let end = self.offset_at(range.end)?;
        (start <= end).then(|| TextRange::new(start, end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn doc(name: &str, text: &str) -> Document {
        Document::new(Url::parse(&format!("file:///tmp/{name}")).unwrap(), text, 0)
    }

    #[rstest]
    #[case("routes.xml", DocumentKind::Xml)]
    #[case("application.properties", DocumentKind::Properties)]
    #[case("Route.java", DocumentKind::Modeline)]
    #[case("integration.groovy", DocumentKind::Modeline)]
    fn test_kind_from_extension(#[case] name: &str, #[case] kind: DocumentKind) {
        assert_eq!(doc(name, "").kind(), kind);
    }

    #[test]
    fn test_offset_position_round_trip() {
        let document = doc("a.xml", "<from uri=\"direct:a\"/>\n<to uri=\"é:x\"/>\n");
        let position = Position {
            line: 1,
            character: 10,
        };
        let offset = document.offset_at(position).unwrap();
        // 'é' is two bytes wide
        assert_eq!(&document.text()[offset..offset + 1], ":");
        assert_eq!(document.position_at(offset), position);
    }

    #[test]
    fn test_offset_past_line_end_is_none() {
        let document = doc("a.xml", "ab\ncd");
        assert!(document
            .offset_at(Position {
                line: 0,
                character: 9
            })
            .is_none());
        assert!(document
            .offset_at(Position {
                line: 7,
                character: 0
            })
            .is_none());
    }

    #[test]
    fn test_text_range_rejects_inverted_ranges() {
        let document = doc("a.xml", "abcdef");
        let range = Range {
            start: Position {
                line: 0,
                character: 4,
            },
            end: Position {
                line: 0,
                character: 1,
            },
        };
        assert!(document.text_range(range).is_none());
    }
}
