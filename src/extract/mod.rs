//! Locating endpoint URIs inside host files.
//!
//! Each format implements [`Extractor`]. An extractor reports one result per
//! occurrence it finds, so a single malformed attribute never hides the rest of
//! the document.

mod properties;
mod xml;

pub use properties::{parse_entries, PropertiesExtractor, PropertyEntry};
pub use xml::XmlExtractor;

use thiserror::Error;

use crate::document::DocumentKind;
use crate::uri::TextRange;

/// Identity of the syntax node owning a URI; ordered by document position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub usize);

/// One raw URI found in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occurrence {
    pub node: NodeId,
    /// Element name or property key, e.g. `from`, `to`, `camel.sink.url`
    pub node_kind: String,
    pub node_range: TextRange,
    pub raw_text: String,
    /// Byte offset of `raw_text` in the document
    pub offset: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    #[error("unterminated `{attribute}` value on <{node_kind}> at offset {offset}")]
    Unterminated {
        node_kind: String,
        attribute: String,
        offset: usize,
    },
    #[error("occurrence at {offset} with length {len} exceeds document length {doc_len}")]
    OutOfBounds {
        offset: usize,
        len: usize,
        doc_len: usize,
    },
    #[error("node {0} owns more than one URI")]
    DuplicateNode(usize),
}

pub trait Extractor {
    fn extract(&self, text: &str) -> Vec<Result<Occurrence, ExtractionError>>;
}

impl<F> Extractor for F
where
    F: Fn(&str) -> Vec<Result<Occurrence, ExtractionError>>,
{
    fn extract(&self, text: &str) -> Vec<Result<Occurrence, ExtractionError>> {
        self(text)
    }
}

/// Extractor for documents whose only structure is modeline comments.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoUris;

impl Extractor for NoUris {
    fn extract(&self, _text: &str) -> Vec<Result<Occurrence, ExtractionError>> {
        Vec::new()
    }
}

pub fn extractor_for(kind: DocumentKind) -> &'static dyn Extractor {
    match kind {
        DocumentKind::Xml => &XmlExtractor,
        DocumentKind::Properties => &PropertiesExtractor,
        DocumentKind::Modeline => &NoUris,
    }
}
