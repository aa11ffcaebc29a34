//! Core types for parsed endpoint URIs.
//!
//! This module contains the building blocks a [`super::UriInstance`] is made of:
//! - `TextRange`: a half-open byte range in the owning document
//! - `SchemeInstance`, `PathParamInstance`, `QueryParamInstance`: the parsed fragments
//! - `Rangeable`: shared range queries for every fragment

use std::ops::Range;

use crate::catalog::SyntaxSlot;

/// A half-open byte range `[start, end)` in the owning document.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
pub struct TextRange {
    pub start: usize,
    pub end: usize,
}

impl TextRange {
    pub fn new(start: usize, end: usize) -> TextRange {
        debug_assert!(start <= end, "range start after end: {start}..{end}");
        TextRange { start, end }
    }

    /// An empty range sitting at `offset`.
    pub fn empty(offset: usize) -> TextRange {
        TextRange::new(offset, offset)
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Strict containment: `start <= offset < end`.
    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }

    /// Containment including the end boundary, i.e. a cursor placed right after the range.
    pub fn touches(&self, offset: usize) -> bool {
        self.start <= offset && offset <= self.end
    }

    pub fn contains_range(&self, other: TextRange) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

impl From<Range<usize>> for TextRange {
    fn from(range: Range<usize>) -> Self {
        TextRange::new(range.start, range.end)
    }
}

impl From<TextRange> for Range<usize> {
    fn from(range: TextRange) -> Self {
        range.start..range.end
    }
}

/// Trait for fragments that occupy a range of the document.
pub trait Rangeable {
    fn range(&self) -> TextRange;

    fn includes(&self, other: &impl Rangeable) -> bool {
        self.range().contains_range(other.range())
    }

    fn includes_offset(&self, offset: usize) -> bool {
        self.range().touches(offset)
    }
}

/// The component name prefix of an endpoint URI (`timer` in `timer:foo`).
#[derive(Debug, Default, PartialEq, Eq, Clone)]
pub struct SchemeInstance {
    pub name: String,
    pub range: TextRange,
    /// Whether the catalog has an entry for `name`.
    pub known: bool,
    /// Declared path slots; empty for unknown schemes.
    pub syntax: Vec<SyntaxSlot>,
}

impl SchemeInstance {
    pub fn is_known(&self) -> bool {
        self.known
    }
}

impl Rangeable for SchemeInstance {
    fn range(&self) -> TextRange {
        self.range
    }
}

/// One positional path segment, bound to a syntax slot or given a synthetic name.
#[derive(Debug, Default, PartialEq, Eq, Clone)]
pub struct PathParamInstance {
    pub name: String,
    pub value: String,
    pub range: TextRange,
}

impl Rangeable for PathParamInstance {
    fn range(&self) -> TextRange {
        self.range
    }
}

/// The text separating a query parameter from the previous one.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum QuerySeparator {
    /// A bare `&`
    Ampersand,
    /// `&amp;`, as written inside XML attributes
    XmlAmpersand,
}

impl QuerySeparator {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuerySeparator::Ampersand => "&",
            QuerySeparator::XmlAmpersand => "&amp;",
        }
    }
}

/// One `key=value` pair after the `?`.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct QueryParamInstance {
    pub key: String,
    pub value: String,
    pub key_range: TextRange,
    /// Empty and positioned at the key end when the chunk has no `=`.
    pub value_range: TextRange,
    /// Whether the chunk contains `=`; `flag` and `flag=` are different texts.
    pub assignment: bool,
    /// `None` for the first parameter.
    pub separator: Option<QuerySeparator>,
}

impl QueryParamInstance {
    /// The value with percent-encoding removed; the raw value if it is not valid UTF-8 once decoded.
    pub fn decoded_value(&self) -> String {
        urlencoding::decode(&self.value)
            .map(|decoded| decoded.into_owned())
            .unwrap_or_else(|_| self.value.clone())
    }
}

impl Rangeable for QueryParamInstance {
    fn range(&self) -> TextRange {
        TextRange::new(self.key_range.start, self.value_range.end.max(self.key_range.end))
    }
}
