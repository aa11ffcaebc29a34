//! The endpoint URI model.
//!
//! [`parse_uri`] turns a raw URI substring such as `timer:foo?period=500` into a
//! [`UriInstance`]: a scheme, positional path parameters and query parameters,
//! each anchored to absolute byte ranges of the owning document.
//!
//! Parsing never fails. Incomplete text (a scheme still being typed, a trailing
//! `/` or `&`, a key without `=`) degrades to a partial structure so completion
//! and diagnostics keep working while the user edits.
//!
//! ```text
//! timer:foo?period=500
//! ^^^^^ ^^^ ^^^^^^ ^^^
//! |     |   |      value
//! |     |   key
//! |     path param (timerName)
//! scheme
//! ```

mod path;
mod query;
mod tokenizer;
mod types;

pub use path::synthetic_name;
pub use types::{
    PathParamInstance, QueryParamInstance, QuerySeparator, Rangeable, SchemeInstance, TextRange,
};

use itertools::Itertools;

use crate::catalog::SchemeLookup;
use crate::semantic::Role;

/// The parsed form of one raw URI occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UriInstance {
    raw_text: String,
    document_offset: usize,
    scheme: SchemeInstance,
    scheme_separator: bool,
    path_params: Vec<PathParamInstance>,
    query: bool,
    query_params: Vec<QueryParamInstance>,
    role: Role,
}

/// Parses `raw_text`, found at `document_offset` in its document.
///
/// The scheme's syntax pattern comes from `lookup`; a miss binds path segments
/// to synthetic names and marks the scheme unknown.
pub fn parse_uri<L>(raw_text: &str, document_offset: usize, lookup: &L) -> UriInstance
where
    L: SchemeLookup + ?Sized,
{
    let tokens = tokenizer::tokenize(raw_text, document_offset);

    let model = tokens
        .scheme_separator
        .then(|| lookup.lookup_scheme(tokens.scheme))
        .flatten();

    let scheme = SchemeInstance {
        name: tokens.scheme.to_string(),
        range: tokens.scheme_range,
        known: model.is_some(),
        syntax: model
            .as_ref()
            .map(|model| model.syntax.clone())
            .unwrap_or_default(),
    };

    let path_params = path::segment_path(tokens.path, tokens.path_start, &scheme.syntax);
    let query_params = tokens
        .query
        .map(|(query, start)| query::segment_query(query, start))
        .unwrap_or_default();

    UriInstance {
        raw_text: raw_text.to_string(),
        document_offset,
        scheme,
        scheme_separator: tokens.scheme_separator,
        path_params,
        query: tokens.query.is_some(),
        query_params,
        role: Role::Unknown,
    }
}

/// A fragment of a [`UriInstance`] located at some offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UriElement<'a> {
    Scheme(&'a SchemeInstance),
    PathParam(&'a PathParamInstance),
    QueryKey(&'a QueryParamInstance),
    QueryValue(&'a QueryParamInstance),
}

impl UriElement<'_> {
    pub fn range(&self) -> TextRange {
        match self {
            UriElement::Scheme(scheme) => scheme.range,
            UriElement::PathParam(param) => param.range,
            UriElement::QueryKey(param) => param.key_range,
            UriElement::QueryValue(param) => param.value_range,
        }
    }
}

impl UriInstance {
    /// Returns a copy carrying the role of the syntax node that owns this URI.
    pub fn with_role(self, role: Role) -> UriInstance {
        UriInstance { role, ..self }
    }

    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    pub fn document_offset(&self) -> usize {
        self.document_offset
    }

    pub fn scheme(&self) -> &SchemeInstance {
        &self.scheme
    }

    pub fn path_params(&self) -> &[PathParamInstance] {
        &self.path_params
    }

    pub fn query_params(&self) -> &[QueryParamInstance] {
        &self.query_params
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn has_scheme_separator(&self) -> bool {
        self.scheme_separator
    }

    pub fn has_query(&self) -> bool {
        self.query
    }

    /// Start of the path part; meaningful only once the scheme separator is typed.
    pub fn path_start(&self) -> usize {
        self.scheme.range.end + 1
    }

    pub fn query_param<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a QueryParamInstance> + 'a {
        self.query_params.iter().filter(move |param| param.key == key)
    }

    /// Every fragment, in textual order.
    pub fn elements(&self) -> impl Iterator<Item = UriElement<'_>> {
        std::iter::once(UriElement::Scheme(&self.scheme))
            .chain(self.path_params.iter().map(UriElement::PathParam))
            .chain(self.query_params.iter().flat_map(|param| {
                std::iter::once(UriElement::QueryKey(param))
                    .chain(param.assignment.then_some(UriElement::QueryValue(param)))
            }))
    }

    /// The innermost fragment at the absolute document `offset`.
    ///
    /// A fragment ending at `offset` wins over one starting there, so a cursor
    /// placed right after a token resolves to that token. Returns `None` inside a
    /// separator that no fragment touches, i.e. where a new token would start.
    /// The XML escaped query separator `&amp;` counts as one separator, so the
    /// offsets inside `amp;` resolve to nothing.
    pub fn element_at(&self, offset: usize) -> Option<UriElement<'_>> {
        self.elements()
            .filter(|element| element.range().touches(offset))
            .min_by_key(|element| {
                let range = element.range();
                (range.end != offset, range.len())
            })
    }

    /// Rebuilds the URI text from its parsed fragments.
    pub fn to_uri_string(&self) -> String {
        let mut uri = self.scheme.name.clone();
        if self.scheme_separator {
            uri.push(':');
        }
        uri.push_str(&self.path_params.iter().map(|param| &param.value).join("/"));
        if self.query {
            uri.push('?');
            for param in &self.query_params {
                if let Some(separator) = param.separator {
                    uri.push_str(separator.as_str());
                }
                uri.push_str(&param.key);
                if param.assignment {
                    uri.push('=');
                    uri.push_str(&param.value);
                }
            }
        }
        uri
    }
}

impl Rangeable for UriInstance {
    fn range(&self) -> TextRange {
        TextRange::new(
            self.document_offset,
            self.document_offset + self.raw_text.len(),
        )
    }
}
