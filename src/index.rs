//! Every endpoint URI of one document, keyed by owning node.
//!
//! The index is rebuilt from the current text on every request and never
//! patched. Occurrences the extractor could not deliver, or that do not fit the
//! document, are kept aside in [`DocumentUriIndex::skipped`] instead of failing
//! the build.

use std::collections::BTreeMap;

use crate::catalog::SchemeLookup;
use crate::extract::{ExtractionError, Extractor, NodeId};
use crate::semantic::Classifier;
use crate::uri::{parse_uri, Rangeable, TextRange, UriInstance};

/// A parsed URI together with the node that owns it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedUri {
    pub node: NodeId,
    pub node_kind: String,
    pub node_range: TextRange,
    pub uri: UriInstance,
}

#[derive(Debug, Clone, Default)]
pub struct DocumentUriIndex {
    entries: BTreeMap<NodeId, IndexedUri>,
    skipped: Vec<ExtractionError>,
}

impl DocumentUriIndex {
    pub fn build<E, L>(
        text: &str,
        extractor: &E,
        lookup: &L,
        classifier: &Classifier,
    ) -> DocumentUriIndex
    where
        E: Extractor + ?Sized,
        L: SchemeLookup + ?Sized,
    {
        let mut index = DocumentUriIndex::default();

        for occurrence in extractor.extract(text) {
            let occurrence = match occurrence {
                Ok(occurrence) => occurrence,
                Err(err) => {
                    index.skipped.push(err);
                    continue;
                }
            };

            let end = occurrence.offset.saturating_add(occurrence.raw_text.len());
            if text.get(occurrence.offset..end) != Some(occurrence.raw_text.as_str()) {
                index.skipped.push(ExtractionError::OutOfBounds {
                    offset: occurrence.offset,
                    len: occurrence.raw_text.len(),
                    doc_len: text.len(),
                });
                continue;
            }

            if index.entries.contains_key(&occurrence.node) {
                index
                    .skipped
                    .push(ExtractionError::DuplicateNode(occurrence.node.0));
                continue;
            }

            let uri = parse_uri(&occurrence.raw_text, occurrence.offset, lookup)
                .with_role(classifier.classify_role(&occurrence.node_kind));

            index.entries.insert(
                occurrence.node,
                IndexedUri {
                    node: occurrence.node,
                    node_kind: occurrence.node_kind,
                    node_range: occurrence.node_range,
                    uri,
                },
            );
        }

        index
    }

    /// Entries in document order.
    pub fn iter(&self) -> impl Iterator<Item = &IndexedUri> {
        self.entries.values()
    }

    pub fn get(&self, node: NodeId) -> Option<&IndexedUri> {
        self.entries.get(&node)
    }

    /// The entry whose raw URI text touches `offset`.
    pub fn uri_at(&self, offset: usize) -> Option<&IndexedUri> {
        self.iter().find(|entry| entry.uri.includes_offset(offset))
    }

    pub fn skipped(&self) -> &[ExtractionError] {
        &self.skipped
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
