//! Per-request view of one document: its URI index plus the catalog and
//! settings it was built with.

use tracing::warn;

use crate::catalog::Catalog;
use crate::config::Settings;
use crate::document::Document;
use crate::extract::extractor_for;
use crate::index::{DocumentUriIndex, IndexedUri};
use crate::semantic::Classifier;
use tower_lsp::lsp_types::Position;

pub struct Analysis<'a> {
    pub document: &'a Document,
    pub catalog: &'a Catalog,
    pub settings: &'a Settings,
    pub classifier: Classifier,
    pub index: DocumentUriIndex,
}

impl<'a> Analysis<'a> {
    pub fn new(document: &'a Document, catalog: &'a Catalog, settings: &'a Settings) -> Analysis<'a> {
        let classifier = Classifier::from_settings(settings);
        let index = DocumentUriIndex::build(
            document.text(),
            extractor_for(document.kind()),
            catalog,
            &classifier,
        );

        for skipped in index.skipped() {
            warn!("Skipping endpoint in {}: {skipped}", document.url());
        }

        Analysis {
            document,
            catalog,
            settings,
            classifier,
            index,
        }
    }

    /// Byte offset of `position` together with the URI under it.
    pub fn uri_at(&self, position: Position) -> Option<(usize, &IndexedUri)> {
        let offset = self.document.offset_at(position)?;
        Some((offset, self.index.uri_at(offset)?))
    }
}
