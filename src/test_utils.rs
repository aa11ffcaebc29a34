//! Shared test utilities for camel-ls.
//!
//! This module provides common helpers used across multiple test modules.
//! It is only compiled when running tests.

use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;
use tower_lsp::lsp_types::Url;

use crate::catalog::Catalog;
use crate::document::Document;

/// The built-in catalog; knows `direct`, `direct-vm`, `seda`, `timer`, `log`, `file` and `kafka`.
pub fn test_catalog() -> Catalog {
    Catalog::builtin()
}

/// Creates a temporary directory for catalog descriptors.
///
/// The descriptors live in a non-hidden `catalog` subdirectory; the `TempDir`
/// handle must be kept alive for the duration of the test.
pub fn create_test_catalog_dir() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let catalog_dir = temp_dir.path().join("catalog");
    fs::create_dir(&catalog_dir).expect("Failed to create catalog subdirectory");
    (temp_dir, catalog_dir)
}

/// A document snapshot named `file:///test/<name>`; the extension picks the document kind.
pub fn test_document(name: &str, text: &str) -> Document {
    let url = Url::parse(&format!("file:///test/{name}")).expect("Invalid test document name");
    Document::new(url, text, 0)
}
