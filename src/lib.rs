//! camel-ls: language support for Camel endpoint URIs
//!
//! Endpoint URIs (`timer:tick?period=500`, `direct:orders`) appear in XML
//! routes, `.properties` connector configurations and `camel-k:` modelines.
//! This crate parses them against a component catalog and answers LSP
//! requests about them.
//!
//! # Architecture
//!
//! - [`uri`]: tokenizes one URI text into scheme, path and query fragments
//! - [`catalog`]: component descriptors with their path slots and options
//! - [`extract`]: finds URI occurrences in each document kind
//! - [`index`]: the per-document index of parsed URIs, keyed by owning node
//! - [`semantic`]: producer/consumer roles and local-channel schemes
//! - [`references`]: pairs producers and consumers of a local channel
//!
//! ```ignore
//! use camel_ls::{analysis::Analysis, catalog::Catalog, config::Settings, document::Document};
//!
//! let settings = Settings::default();
//! let catalog = Catalog::from_settings(&settings);
//! let document = Document::new(url, text, 0);
//! let analysis = Analysis::new(&document, &catalog, &settings);
//! ```

// Endpoint URI model
pub mod catalog;
pub mod uri;

// Document indexing
pub mod analysis;
pub mod document;
pub mod extract;
pub mod index;
pub mod modeline;
pub mod semantic;

// LSP feature modules
pub mod codeactions;
pub mod completion;
pub mod diagnostics;
pub mod hover;
pub mod references;
pub mod symbol;

// Configuration and server
pub mod config;
pub mod server;

// Test utilities (only available in test builds)
#[cfg(test)]
pub mod test_utils;
