//! The `tower-lsp` backend.
//!
//! Open documents are kept as full-text snapshots. Every request builds a
//! fresh [`Analysis`] of the requested document against the current catalog
//! and settings.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::RwLock;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer};
use tracing::{debug, info, warn};

use crate::analysis::Analysis;
use crate::catalog::Catalog;
use crate::codeactions::code_actions;
use crate::completion::get_completions;
use crate::config::Settings;
use crate::diagnostics::diagnostics;
use crate::document::Document;
use crate::hover::hover;
use crate::references::references;
use crate::symbol::document_symbol;

/// Settings with the catalog built from them.
struct State {
    settings: Settings,
    catalog: Catalog,
}

/// What `initialize` told us, kept to rebuild settings on configuration changes.
#[derive(Default)]
struct ClientInit {
    root_dir: Option<PathBuf>,
    capabilities: ClientCapabilities,
}

pub struct CamelLanguageServer {
    client: Client,
    documents: Arc<RwLock<HashMap<Url, Document>>>,
    state: Arc<RwLock<State>>,
    init: Arc<RwLock<ClientInit>>,
    /// Catalog directory given on the command line; wins over settings.
    catalog_override: Option<String>,
}

impl CamelLanguageServer {
    pub fn new(client: Client, catalog_override: Option<String>) -> CamelLanguageServer {
        let settings = Settings {
            catalog_path: catalog_override.clone(),
            ..Settings::default()
        };
        let catalog = Catalog::from_settings(&settings);

        CamelLanguageServer {
            client,
            documents: Arc::new(RwLock::new(HashMap::new())),
            state: Arc::new(RwLock::new(State { settings, catalog })),
            init: Arc::new(RwLock::new(ClientInit::default())),
            catalog_override,
        }
    }

    async fn reload(&self, options: Option<&serde_json::Value>) {
        let init = self.init.read().await;
        let mut settings =
            match Settings::new(init.root_dir.as_deref(), options, &init.capabilities) {
                Ok(settings) => settings,
                Err(err) => {
                    warn!("Invalid settings, using defaults: {err:#}");
                    self.client
                        .log_message(MessageType::WARNING, format!("Invalid settings: {err:#}"))
                        .await;
                    Settings::default()
                }
            };
        if self.catalog_override.is_some() {
            settings.catalog_path = self.catalog_override.clone();
        }

        let catalog = Catalog::from_settings(&settings);
        info!("Catalog loaded with {} components", catalog.len());

        *self.state.write().await = State { settings, catalog };
    }

    /// Runs `f` over a fresh analysis of the document at `url`.
    async fn with_analysis<T>(&self, url: &Url, f: impl FnOnce(&Analysis) -> T) -> Option<T> {
        let documents = self.documents.read().await;
        let Some(document) = documents.get(url) else {
            debug!("Request for unknown document {url}");
            return None;
        };
        let state = self.state.read().await;
        let analysis = Analysis::new(document, &state.catalog, &state.settings);
        Some(f(&analysis))
    }

    async fn publish_diagnostics(&self, url: &Url) {
        let version = self
            .documents
            .read()
            .await
            .get(url)
            .map(|document| document.version());
        if let Some(diags) = self.with_analysis(url, diagnostics).await {
            self.client
                .publish_diagnostics(url.clone(), diags, version)
                .await;
        }
    }

    async fn publish_all_diagnostics(&self) {
        let urls: Vec<Url> = self.documents.read().await.keys().cloned().collect();
        for url in urls {
            self.publish_diagnostics(&url).await;
        }
    }

    async fn update_document(&self, url: Url, text: String, version: i32) {
        let document = Document::new(url.clone(), text, version);
        self.documents.write().await.insert(url.clone(), document);
        self.publish_diagnostics(&url).await;
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for CamelLanguageServer {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        let root_dir = params
            .root_uri
            .as_ref()
            .and_then(|root| root.to_file_path().ok())
            .or_else(|| {
                params
                    .workspace_folders
                    .as_ref()
                    .and_then(|folders| folders.first())
                    .and_then(|folder| folder.uri.to_file_path().ok())
            });

        *self.init.write().await = ClientInit {
            root_dir,
            capabilities: params.capabilities.clone(),
        };
        self.reload(params.initialization_options.as_ref()).await;

        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Kind(
                    TextDocumentSyncKind::FULL,
                )),
                completion_provider: Some(CompletionOptions {
                    resolve_provider: Some(false),
                    trigger_characters: Some(
                        [":", "?", "&", "=", ";"].map(String::from).to_vec(),
                    ),
                    ..Default::default()
                }),
                hover_provider: Some(HoverProviderCapability::Simple(true)),
                references_provider: Some(OneOf::Left(true)),
                document_symbol_provider: Some(OneOf::Left(true)),
                code_action_provider: Some(CodeActionProviderCapability::Options(
                    CodeActionOptions {
                        code_action_kinds: Some(vec![CodeActionKind::QUICKFIX]),
                        ..Default::default()
                    },
                )),
                ..ServerCapabilities::default()
            },
            server_info: Some(ServerInfo {
                name: "camel-ls".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        self.client
            .log_message(MessageType::INFO, "camel-ls initialized")
            .await;
    }

    async fn shutdown(&self) -> Result<()> {
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let TextDocumentItem {
            uri, text, version, ..
        } = params.text_document;
        self.update_document(uri, text, version).await;
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        if let Some(change) = params.content_changes.into_iter().last() {
            self.update_document(
                params.text_document.uri,
                change.text,
                params.text_document.version,
            )
            .await;
        }
    }

    async fn did_save(&self, params: DidSaveTextDocumentParams) {
        match params.text {
            Some(text) => {
                let version = self
                    .documents
                    .read()
                    .await
                    .get(&params.text_document.uri)
                    .map_or(0, |document| document.version());
                self.update_document(params.text_document.uri, text, version)
                    .await;
            }
            None => self.publish_diagnostics(&params.text_document.uri).await,
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let url = params.text_document.uri;
        self.documents.write().await.remove(&url);
        self.client.publish_diagnostics(url, Vec::new(), None).await;
    }

    async fn did_change_configuration(&self, params: DidChangeConfigurationParams) {
        debug!("Configuration changed");
        let options = match params.settings.get("camel") {
            Some(_) => params.settings,
            None => serde_json::json!({ "camel": params.settings }),
        };
        self.reload(Some(&options)).await;
        self.publish_all_diagnostics().await;
    }

    async fn references(&self, params: ReferenceParams) -> Result<Option<Vec<Location>>> {
        let position = params.text_document_position.position;
        Ok(self
            .with_analysis(&params.text_document_position.text_document.uri, |analysis| {
                references(analysis, position)
            })
            .await
            .flatten())
    }

    async fn completion(&self, params: CompletionParams) -> Result<Option<CompletionResponse>> {
        Ok(self
            .with_analysis(&params.text_document_position.text_document.uri, |analysis| {
                get_completions(analysis, &params)
            })
            .await
            .flatten())
    }

    async fn hover(&self, params: HoverParams) -> Result<Option<Hover>> {
        Ok(self
            .with_analysis(
                &params.text_document_position_params.text_document.uri,
                |analysis| hover(analysis, &params),
            )
            .await
            .flatten())
    }

    async fn document_symbol(
        &self,
        params: DocumentSymbolParams,
    ) -> Result<Option<DocumentSymbolResponse>> {
        Ok(self
            .with_analysis(&params.text_document.uri, document_symbol)
            .await
            .flatten())
    }

    async fn code_action(&self, params: CodeActionParams) -> Result<Option<CodeActionResponse>> {
        Ok(self
            .with_analysis(&params.text_document.uri, |analysis| {
                code_actions(analysis, &params)
            })
            .await
            .flatten())
    }
}
