//! Document outline.
//!
//! | Symbol | LSP Kind | Example |
//! |--------|----------|---------|
//! | Endpoint URI | `Event` | `<from uri="timer:tick"/>` |
//! | Connector class | `Class` | `connector.class=org.acme.TimerSourceConnector` |
//! | Connector path option | `Field` | `camel.source.path.timerName=tick` |
//! | Connector endpoint option | `Constant` | `camel.source.endpoint.period=500` |
//! | Modeline option | `Property` | `// camel-k: dependency=mvn:org.acme:lib` |
//!
//! Connector options nest under the connector class when the file declares
//! one. Symbols come back in document order.

use tower_lsp::lsp_types::{DocumentSymbol, DocumentSymbolResponse, SymbolKind};

use crate::analysis::Analysis;
use crate::uri::Rangeable;
use crate::document::DocumentKind;
use crate::extract::{parse_entries, PropertyEntry};
use crate::modeline::parse_modelines;
use crate::uri::TextRange;

const CONNECTOR_CLASS: &str = "connector.class";
const PATH_PREFIXES: [&str; 2] = ["camel.sink.path.", "camel.source.path."];
const ENDPOINT_PREFIXES: [&str; 2] = ["camel.sink.endpoint.", "camel.source.endpoint."];

/// Internal representation of a symbol before range conversion.
#[derive(Debug)]
struct FlatSymbol {
    name: String,
    kind: SymbolKind,
    range: TextRange,
    selection_range: TextRange,
    detail: Option<String>,
    children: Vec<FlatSymbol>,
}

pub fn document_symbol(analysis: &Analysis) -> Option<DocumentSymbolResponse> {
    let mut symbols: Vec<FlatSymbol> = analysis
        .index
        .iter()
        .filter(|entry| !entry.uri.raw_text().is_empty())
        .map(|entry| FlatSymbol {
            name: entry.uri.raw_text().to_string(),
            kind: SymbolKind::EVENT,
            range: entry.node_range,
            selection_range: entry.uri.range(),
            detail: Some(entry.node_kind.clone()),
            children: Vec::new(),
        })
        .collect();

    if analysis.document.kind() == DocumentKind::Properties {
        symbols.extend(connector_outline(analysis.document.text()));
    }

    for modeline in parse_modelines(analysis.document.text()) {
        symbols.extend(modeline.options.into_iter().map(|option| FlatSymbol {
            range: option.range(),
            selection_range: option.name_range,
            detail: (!option.value.is_empty()).then_some(option.value),
            name: option.name,
            kind: SymbolKind::PROPERTY,
            children: Vec::new(),
        }));
    }

    if symbols.is_empty() {
        return None;
    }

    symbols.sort_by_key(|symbol| symbol.range.start);

    Some(DocumentSymbolResponse::Nested(
        symbols
            .into_iter()
            .map(|symbol| to_document_symbol(analysis, symbol))
            .collect(),
    ))
}

/// The connector class with its path and endpoint options as children.
///
/// Without a `connector.class` entry the options are returned at top level.
fn connector_outline(text: &str) -> Vec<FlatSymbol> {
    let entries = parse_entries(text);
    let options: Vec<FlatSymbol> = entries.iter().filter_map(connector_option).collect();

    match entries.iter().find(|entry| entry.key == CONNECTOR_CLASS) {
        Some(class) => {
            let simple_name = class
                .value
                .rsplit('.')
                .next()
                .unwrap_or(class.value.as_str());
            vec![FlatSymbol {
                name: simple_name.to_string(),
                kind: SymbolKind::CLASS,
                range: class.line_range,
                selection_range: class.value_range,
                detail: Some(class.value.clone()),
                children: options,
            }]
        }
        None => options,
    }
}

fn connector_option(entry: &PropertyEntry) -> Option<FlatSymbol> {
    let strip = |prefixes: &[&str]| {
        prefixes
            .iter()
            .find_map(|prefix| entry.key.strip_prefix(prefix))
            .filter(|name| !name.is_empty())
    };

    let (name, kind) = match (strip(&PATH_PREFIXES), strip(&ENDPOINT_PREFIXES)) {
        (Some(name), _) => (name, SymbolKind::FIELD),
        (None, Some(name)) => (name, SymbolKind::CONSTANT),
        (None, None) => return None,
    };

    Some(FlatSymbol {
        name: name.to_string(),
        kind,
        range: entry.line_range,
        selection_range: entry.key_range,
        detail: (!entry.value.is_empty()).then(|| entry.value.clone()),
        children: Vec::new(),
    })
}

#[allow(deprecated)] // field deprecated has been deprecated in favor of using tags
fn to_document_symbol(analysis: &Analysis, symbol: FlatSymbol) -> DocumentSymbol {
    let children = symbol
        .children
        .into_iter()
        .map(|child| to_document_symbol(analysis, child))
        .collect::<Vec<_>>();

    DocumentSymbol {
        name: symbol.name,
        kind: symbol.kind,
        range: analysis.document.lsp_range(symbol.range),
        selection_range: analysis.document.lsp_range(symbol.selection_range),
        detail: symbol.detail,
        deprecated: None,
        tags: None,
        children: (!children.is_empty()).then_some(children),
    }
}
