//! Shape checks of the endpoint URIs of one document.
//!
//! | Check | Severity | Code |
//! |-------|----------|------|
//! | Query key unknown to the scheme | `ERROR` | [`UNKNOWN_PROPERTY`] |
//! | Deprecated query key | `WARNING` | [`DEPRECATED_PROPERTY`] |
//! | Required path parameter missing | `ERROR` | [`MISSING_PATH_PARAM`] |
//! | Local-channel producer without consumer | `INFORMATION` | [`UNRESOLVED_CHANNEL`] |
//! | Unknown scheme (off by default) | `HINT` | [`UNKNOWN_SCHEME`] |
//!
//! Every check has its own switch in [`Settings`](crate::config::Settings).

use tower_lsp::lsp_types::{Diagnostic, DiagnosticSeverity, DiagnosticTag, NumberOrString};

use crate::analysis::Analysis;
use crate::uri::Rangeable;
use crate::catalog::{ComponentModel, SchemeLookup};
use crate::index::IndexedUri;
use crate::references::find_references;
use crate::semantic::{channel_identifier, Role};
use crate::uri::TextRange;

pub const SOURCE: &str = "camel-ls";

pub const UNKNOWN_PROPERTY: &str = "camel.unknown.property";
pub const DEPRECATED_PROPERTY: &str = "camel.deprecated.property";
pub const MISSING_PATH_PARAM: &str = "camel.missing.path";
pub const UNRESOLVED_CHANNEL: &str = "camel.unresolved.channel";
pub const UNKNOWN_SCHEME: &str = "camel.unknown.scheme";

pub fn diagnostics(analysis: &Analysis) -> Vec<Diagnostic> {
    analysis
        .index
        .iter()
        .flat_map(|entry| entry_diagnostics(analysis, entry))
        .collect()
}

fn entry_diagnostics(analysis: &Analysis, entry: &IndexedUri) -> Vec<Diagnostic> {
    let settings = analysis.settings;
    let uri = &entry.uri;
    let scheme = uri.scheme();
    let mut diags = Vec::new();

    if !uri.has_scheme_separator() {
        return diags;
    }

    let Some(model) = analysis.catalog.lookup_scheme(&scheme.name) else {
        if settings.unknown_scheme_diagnostics {
            diags.push(diagnostic(
                analysis,
                scheme.range,
                DiagnosticSeverity::HINT,
                UNKNOWN_SCHEME,
                format!("Unknown component scheme '{}'", scheme.name),
            ));
        }
        return diags;
    };

    if settings.required_path_diagnostics {
        diags.extend(missing_path_params(analysis, entry, &model));
    }

    for param in uri.query_params().iter().filter(|param| !param.key.is_empty()) {
        match model.query_params.get(&param.key) {
            None if settings.unknown_property_diagnostics => diags.push(diagnostic(
                analysis,
                param.key_range,
                DiagnosticSeverity::ERROR,
                UNKNOWN_PROPERTY,
                format!("Unknown option '{}' for component '{}'", param.key, scheme.name),
            )),
            Some(metadata) if metadata.deprecated && settings.deprecated_diagnostics => {
                let mut message = format!("Option '{}' is deprecated", param.key);
                if !metadata.deprecation_note.is_empty() {
                    message = format!("{message}: {}", metadata.deprecation_note);
                }
                diags.push(Diagnostic {
                    tags: Some(vec![DiagnosticTag::DEPRECATED]),
                    ..diagnostic(
                        analysis,
                        param.key_range,
                        DiagnosticSeverity::WARNING,
                        DEPRECATED_PROPERTY,
                        message,
                    )
                });
            }
            _ => {}
        }
    }

    if settings.unresolved_channel_diagnostics && uri.role() == Role::Producer {
        if let Some(identifier) = channel_identifier(uri) {
            let local = analysis.classifier.is_local_channel_scheme(&scheme.name);
            if local && find_references(uri, &analysis.index, &analysis.classifier).is_empty() {
                diags.push(diagnostic(
                    analysis,
                    uri.range(),
                    DiagnosticSeverity::INFORMATION,
                    UNRESOLVED_CHANNEL,
                    format!(
                        "No consumer of '{}:{identifier}' in this document",
                        scheme.name
                    ),
                ));
            }
        }
    }

    diags
}

fn missing_path_params(
    analysis: &Analysis,
    entry: &IndexedUri,
    model: &ComponentModel,
) -> Vec<Diagnostic> {
    let uri = &entry.uri;
    model
        .syntax
        .iter()
        .take(model.bound_slots)
        .enumerate()
        .filter(|(_, slot)| slot.required)
        .filter(|(index, _)| {
            uri.path_params()
                .get(*index)
                .map_or(true, |param| param.value.is_empty())
        })
        .map(|(_, slot)| {
            diagnostic(
                analysis,
                uri.scheme().range,
                DiagnosticSeverity::ERROR,
                MISSING_PATH_PARAM,
                format!(
                    "Missing required path parameter '{}' for component '{}'",
                    slot.name,
                    uri.scheme().name
                ),
            )
        })
        .collect()
}

fn diagnostic(
    analysis: &Analysis,
    range: TextRange,
    severity: DiagnosticSeverity,
    code: &str,
    message: String,
) -> Diagnostic {
    Diagnostic {
        range: analysis.document.lsp_range(range),
        severity: Some(severity),
        code: Some(NumberOrString::String(code.to_string())),
        source: Some(SOURCE.into()),
        message,
        ..Default::default()
    }
}
