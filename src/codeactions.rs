//! Quick fixes for misspelled query parameter names.

use std::collections::HashMap;

use tower_lsp::lsp_types::{
    CodeAction, CodeActionKind, CodeActionOrCommand, CodeActionParams, Diagnostic, NumberOrString,
    TextEdit, WorkspaceEdit,
};
use tracing::debug;

use crate::analysis::Analysis;
use crate::catalog::{ComponentModel, SchemeLookup};
use crate::diagnostics::UNKNOWN_PROPERTY;

/// Keys scoring below this are not offered as replacements.
const MIN_SIMILARITY: f64 = 0.7;

pub fn code_actions(analysis: &Analysis, params: &CodeActionParams) -> Option<Vec<CodeActionOrCommand>> {
    if let Some(only) = &params.context.only {
        if !only
            .iter()
            .any(|kind| *kind == CodeActionKind::QUICKFIX || *kind == CodeActionKind::EMPTY)
        {
            return None;
        }
    }

    let actions = params
        .context
        .diagnostics
        .iter()
        .filter(|diag| matches!(&diag.code, Some(NumberOrString::String(code)) if code == UNKNOWN_PROPERTY))
        .filter_map(|diag| replace_unknown_key(analysis, diag))
        .map(CodeActionOrCommand::CodeAction)
        .collect();

    Some(actions)
}

fn replace_unknown_key(analysis: &Analysis, diag: &Diagnostic) -> Option<CodeAction> {
    let Some(range) = analysis.document.text_range(diag.range) else {
        debug!("Ignoring diagnostic with a stale range: {:?}", diag.range);
        return None;
    };
    let entry = analysis.index.uri_at(range.start)?;
    let param = entry
        .uri
        .query_params()
        .iter()
        .find(|param| param.key_range == range)?;
    let model = analysis.catalog.lookup_scheme(&entry.uri.scheme().name)?;

    let present: Vec<&str> = entry
        .uri
        .query_params()
        .iter()
        .map(|param| param.key.as_str())
        .collect();
    let replacement = closest_key(&model, &param.key, &present)?;

    let edit = TextEdit {
        range: diag.range,
        new_text: replacement.to_string(),
    };

    Some(CodeAction {
        title: format!("Change to '{replacement}'"),
        kind: Some(CodeActionKind::QUICKFIX),
        diagnostics: Some(vec![diag.clone()]),
        edit: Some(WorkspaceEdit {
            changes: Some(HashMap::from([(analysis.document.url().clone(), vec![edit])])),
            ..Default::default()
        }),
        is_preferred: Some(true),
        ..Default::default()
    })
}

/// Most similar parameter name not already used by the URI.
fn closest_key<'m>(model: &'m ComponentModel, key: &str, present: &[&str]) -> Option<&'m str> {
    let wanted = key.to_lowercase();
    model
        .query_params
        .keys()
        .filter(|candidate| !present.contains(&candidate.as_str()))
        .map(|candidate| {
            let score = strsim::jaro_winkler(&wanted, &candidate.to_lowercase());
            (candidate.as_str(), score)
        })
        .filter(|(_, score)| *score >= MIN_SIMILARITY)
        .max_by(|(_, a), (_, b)| a.total_cmp(b))
        .map(|(candidate, _)| candidate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::config::Settings;
    use crate::diagnostics::diagnostics;
    use crate::test_utils::test_document;
    use tower_lsp::lsp_types::{
        CodeActionContext, PartialResultParams, Position, Range, TextDocumentIdentifier,
        WorkDoneProgressParams,
    };

    fn run(text: &str, only: Option<Vec<CodeActionKind>>) -> Option<Vec<CodeActionOrCommand>> {
        let document = test_document("routes.xml", text);
        let catalog = Catalog::builtin();
        let settings = Settings::default();
        let analysis = Analysis::new(&document, &catalog, &settings);
        let params = CodeActionParams {
            text_document: TextDocumentIdentifier {
                uri: document.url().clone(),
            },
            range: Range::default(),
            context: CodeActionContext {
                diagnostics: diagnostics(&analysis),
                only,
                trigger_kind: None,
            },
            work_done_progress_params: WorkDoneProgressParams::default(),
            partial_result_params: PartialResultParams::default(),
        };
        code_actions(&analysis, &params)
    }

    fn edits(action: &CodeActionOrCommand) -> Vec<TextEdit> {
        match action {
            CodeActionOrCommand::CodeAction(action) => action
                .edit
                .as_ref()
                .and_then(|edit| edit.changes.as_ref())
                .map(|changes| changes.values().flatten().cloned().collect())
                .unwrap_or_default(),
            CodeActionOrCommand::Command(_) => Vec::new(),
        }
    }

    #[test]
    fn test_misspelled_key_is_replaced() {
        let actions = run(r#"<from uri="timer:foo?perod=500"/>"#, None).unwrap();
        assert_eq!(actions.len(), 1);
        let edits = edits(&actions[0]);
        assert_eq!(edits[0].new_text, "period");
        assert_eq!(edits[0].range.start, Position { line: 0, character: 21 });
    }

    #[test]
    fn test_present_keys_are_not_suggested() {
        let actions = run(r#"<from uri="timer:foo?period=1&amp;perod=500"/>"#, None).unwrap();
        let suggested: Vec<String> = actions
            .iter()
            .flat_map(edits)
            .map(|edit| edit.new_text)
            .collect();
        assert!(!suggested.contains(&"period".to_string()));
    }

    #[test]
    fn test_nothing_similar() {
        let actions = run(r#"<from uri="timer:foo?zzzzzz=1"/>"#, None).unwrap();
        assert!(actions.is_empty());
    }

    #[test]
    fn test_respects_requested_kinds() {
        let text = r#"<from uri="timer:foo?perod=500"/>"#;
        assert!(run(text, Some(vec![CodeActionKind::REFACTOR])).is_none());
        assert_eq!(run(text, Some(vec![CodeActionKind::QUICKFIX])).unwrap().len(), 1);
    }
}
