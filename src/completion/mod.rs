use tower_lsp::lsp_types::{CompletionItem, CompletionList, CompletionParams, CompletionResponse};
use tracing::debug;

use crate::analysis::Analysis;

use self::channel_completer::ChannelIdCompleter;
use self::component_option_completer::ComponentOptionCompleter;
use self::kamelet_completer::KameletCompleter;
use self::modeline_completer::ModelineCompleter;
use self::modeline_value_completer::ModelineValueCompleter;
use self::query_key_completer::QueryKeyCompleter;
use self::query_value_completer::QueryValueCompleter;
use self::scheme_completer::SchemeCompleter;

mod channel_completer;
mod component_option_completer;
mod kamelet_completer;
mod matcher;
mod modeline_completer;
mod modeline_value_completer;
mod query_key_completer;
mod query_value_completer;
mod scheme_completer;
mod util;

#[derive(Clone, Copy)]
pub struct Context<'a> {
    analysis: &'a Analysis<'a>,
}

pub trait Completer<'a>: Sized {
    /// `offset` is the cursor's byte offset in the document.
    fn construct(context: Context<'a>, offset: usize) -> Option<Self>
    where
        Self: Sized + Completer<'a>;

    fn completions(&self) -> Vec<impl Completable<'a, Self>>
    where
        Self: Sized;

    type FilterParams<'p>;
    /// Completers like nvim-cmp are odd so manually define the filter text as a situational workaround
    fn completion_filter_text(&self, params: Self::FilterParams<'_>) -> String;
}

pub trait Completable<'a, T: Completer<'a>>: Sized {
    fn completions(&self, completer: &T) -> Option<CompletionItem>;
}

pub fn get_completions(analysis: &Analysis, params: &CompletionParams) -> Option<CompletionResponse> {
    let offset = analysis
        .document
        .offset_at(params.text_document_position.position)?;
    let completion_context = Context { analysis };
    debug!("Completing {} at offset {offset}", analysis.document.url());

    run_completer::<ModelineCompleter>(completion_context, offset)
        .or_else(|| run_completer::<ModelineValueCompleter>(completion_context, offset))
        .or_else(|| run_completer::<ComponentOptionCompleter>(completion_context, offset))
        .or_else(|| run_completer::<QueryValueCompleter>(completion_context, offset))
        .or_else(|| run_completer::<QueryKeyCompleter>(completion_context, offset))
        .or_else(|| run_completer::<KameletCompleter>(completion_context, offset))
        .or_else(|| run_completer::<ChannelIdCompleter>(completion_context, offset))
        .or_else(|| run_completer::<SchemeCompleter>(completion_context, offset))
}

fn run_completer<'a, T: Completer<'a>>(
    context: Context<'a>,
    offset: usize,
) -> Option<CompletionResponse> {
    let completer = T::construct(context, offset)?;
    let completions = completer.completions();

    let completions = completions
        .into_iter()
        .take(context.analysis.settings.completion_limit)
        .flat_map(|completable| completable.completions(&completer))
        .collect::<Vec<CompletionItem>>();

    Some(CompletionResponse::List(CompletionList {
        is_incomplete: true,
        items: completions,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    use crate::catalog::Catalog;
    use crate::config::Settings;
    use crate::document::Document;
    use crate::test_utils::test_document;
    use tower_lsp::lsp_types::{
        CompletionItemTag, CompletionTextEdit, PartialResultParams, Position,
        TextDocumentIdentifier, TextDocumentPositionParams, Url, WorkDoneProgressParams,
    };

    /// Splits the `|` cursor marker out of `marked`.
    fn cursor(marked: &str) -> (usize, String) {
        let offset = marked.find('|').expect("missing cursor marker");
        (offset, marked.replacen('|', "", 1))
    }

    /// Completes at the `|` marker, which is removed from the text.
    pub(super) fn complete_with(name: &str, marked: &str, settings: &Settings) -> Vec<CompletionItem> {
        let (offset, text) = cursor(marked);
        complete_document(&test_document(name, &text), offset, settings)
    }

    /// Like [`complete`], for a document stored at `path` on disk.
    pub(super) fn complete_in_file(path: &Path, marked: &str) -> Vec<CompletionItem> {
        let (offset, text) = cursor(marked);
        let document = Document::new(Url::from_file_path(path).unwrap(), text, 0);
        complete_document(&document, offset, &Settings::default())
    }

    fn complete_document(document: &Document, offset: usize, settings: &Settings) -> Vec<CompletionItem> {
        let catalog = Catalog::builtin();
        let analysis = Analysis::new(document, &catalog, settings);

        let params = CompletionParams {
            text_document_position: TextDocumentPositionParams {
                text_document: TextDocumentIdentifier {
                    uri: document.url().clone(),
                },
                position: document.position_at(offset),
            },
            work_done_progress_params: WorkDoneProgressParams::default(),
            partial_result_params: PartialResultParams::default(),
            context: None,
        };

        match get_completions(&analysis, &params) {
            Some(CompletionResponse::List(list)) => list.items,
            Some(CompletionResponse::Array(items)) => items,
            None => Vec::new(),
        }
    }

    pub(super) fn complete(name: &str, marked: &str) -> Vec<CompletionItem> {
        complete_with(name, marked, &Settings::default())
    }

    pub(super) fn labels(items: &[CompletionItem]) -> Vec<&str> {
        items.iter().map(|item| item.label.as_str()).collect()
    }

    pub(super) fn new_text(item: &CompletionItem) -> &str {
        match &item.text_edit {
            Some(CompletionTextEdit::Edit(edit)) => &edit.new_text,
            _ => panic!("expected a text edit"),
        }
    }

    #[test]
    fn test_nothing_outside_uris() {
        assert!(complete("routes.xml", "<route>|</route>").is_empty());
    }

    #[test]
    fn test_completion_limit() {
        let settings = Settings {
            completion_limit: 2,
            ..Settings::default()
        };
        assert_eq!(complete_with("routes.xml", "<to uri=\"|\"/>", &settings).len(), 2);
    }

    #[test]
    fn test_deprecated_items_are_tagged() {
        let items = complete("routes.xml", "<from uri=\"timer:t?pat|\"/>");
        let pattern = items.iter().find(|item| item.label == "pattern").unwrap();
        assert_eq!(pattern.tags, Some(vec![CompletionItemTag::DEPRECATED]));
    }

    #[test]
    fn test_edit_range_is_the_token_under_cursor() {
        let items = complete("routes.xml", "<to uri=\"log:x?lev|\"/>");
        let level = items.iter().find(|item| item.label == "level").unwrap();
        match &level.text_edit {
            Some(CompletionTextEdit::Edit(edit)) => {
                assert_eq!(edit.range.start, Position { line: 0, character: 15 });
                assert_eq!(edit.range.end, Position { line: 0, character: 18 });
            }
            _ => panic!("expected a text edit"),
        }
    }
}
