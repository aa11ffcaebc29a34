//! Component-level option names in `.properties` files:
//! `camel.component.timer.inc|` -> `includeMetadata=false`.

use std::borrow::Cow;

use tower_lsp::lsp_types::{CompletionItem, CompletionItemKind};

use crate::catalog::{ComponentModel, ParamMetadata, SchemeLookup};
use crate::document::DocumentKind;
use crate::extract::parse_entries;
use crate::uri::TextRange;

use super::matcher::{fuzzy_match_completions, Matchable};
use super::util::{deprecated_tags, param_documentation, text_edit, typed};
use super::{Completable, Completer, Context};

const COMPONENT_PREFIX: &str = "camel.component.";

pub struct ComponentOptionCompleter<'a> {
    context: Context<'a>,
    model: Cow<'a, ComponentModel>,
    /// Whether the entry already has a `=`/`:` separator or a value
    has_value: bool,
    typed: &'a str,
    range: TextRange,
}

impl<'a> Completer<'a> for ComponentOptionCompleter<'a> {
    fn construct(context: Context<'a>, offset: usize) -> Option<Self>
    where
        Self: Sized + Completer<'a>,
    {
        let document = context.analysis.document;
        if document.kind() != DocumentKind::Properties {
            return None;
        }

        let text = document.text();
        let entry = parse_entries(text)
            .into_iter()
            .find(|entry| entry.key_range.touches(offset))?;
        let (scheme, option) = entry.key.strip_prefix(COMPONENT_PREFIX)?.split_once('.')?;
        if scheme.is_empty() || option.contains('.') {
            return None;
        }

        let option_start = entry.key_range.start + COMPONENT_PREFIX.len() + scheme.len() + 1;
        if offset < option_start {
            return None;
        }

        let model = context.analysis.catalog.lookup_scheme(scheme)?;
        let has_value = !entry.value.is_empty()
            || text[entry.key_range.end..entry.line_range.end]
                .trim_start()
                .starts_with(['=', ':']);
        let range = TextRange::new(option_start, entry.key_range.end);

        Some(ComponentOptionCompleter {
            context,
            model,
            has_value,
            typed: typed(&context, range, offset),
            range,
        })
    }

    fn completions(&self) -> Vec<impl Completable<'a, Self>>
    where
        Self: Sized,
    {
        let options = self
            .model
            .component_params
            .iter()
            .map(|(name, metadata)| ComponentOptionCompletion {
                name: name.clone(),
                metadata: metadata.clone(),
            })
            .collect();

        fuzzy_match_completions(self.typed, options)
    }

    type FilterParams<'p> = &'p str;

    fn completion_filter_text(&self, params: Self::FilterParams<'_>) -> String {
        params.to_string()
    }
}

struct ComponentOptionCompletion {
    name: String,
    metadata: ParamMetadata,
}

impl Matchable for ComponentOptionCompletion {
    fn match_string(&self) -> &str {
        &self.name
    }
}

impl<'a> Completable<'a, ComponentOptionCompleter<'a>> for ComponentOptionCompletion {
    fn completions(&self, completer: &ComponentOptionCompleter<'a>) -> Option<CompletionItem> {
        let new_text = match completer.has_value {
            true => self.name.clone(),
            false => format!(
                "{}={}",
                self.name,
                self.metadata.default_value.as_deref().unwrap_or_default()
            ),
        };

        Some(CompletionItem {
            label: self.name.clone(),
            kind: Some(CompletionItemKind::PROPERTY),
            detail: (!self.metadata.value_type.is_empty()).then(|| self.metadata.value_type.clone()),
            documentation: param_documentation(&self.metadata),
            tags: deprecated_tags(self.metadata.deprecated),
            text_edit: Some(text_edit(&completer.context, completer.range, new_text)),
            filter_text: Some(completer.completion_filter_text(&self.name)),
            ..Default::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use tower_lsp::lsp_types::{CompletionTextEdit, Position};

    use crate::completion::tests::{complete, labels, new_text};

    #[test]
    fn test_lists_component_options_with_defaults() {
        let items = complete("application.properties", "camel.component.timer.|\n");
        assert_eq!(
            labels(&items),
            vec!["autowiredEnabled", "bridgeErrorHandler", "includeMetadata"]
        );
        assert_eq!(new_text(&items[2]), "includeMetadata=false");
    }

    #[test]
    fn test_option_without_default_gets_empty_value() {
        let items = complete("application.properties", "camel.component.kafka.clientI|\n");
        assert_eq!(labels(&items), vec!["clientId"]);
        assert_eq!(new_text(&items[0]), "clientId=");
    }

    #[test]
    fn test_existing_value_keeps_only_the_name() {
        let items = complete("application.properties", "camel.component.timer.inc|=true\n");
        assert_eq!(labels(&items), vec!["includeMetadata"]);
        assert_eq!(new_text(&items[0]), "includeMetadata");
        match &items[0].text_edit {
            Some(CompletionTextEdit::Edit(edit)) => {
                assert_eq!(edit.range.start, Position { line: 0, character: 22 });
                assert_eq!(edit.range.end, Position { line: 0, character: 25 });
            }
            _ => panic!("expected a text edit"),
        }
    }

    #[test]
    fn test_nested_option_key_is_not_completed() {
        let text = "camel.component.timer.includeMetadata.|\n";
        assert!(complete("application.properties", text).is_empty());
    }

    #[test]
    fn test_unknown_component_or_scheme_part() {
        assert!(complete("application.properties", "camel.component.nope.|\n").is_empty());
        assert!(complete("application.properties", "camel.component.tim|\n").is_empty());
    }

    #[test]
    fn test_only_in_properties_documents() {
        assert!(complete("routes.xml", "camel.component.timer.|\n").is_empty());
    }
}
