//! Scheme names, e.g. `ti|` -> `timer:`.

use std::borrow::Cow;

use tower_lsp::lsp_types::{CompletionItem, CompletionItemKind, Documentation};

use crate::catalog::ComponentModel;
use crate::uri::TextRange;

use super::matcher::{fuzzy_match_completions, Matchable};
use super::util::{deprecated_tags, text_edit, typed};
use super::{Completable, Completer, Context};

pub struct SchemeCompleter<'a> {
    context: Context<'a>,
    /// The scheme typed so far
    typed: &'a str,
    range: TextRange,
    /// Whether `:` already follows the scheme
    separator: bool,
}

impl<'a> Completer<'a> for SchemeCompleter<'a> {
    fn construct(context: Context<'a>, offset: usize) -> Option<Self>
    where
        Self: Sized + Completer<'a>,
    {
        let entry = context.analysis.index.uri_at(offset)?;
        let scheme = entry.uri.scheme();
        if !scheme.range.touches(offset) {
            return None;
        }

        Some(SchemeCompleter {
            context,
            typed: typed(&context, scheme.range, offset),
            range: scheme.range,
            separator: entry.uri.has_scheme_separator(),
        })
    }

    fn completions(&self) -> Vec<impl Completable<'a, Self>>
    where
        Self: Sized,
    {
        let schemes = self
            .context
            .analysis
            .catalog
            .entries()
            .into_iter()
            .map(|(name, model)| SchemeCompletion { name, model })
            .collect();

        fuzzy_match_completions(self.typed, schemes)
    }

    type FilterParams<'p> = &'p str;

    fn completion_filter_text(&self, params: Self::FilterParams<'_>) -> String {
        params.to_string()
    }
}

struct SchemeCompletion<'a> {
    name: &'a str,
    model: Cow<'a, ComponentModel>,
}

impl Matchable for SchemeCompletion<'_> {
    fn match_string(&self) -> &str {
        self.name
    }
}

impl<'a> Completable<'a, SchemeCompleter<'a>> for SchemeCompletion<'a> {
    fn completions(&self, completer: &SchemeCompleter<'a>) -> Option<CompletionItem> {
        let new_text = match completer.separator {
            true => self.name.to_string(),
            false => format!("{}:", self.name),
        };
        let info = &self.model.info;

        Some(CompletionItem {
            label: self.name.to_string(),
            kind: Some(CompletionItemKind::MODULE),
            detail: (!info.title.is_empty()).then(|| info.title.clone()),
            documentation: (!info.description.is_empty())
                .then(|| Documentation::String(info.description.clone())),
            tags: deprecated_tags(info.deprecated),
            text_edit: Some(text_edit(&completer.context, completer.range, new_text)),
            filter_text: Some(completer.completion_filter_text(self.name)),
            ..Default::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::completion::tests::{complete, labels, new_text};

    #[test]
    fn test_empty_uri_lists_every_scheme() {
        let items = complete("routes.xml", "<to uri=\"|\"/>");
        assert_eq!(
            labels(&items),
            vec!["direct", "direct-vm", "file", "kafka", "kamelet", "log", "seda", "timer"]
        );
        assert_eq!(new_text(&items[0]), "direct:");
    }

    #[test]
    fn test_partial_scheme_is_fuzzy_ranked() {
        let items = complete("routes.xml", "<from uri=\"tim|\"/>");
        assert_eq!(labels(&items).first(), Some(&"timer"));
        assert_eq!(items[0].detail.as_deref(), Some("Timer"));
    }

    #[test]
    fn test_existing_separator_is_not_duplicated() {
        let items = complete("routes.xml", "<from uri=\"tim|:foo\"/>");
        assert_eq!(new_text(&items[0]), "timer");
    }

    #[test]
    fn test_properties_value() {
        let items = complete("a.properties", "camel.sink.url=kaf|:x\n");
        assert_eq!(labels(&items), vec!["kafka"]);
    }

    #[test]
    fn test_properties_value_without_separator() {
        let items = complete("a.properties", "camel.sink.url=tim|\n");
        assert_eq!(labels(&items), vec!["timer"]);
        assert_eq!(new_text(&items[0]), "timer:");
    }

    #[test]
    fn test_properties_empty_value() {
        let items = complete("a.properties", "camel.sink.url=|\n");
        assert!(labels(&items).contains(&"timer"));
    }
}
