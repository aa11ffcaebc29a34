//! Query parameter names of a known scheme: `timer:t?per|` -> `period=1000`.

use std::borrow::Cow;

use tower_lsp::lsp_types::{CompletionItem, CompletionItemKind};

use crate::catalog::{ComponentModel, ParamMetadata, SchemeLookup};
use crate::uri::{QueryParamInstance, Rangeable, TextRange, UriElement};

use super::matcher::{fuzzy_match_completions, Matchable};
use super::util::{deprecated_tags, param_documentation, text_edit, typed};
use super::{Completable, Completer, Context};

pub struct QueryKeyCompleter<'a> {
    context: Context<'a>,
    model: Cow<'a, ComponentModel>,
    /// The parameter whose key is being edited; `None` right after a bare `?`
    param: Option<&'a QueryParamInstance>,
    /// Keys of the other parameters of the URI
    present: Vec<&'a str>,
    typed: &'a str,
    range: TextRange,
}

impl<'a> Completer<'a> for QueryKeyCompleter<'a> {
    fn construct(context: Context<'a>, offset: usize) -> Option<Self>
    where
        Self: Sized + Completer<'a>,
    {
        let entry = context.analysis.index.uri_at(offset)?;
        let uri = &entry.uri;
        if !uri.scheme().is_known() || !uri.has_query() {
            return None;
        }

        let (param, range) = match uri.element_at(offset) {
            Some(UriElement::QueryKey(param)) => (Some(param), param.key_range),
            None if uri.query_params().is_empty() && offset == uri.range().end => {
                (None, TextRange::empty(offset))
            }
            _ => return None,
        };

        let model = context
            .analysis
            .catalog
            .lookup_scheme(&uri.scheme().name)?;

        let present = uri
            .query_params()
            .iter()
            .filter(|other| param.map_or(true, |param| !std::ptr::eq(*other, param)))
            .map(|other| other.key.as_str())
            .collect();

        Some(QueryKeyCompleter {
            context,
            model,
            param,
            present,
            typed: typed(&context, range, offset),
            range,
        })
    }

    fn completions(&self) -> Vec<impl Completable<'a, Self>>
    where
        Self: Sized,
    {
        let keys = self
            .model
            .query_params
            .iter()
            .filter(|(key, _)| !self.present.contains(&key.as_str()))
            .map(|(key, metadata)| QueryKeyCompletion {
                key: key.clone(),
                metadata: metadata.clone(),
            })
            .collect();

        fuzzy_match_completions(self.typed, keys)
    }

    type FilterParams<'p> = &'p str;

    fn completion_filter_text(&self, params: Self::FilterParams<'_>) -> String {
        params.to_string()
    }
}

struct QueryKeyCompletion {
    key: String,
    metadata: ParamMetadata,
}

impl Matchable for QueryKeyCompletion {
    fn match_string(&self) -> &str {
        &self.key
    }
}

impl<'a> Completable<'a, QueryKeyCompleter<'a>> for QueryKeyCompletion {
    fn completions(&self, completer: &QueryKeyCompleter<'a>) -> Option<CompletionItem> {
        let has_value = completer.param.is_some_and(|param| param.assignment);
        let new_text = match has_value {
            true => self.key.clone(),
            false => format!(
                "{}={}",
                self.key,
                self.metadata.default_value.as_deref().unwrap_or_default()
            ),
        };

        Some(CompletionItem {
            label: self.key.clone(),
            kind: Some(CompletionItemKind::PROPERTY),
            detail: (!self.metadata.value_type.is_empty()).then(|| self.metadata.value_type.clone()),
            documentation: param_documentation(&self.metadata),
            tags: deprecated_tags(self.metadata.deprecated),
            text_edit: Some(text_edit(&completer.context, completer.range, new_text)),
            filter_text: Some(completer.completion_filter_text(&self.key)),
            ..Default::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::completion::tests::{complete, labels, new_text};

    #[test]
    fn test_after_question_mark_lists_every_parameter() {
        let items = complete("routes.xml", "<from uri=\"timer:t?|\"/>");
        assert_eq!(
            labels(&items),
            vec!["daemon", "delay", "fixedRate", "pattern", "period", "repeatCount", "time"]
        );
    }

    #[test]
    fn test_inserts_default_value_when_no_value_yet() {
        let items = complete("routes.xml", "<from uri=\"timer:t?peri|\"/>");
        assert_eq!(labels(&items), vec!["period"]);
        assert_eq!(new_text(&items[0]), "period=1000");
    }

    #[test]
    fn test_keeps_existing_value() {
        let items = complete("routes.xml", "<from uri=\"timer:t?peri|=5\"/>");
        assert_eq!(new_text(&items[0]), "period");
    }

    #[test]
    fn test_parameter_without_default() {
        let items = complete("routes.xml", "<from uri=\"timer:t?tim|\"/>");
        assert_eq!(new_text(&items[0]), "time=");
    }

    #[test]
    fn test_present_keys_are_excluded() {
        let items = complete("routes.xml", "<from uri=\"timer:t?period=5&amp;|\"/>");
        assert!(!labels(&items).contains(&"period"));
        assert!(labels(&items).contains(&"delay"));
    }

    #[test]
    fn test_unknown_scheme_has_no_parameters() {
        assert!(complete("routes.xml", "<from uri=\"nope:t?|\"/>").is_empty());
    }
}
