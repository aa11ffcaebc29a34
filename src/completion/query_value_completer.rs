//! Values of boolean and enumerated query parameters: `log:x?level=|`.

use tower_lsp::lsp_types::{CompletionItem, CompletionItemKind};

use crate::catalog::SchemeLookup;
use crate::uri::{TextRange, UriElement};

use super::matcher::{fuzzy_match_completions, Matchable};
use super::util::{text_edit, typed};
use super::{Completable, Completer, Context};

pub struct QueryValueCompleter<'a> {
    context: Context<'a>,
    values: Vec<String>,
    default_value: Option<String>,
    typed: &'a str,
    range: TextRange,
}

impl<'a> Completer<'a> for QueryValueCompleter<'a> {
    fn construct(context: Context<'a>, offset: usize) -> Option<Self>
    where
        Self: Sized + Completer<'a>,
    {
        let entry = context.analysis.index.uri_at(offset)?;
        let Some(UriElement::QueryValue(param)) = entry.uri.element_at(offset) else {
            return None;
        };

        let model = context
            .analysis
            .catalog
            .lookup_scheme(&entry.uri.scheme().name)?;
        let metadata = model.query_params.get(&param.key)?;
        let values = metadata.suggested_values();
        if values.is_empty() {
            return None;
        }

        Some(QueryValueCompleter {
            context,
            values,
            default_value: metadata.default_value.clone(),
            typed: typed(&context, param.value_range, offset),
            range: param.value_range,
        })
    }

    fn completions(&self) -> Vec<impl Completable<'a, Self>>
    where
        Self: Sized,
    {
        let values = self.values.iter().cloned().map(ValueCompletion).collect();
        fuzzy_match_completions(self.typed, values)
    }

    type FilterParams<'p> = &'p str;

    fn completion_filter_text(&self, params: Self::FilterParams<'_>) -> String {
        params.to_string()
    }
}

struct ValueCompletion(String);

impl Matchable for ValueCompletion {
    fn match_string(&self) -> &str {
        &self.0
    }
}

impl<'a> Completable<'a, QueryValueCompleter<'a>> for ValueCompletion {
    fn completions(&self, completer: &QueryValueCompleter<'a>) -> Option<CompletionItem> {
        let is_default = completer.default_value.as_deref() == Some(self.0.as_str());

        Some(CompletionItem {
            label: self.0.clone(),
            kind: Some(CompletionItemKind::VALUE),
            detail: is_default.then(|| "default".to_string()),
            preselect: is_default.then_some(true),
            text_edit: Some(text_edit(&completer.context, completer.range, self.0.clone())),
            filter_text: Some(completer.completion_filter_text(&self.0)),
            ..Default::default()
        })
    }
}
