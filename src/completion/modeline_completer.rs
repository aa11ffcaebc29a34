//! Option names inside a `camel-k:` modeline. Values belong to `ModelineValueCompleter`.

use tower_lsp::lsp_types::{CompletionItem, CompletionItemKind, Documentation};

use crate::modeline::{parse_modelines, OPTION_NAMES};
use crate::uri::TextRange;

use super::matcher::{fuzzy_match_completions, Matchable};
use super::util::{text_edit, typed};
use super::{Completable, Completer, Context};

pub struct ModelineCompleter<'a> {
    context: Context<'a>,
    typed: &'a str,
    range: TextRange,
}

impl<'a> Completer<'a> for ModelineCompleter<'a> {
    fn construct(context: Context<'a>, offset: usize) -> Option<Self>
    where
        Self: Sized + Completer<'a>,
    {
        let text = context.analysis.document.text();
        let modeline = parse_modelines(text)
            .into_iter()
            .find(|modeline| modeline.line_range.touches(offset) && offset >= modeline.body_start)?;

        let range = match modeline.option_at(offset) {
            Some(option) if option.name_range.touches(offset) => option.name_range,
            Some(_) => return None,
            None if offset == modeline.body_start
                || text[..offset].ends_with(char::is_whitespace) =>
            {
                TextRange::empty(offset)
            }
            None => return None,
        };

        Some(ModelineCompleter {
            context,
            typed: typed(&context, range, offset),
            range,
        })
    }

    fn completions(&self) -> Vec<impl Completable<'a, Self>>
    where
        Self: Sized,
    {
        let options = OPTION_NAMES
            .iter()
            .map(|(name, description)| OptionCompletion { name, description })
            .collect();

        fuzzy_match_completions(self.typed, options)
    }

    type FilterParams<'p> = &'p str;

    fn completion_filter_text(&self, params: Self::FilterParams<'_>) -> String {
        params.to_string()
    }
}

struct OptionCompletion {
    name: &'static str,
    description: &'static str,
}

impl Matchable for OptionCompletion {
    fn match_string(&self) -> &str {
        self.name
    }
}

impl<'a> Completable<'a, ModelineCompleter<'a>> for OptionCompletion {
    fn completions(&self, completer: &ModelineCompleter<'a>) -> Option<CompletionItem> {
        Some(CompletionItem {
            label: self.name.to_string(),
            kind: Some(CompletionItemKind::KEYWORD),
            documentation: Some(Documentation::String(self.description.to_string())),
            text_edit: Some(text_edit(
                &completer.context,
                completer.range,
                format!("{}=", self.name),
            )),
            filter_text: Some(completer.completion_filter_text(self.name)),
            ..Default::default()
        })
    }
}
