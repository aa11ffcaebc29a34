//! Channel names of local-channel schemes already used in the document:
//! `<to uri="direct:|"/>` offers every `direct` channel some other endpoint names.

use tower_lsp::lsp_types::{CompletionItem, CompletionItemKind};

use crate::extract::NodeId;
use crate::references::endpoint_ids_of_scheme;
use crate::uri::TextRange;

use super::matcher::{fuzzy_match_completions, Matchable};
use super::util::{text_edit, typed};
use super::{Completable, Completer, Context};

pub struct ChannelIdCompleter<'a> {
    context: Context<'a>,
    scheme: &'a str,
    node: NodeId,
    typed: &'a str,
    range: TextRange,
}

impl<'a> Completer<'a> for ChannelIdCompleter<'a> {
    fn construct(context: Context<'a>, offset: usize) -> Option<Self>
    where
        Self: Sized + Completer<'a>,
    {
        let entry = context.analysis.index.uri_at(offset)?;
        let uri = &entry.uri;
        let scheme = &uri.scheme().name;
        if !context.analysis.classifier.is_local_channel_scheme(scheme)
            || !uri.has_scheme_separator()
            || offset < uri.path_start()
        {
            return None;
        }

        let range = match uri.path_params().first() {
            Some(param) if param.range.touches(offset) => param.range,
            Some(_) => return None,
            None if offset == uri.path_start() => TextRange::empty(offset),
            None => return None,
        };

        Some(ChannelIdCompleter {
            context,
            scheme,
            node: entry.node,
            typed: typed(&context, range, offset),
            range,
        })
    }

    fn completions(&self) -> Vec<impl Completable<'a, Self>>
    where
        Self: Sized,
    {
        let analysis = self.context.analysis;
        let prefix = format!("{}:", self.scheme);
        let others = analysis.index.iter().filter(|entry| entry.node != self.node);

        let channels = endpoint_ids_of_scheme(self.scheme, others, &analysis.classifier)
            .into_iter()
            .filter_map(|channel| channel.strip_prefix(&prefix).map(str::to_string))
            .map(ChannelCompletion)
            .collect();

        fuzzy_match_completions(self.typed, channels)
    }

    type FilterParams<'p> = &'p str;

    fn completion_filter_text(&self, params: Self::FilterParams<'_>) -> String {
        params.to_string()
    }
}

struct ChannelCompletion(String);

impl Matchable for ChannelCompletion {
    fn match_string(&self) -> &str {
        &self.0
    }
}

impl<'a> Completable<'a, ChannelIdCompleter<'a>> for ChannelCompletion {
    fn completions(&self, completer: &ChannelIdCompleter<'a>) -> Option<CompletionItem> {
        Some(CompletionItem {
            label: self.0.clone(),
            kind: Some(CompletionItemKind::REFERENCE),
            detail: Some(format!("{}:{}", completer.scheme, self.0)),
            text_edit: Some(text_edit(&completer.context, completer.range, self.0.clone())),
            filter_text: Some(completer.completion_filter_text(&self.0)),
            ..Default::default()
        })
    }
}
