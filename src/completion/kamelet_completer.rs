//! Kamelet template ids: `<from uri="kamelet:|"/>` offers source templates,
//! `<to uri="kamelet:|"/>` sink templates.

use tower_lsp::lsp_types::{CompletionItem, CompletionItemKind, Documentation};

use crate::catalog::KameletTemplate;
use crate::semantic::Role;
use crate::uri::TextRange;

use super::matcher::{fuzzy_match_completions, Matchable};
use super::util::{text_edit, typed};
use super::{Completable, Completer, Context};

const KAMELET_SCHEME: &str = "kamelet";

pub struct KameletCompleter<'a> {
    context: Context<'a>,
    role: Role,
    typed: &'a str,
    range: TextRange,
}

impl<'a> Completer<'a> for KameletCompleter<'a> {
    fn construct(context: Context<'a>, offset: usize) -> Option<Self>
    where
        Self: Sized + Completer<'a>,
    {
        let uri = &context.analysis.index.uri_at(offset)?.uri;
        if uri.scheme().name != KAMELET_SCHEME
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

        Some(KameletCompleter {
            context,
            role: uri.role(),
            typed: typed(&context, range, offset),
            range,
        })
    }

    fn completions(&self) -> Vec<impl Completable<'a, Self>>
    where
        Self: Sized,
    {
        let templates = self
            .context
            .analysis
            .catalog
            .kamelets()
            .iter()
            .filter(|template| template.fits(self.role))
            .map(KameletCompletion)
            .collect();

        fuzzy_match_completions(self.typed, templates)
    }

    type FilterParams<'p> = &'p str;

    fn completion_filter_text(&self, params: Self::FilterParams<'_>) -> String {
        params.to_string()
    }
}

struct KameletCompletion<'a>(&'a KameletTemplate);

impl Matchable for KameletCompletion<'_> {
    fn match_string(&self) -> &str {
        &self.0.id
    }
}

impl<'a> Completable<'a, KameletCompleter<'a>> for KameletCompletion<'a> {
    fn completions(&self, completer: &KameletCompleter<'a>) -> Option<CompletionItem> {
        let template = self.0;
        Some(CompletionItem {
            label: template.id.clone(),
            kind: Some(CompletionItemKind::MODULE),
            detail: (!template.title.is_empty()).then(|| template.title.clone()),
            documentation: (!template.description.is_empty())
                .then(|| Documentation::String(template.description.clone())),
            text_edit: Some(text_edit(&completer.context, completer.range, template.id.clone())),
            filter_text: Some(completer.completion_filter_text(&template.id)),
            ..Default::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use tower_lsp::lsp_types::Documentation;

    use crate::completion::tests::{complete, labels, new_text};

    #[test]
    fn test_consumer_gets_sources() {
        let items = complete("routes.xml", "<from uri=\"kamelet:|\"/>");
        let ids = labels(&items);
        assert!(ids.contains(&"aws-ddb-streams-source"));
        assert!(!ids.contains(&"aws-kinesis-sink"));
        assert!(ids.iter().all(|id| id.ends_with("-source")));

        let ddb = items
            .iter()
            .find(|item| item.label == "aws-ddb-streams-source")
            .unwrap();
        assert_eq!(
            ddb.documentation,
            Some(Documentation::String(
                "Receive events from AWS DynamoDB Streams.".to_string()
            ))
        );
        assert_eq!(new_text(ddb), "aws-ddb-streams-source");
    }

    #[test]
    fn test_producer_gets_sinks() {
        let items = complete("routes.xml", "<to uri=\"kamelet:|\"/>");
        let ids = labels(&items);
        assert!(ids.contains(&"aws-kinesis-sink"));
        assert!(!ids.contains(&"aws-ddb-streams-source"));
        assert!(!ids.contains(&"insert-header-action"));
    }

    #[test]
    fn test_partial_template_id() {
        let items = complete("routes.xml", "<to uri=\"kamelet:log-s|/route1\"/>");
        assert_eq!(labels(&items), vec!["log-sink"]);
    }

    #[test]
    fn test_route_id_segment_is_not_completed() {
        assert!(complete("routes.xml", "<to uri=\"kamelet:log-sink/r|\"/>").is_empty());
    }

    #[test]
    fn test_connector_source_url() {
        let items = complete("a.properties", "camel.source.url=kamelet:kafka|\n");
        assert_eq!(labels(&items), vec!["kafka-source"]);
    }
}
