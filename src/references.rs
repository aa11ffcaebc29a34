use itertools::Itertools;
use tower_lsp::lsp_types::{Location, Position};
use tracing::debug;

use crate::analysis::Analysis;
use crate::index::{DocumentUriIndex, IndexedUri};
use crate::semantic::{channel_identifier, Classifier};
use crate::uri::UriInstance;

/// Every URI of `index` on the other end of the local channel `target` names.
///
/// Empty unless `target` uses a local-channel scheme, has a non-empty channel
/// name and a known role. Matches share the exact channel name, have the
/// opposite role and come in document order.
pub fn find_references<'i>(
    target: &UriInstance,
    index: &'i DocumentUriIndex,
    classifier: &Classifier,
) -> Vec<&'i IndexedUri> {
    if !classifier.is_local_channel_scheme(&target.scheme().name) {
        return Vec::new();
    }
    let (Some(identifier), Some(wanted_role)) = (channel_identifier(target), target.role().opposite())
    else {
        return Vec::new();
    };

    index
        .iter()
        .filter(|entry| {
            classifier.is_local_channel_scheme(&entry.uri.scheme().name)
                && entry.uri.role() == wanted_role
                && channel_identifier(&entry.uri) == Some(identifier)
        })
        .collect()
}

/// Distinct `scheme:name` channels named by `entries`, in the order given.
///
/// Blank names are skipped.
pub fn endpoint_ids_of_scheme<'i>(
    scheme: &str,
    entries: impl IntoIterator<Item = &'i IndexedUri>,
    classifier: &Classifier,
) -> Vec<String> {
    entries
        .into_iter()
        .filter(|entry| {
            classifier.is_local_channel_scheme(&entry.uri.scheme().name)
                && entry.uri.scheme().name.eq_ignore_ascii_case(scheme)
        })
        .filter_map(|entry| channel_identifier(&entry.uri))
        .filter(|identifier| !identifier.trim().is_empty())
        .map(|identifier| format!("{scheme}:{identifier}"))
        .unique()
        .collect()
}

pub fn references(analysis: &Analysis, cursor_position: Position) -> Option<Vec<Location>> {
    let (_, target) = analysis.uri_at(cursor_position)?;
    debug!(
        "Resolving references of {} ({:?})",
        target.uri.raw_text(),
        target.uri.role()
    );

    Some(
        find_references(&target.uri, &analysis.index, &analysis.classifier)
            .into_iter()
            .map(|entry| Location {
                uri: analysis.document.url().clone(),
                range: analysis.document.lsp_range(entry.node_range),
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::config::Settings;
    use crate::document::Document;
    use crate::extract::XmlExtractor;
    use crate::semantic::Role;
    use crate::test_utils::test_catalog;
    use tower_lsp::lsp_types::Url;

    fn index(text: &str) -> DocumentUriIndex {
        DocumentUriIndex::build(text, &XmlExtractor, &test_catalog(), &Classifier::default())
    }

    fn raw_texts(found: Vec<&IndexedUri>) -> Vec<&str> {
        found.into_iter().map(|entry| entry.uri.raw_text()).collect()
    }

    #[test]
    fn test_producer_finds_every_consumer_in_document_order() {
        let index = index(
            r#"<from uri="direct:orders"/>
<to uri="direct:orders?block=false"/>
<from uri="direct-vm:orders"/>
<from uri="direct:other"/>"#,
        );
        let target = &index.iter().nth(1).unwrap().uri;
        assert_eq!(target.role(), Role::Producer);

        let found = find_references(target, &index, &Classifier::default());
        assert_eq!(raw_texts(found), vec!["direct:orders", "direct-vm:orders"]);
    }

    #[test]
    fn test_identifiers_are_case_sensitive() {
        let index = index(r#"<from uri="direct:Orders"/><to uri="direct:orders"/>"#);
        let target = &index.iter().nth(1).unwrap().uri;
        assert!(find_references(target, &index, &Classifier::default()).is_empty());
    }

    #[test]
    fn test_non_local_channel_target_has_no_references() {
        let index = index(r#"<from uri="seda:a"/><to uri="seda:a"/>"#);
        let target = &index.iter().nth(1).unwrap().uri;
        assert!(find_references(target, &index, &Classifier::default()).is_empty());

        let seda = Classifier::new(["to"], ["from"], ["seda"]);
        assert_eq!(find_references(target, &index, &seda).len(), 1);
    }

    #[test]
    fn test_unknown_role_target_has_no_references() {
        let index = index(r#"<from uri="direct:a"/><enrichSomething uri="direct:a"/>"#);
        let target = &index.iter().nth(1).unwrap().uri;
        assert_eq!(target.role(), Role::Unknown);
        assert!(find_references(target, &index, &Classifier::default()).is_empty());
    }

    #[test]
    fn test_endpoint_ids_of_scheme() {
        let index = index(
            r#"<from uri="direct:a"/><to uri="direct:b"/><to uri="direct:a"/><to uri="direct-vm:c"/><to uri="direct:"/>"#,
        );
        assert_eq!(
            endpoint_ids_of_scheme("direct", index.iter(), &Classifier::default()),
            vec!["direct:a", "direct:b"]
        );
    }

    #[test]
    fn test_endpoint_ids_skip_blank_names() {
        let index = index(r#"<from uri="direct: "/><to uri="direct:   "/><to uri="direct:a"/>"#);
        assert_eq!(
            endpoint_ids_of_scheme("direct", index.iter(), &Classifier::default()),
            vec!["direct:a"]
        );
    }

    #[test]
    fn test_references_returns_owning_node_locations() {
        let document = Document::new(
            Url::parse("file:///tmp/routes.xml").unwrap(),
            "<route>\n  <from uri=\"direct:a\"/>\n  <to uri=\"direct:a\"/>\n</route>\n",
            0,
        );
        let catalog = Catalog::builtin();
        let settings = Settings::default();
        let analysis = Analysis::new(&document, &catalog, &settings);

        let locations = references(
            &analysis,
            Position {
                line: 2,
                character: 15,
            },
        )
        .unwrap();

        assert_eq!(locations.len(), 1);
        assert_eq!(locations[0].range.start, Position { line: 1, character: 2 });
        assert_eq!(locations[0].range.end, Position { line: 1, character: 24 });
    }

    #[test]
    fn test_references_outside_uri_is_none() {
        let document = Document::new(
            Url::parse("file:///tmp/routes.xml").unwrap(),
            "<route>\n  <to uri=\"direct:a\"/>\n</route>\n",
            0,
        );
        let catalog = Catalog::builtin();
        let settings = Settings::default();
        let analysis = Analysis::new(&document, &catalog, &settings);

        assert!(references(&analysis, Position { line: 0, character: 1 }).is_none());
    }
}
