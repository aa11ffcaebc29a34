//! Camel K modelines: integration options written in a comment of the source file.
//!
//! ```java
//! // camel-k: dependency=mvn:org.my:lib:1.0 trait=quarkus.enabled=true
//! ```
//!
//! Options are whitespace separated `name=value` pairs; the value keeps any
//! further `=`.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::uri::TextRange;

static MODELINE_START: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(?://|#)\s*camel-k:").unwrap());

/// Known option names with a short description.
pub const OPTION_NAMES: &[(&str, &str)] = &[
    ("annotation", "Add an annotation to the integration"),
    ("build-property", "Add a build time property"),
    ("config", "Add a runtime configuration from a ConfigMap, a Secret or a file"),
    ("connect", "A Service that the integration should bind to"),
    ("dependency", "A dependency that should be included"),
    ("env", "Set an environment variable in the integration container"),
    ("label", "Add a label to the integration"),
    ("name", "The integration name"),
    ("open-api", "Add an OpenAPI v2 document"),
    ("profile", "Trait profile used for deployment"),
    ("property", "Add a runtime property"),
    ("resource", "Add a runtime resource from a ConfigMap, a Secret or a file"),
    ("source", "Add a source file to the integration"),
    ("trait", "Configure a trait, e.g. \"quarkus.enabled=true\""),
    ("volume", "Mount a volume into the integration container"),
];

pub fn option_description(name: &str) -> Option<&'static str> {
    OPTION_NAMES
        .iter()
        .find(|(option, _)| *option == name)
        .map(|(_, description)| *description)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelineOption {
    pub name: String,
    pub value: String,
    pub name_range: TextRange,
    /// Empty, at the end of the name, when the option has no `=`
    pub value_range: TextRange,
}

impl ModelineOption {
    pub fn range(&self) -> TextRange {
        TextRange::new(self.name_range.start, self.value_range.end.max(self.name_range.end))
    }

    pub fn is_known(&self) -> bool {
        option_description(&self.name).is_some()
    }

    /// Whether a `=` follows the name, even with nothing after it.
    pub fn has_assignment(&self) -> bool {
        self.value_range.start > self.name_range.end
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Modeline {
    pub line_range: TextRange,
    /// Where options start, right after `camel-k:`
    pub body_start: usize,
    pub options: Vec<ModelineOption>,
}

impl Modeline {
    pub fn option_at(&self, offset: usize) -> Option<&ModelineOption> {
        self.options
            .iter()
            .find(|option| option.range().touches(offset))
    }
}

pub fn parse_modelines(text: &str) -> Vec<Modeline> {
    let mut line_start = 0;
    let mut modelines = Vec::new();

    for line in text.split_inclusive('\n') {
        let start = line_start;
        line_start += line.len();

        let content = line.trim_end_matches(['\n', '\r']);
        let Some(prefix) = MODELINE_START.find(content) else {
            continue;
        };

        modelines.push(Modeline {
            line_range: TextRange::new(start, start + content.len()),
            body_start: start + prefix.end(),
            options: parse_options(&content[prefix.end()..], start + prefix.end()),
        });
    }

    modelines
}

fn parse_options(body: &str, base: usize) -> Vec<ModelineOption> {
    let mut options = Vec::new();
    let mut rest = body;
    let mut offset = base;

    loop {
        let trimmed = rest.trim_start();
        offset += rest.len() - trimmed.len();
        if trimmed.is_empty() {
            break;
        }

        let len = trimmed.find(char::is_whitespace).unwrap_or(trimmed.len());
        let token = &trimmed[..len];
        options.push(match token.split_once('=') {
            Some((name, value)) => ModelineOption {
                name: name.to_string(),
                value: value.to_string(),
                name_range: TextRange::new(offset, offset + name.len()),
                value_range: TextRange::new(offset + name.len() + 1, offset + len),
            },
            None => ModelineOption {
                name: token.to_string(),
                value: String::new(),
                name_range: TextRange::new(offset, offset + len),
                value_range: TextRange::empty(offset + len),
            },
        });

        offset += len;
        rest = &trimmed[len..];
    }

    options
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_options_with_ranges() {
        let text = "// camel-k: trait=quarkus.enabled=true dependency=mvn:a:b:1\nfrom(\"timer:x\")";
        let modelines = parse_modelines(text);

        assert_eq!(modelines.len(), 1);
        let options = &modelines[0].options;
        assert_eq!(options.len(), 2);
        assert_eq!(options[0].name, "trait");
        assert_eq!(options[0].value, "quarkus.enabled=true");
        assert_eq!(&text[options[0].name_range.start..options[0].name_range.end], "trait");
        assert_eq!(
            &text[options[1].value_range.start..options[1].value_range.end],
            "mvn:a:b:1"
        );
    }

    #[test]
    fn test_hash_comment_and_option_without_value() {
        let modelines = parse_modelines("x = 1\n# camel-k: name\n");
        assert_eq!(modelines.len(), 1);
        assert_eq!(modelines[0].options[0].name, "name");
        assert!(modelines[0].options[0].value_range.is_empty());
        assert!(!modelines[0].options[0].has_assignment());
        assert!(modelines[0].options[0].is_known());

        let modelines = parse_modelines("# camel-k: resource=");
        assert!(modelines[0].options[0].value_range.is_empty());
        assert!(modelines[0].options[0].has_assignment());
    }

    #[test]
    fn test_empty_modeline() {
        let modelines = parse_modelines("// camel-k:   ");
        assert_eq!(modelines.len(), 1);
        assert!(modelines[0].options.is_empty());
        assert_eq!(modelines[0].body_start, 11);
    }

    #[test]
    fn test_not_a_modeline() {
        assert!(parse_modelines("// camel: trait=x\nlet k = \"camel-k:\";").is_empty());
    }

    #[test]
    fn test_option_at() {
        let modelines = parse_modelines("// camel-k: trait=a env=b");
        let option = modelines[0].option_at(23).unwrap();
        assert_eq!(option.name, "env");
    }
}
