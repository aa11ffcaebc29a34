//! Values of `camel-k:` modeline options.
//!
//! - `trait=qu|` -> `quarkus.`
//! - `trait=quarkus.na|` -> `native=false`
//! - `resource=|` -> files next to the document

use tower_lsp::lsp_types::{CompletionItem, CompletionItemKind, Documentation};
use tracing::debug;
use walkdir::WalkDir;

use crate::catalog::{ParamMetadata, TraitModel};
use crate::modeline::parse_modelines;
use crate::uri::TextRange;

use super::matcher::{fuzzy_match_completions, Matchable};
use super::util::{param_documentation, text_edit, typed};
use super::{Completable, Completer, Context};

enum ValueSlot<'a> {
    /// The trait name before the first `.`
    TraitName { dot_follows: bool },
    /// The property name between `.` and `=`; `None` for an unknown trait
    TraitProperty {
        model: Option<&'a TraitModel>,
        has_value: bool,
    },
    Resource,
}

pub struct ModelineValueCompleter<'a> {
    context: Context<'a>,
    slot: ValueSlot<'a>,
    typed: &'a str,
    range: TextRange,
}

impl<'a> Completer<'a> for ModelineValueCompleter<'a> {
    fn construct(context: Context<'a>, offset: usize) -> Option<Self>
    where
        Self: Sized + Completer<'a>,
    {
        let modeline = parse_modelines(context.analysis.document.text())
            .into_iter()
            .find(|modeline| modeline.line_range.touches(offset) && offset >= modeline.body_start)?;
        let option = modeline.option_at(offset)?;
        if !option.has_assignment() || offset < option.value_range.start {
            return None;
        }

        let start = option.value_range.start;
        let value = option.value.as_str();
        let (slot, range) = match option.name.as_str() {
            "trait" => match value.find('.') {
                Some(dot) if offset - start > dot => {
                    let property_start = dot + 1;
                    let property_end = value[property_start..]
                        .find('=')
                        .map_or(value.len(), |index| property_start + index);
                    if offset - start > property_end {
                        return None;
                    }
                    let slot = ValueSlot::TraitProperty {
                        model: context.analysis.catalog.trait_model(&value[..dot]),
                        has_value: property_end < value.len(),
                    };
                    (slot, TextRange::new(start + property_start, start + property_end))
                }
                _ => {
                    let name_end = value.find(['.', '=']).unwrap_or(value.len());
                    let slot = ValueSlot::TraitName {
                        dot_follows: value[name_end..].starts_with('.'),
                    };
                    (slot, TextRange::new(start, start + name_end))
                }
            },
            "resource" => (ValueSlot::Resource, option.value_range),
            _ => return None,
        };

        Some(ModelineValueCompleter {
            context,
            slot,
            typed: typed(&context, range, offset),
            range,
        })
    }

    fn completions(&self) -> Vec<impl Completable<'a, Self>>
    where
        Self: Sized,
    {
        let values: Vec<ValueCompletion<'a>> = match &self.slot {
            ValueSlot::TraitName { .. } => self
                .context
                .analysis
                .catalog
                .traits()
                .iter()
                .map(ValueCompletion::Trait)
                .collect(),
            ValueSlot::TraitProperty { model, .. } => model
                .iter()
                .copied()
                .flat_map(|model| &model.properties)
                .map(|(name, metadata)| ValueCompletion::Property {
                    name: name.as_str(),
                    metadata,
                })
                .collect(),
            ValueSlot::Resource => self
                .sibling_files()
                .into_iter()
                .map(ValueCompletion::File)
                .collect(),
        };

        fuzzy_match_completions(self.typed, values)
    }

    type FilterParams<'p> = &'p str;

    fn completion_filter_text(&self, params: Self::FilterParams<'_>) -> String {
        params.to_string()
    }
}

impl ModelineValueCompleter<'_> {
    /// Names of the other files in the document's directory, sorted.
    fn sibling_files(&self) -> Vec<String> {
        let url = self.context.analysis.document.url();
        let Ok(path) = url.to_file_path() else {
            debug!("No directory to list resources from for {url}");
            return Vec::new();
        };
        let Some(dir) = path.parent() else {
            return Vec::new();
        };

        WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .filter(|sibling| *sibling != path)
            .filter_map(|sibling| Some(sibling.file_name()?.to_string_lossy().into_owned()))
            .collect()
    }
}

enum ValueCompletion<'a> {
    Trait(&'a TraitModel),
    Property {
        name: &'a str,
        metadata: &'a ParamMetadata,
    },
    File(String),
}

impl Matchable for ValueCompletion<'_> {
    fn match_string(&self) -> &str {
        match self {
            ValueCompletion::Trait(model) => &model.name,
            ValueCompletion::Property { name, .. } => name,
            ValueCompletion::File(name) => name,
        }
    }
}

impl<'a> Completable<'a, ModelineValueCompleter<'a>> for ValueCompletion<'a> {
    fn completions(&self, completer: &ModelineValueCompleter<'a>) -> Option<CompletionItem> {
        let label = self.match_string().to_string();
        let (kind, documentation, new_text) = match (self, &completer.slot) {
            (ValueCompletion::Trait(model), ValueSlot::TraitName { dot_follows }) => (
                CompletionItemKind::MODULE,
                (!model.description.is_empty())
                    .then(|| Documentation::String(model.description.clone())),
                match *dot_follows {
                    true => label.clone(),
                    false => format!("{label}."),
                },
            ),
            (ValueCompletion::Property { metadata, .. }, ValueSlot::TraitProperty { has_value, .. }) => (
                CompletionItemKind::PROPERTY,
                param_documentation(metadata),
                match *has_value {
                    true => label.clone(),
                    false => format!(
                        "{label}={}",
                        metadata.default_value.as_deref().unwrap_or_default()
                    ),
                },
            ),
            (ValueCompletion::File(_), ValueSlot::Resource) => {
                (CompletionItemKind::FILE, None, label.clone())
            }
            _ => return None,
        };

        Some(CompletionItem {
            label: label.clone(),
            kind: Some(kind),
            documentation,
            text_edit: Some(text_edit(&completer.context, completer.range, new_text)),
            filter_text: Some(completer.completion_filter_text(&label)),
            ..Default::default()
        })
    }
}
