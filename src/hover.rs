//! Hover documentation for endpoint URIs and modeline options.
//!
//! | Target | Shows |
//! |--------|-------|
//! | Scheme | Component title, syntax and description |
//! | Path parameter | Slot name, requiredness and description |
//! | Query key or value | Type, default, deprecation and description |
//! | Modeline option | Option description |
//!
//! Hover can be disabled via [`Settings::hover`](crate::config::Settings::hover).

use tower_lsp::lsp_types::{Hover, HoverContents, HoverParams, MarkupContent, MarkupKind};

use crate::analysis::Analysis;
use crate::catalog::{ComponentModel, ParamMetadata, SchemeLookup};
use crate::modeline::{option_description, parse_modelines};
use crate::uri::{QueryParamInstance, TextRange, UriElement};

pub fn hover(analysis: &Analysis, params: &HoverParams) -> Option<Hover> {
    if !analysis.settings.hover {
        return None;
    }

    let position = params.text_document_position_params.position;
    let offset = analysis.document.offset_at(position)?;

    let (markdown, range) = match analysis.index.uri_at(offset) {
        Some(entry) => uri_hover(analysis, entry.uri.element_at(offset)?, &entry.uri.scheme().name)?,
        None => modeline_hover(analysis, offset)?,
    };

    Some(Hover {
        contents: HoverContents::Markup(MarkupContent {
            kind: MarkupKind::Markdown,
            value: markdown,
        }),
        range: Some(analysis.document.lsp_range(range)),
    })
}

fn uri_hover(analysis: &Analysis, element: UriElement, scheme: &str) -> Option<(String, TextRange)> {
    let model = analysis.catalog.lookup_scheme(scheme)?;

    match element {
        UriElement::Scheme(instance) => Some((component_markdown(&model), instance.range)),
        UriElement::PathParam(param) => {
            let metadata = model.path_params.get(&param.name)?;
            let mut markdown = format!("**{}** path parameter of `{}`", param.name, model.scheme());
            if metadata.required {
                markdown.push_str(" (required)");
            }
            append_param_details(&mut markdown, metadata);
            Some((markdown, param.range))
        }
        UriElement::QueryKey(param) => {
            let metadata = model.query_params.get(&param.key)?;
            Some((query_markdown(&model, param, metadata), param.key_range))
        }
        UriElement::QueryValue(param) => {
            let metadata = model.query_params.get(&param.key)?;
            let mut markdown = query_markdown(&model, param, metadata);
            let decoded = param.decoded_value();
            if decoded != param.value {
                markdown.push_str(&format!("\n\nDecoded value: `{decoded}`"));
            }
            Some((markdown, param.value_range))
        }
    }
}

fn component_markdown(model: &ComponentModel) -> String {
    let info = &model.info;
    let title = match info.title.is_empty() {
        true => model.scheme(),
        false => info.title.as_str(),
    };

    let mut markdown = format!("### {title}\n\n`{}`", info.syntax);
    if info.deprecated {
        markdown.push_str("\n\n*Deprecated*");
    }
    if !info.description.is_empty() {
        markdown.push_str(&format!("\n\n{}", info.description));
    }
    markdown
}

fn query_markdown(model: &ComponentModel, param: &QueryParamInstance, metadata: &ParamMetadata) -> String {
    let mut markdown = format!("**{}** option of `{}`", param.key, model.scheme());
    append_param_details(&mut markdown, metadata);
    markdown
}

fn append_param_details(markdown: &mut String, metadata: &ParamMetadata) {
    if !metadata.value_type.is_empty() {
        markdown.push_str(&format!("\n\nType: `{}`", metadata.value_type));
    }
    if let Some(default) = &metadata.default_value {
        markdown.push_str(&format!("\n\nDefault: `{default}`"));
    }
    if !metadata.enum_values.is_empty() {
        let values: Vec<String> = metadata.enum_values.iter().map(|value| format!("`{value}`")).collect();
        markdown.push_str(&format!("\n\nValues: {}", values.join(", ")));
    }
    if metadata.deprecated {
        markdown.push_str("\n\n*Deprecated*");
        if !metadata.deprecation_note.is_empty() {
            markdown.push_str(&format!(": {}", metadata.deprecation_note));
        }
    }
    if !metadata.description.is_empty() {
        markdown.push_str(&format!("\n\n{}", metadata.description));
    }
}

fn modeline_hover(analysis: &Analysis, offset: usize) -> Option<(String, TextRange)> {
    parse_modelines(analysis.document.text())
        .iter()
        .find_map(|modeline| modeline.option_at(offset))
        .and_then(|option| {
            let description = option_description(&option.name)?;
            Some((format!("**{}**\n\n{description}", option.name), option.range()))
        })
}
