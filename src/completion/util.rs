use tower_lsp::lsp_types::{CompletionItemTag, CompletionTextEdit, Documentation, TextEdit};

use crate::catalog::ParamMetadata;
use crate::uri::TextRange;

use super::Context;

/// Replaces `range` of the completed document with `new_text`.
pub fn text_edit(context: &Context, range: TextRange, new_text: String) -> CompletionTextEdit {
    CompletionTextEdit::Edit(TextEdit {
        range: context.analysis.document.lsp_range(range),
        new_text,
    })
}

/// The part of `range` the user has already typed, up to the cursor.
pub fn typed<'a>(context: &Context<'a>, range: TextRange, offset: usize) -> &'a str {
    context
        .analysis
        .document
        .text()
        .get(range.start..offset.clamp(range.start, range.end))
        .unwrap_or_default()
}

pub fn deprecated_tags(deprecated: bool) -> Option<Vec<CompletionItemTag>> {
    deprecated.then(|| vec![CompletionItemTag::DEPRECATED])
}

pub fn param_documentation(metadata: &ParamMetadata) -> Option<Documentation> {
    (!metadata.description.is_empty()).then(|| Documentation::String(metadata.description.clone()))
}
