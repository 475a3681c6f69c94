//! Preview rendering: the question as a student would see it.

use crate::editing::{Run, SpanRegistry, TextDocument};

/// Text shown in place of every active blank
pub const PLACEHOLDER: &str = "____";

/// Render the document with checked spans replaced by [`PLACEHOLDER`]
///
/// Unchecked spans read exactly like plain text. A span run the registry
/// does not know is treated as unchecked.
pub fn render(document: &TextDocument, registry: &SpanRegistry) -> String {
    let mut out = String::with_capacity(document.len());
    for run in document.runs() {
        match run {
            Run::Plain(text) => out.push_str(text),
            Run::Span { id, text } => {
                if registry.is_checked(*id).unwrap_or(false) {
                    out.push_str(PLACEHOLDER);
                } else {
                    out.push_str(text);
                }
            }
        }
    }
    out
}

/// Texts of the checked spans in document order
///
/// The n-th entry is the answer for the n-th placeholder in [`render`]'s output.
pub fn blank_answers<'a>(document: &'a TextDocument, registry: &SpanRegistry) -> Vec<&'a str> {
    document
        .runs()
        .iter()
        .filter_map(|run| match run {
            Run::Span { id, text } if registry.is_checked(*id) == Some(true) => {
                Some(text.as_str())
            }
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::engine_with_blanks;

    #[test]
    fn test_render_plain_document_is_verbatim() {
        let document = TextDocument::from_text("Nothing to hide here.");

        assert_eq!(
            render(&document, &SpanRegistry::new()),
            "Nothing to hide here."
        );
    }

    #[test]
    fn test_render_mixes_checked_and_unchecked_blanks() {
        let (mut engine, ids) = engine_with_blanks("The cat sat on the mat.", &["cat", "mat"]);
        engine.toggle_checked(ids[1], false).unwrap();

        let preview = render(engine.document(), engine.registry());

        assert_eq!(preview, "The ____ sat on the mat.");
    }

    #[test]
    fn test_render_is_repeatable() {
        let (engine, _) = engine_with_blanks("The cat sat on the mat.", &["cat"]);

        assert_eq!(engine.render(), engine.render());
    }

    #[test]
    fn test_unknown_span_renders_as_text() {
        let (engine, _) = engine_with_blanks("The cat sat", &["cat"]);

        assert_eq!(render(engine.document(), &SpanRegistry::new()), "The cat sat");
    }

    #[test]
    fn test_blank_answers_follow_document_order() {
        let (mut engine, ids) =
            engine_with_blanks("The cat sat on the mat with a hat.", &["mat", "hat", "cat"]);
        engine.reorder_spans(&[ids[2], ids[1], ids[0]]).unwrap();
        engine.toggle_checked(ids[1], false).unwrap();

        assert_eq!(engine.blank_answers(), vec!["cat", "mat"]);
        assert_eq!(engine.render(), "The ____ sat on the ____ with a hat.");
    }
}
