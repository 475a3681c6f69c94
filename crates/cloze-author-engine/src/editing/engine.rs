use std::ops::Range;

use crate::editing::{AnnotationError, Run, Span, SpanId, SpanRegistry, TextDocument, preview};

/// A user's underline gesture as reported by the editable-text widget
///
/// Offsets count characters of the document's flat text. `text` is the
/// widget's own copy of the selected characters and must agree with the
/// document, otherwise the gesture is stale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionEvent {
    pub start: usize,
    pub end: usize,
    pub text: String,
}

impl SelectionEvent {
    pub fn new(start: usize, end: usize, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            text: text.into(),
        }
    }
}

/// What a selection did to the document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionOutcome {
    /// A new blank now wraps the selected text
    Created(SpanId),
    /// The selection matched an existing blank, which was turned back into plain text
    Removed(SpanId),
}

/// Operation surface for one cloze question
///
/// Owns the question's [`TextDocument`] and [`SpanRegistry`] and keeps them
/// in step: every mutation is applied to copies of both and committed only
/// when every step succeeded, so a failed operation leaves no trace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotationEngine {
    pub(crate) document: TextDocument,
    pub(crate) registry: SpanRegistry,
}

impl AnnotationEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a question from plain text with no blanks
    pub fn from_text(text: &str) -> Self {
        Self {
            document: TextDocument::from_text(text),
            registry: SpanRegistry::new(),
        }
    }

    pub fn document(&self) -> &TextDocument {
        &self.document
    }

    pub fn registry(&self) -> &SpanRegistry {
        &self.registry
    }

    pub fn flat_text(&self) -> String {
        self.document.flat_text()
    }

    /// Preview with every checked blank replaced by the placeholder
    pub fn render(&self) -> String {
        preview::render(&self.document, &self.registry)
    }

    /// Answers for the preview's placeholders, left to right
    pub fn blank_answers(&self) -> Vec<&str> {
        preview::blank_answers(&self.document, &self.registry)
    }

    /// Live spans in display order
    pub fn spans(&self) -> impl Iterator<Item = &Span> {
        self.registry.iter()
    }

    /// Character range of a span in the flat text
    pub fn span_range(&self, id: SpanId) -> Option<Range<usize>> {
        self.document.span_range(id)
    }

    /// Classify a selection and apply it
    ///
    /// 1. The event's text must match the document, else `StaleSelection`.
    /// 2. A selection covering exactly one span removes that span.
    /// 3. Any other contact with a span is an `OverlappingSelection`.
    /// 4. A selection with no non-whitespace text is an `EmptySelection`.
    /// 5. Otherwise the trimmed text becomes a new checked span, unless a
    ///    live span already wraps the same text (`DuplicateAnnotation`).
    ///    Whitespace trimmed off either end stays in the document as plain
    ///    text beside the span.
    pub fn apply_selection(
        &mut self,
        event: &SelectionEvent,
    ) -> Result<SelectionOutcome, AnnotationError> {
        let (start, end) = (event.start, event.end);

        let actual = self.document.slice(start, end)?;
        if actual != event.text {
            log::debug!("Rejecting stale selection {start}..{end}");
            return Err(AnnotationError::StaleSelection {
                start,
                end,
                expected: event.text.clone(),
                actual,
            });
        }

        if let Some(id) = self.document.span_at_exact(start, end) {
            self.unwrap_span(id)?;
            log::debug!("Removed blank {id} by reselecting {start}..{end}");
            return Ok(SelectionOutcome::Removed(id));
        }

        if self.document.first_span_intersecting(start, end).is_some() {
            log::debug!("Rejecting selection {start}..{end} overlapping an existing blank");
            return Err(AnnotationError::OverlappingSelection { start, end });
        }

        let trimmed = TrimmedSelection::new(&actual);
        if trimmed.core.is_empty() {
            return Err(AnnotationError::EmptySelection { start, end });
        }
        let inner_start = start + trimmed.leading.chars().count();
        let inner_end = end - trimmed.trailing.chars().count();

        if self.registry.find_by_text(&trimmed.core).is_some() {
            log::debug!("Rejecting duplicate blank for {:?}", trimmed.core);
            return Err(AnnotationError::DuplicateAnnotation {
                text: trimmed.core,
            });
        }

        let id = SpanId::new();
        self.transact(|document, registry| {
            document.replace_range(
                start,
                end,
                vec![
                    Run::plain(trimmed.leading),
                    Run::span(id, trimmed.core.clone()),
                    Run::plain(trimmed.trailing),
                ],
            )?;
            registry.create(id, trimmed.core)
        })?;
        log::debug!("Created blank {id} at {inner_start}..{inner_end}");
        Ok(SelectionOutcome::Created(id))
    }

    /// Mark a span active (rendered as a blank) or inactive
    pub fn toggle_checked(&mut self, id: SpanId, checked: bool) -> Result<(), AnnotationError> {
        self.registry.set_checked(id, checked)?;
        log::debug!("Blank {id} checked = {checked}");
        Ok(())
    }

    /// Turn a span back into plain text and forget it
    pub fn delete_span(&mut self, id: SpanId) -> Result<(), AnnotationError> {
        self.unwrap_span(id)?;
        log::debug!("Deleted blank {id}");
        Ok(())
    }

    /// Replace the author-facing order of the blank list
    pub fn reorder_spans(&mut self, new_order: &[SpanId]) -> Result<(), AnnotationError> {
        self.registry.reorder(new_order)
    }

    /// Drop the dragged span `id` onto the list position of `over`
    pub fn move_span(&mut self, id: SpanId, over: SpanId) -> Result<(), AnnotationError> {
        self.registry.move_to(id, over)
    }

    /// Replace characters `start..end` with plain `replacement` text
    ///
    /// This is how typing and deleting in the editor reaches the model.
    /// Spans keep their identity and text: a range that touches a span's
    /// characters, or an insertion point strictly inside a span, is an
    /// `OverlappingSelection`. Insertion right at a span boundary is plain.
    pub fn edit_text(
        &mut self,
        start: usize,
        end: usize,
        replacement: &str,
    ) -> Result<(), AnnotationError> {
        self.document.slice(start, end)?;
        if self.document.first_span_intersecting(start, end).is_some() {
            return Err(AnnotationError::OverlappingSelection { start, end });
        }
        self.document
            .replace_range(start, end, vec![Run::plain(replacement)])
    }

    /// Verify that the document and the registry describe the same spans
    pub fn check_consistency(&self) -> Result<(), AnnotationError> {
        let mut in_document = 0;
        for run in self.document.runs() {
            let Run::Span { id, text } = run else {
                continue;
            };
            in_document += 1;
            let span = self.registry.get(*id).ok_or(AnnotationError::NotFound(*id))?;
            if span.text != *text {
                return Err(AnnotationError::SpanTextMismatch {
                    span: *id,
                    document: text.clone(),
                    registry: span.text.clone(),
                });
            }
        }
        if in_document != self.registry.len() {
            return Err(AnnotationError::InvalidPermutation);
        }
        Ok(())
    }

    /// Replace the span run `id` with a plain run and remove it from the registry
    fn unwrap_span(&mut self, id: SpanId) -> Result<(), AnnotationError> {
        let range = self
            .document
            .span_range(id)
            .ok_or(AnnotationError::NotFound(id))?;
        self.transact(|document, registry| {
            let text = document.slice(range.start, range.end)?;
            document.replace_range(range.start, range.end, vec![Run::plain(text)])?;
            registry.remove(id).map(|_| ())
        })
    }

    /// Apply `op` to copies of both structures, committing only on success
    fn transact<T>(
        &mut self,
        op: impl FnOnce(&mut TextDocument, &mut SpanRegistry) -> Result<T, AnnotationError>,
    ) -> Result<T, AnnotationError> {
        let mut document = self.document.clone();
        let mut registry = self.registry.clone();
        match op(&mut document, &mut registry) {
            Ok(value) => {
                self.document = document;
                self.registry = registry;
                Ok(value)
            }
            Err(err) => {
                log::warn!("Annotation aborted without changes: {err}");
                Err(err)
            }
        }
    }
}

/// A selection split into surrounding whitespace and the text worth blanking
struct TrimmedSelection {
    leading: String,
    core: String,
    trailing: String,
}

impl TrimmedSelection {
    fn new(text: &str) -> Self {
        let core = text.trim();
        if core.is_empty() {
            return Self {
                leading: text.to_string(),
                core: String::new(),
                trailing: String::new(),
            };
        }
        let leading_len = text.len() - text.trim_start().len();
        let trailing_start = leading_len + core.len();
        Self {
            leading: text[..leading_len].to_string(),
            core: core.to_string(),
            trailing: text[trailing_start..].to_string(),
        }
    }
}
