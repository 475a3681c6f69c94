use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::editing::AnnotationError;

/// Stable identifier of an annotated span, generated once at creation
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpanId(pub Uuid);

impl SpanId {
    pub fn new() -> Self {
        SpanId(Uuid::new_v4())
    }
}

impl Default for SpanId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SpanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A potential blank as shown in the author's option list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub id: SpanId,
    /// Copy of the span run's payload in the document
    pub text: String,
    /// Checked spans render as blanks in the preview
    pub checked: bool,
}

/// Live spans kept in author-facing display order
///
/// The backing vector *is* the display order, which keeps it a permutation
/// of the live ids by construction. Lookups are linear; a question rarely
/// has more than a handful of blanks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpanRegistry {
    spans: Vec<Span>,
}

impl SpanRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a checked span at the end of the display order
    pub fn create(&mut self, id: SpanId, text: impl Into<String>) -> Result<(), AnnotationError> {
        if self.contains(id) {
            return Err(AnnotationError::DuplicateId(id));
        }
        self.spans.push(Span {
            id,
            text: text.into(),
            checked: true,
        });
        Ok(())
    }

    /// Remove a span; removing it a second time fails with `NotFound`
    pub fn remove(&mut self, id: SpanId) -> Result<Span, AnnotationError> {
        let index = self.index_of(id)?;
        Ok(self.spans.remove(index))
    }

    pub fn set_checked(&mut self, id: SpanId, checked: bool) -> Result<(), AnnotationError> {
        let index = self.index_of(id)?;
        self.spans[index].checked = checked;
        Ok(())
    }

    /// Replace the display order
    ///
    /// `new_order` must name every live span exactly once. Anything else
    /// fails with `InvalidPermutation` and keeps the current order.
    pub fn reorder(&mut self, new_order: &[SpanId]) -> Result<(), AnnotationError> {
        if new_order.len() != self.spans.len() {
            return Err(AnnotationError::InvalidPermutation);
        }
        let mut seen = HashSet::with_capacity(new_order.len());
        for id in new_order {
            if !self.contains(*id) || !seen.insert(*id) {
                return Err(AnnotationError::InvalidPermutation);
            }
        }

        let mut reordered = Vec::with_capacity(self.spans.len());
        for id in new_order {
            let index = self.index_of(*id)?;
            reordered.push(self.spans.swap_remove(index));
        }
        self.spans = reordered;
        Ok(())
    }

    /// Move `id` to the position currently held by `over`
    ///
    /// Mirrors a drag handle being dropped onto another list entry: the
    /// spans in between shift by one towards the vacated slot.
    pub fn move_to(&mut self, id: SpanId, over: SpanId) -> Result<(), AnnotationError> {
        let from = self.index_of(id)?;
        let to = self.index_of(over)?;
        if from != to {
            let span = self.spans.remove(from);
            self.spans.insert(to, span);
        }
        Ok(())
    }

    /// Live span wrapping exactly `text` (case-sensitive)
    pub fn find_by_text(&self, text: &str) -> Option<SpanId> {
        self.spans.iter().find(|span| span.text == text).map(|span| span.id)
    }

    pub fn get(&self, id: SpanId) -> Option<&Span> {
        self.spans.iter().find(|span| span.id == id)
    }

    pub fn contains(&self, id: SpanId) -> bool {
        self.get(id).is_some()
    }

    /// Checked state of `id`, or `None` if the span is unknown
    pub fn is_checked(&self, id: SpanId) -> Option<bool> {
        self.get(id).map(|span| span.checked)
    }

    /// Live spans in display order
    pub fn iter(&self) -> impl Iterator<Item = &Span> {
        self.spans.iter()
    }

    /// Live span ids in display order
    pub fn display_order(&self) -> Vec<SpanId> {
        self.spans.iter().map(|span| span.id).collect()
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    fn index_of(&self, id: SpanId) -> Result<usize, AnnotationError> {
        self.spans
            .iter()
            .position(|span| span.id == id)
            .ok_or(AnnotationError::NotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn registry_with(words: &[&str]) -> (SpanRegistry, Vec<SpanId>) {
        let mut registry = SpanRegistry::new();
        let ids = words
            .iter()
            .map(|word| {
                let id = SpanId::new();
                registry.create(id, *word).unwrap();
                id
            })
            .collect();
        (registry, ids)
    }

    #[test]
    fn test_create_appends_checked_span() {
        let (registry, ids) = registry_with(&["cat", "mat"]);

        assert_eq!(registry.display_order(), ids);
        assert_eq!(registry.is_checked(ids[0]), Some(true));
        assert_eq!(registry.get(ids[1]).unwrap().text, "mat");
    }

    #[test]
    fn test_create_rejects_duplicate_id() {
        let (mut registry, ids) = registry_with(&["cat"]);

        assert_eq!(
            registry.create(ids[0], "dog"),
            Err(AnnotationError::DuplicateId(ids[0]))
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_second_removal_fails() {
        let (mut registry, ids) = registry_with(&["cat", "mat"]);

        let removed = registry.remove(ids[0]).unwrap();

        assert_eq!(removed.text, "cat");
        assert_eq!(registry.display_order(), vec![ids[1]]);
        assert_eq!(
            registry.remove(ids[0]),
            Err(AnnotationError::NotFound(ids[0]))
        );
    }

    #[test]
    fn test_set_checked_unknown_id() {
        let mut registry = SpanRegistry::new();
        let id = SpanId::new();

        assert_eq!(
            registry.set_checked(id, false),
            Err(AnnotationError::NotFound(id))
        );
    }

    #[test]
    fn test_reorder_applies_full_permutation() {
        let (mut registry, ids) = registry_with(&["a", "b", "c"]);

        registry.reorder(&[ids[2], ids[0], ids[1]]).unwrap();

        let texts: Vec<&str> = registry.iter().map(|span| span.text.as_str()).collect();
        assert_eq!(texts, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_reorder_rejects_missing_extra_and_repeated_ids() {
        let (mut registry, ids) = registry_with(&["a", "b"]);
        let before = registry.display_order();

        let partial = registry.reorder(&[ids[1]]);
        let injected = registry.reorder(&[ids[1], ids[0], SpanId::new()]);
        let swapped_in = registry.reorder(&[ids[1], SpanId::new()]);
        let repeated = registry.reorder(&[ids[1], ids[1]]);

        for result in [partial, injected, swapped_in, repeated] {
            assert_eq!(result, Err(AnnotationError::InvalidPermutation));
        }
        assert_eq!(registry.display_order(), before);
    }

    #[test]
    fn test_move_to_shifts_neighbours() {
        let (mut registry, ids) = registry_with(&["a", "b", "c", "d"]);

        registry.move_to(ids[0], ids[2]).unwrap();
        assert_eq!(registry.display_order(), vec![ids[1], ids[2], ids[0], ids[3]]);

        registry.move_to(ids[3], ids[1]).unwrap();
        assert_eq!(registry.display_order(), vec![ids[3], ids[1], ids[2], ids[0]]);
    }

    #[test]
    fn test_move_onto_itself_is_noop() {
        let (mut registry, ids) = registry_with(&["a", "b"]);

        registry.move_to(ids[1], ids[1]).unwrap();

        assert_eq!(registry.display_order(), ids);
    }

    #[test]
    fn test_find_by_text_is_exact_and_case_sensitive() {
        let (registry, ids) = registry_with(&["Paris"]);

        assert_eq!(registry.find_by_text("Paris"), Some(ids[0]));
        assert_eq!(registry.find_by_text("paris"), None);
        assert_eq!(registry.find_by_text("Paris "), None);
    }

    #[test]
    fn test_span_id_serializes_as_uuid_string() {
        let id = SpanId::new();

        let json = serde_json::to_string(&id).unwrap();

        assert_eq!(json, format!("\"{id}\""));
    }
}
