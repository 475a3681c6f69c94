/*!
 * # Blank Annotation Engine
 *
 * A cloze question is a sentence in which the author marks words as
 * *blanks*. This module holds the model behind that gesture.
 *
 * ## Architecture Overview
 *
 * ### 1. Runs instead of markup
 * - A [`TextDocument`] is a sequence of [`Run`]s: plain text, or text tagged
 *   with a stable [`SpanId`]
 * - Concatenating the runs always reproduces the author's text exactly;
 *   annotating never changes what was typed
 *
 * ### 2. Registry with its own order
 * - The [`SpanRegistry`] stores each span's checked state and keeps the
 *   author-facing display order, independent of document position
 *
 * ### 3. One operation surface
 * - [`AnnotationEngine`] is the only writer of both structures
 * - Selections are classified as "create a blank" or "remove a blank" by
 *   comparing character offsets against the runs
 * - Every mutation is all-or-nothing across document and registry
 *
 * ### 4. Pure preview
 * - [`preview::render`] replaces each checked span by [`preview::PLACEHOLDER`]
 *
 * ## Usage Pattern
 *
 * ```rust
 * use cloze_author_engine::editing::*;
 *
 * let mut engine = AnnotationEngine::from_text("The cat sat on the mat.");
 *
 * // The editor reports the selection of "cat"
 * let outcome = engine
 *     .apply_selection(&SelectionEvent::new(4, 7, "cat"))
 *     .unwrap();
 * let SelectionOutcome::Created(cat) = outcome else { unreachable!() };
 * assert_eq!(engine.render(), "The ____ sat on the mat.");
 *
 * // Unchecking keeps the span but shows its text again
 * engine.toggle_checked(cat, false).unwrap();
 * assert_eq!(engine.render(), "The cat sat on the mat.");
 * ```
 */

pub mod document;
pub mod engine;
pub mod error;
pub mod preview;
pub mod registry;

pub use document::{Run, TextDocument};
pub use engine::{AnnotationEngine, SelectionEvent, SelectionOutcome};
pub use error::AnnotationError;
pub use preview::PLACEHOLDER;
pub use registry::{Span, SpanId, SpanRegistry};
