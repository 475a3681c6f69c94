pub mod editing;
pub mod io;
pub mod models;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use editing::{
    AnnotationEngine, AnnotationError, PLACEHOLDER, Run, SelectionEvent, SelectionOutcome, Span,
    SpanId, SpanRegistry, TextDocument,
};
pub use io::*;
pub use models::*;
