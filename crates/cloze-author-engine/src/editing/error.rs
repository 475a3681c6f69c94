use crate::editing::SpanId;

/// Every way an annotation operation can be refused.
///
/// Failures never leave the engine half-mutated: the document and the
/// registry are either both updated or both untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnnotationError {
    /// The caller's copy of the text disagrees with the document
    #[error("Stale selection {start}..{end}: expected {expected:?}, document has {actual:?}")]
    StaleSelection {
        start: usize,
        end: usize,
        expected: String,
        actual: String,
    },

    #[error("Selection {start}..{end} partially overlaps an existing blank")]
    OverlappingSelection { start: usize, end: usize },

    #[error("A blank for {text:?} already exists")]
    DuplicateAnnotation { text: String },

    #[error("Selection {start}..{end} contains no text to turn into a blank")]
    EmptySelection { start: usize, end: usize },

    #[error("Unknown span {0}")]
    NotFound(SpanId),

    #[error("Span {0} already exists")]
    DuplicateId(SpanId),

    #[error("New display order is not a permutation of the live spans")]
    InvalidPermutation,

    #[error("Range {start}..{end} is outside the document (length {len})")]
    OutOfRange { start: usize, end: usize, len: usize },

    #[error("Span {span} reads {document:?} in the document but {registry:?} in the registry")]
    SpanTextMismatch {
        span: SpanId,
        document: String,
        registry: String,
    },

    #[error("Range {start}..{end} would split or overlap span {span}")]
    OverlapViolation {
        start: usize,
        end: usize,
        span: SpanId,
    },

    /// Loaded data that no sequence of gestures could have produced
    #[error("Corrupt question: {0}")]
    CorruptQuestion(String),
}

impl AnnotationError {
    /// Rejections an author triggers through an ordinary gesture.
    ///
    /// These are shown as a transient notice; the model is unchanged and the
    /// gesture can simply be retried.
    pub fn is_policy_rejection(&self) -> bool {
        matches!(
            self,
            AnnotationError::StaleSelection { .. }
                | AnnotationError::OverlappingSelection { .. }
                | AnnotationError::DuplicateAnnotation { .. }
                | AnnotationError::EmptySelection { .. }
        )
    }

    /// Broken contracts between the engine and its own data structures.
    pub fn is_contract_violation(&self) -> bool {
        !self.is_policy_rejection()
    }
}
