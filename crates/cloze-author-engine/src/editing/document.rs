use std::collections::HashSet;
use std::ops::Range;

use crate::editing::{AnnotationError, SpanId};

/// A contiguous segment of the document's text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Run {
    /// Text with no identity
    Plain(String),
    /// Text tagged as a potential blank
    Span { id: SpanId, text: String },
}

impl Run {
    pub fn plain(text: impl Into<String>) -> Self {
        Run::Plain(text.into())
    }

    pub fn span(id: SpanId, text: impl Into<String>) -> Self {
        Run::Span {
            id,
            text: text.into(),
        }
    }

    /// The run's payload
    pub fn text(&self) -> &str {
        match self {
            Run::Plain(text) | Run::Span { text, .. } => text,
        }
    }

    pub fn span_id(&self) -> Option<SpanId> {
        match self {
            Run::Plain(_) => None,
            Run::Span { id, .. } => Some(*id),
        }
    }

    /// Length in characters
    pub fn char_len(&self) -> usize {
        self.text().chars().count()
    }
}

/// Text document made of plain runs and span runs
///
/// ## Invariants
/// - Concatenating every run's payload in order gives [`TextDocument::flat_text`]
/// - Span runs never nest or overlap and each `SpanId` appears in at most one run
/// - No two plain runs are adjacent and no plain run is empty, so removing a
///   blank always folds its text back into the surrounding prose
///
/// All offsets count characters (Unicode scalar values) of the flat text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextDocument {
    runs: Vec<Run>,
}

impl TextDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a document holding `text` as a single plain run
    pub fn from_text(text: &str) -> Self {
        Self {
            runs: normalize(vec![Run::plain(text)]),
        }
    }

    /// Rebuild a document from stored runs, rejecting repeated span ids and empty spans
    pub(crate) fn from_runs(runs: Vec<Run>) -> Result<Self, AnnotationError> {
        let mut seen = HashSet::new();
        for run in &runs {
            let Run::Span { id, text } = run else {
                continue;
            };
            if !seen.insert(*id) {
                return Err(AnnotationError::DuplicateId(*id));
            }
            if text.is_empty() {
                return Err(AnnotationError::CorruptQuestion(format!(
                    "span {id} has no text"
                )));
            }
        }
        Ok(Self {
            runs: normalize(runs),
        })
    }

    pub fn runs(&self) -> &[Run] {
        &self.runs
    }

    /// Total length in characters
    pub fn len(&self) -> usize {
        self.runs.iter().map(Run::char_len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// Concatenation of every run's payload
    pub fn flat_text(&self) -> String {
        self.runs.iter().map(Run::text).collect()
    }

    /// Characters `start..end` of the flat text
    pub fn slice(&self, start: usize, end: usize) -> Result<String, AnnotationError> {
        self.check_range(start, end)?;
        Ok(self.flat_text().chars().skip(start).take(end - start).collect())
    }

    /// Every run paired with its character range in the flat text
    pub fn run_ranges(&self) -> impl Iterator<Item = (Range<usize>, &Run)> + '_ {
        let mut offset = 0;
        self.runs.iter().map(move |run| {
            let start = offset;
            offset += run.char_len();
            (start..offset, run)
        })
    }

    /// Character range of the run tagged with `id`
    pub fn span_range(&self, id: SpanId) -> Option<Range<usize>> {
        self.run_ranges()
            .find(|(_, run)| run.span_id() == Some(id))
            .map(|(range, _)| range)
    }

    /// Span id whose run covers exactly `start..end`
    pub fn span_at_exact(&self, start: usize, end: usize) -> Option<SpanId> {
        self.run_ranges()
            .find(|(range, _)| range.start == start && range.end == end)
            .and_then(|(_, run)| run.span_id())
    }

    /// First span run sharing at least one character with `start..end`
    ///
    /// An empty range counts as intersecting when it sits strictly inside a
    /// span run, because inserting there would split the span.
    pub fn first_span_intersecting(&self, start: usize, end: usize) -> Option<SpanId> {
        self.run_ranges()
            .filter_map(|(range, run)| run.span_id().map(|id| (range, id)))
            .find(|(range, _)| {
                if start == end {
                    range.start < start && start < range.end
                } else {
                    start < range.end && range.start < end
                }
            })
            .map(|(_, id)| id)
    }

    /// Replace characters `start..end` with `new_runs`
    ///
    /// Plain runs straddling either boundary are split, plain runs fully
    /// inside the range are dropped, and `new_runs` are spliced in their
    /// place. Span runs are atomic: the only edit allowed to touch one is
    /// replacing exactly its range with a single plain run of its text.
    /// Anything else reaching into a span fails with
    /// [`AnnotationError::OverlapViolation`]. A span id in `new_runs` that survives elsewhere
    /// in the document fails with [`AnnotationError::DuplicateId`].
    ///
    /// The document is unchanged on error.
    pub(crate) fn replace_range(
        &mut self,
        start: usize,
        end: usize,
        new_runs: Vec<Run>,
    ) -> Result<(), AnnotationError> {
        self.check_range(start, end)?;

        let mut incoming = HashSet::new();
        for id in new_runs.iter().filter_map(Run::span_id) {
            if !incoming.insert(id) {
                return Err(AnnotationError::DuplicateId(id));
            }
        }

        let mut before = Vec::new();
        let mut after = Vec::new();
        for (range, run) in self.run_ranges() {
            if let Run::Span { id, text } = run {
                let splits_start = range.start < start && start < range.end;
                let splits_end = range.start < end && end < range.end;
                let covered = start < range.end && range.start < end;
                let unwrapped = range == (start..end)
                    && matches!(new_runs.as_slice(), [Run::Plain(plain)] if plain == text);
                if splits_start || splits_end || (covered && !unwrapped) {
                    return Err(AnnotationError::OverlapViolation {
                        start,
                        end,
                        span: *id,
                    });
                }
            }

            if range.end <= start {
                before.push(run.clone());
            } else if range.start >= end {
                after.push(run.clone());
            } else if let Run::Plain(text) = run {
                if range.start < start {
                    before.push(Run::Plain(take_chars(text, start - range.start)));
                }
                if end < range.end {
                    after.push(Run::Plain(skip_chars(text, end - range.start)));
                }
            }
        }

        if let Some(id) = before
            .iter()
            .chain(after.iter())
            .filter_map(Run::span_id)
            .find(|id| incoming.contains(id))
        {
            return Err(AnnotationError::DuplicateId(id));
        }

        before.extend(new_runs);
        before.extend(after);
        self.runs = normalize(before);
        Ok(())
    }

    fn check_range(&self, start: usize, end: usize) -> Result<(), AnnotationError> {
        let len = self.len();
        if start > end || end > len {
            return Err(AnnotationError::OutOfRange { start, end, len });
        }
        Ok(())
    }
}

/// Drop empty plain runs and merge neighbouring plain runs
fn normalize(runs: Vec<Run>) -> Vec<Run> {
    let mut out: Vec<Run> = Vec::with_capacity(runs.len());
    for run in runs {
        match run {
            Run::Plain(text) if text.is_empty() => {}
            Run::Plain(text) => match out.last_mut() {
                Some(Run::Plain(previous)) => previous.push_str(&text),
                _ => out.push(Run::Plain(text)),
            },
            span => out.push(span),
        }
    }
    out
}

fn take_chars(text: &str, count: usize) -> String {
    text.chars().take(count).collect()
}

fn skip_chars(text: &str, count: usize) -> String {
    text.chars().skip(count).collect()
}
