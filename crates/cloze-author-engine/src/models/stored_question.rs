use serde::{Deserialize, Serialize};

use crate::editing::{AnnotationEngine, AnnotationError, Run, SpanId, SpanRegistry, TextDocument};

/// Serializable form of one authored cloze question
///
/// `document` lists the runs in text order; `spans` lists the blanks in
/// display order. Together they rebuild the engine exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredQuestion {
    pub document: Vec<StoredRun>,
    pub spans: Vec<StoredSpan>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunKind {
    Plain,
    Span,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredRun {
    pub kind: RunKind,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span_id: Option<SpanId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSpan {
    pub id: SpanId,
    pub checked: bool,
}

impl StoredRun {
    fn to_run(&self, index: usize) -> Result<Run, AnnotationError> {
        match (self.kind, self.span_id) {
            (RunKind::Plain, None) => Ok(Run::plain(self.text.clone())),
            (RunKind::Span, Some(id)) => Ok(Run::span(id, self.text.clone())),
            (RunKind::Plain, Some(id)) => Err(AnnotationError::CorruptQuestion(format!(
                "plain run {index} carries span id {id}"
            ))),
            (RunKind::Span, None) => Err(AnnotationError::CorruptQuestion(format!(
                "span run {index} has no span id"
            ))),
        }
    }
}

impl From<&Run> for StoredRun {
    fn from(run: &Run) -> Self {
        match run {
            Run::Plain(text) => StoredRun {
                kind: RunKind::Plain,
                text: text.clone(),
                span_id: None,
            },
            Run::Span { id, text } => StoredRun {
                kind: RunKind::Span,
                text: text.clone(),
                span_id: Some(*id),
            },
        }
    }
}

impl From<&AnnotationEngine> for StoredQuestion {
    fn from(engine: &AnnotationEngine) -> Self {
        Self {
            document: engine.document.runs().iter().map(StoredRun::from).collect(),
            spans: engine
                .registry
                .iter()
                .map(|span| StoredSpan {
                    id: span.id,
                    checked: span.checked,
                })
                .collect(),
        }
    }
}

impl TryFrom<StoredQuestion> for AnnotationEngine {
    type Error = AnnotationError;

    /// Rebuild an engine, refusing any stored question that breaks an invariant
    fn try_from(stored: StoredQuestion) -> Result<Self, Self::Error> {
        let runs = stored
            .document
            .iter()
            .enumerate()
            .map(|(index, run)| run.to_run(index))
            .collect::<Result<Vec<_>, _>>()?;
        let document = TextDocument::from_runs(runs)?;

        let mut registry = SpanRegistry::new();
        for span in &stored.spans {
            let text = document
                .runs()
                .iter()
                .find(|run| run.span_id() == Some(span.id))
                .map(|run| run.text().to_string())
                .ok_or(AnnotationError::NotFound(span.id))?;
            if registry.find_by_text(&text).is_some() {
                return Err(AnnotationError::CorruptQuestion(format!(
                    "more than one blank wraps {text:?}"
                )));
            }
            registry.create(span.id, text)?;
            registry.set_checked(span.id, span.checked)?;
        }

        let engine = AnnotationEngine { document, registry };
        engine.check_consistency()?;
        Ok(engine)
    }
}

impl AnnotationEngine {
    pub fn to_stored(&self) -> StoredQuestion {
        StoredQuestion::from(self)
    }

    pub fn from_stored(stored: StoredQuestion) -> Result<Self, AnnotationError> {
        Self::try_from(stored)
    }
}
