use crate::editing::{AnnotationEngine, SelectionEvent, SelectionOutcome, SpanId};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Create a temporary directory for question files
pub fn create_test_questions_dir() -> TempDir {
    tempfile::tempdir().unwrap()
}

/// Create a question file with raw content
pub fn create_test_file(dir: &TempDir, filename: &str, content: &str) -> PathBuf {
    let file_path = dir.path().join(filename);
    fs::write(&file_path, content).unwrap();
    file_path
}

/// Select the first occurrence of `needle` and expect a new blank
pub fn select(engine: &mut AnnotationEngine, needle: &str) -> SpanId {
    let flat = engine.flat_text();
    let byte_start = flat
        .find(needle)
        .unwrap_or_else(|| panic!("{needle:?} not found in {flat:?}"));
    let start = flat[..byte_start].chars().count();
    let end = start + needle.chars().count();

    match engine
        .apply_selection(&SelectionEvent::new(start, end, needle))
        .unwrap()
    {
        SelectionOutcome::Created(id) => id,
        outcome => panic!("expected a new blank for {needle:?}, got {outcome:?}"),
    }
}

/// Build an engine from `text` with a blank over the first occurrence of each word
pub fn engine_with_blanks(text: &str, words: &[&str]) -> (AnnotationEngine, Vec<SpanId>) {
    let mut engine = AnnotationEngine::from_text(text);
    let ids = words.iter().map(|word| select(&mut engine, word)).collect();
    (engine, ids)
}
