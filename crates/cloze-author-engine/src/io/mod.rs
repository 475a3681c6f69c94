use crate::editing::{AnnotationEngine, AnnotationError};
use crate::models::StoredQuestion;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed question file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Inconsistent question file: {0}")]
    Invalid(#[from] AnnotationError),
}

/// Read a question file and rebuild its engine
pub fn load_question(path: &Path) -> Result<AnnotationEngine, IoError> {
    if !path.exists() {
        return Err(IoError::NotFound(path.to_path_buf()));
    }
    let content = fs::read_to_string(path)?;
    let stored: StoredQuestion = serde_json::from_str(&content)?;
    let engine = AnnotationEngine::from_stored(stored)?;
    log::info!(
        "Loaded question with {} blanks from {}",
        engine.registry().len(),
        path.display()
    );
    Ok(engine)
}

/// Write a question file as pretty-printed JSON
pub fn save_question(path: &Path, engine: &AnnotationEngine) -> Result<(), IoError> {
    // Create parent directories if they don't exist
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let content = serde_json::to_string_pretty(&engine.to_stored())?;
    fs::write(path, content)?;
    log::info!("Saved question to {}", path.display());
    Ok(())
}

/// Load `path` if it exists, otherwise start a new question from `seed`
pub fn load_or_seed(path: &Path, seed: &str) -> Result<AnnotationEngine, IoError> {
    match load_question(path) {
        Err(IoError::NotFound(_)) => {
            log::info!("No question at {}, starting a new one", path.display());
            Ok(AnnotationEngine::from_text(seed))
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{create_test_file, create_test_questions_dir, engine_with_blanks};

    #[test]
    fn test_save_and_load_question() {
        // Given a question with a blank
        let dir = create_test_questions_dir();
        let path = dir.path().join("nested/q1.json");
        let (engine, _) = engine_with_blanks("The cat sat on the mat.", &["cat"]);

        // When saving into a directory that does not exist yet
        save_question(&path, &engine).unwrap();

        // Then loading it gives the same engine back
        let loaded = load_question(&path).unwrap();
        assert_eq!(loaded, engine);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = create_test_questions_dir();
        let path = dir.path().join("missing.json");

        let result = load_question(&path);

        assert!(matches!(result, Err(IoError::NotFound(p)) if p == path));
    }

    #[test]
    fn test_load_malformed_json() {
        let dir = create_test_questions_dir();
        let path = create_test_file(&dir, "broken.json", "{ \"document\": [");

        assert!(matches!(load_question(&path), Err(IoError::Json(_))));
    }

    #[test]
    fn test_load_inconsistent_question() {
        let dir = create_test_questions_dir();
        let content = r#"{
            "document": [
                { "kind": "plain", "text": "The " },
                { "kind": "span", "text": "cat", "span_id": "6f1b3c2e-9a7d-4b51-8f0e-2d4c6a8b0e13" }
            ],
            "spans": []
        }"#;
        let path = create_test_file(&dir, "orphan.json", content);

        let result = load_question(&path);

        assert!(matches!(
            result,
            Err(IoError::Invalid(AnnotationError::NotFound(_)))
        ));
    }

    #[test]
    fn test_load_or_seed_starts_new_question() {
        let dir = create_test_questions_dir();
        let path = dir.path().join("new.json");

        let engine = load_or_seed(&path, "Underline the words here").unwrap();

        assert_eq!(engine.flat_text(), "Underline the words here");
        assert!(engine.registry().is_empty());
    }

    #[test]
    fn test_load_or_seed_prefers_existing_file() {
        let dir = create_test_questions_dir();
        let path = dir.path().join("q.json");
        let (engine, _) = engine_with_blanks("Paris is in France", &["Paris"]);
        save_question(&path, &engine).unwrap();

        let loaded = load_or_seed(&path, "ignored").unwrap();

        assert_eq!(loaded.render(), "____ is in France");
    }
}
