pub mod stored_question;

pub use stored_question::{RunKind, StoredQuestion, StoredRun, StoredSpan};
