pub mod ai;
pub mod choices;
pub mod config;
pub mod error;
pub mod extract;
pub mod file_io;
pub mod logger;
pub mod models;
pub mod prompt;
pub mod table;

// Re-exports for convenience
pub use ai::{CallOutcome, HttpEndpoint, InferenceBackend, OpenRouterBackend, SubjectEvaluator};
pub use choices::ChoiceSet;
pub use config::{EndpointConfig, DEFAULT_MODEL};
pub use error::EvalError;
pub use extract::extract_answer;
pub use file_io::{write_subject_results, write_submission, write_summary};
pub use models::{
    EvalOptions, EvaluationRecord, Extraction, PromptStyle, QuestionRow, Stage, SubjectResult,
};
pub use prompt::format_example;
pub use table::{discover_subjects, Table};
