pub mod client;
pub mod evaluator;

// Public API exports
pub use client::{CallOutcome, HttpEndpoint, InferenceBackend, OpenRouterBackend};
pub use evaluator::{augmented_table, SubjectEvaluator, CORRECTNESS_COLUMN, MODEL_OUTPUT_COLUMN};
