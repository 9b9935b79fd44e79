use crate::ai::client::{CallOutcome, InferenceBackend};
use crate::choices::ChoiceSet;
use crate::error::EvalError;
use crate::extract::extract_answer;
use crate::file_io::write_subject_results;
use crate::logger;
use crate::models::{EvalOptions, EvaluationRecord, SubjectResult};
use crate::prompt::format_example;
use crate::table::Table;
use rand::Rng;
use std::collections::BTreeMap;

pub const MODEL_OUTPUT_COLUMN: &str = "model_output";
pub const CORRECTNESS_COLUMN: &str = "correctness";

/// Runs one subject's questions through a backend, one call at a time.
pub struct SubjectEvaluator {
    backend: Box<dyn InferenceBackend>,
    choices: ChoiceSet,
}

impl SubjectEvaluator {
    pub fn new(backend: Box<dyn InferenceBackend>, choices: ChoiceSet) -> Self {
        Self { backend, choices }
    }

    pub fn choices(&self) -> &ChoiceSet {
        &self.choices
    }

    /// Scores every row of `table` and, if `options.persist_dir` is set,
    /// writes the augmented table as `<dir>/<subject>_test.csv`.
    ///
    /// A failed inference call counts as an empty response. An empty table
    /// or a missing column is an error.
    pub async fn evaluate_subject<R: Rng + ?Sized>(
        &self,
        subject: &str,
        table: &Table,
        options: &EvalOptions,
        rng: &mut R,
    ) -> Result<SubjectResult, EvalError> {
        let rows = table.question_rows(&self.choices, options.ground_truth_available)?;
        if rows.is_empty() {
            return Err(EvalError::EmptySubject(subject.to_string()));
        }

        logger::log(&format!(
            "Evaluating {} ({} rows) with {}",
            subject,
            rows.len(),
            self.backend.model()
        ));

        let mut correct_num = 0;
        let mut answers = BTreeMap::new();
        let mut records = Vec::with_capacity(rows.len());

        for row in &rows {
            let question = format_example(row, &self.choices, false, options.prompt_style);

            let response = match self.backend.generate(&question).await {
                CallOutcome::Success(text) => text,
                CallOutcome::Failure(reason) => {
                    logger::log(&format!("API call failed for row {}: {}", row.index, reason));
                    String::new()
                }
            };

            let extraction = extract_answer(&self.choices, row, &response, rng);

            let ground_truth = if options.ground_truth_available {
                row.answer.clone()
            } else {
                None
            };
            let correct = ground_truth
                .as_deref()
                .is_some_and(|truth| truth == extraction.letter.to_string());
            if correct {
                correct_num += 1;
            }

            logger::log(&format!("=======begin {}=======", row.index));
            logger::log(&format!("question: {}", question));
            logger::log(&format!("response: {}", response));
            logger::log(&format!(
                "ans: {} ({:?}, confident: {})",
                extraction.letter, extraction.stage, extraction.confident
            ));
            logger::log(&format!(
                "ground truth: {}",
                ground_truth.as_deref().unwrap_or("NA")
            ));
            logger::log(&format!("=======end {}=======", row.index));

            answers.insert(row.index.to_string(), extraction.letter.to_string());
            records.push(EvaluationRecord {
                index: row.index,
                question,
                response,
                extraction,
                ground_truth,
                correct,
            });
        }

        let ratio = 100.0 * correct_num as f64 / rows.len() as f64;

        let augmented = match &options.persist_dir {
            Some(dir) => {
                let augmented = augmented_table(table, &records)?;
                let path = write_subject_results(dir, subject, &augmented)?;
                logger::log(&format!("Wrote {}", path.display()));
                Some(augmented)
            }
            None => None,
        };

        Ok(SubjectResult {
            subject: subject.to_string(),
            ratio,
            correct: correct_num,
            total: rows.len(),
            answers,
            records,
            augmented,
        })
    }
}

/// Input columns unchanged, then `model_output` and `correctness` (1/0).
pub fn augmented_table(table: &Table, records: &[EvaluationRecord]) -> Result<Table, EvalError> {
    let outputs = records.iter().map(|r| r.response.clone()).collect();
    let scores = records
        .iter()
        .map(|r| if r.correct { "1" } else { "0" }.to_string())
        .collect();

    table.with_appended_columns(vec![
        (MODEL_OUTPUT_COLUMN.to_string(), outputs),
        (CORRECTNESS_COLUMN.to_string(), scores),
    ])
}

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::collections::VecDeque;

/// Mock backend for testing - replays scripted outcomes and records prompts
#[cfg(test)]
pub struct MockBackend {
    outcomes: RefCell<VecDeque<CallOutcome>>,
    prompts: std::rc::Rc<RefCell<Vec<String>>>,
}

#[cfg(test)]
impl MockBackend {
    pub fn with_outcomes(outcomes: Vec<CallOutcome>) -> Self {
        Self {
            outcomes: RefCell::new(outcomes.into()),
            prompts: std::rc::Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Shared handle on the prompts seen so far
    pub fn prompts(&self) -> std::rc::Rc<RefCell<Vec<String>>> {
        self.prompts.clone()
    }
}

#[cfg(test)]
#[async_trait::async_trait(?Send)]
impl InferenceBackend for MockBackend {
    async fn generate(&self, prompt: &str) -> CallOutcome {
        self.prompts.borrow_mut().push(prompt.to_string());
        // Running out of script behaves like a dead endpoint
        self.outcomes
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| CallOutcome::Failure("no scripted response".to_string()))
    }

    fn model(&self) -> &str {
        "mock"
    }
}
