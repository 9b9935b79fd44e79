use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::table::Table;

/// One multiple-choice question, in choice order.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionRow {
    pub index: usize,
    pub question: String,
    pub options: Vec<(char, String)>,
    /// `None` in blind mode.
    pub answer: Option<String>,
    pub explanation: Option<String>,
}

impl QuestionRow {
    pub fn option(&self, letter: char) -> Option<&str> {
        self.options
            .iter()
            .find(|(c, _)| *c == letter)
            .map(|(_, text)| text.as_str())
    }
}

/// Which cascade stage produced an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Explicit,
    Phrase,
    BareLetter,
    OptionText,
    Random,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Extraction {
    pub letter: char,
    /// Only set by the explicit-statement stage.
    pub confident: bool,
    pub stage: Stage,
}

impl Extraction {
    pub fn new(letter: char, stage: Stage) -> Self {
        Self {
            letter,
            confident: stage == Stage::Explicit,
            stage,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationRecord {
    pub index: usize,
    pub question: String,
    pub response: String,
    pub extraction: Extraction,
    pub ground_truth: Option<String>,
    pub correct: bool,
}

/// Flags that only change how a question is rendered into a prompt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PromptStyle {
    pub cot: bool,
    pub with_prompt: bool,
}

#[derive(Debug, Clone, Default)]
pub struct EvalOptions {
    /// `false` is blind/test mode: the table carries no usable labels.
    pub ground_truth_available: bool,
    /// When set, `<dir>/<subject>_test.csv` is written after the run.
    pub persist_dir: Option<PathBuf>,
    pub prompt_style: PromptStyle,
}

#[derive(Debug, Clone)]
pub struct SubjectResult {
    pub subject: String,
    /// 0-100.
    pub ratio: f64,
    pub correct: usize,
    pub total: usize,
    pub answers: BTreeMap<String, String>,
    pub records: Vec<EvaluationRecord>,
    /// Input columns plus `model_output` and `correctness`, when persisted.
    pub augmented: Option<Table>,
}
