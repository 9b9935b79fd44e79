use crate::choices::ChoiceSet;
use crate::error::EvalError;
use crate::models::QuestionRow;
use std::fs;
use std::path::{Path, PathBuf};

pub const QUESTION_COLUMN: &str = "question";
pub const ANSWER_COLUMN: &str = "answer";
pub const EXPLANATION_COLUMN: &str = "explanation";

/// A header row plus string records, all of the same width.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    pub headers: Vec<String>,
    pub records: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>, records: Vec<Vec<String>>) -> Result<Self, EvalError> {
        for (row, record) in records.iter().enumerate() {
            if record.len() != headers.len() {
                return Err(EvalError::RowWidth {
                    row,
                    expected: headers.len(),
                    found: record.len(),
                });
            }
        }
        Ok(Self { headers, records })
    }

    pub fn read(path: &Path) -> Result<Self, EvalError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(path)?;

        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        let mut records: Vec<Vec<String>> = Vec::new();
        for record in reader.records() {
            records.push(record?.iter().map(str::to_string).collect());
        }

        Self::new(headers, records)
    }

    pub fn write(&self, path: &Path) -> Result<(), EvalError> {
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(&self.headers)?;
        for record in &self.records {
            writer.write_record(record)?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    fn require_column(&self, name: &str) -> Result<usize, EvalError> {
        self.column_index(name)
            .ok_or_else(|| EvalError::MissingColumn(name.to_string()))
    }

    /// Copy of the table with extra columns appended after the existing ones.
    pub fn with_appended_columns(
        &self,
        columns: Vec<(String, Vec<String>)>,
    ) -> Result<Table, EvalError> {
        for (name, values) in &columns {
            if values.len() != self.records.len() {
                return Err(EvalError::ColumnLength {
                    column: name.clone(),
                    expected: self.records.len(),
                    found: values.len(),
                });
            }
        }

        let mut headers = self.headers.clone();
        let mut records = self.records.clone();
        for (name, values) in columns {
            headers.push(name);
            for (record, value) in records.iter_mut().zip(values) {
                record.push(value);
            }
        }

        Ok(Table { headers, records })
    }

    /// Parses every record into a question. The answer column is only
    /// required when ground truth is expected.
    pub fn question_rows(
        &self,
        choices: &ChoiceSet,
        require_answer: bool,
    ) -> Result<Vec<QuestionRow>, EvalError> {
        let question_idx = self.require_column(QUESTION_COLUMN)?;
        let option_idx = choices
            .letters()
            .iter()
            .map(|&c| Ok((c, self.require_column(&c.to_string())?)))
            .collect::<Result<Vec<_>, EvalError>>()?;
        let answer_idx = if require_answer {
            Some(self.require_column(ANSWER_COLUMN)?)
        } else {
            None
        };
        let explanation_idx = self.column_index(EXPLANATION_COLUMN);

        Ok(self
            .records
            .iter()
            .enumerate()
            .map(|(index, record)| QuestionRow {
                index,
                question: record[question_idx].clone(),
                options: option_idx
                    .iter()
                    .map(|&(c, i)| (c, record[i].clone()))
                    .collect(),
                answer: answer_idx.map(|i| record[i].trim().to_string()),
                explanation: explanation_idx.map(|i| record[i].clone()),
            })
            .collect())
    }
}

/// Lists `<data_dir>/<split>/<subject>_<split>.csv` files as `(subject, path)`.
pub fn discover_subjects(data_dir: &Path, split: &str) -> Vec<(String, PathBuf)> {
    let split_dir = data_dir.join(split);
    let suffix = format!("_{}", split);
    let mut subjects = Vec::new();

    if split_dir.is_dir()
        && let Ok(entries) = fs::read_dir(&split_dir)
    {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "csv")
                && let Some(stem) = path.file_stem().map(|s| s.to_string_lossy().to_string())
                && let Some(subject) = stem.strip_suffix(&suffix)
                && !subject.is_empty()
            {
                subjects.push((subject.to_string(), path));
            }
        }
    }

    subjects.sort();
    subjects
}
