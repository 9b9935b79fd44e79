use crate::error::EvalError;
use crate::table::Table;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const SUBMISSION_FILE: &str = "submission.json";
pub const SUMMARY_FILE: &str = "summary.json";

pub fn subject_results_path(dir: &Path, subject: &str) -> PathBuf {
    dir.join(format!("{}_test.csv", subject))
}

/// Writes the augmented table of one subject as `<dir>/<subject>_test.csv`.
pub fn write_subject_results(dir: &Path, subject: &str, table: &Table) -> Result<PathBuf, EvalError> {
    fs::create_dir_all(dir)?;
    let path = subject_results_path(dir, subject);
    table.write(&path)?;
    Ok(path)
}

/// Blind-mode answers keyed by subject, then by row index.
pub fn write_submission(
    dir: &Path,
    answers: &BTreeMap<String, BTreeMap<String, String>>,
) -> Result<PathBuf, EvalError> {
    write_json(dir, SUBMISSION_FILE, answers)
}

#[derive(Debug, Serialize)]
struct Summary<'a> {
    subjects: &'a BTreeMap<String, f64>,
    average: f64,
}

/// Per-subject ratios plus their unweighted mean.
pub fn write_summary(dir: &Path, ratios: &BTreeMap<String, f64>) -> Result<PathBuf, EvalError> {
    let summary = Summary {
        subjects: ratios,
        average: average_ratio(ratios),
    };
    write_json(dir, SUMMARY_FILE, &summary)
}

pub fn average_ratio(ratios: &BTreeMap<String, f64>) -> f64 {
    if ratios.is_empty() {
        0.0
    } else {
        ratios.values().sum::<f64>() / ratios.len() as f64
    }
}

fn write_json<T: Serialize + ?Sized>(dir: &Path, name: &str, value: &T) -> Result<PathBuf, EvalError> {
    fs::create_dir_all(dir)?;
    let path = dir.join(name);
    fs::write(&path, serde_json::to_string_pretty(value)?)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_subject_results_path() {
        let path = subject_results_path(Path::new("out"), "organic_chemistry");
        assert_eq!(path, PathBuf::from("out/organic_chemistry_test.csv"));
    }

    #[test]
    fn test_write_subject_results_creates_dir() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("nested").join("results");
        let table = Table::new(vec!["question".into()], vec![vec!["q".into()]]).unwrap();

        let path = write_subject_results(&out, "physics", &table).unwrap();
        assert!(path.exists());
        assert_eq!(Table::read(&path).unwrap(), table);
    }

    #[test]
    fn test_write_submission() {
        let dir = TempDir::new().unwrap();
        let mut answers = BTreeMap::new();
        answers.insert(
            "physics".to_string(),
            BTreeMap::from([("0".to_string(), "B".to_string())]),
        );

        let path = write_submission(dir.path(), &answers).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(value["physics"]["0"], "B");
    }

    #[test]
    fn test_write_summary_average() {
        let dir = TempDir::new().unwrap();
        let ratios = BTreeMap::from([("a".to_string(), 50.0), ("b".to_string(), 100.0)]);

        let path = write_summary(dir.path(), &ratios).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(value["average"], 75.0);
        assert_eq!(value["subjects"]["a"], 50.0);
    }

    #[test]
    fn test_average_of_nothing() {
        assert_eq!(average_ratio(&BTreeMap::new()), 0.0);
    }
}
