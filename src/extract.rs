//! Answer extraction from free-text model output.
//!
//! Stages run in a fixed order and the first one that yields a letter wins.
//! Only the last stage is random, so for a given row and response the result
//! is deterministic unless nothing recognizable was found.

use std::collections::HashMap;

use lazy_static::lazy_static;
use rand::Rng;
use regex::Regex;

use crate::choices::ChoiceSet;
use crate::models::{Extraction, QuestionRow, Stage};

lazy_static! {
    static ref EXPLICIT_STATEMENT: Regex = Regex::new(r"所以答案是(.+?)。").unwrap();
}

pub type Strategy = fn(&ChoiceSet, &QuestionRow, &str) -> Option<Extraction>;

pub const CASCADE: [(Stage, Strategy); 4] = [
    (Stage::Explicit, explicit_statement),
    (Stage::Phrase, structured_phrase),
    (Stage::BareLetter, bare_letter),
    (Stage::OptionText, option_text),
];

/// Runs the cascade and falls back to a uniformly random letter.
pub fn extract_answer<R: Rng + ?Sized>(
    choices: &ChoiceSet,
    row: &QuestionRow,
    response: &str,
    rng: &mut R,
) -> Extraction {
    CASCADE
        .iter()
        .find_map(|(_, strategy)| strategy(choices, row, response))
        .unwrap_or_else(|| random_letter(choices, rng))
}

/// Last "所以答案是X。" in the response, accepted only if X is exactly one choice letter.
pub fn explicit_statement(
    choices: &ChoiceSet,
    _row: &QuestionRow,
    response: &str,
) -> Option<Extraction> {
    let last = EXPLICIT_STATEMENT.captures_iter(response).last()?;
    let letter = choices.parse_letter(last.get(1)?.as_str())?;
    Some(Extraction::new(letter, Stage::Explicit))
}

/// First template (in priority order) that matches anywhere in the response.
pub fn structured_phrase(
    choices: &ChoiceSet,
    _row: &QuestionRow,
    response: &str,
) -> Option<Extraction> {
    choices.phrase_patterns().iter().find_map(|pattern| {
        let letter = pattern.captures(response)?.get(1)?.as_str().chars().next()?;
        Some(Extraction::new(letter, Stage::Phrase))
    })
}

/// First choice letter anywhere in the response.
pub fn bare_letter(choices: &ChoiceSet, _row: &QuestionRow, response: &str) -> Option<Extraction> {
    let letter = choices.bare_letter().find(response)?.as_str().chars().next()?;
    Some(Extraction::new(letter, Stage::BareLetter))
}

/// Literal option text found in the response.
///
/// Options are tried in choice order and the first one present anywhere in
/// the response wins, wherever it occurs. Empty option texts are skipped.
/// Duplicate texts map to the later letter.
pub fn option_text(choices: &ChoiceSet, row: &QuestionRow, response: &str) -> Option<Extraction> {
    let mut lookup: HashMap<&str, char> = HashMap::new();
    let mut texts = Vec::new();

    for &letter in choices.letters() {
        if let Some(text) = row.option(letter)
            && !text.is_empty()
        {
            lookup.insert(text, letter);
            texts.push(text);
        }
    }

    let found = texts.into_iter().find(|text| response.contains(*text))?;
    let letter = *lookup.get(found)?;
    Some(Extraction::new(letter, Stage::OptionText))
}

/// Source of run-to-run variance for unparseable responses.
pub fn random_letter<R: Rng + ?Sized>(choices: &ChoiceSet, rng: &mut R) -> Extraction {
    let letters = choices.letters();
    let letter = letters[rng.gen_range(0..letters.len())];
    Extraction::new(letter, Stage::Random)
}
