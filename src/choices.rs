use crate::error::EvalError;
use regex::Regex;

pub const DEFAULT_LETTERS: [char; 4] = ['A', 'B', 'C', 'D'];

/// Structured-phrase templates in priority order. `{c}` is replaced by a
/// character class of the choice letters and is the single capture.
const PHRASE_TEMPLATES: &[&str] = &[
    "({c})是正确的",
    "选项({c})正确",
    "答案为({c})",
    "答案是({c})",
    "答案({c})",
    "选择({c})",
    "答案：({c})",
    "选择答案({c})",
    "({c}) (?i:is correct)",
    "(?i:answer is) ({c})",
    "(?i:answer) ({c})",
    "(?i:choose) ({c})",
    "(?i:answer): ?({c})",
];

/// The ordered answer alphabet of a subject, plus the patterns derived from it.
#[derive(Debug, Clone)]
pub struct ChoiceSet {
    letters: Vec<char>,
    phrase_patterns: Vec<Regex>,
    bare_letter: Regex,
}

impl ChoiceSet {
    pub fn new(letters: &[char]) -> Result<Self, EvalError> {
        if letters.is_empty() {
            return Err(EvalError::InvalidChoices("no letters given".to_string()));
        }

        for (i, c) in letters.iter().enumerate() {
            if !c.is_ascii_uppercase() {
                return Err(EvalError::InvalidChoices(format!(
                    "`{}` is not an uppercase ASCII letter",
                    c
                )));
            }
            if letters[..i].contains(c) {
                return Err(EvalError::InvalidChoices(format!("`{}` appears twice", c)));
            }
        }

        let class: String = format!("[{}]", letters.iter().collect::<String>());
        let phrase_patterns = PHRASE_TEMPLATES
            .iter()
            .map(|t| Regex::new(&t.replace("{c}", &class)))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| EvalError::InvalidChoices(e.to_string()))?;
        let bare_letter =
            Regex::new(&class).map_err(|e| EvalError::InvalidChoices(e.to_string()))?;

        Ok(Self {
            letters: letters.to_vec(),
            phrase_patterns,
            bare_letter,
        })
    }

    pub fn letters(&self) -> &[char] {
        &self.letters
    }

    pub fn len(&self) -> usize {
        self.letters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.letters.is_empty()
    }

    pub fn contains(&self, letter: char) -> bool {
        self.letters.contains(&letter)
    }

    /// Exact single-letter membership of a captured string.
    pub fn parse_letter(&self, text: &str) -> Option<char> {
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if self.contains(c) => Some(c),
            _ => None,
        }
    }

    pub fn phrase_patterns(&self) -> &[Regex] {
        &self.phrase_patterns
    }

    pub fn bare_letter(&self) -> &Regex {
        &self.bare_letter
    }
}

impl Default for ChoiceSet {
    fn default() -> Self {
        Self::new(&DEFAULT_LETTERS).expect("default choice letters are valid")
    }
}
