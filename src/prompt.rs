use crate::choices::ChoiceSet;
use crate::models::{PromptStyle, QuestionRow};

const STEP_BY_STEP: &str = "让我们一步一步思考，\n";

/// Renders a question with its options and an answer cue.
///
/// With `include_answer` the ground truth (and explanation in chain-of-thought
/// mode) is appended, which is how worked examples are shown.
pub fn format_example(
    row: &QuestionRow,
    choices: &ChoiceSet,
    include_answer: bool,
    style: PromptStyle,
) -> String {
    let mut example = row.question.clone();
    for &letter in choices.letters() {
        example.push_str(&format!("\n{}. {}", letter, row.option(letter).unwrap_or("")));
    }

    if include_answer {
        let answer = row.answer.as_deref().unwrap_or("");
        if style.cot {
            let explanation = row.explanation.as_deref().unwrap_or("");
            example.push_str(&format!(
                "\n答案：{}{}\n所以答案是{}。\n\n",
                STEP_BY_STEP, explanation, answer
            ));
        } else {
            example.push_str(&format!("\n答案：{}\n\n", answer));
        }
        return example;
    }

    let cue = match (style.with_prompt, style.cot) {
        (false, false) => "\n答案：".to_string(),
        (false, true) => format!("\n答案：{}1.", STEP_BY_STEP),
        (true, false) => "\n答案是什么？ ".to_string(),
        (true, true) => format!("\n答案是什么？{}1.", STEP_BY_STEP),
    };
    example.push_str(&cue);
    example
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> QuestionRow {
        QuestionRow {
            index: 3,
            question: "下列属于纯净物的是".to_string(),
            options: vec![
                ('A', "空气".to_string()),
                ('B', "蒸馏水".to_string()),
                ('C', "海水".to_string()),
                ('D', "石油".to_string()),
            ],
            answer: Some("B".to_string()),
            explanation: Some("1. 蒸馏水只含一种物质".to_string()),
        }
    }

    #[test]
    fn test_plain_question() {
        let prompt = format_example(&row(), &ChoiceSet::default(), false, PromptStyle::default());
        assert_eq!(
            prompt,
            "下列属于纯净物的是\nA. 空气\nB. 蒸馏水\nC. 海水\nD. 石油\n答案："
        );
    }

    #[test]
    fn test_question_never_leaks_answer() {
        let style = PromptStyle {
            cot: true,
            with_prompt: true,
        };
        let prompt = format_example(&row(), &ChoiceSet::default(), false, style);
        assert!(prompt.ends_with("答案是什么？让我们一步一步思考，\n1."));
        assert!(!prompt.contains("所以答案是"));
    }

    #[test]
    fn test_with_prompt_cue() {
        let style = PromptStyle {
            cot: false,
            with_prompt: true,
        };
        let prompt = format_example(&row(), &ChoiceSet::default(), false, style);
        assert!(prompt.ends_with("\n答案是什么？ "));
    }

    #[test]
    fn test_worked_example_with_cot() {
        let style = PromptStyle {
            cot: true,
            with_prompt: false,
        };
        let prompt = format_example(&row(), &ChoiceSet::default(), true, style);
        assert!(prompt.ends_with("答案：让我们一步一步思考，\n1. 蒸馏水只含一种物质\n所以答案是B。\n\n"));
    }

    #[test]
    fn test_worked_example_plain() {
        let prompt = format_example(&row(), &ChoiceSet::default(), true, PromptStyle::default());
        assert!(prompt.ends_with("D. 石油\n答案：B\n\n"));
    }
}
