//! Quiz: multiple-choice questions with four options each.

use serde_json::Value;

use super::{new_id, non_empty, text_field, value_as_text, StudyFormat};
use crate::domain::{sentinel, GenerationOptions, Quiz, QuizQuestion, TransformationType};
use crate::ports::{PortError, PortResult};
use crate::text::{char_len, sentences};

const PROMPT_TEMPLATE: &str = r#"Create a quiz with {count} multiple-choice questions from this text. Format as JSON with a "questions" array. Each question object should have "question", "answers" (array of 4 choices), and "correctAnswerIndex" (index 0-3 of correct answer).

Text: {text}

Example format:
{
  "questions": [
    {
      "question": "What is the capital of France?",
      "answers": ["London", "Paris", "Berlin", "Madrid"],
      "correctAnswerIndex": 1
    }
  ]
}"#;

pub const ANSWERS_PER_QUESTION: usize = 4;
const MIN_SENTENCE_CHARS: usize = 15;
/// Words longer than this are used as distractor material.
const MIN_KEYWORD_CHARS: usize = 5;

pub struct QuizFormat;

impl StudyFormat for QuizFormat {
    type Output = Quiz;

    const KIND: TransformationType = TransformationType::Quiz;

    fn prompt(text: &str, options: &GenerationOptions) -> String {
        PROMPT_TEMPLATE
            .replace("{count}", &options.question_count().to_string())
            .replace("{text}", text)
    }

    fn coerce(value: Value, options: &GenerationOptions) -> PortResult<Self::Output> {
        let items = match value.get("questions") {
            Some(Value::Array(items)) => items,
            _ => return Err(PortError::InvalidOutput("Invalid quiz format".to_string())),
        };

        let questions = items
            .iter()
            .take(options.question_count())
            .map(|item| {
                // The key must name one of the model's own answers that survives
                // truncation, never a padded `Option N`.
                let keyable = match item.get("answers") {
                    Some(Value::Array(raw)) => raw.len().min(ANSWERS_PER_QUESTION),
                    _ => 0,
                };
                let correct_answer_index = item
                    .get("correctAnswerIndex")
                    .and_then(Value::as_u64)
                    .and_then(|index| usize::try_from(index).ok())
                    .filter(|index| *index < keyable)
                    .unwrap_or(0);
                let answers = coerce_answers(item.get("answers"));
                QuizQuestion {
                    id: new_id(),
                    question: text_field(item, "question", "Question not generated"),
                    answers,
                    correct_answer_index,
                }
            })
            .collect();

        Ok(Quiz {
            questions: non_empty(questions, "quiz questions")?,
        })
    }

    /// The correct answer is always the first option here; the options are
    /// not shuffled.
    fn fallback(text: &str, options: &GenerationOptions) -> PortResult<Self::Output> {
        let count = options.question_count();
        let subject = options.subject_or("the subject");
        let keywords: Vec<&str> = text
            .split(' ')
            .filter(|word| char_len(word) > MIN_KEYWORD_CHARS)
            .collect();

        let mut questions: Vec<QuizQuestion> = sentences(text)
            .into_iter()
            .take(count)
            .enumerate()
            .filter(|(_, sentence)| char_len(sentence) > MIN_SENTENCE_CHARS)
            .map(|(index, sentence)| {
                let keyword = if keywords.is_empty() {
                    "this topic"
                } else {
                    keywords[index % keywords.len()]
                };
                QuizQuestion {
                    id: new_id(),
                    question: format!("Which statement is true about {}?", subject),
                    answers: vec![
                        sentence.to_string(),
                        format!("The opposite of {}", sentence),
                        format!("{} is unrelated to {}", subject, keyword),
                        "None of the above".to_string(),
                    ],
                    correct_answer_index: 0,
                }
            })
            .collect();

        while questions.len() < count {
            questions.push(QuizQuestion {
                id: new_id(),
                question: format!("What best describes {}?", subject),
                answers: vec![
                    "It is as described in the text".to_string(),
                    "It is unrelated to the text".to_string(),
                    "It contradicts the text".to_string(),
                    "None of the above".to_string(),
                ],
                correct_answer_index: 0,
            });
        }

        Ok(Quiz { questions })
    }

    fn error_placeholder() -> Self::Output {
        Quiz {
            questions: vec![QuizQuestion {
                id: new_id(),
                question: sentinel::QUIZ.to_string(),
                answers: default_answers(),
                correct_answer_index: 0,
            }],
        }
    }
}

/// Exactly four options: extra ones are dropped, missing ones get `Option N`.
fn coerce_answers(value: Option<&Value>) -> Vec<String> {
    let Some(Value::Array(items)) = value else {
        return default_answers();
    };

    let mut answers: Vec<String> = items
        .iter()
        .take(ANSWERS_PER_QUESTION)
        .enumerate()
        .map(|(index, answer)| {
            value_as_text(answer).unwrap_or_else(|| format!("Option {}", index + 1))
        })
        .collect();
    while answers.len() < ANSWERS_PER_QUESTION {
        answers.push(format!("Option {}", answers.len() + 1));
    }
    answers
}

fn default_answers() -> Vec<String> {
    (1..=ANSWERS_PER_QUESTION)
        .map(|n| format!("Option {}", n))
        .collect()
}
