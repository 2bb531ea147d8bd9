//! Practice questions: open questions with a model answer, not graded.

use serde_json::Value;

use super::{into_array, new_id, non_empty, text_field, StudyFormat};
use crate::domain::{sentinel, GenerationOptions, Question, TransformationType};
use crate::ports::PortResult;
use crate::text::{char_len, first_words, sentences};

const PROMPT_TEMPLATE: &str = r#"Generate {count} practice questions from this text. Format as JSON array with objects containing "question" and "answer" fields.

Text: {text}

Example format:
[
  {
    "question": "What is the capital of France?",
    "answer": "Paris"
  }
]"#;

const MIN_SENTENCE_CHARS: usize = 15;

pub struct QuestionFormat;

impl StudyFormat for QuestionFormat {
    type Output = Vec<Question>;

    const KIND: TransformationType = TransformationType::Questions;

    fn prompt(text: &str, options: &GenerationOptions) -> String {
        PROMPT_TEMPLATE
            .replace("{count}", &options.question_count().to_string())
            .replace("{text}", text)
    }

    fn coerce(value: Value, options: &GenerationOptions) -> PortResult<Self::Output> {
        let questions = into_array(value, "questions")?
            .iter()
            .take(options.question_count())
            .map(|item| Question {
                id: new_id(),
                question: text_field(item, "question", "Question not generated"),
                answer: text_field(item, "answer", "Answer not generated"),
            })
            .collect();
        non_empty(questions, "questions")
    }

    fn fallback(text: &str, options: &GenerationOptions) -> PortResult<Self::Output> {
        let count = options.question_count();
        let mut questions: Vec<Question> = sentences(text)
            .into_iter()
            .take(count)
            .filter(|sentence| char_len(sentence) > MIN_SENTENCE_CHARS)
            .map(|sentence| Question {
                id: new_id(),
                question: format!("What does it mean that \"{}...\"?", first_words(sentence, 8)),
                answer: sentence.to_string(),
            })
            .collect();

        let subject = options.subject_or("the topic");
        while questions.len() < count {
            questions.push(Question {
                id: new_id(),
                question: format!("What is an important aspect of {}?", subject),
                answer: "The text discusses various aspects of this topic.".to_string(),
            });
        }

        Ok(questions)
    }

    fn error_placeholder() -> Self::Output {
        vec![Question {
            id: new_id(),
            question: sentinel::QUESTIONS.to_string(),
            answer: sentinel::RETRY_HINT.to_string(),
        }]
    }
}
