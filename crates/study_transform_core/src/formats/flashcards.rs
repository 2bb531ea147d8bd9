//! Flashcards: question/answer pairs for self-testing.

use serde_json::Value;

use super::{into_array, new_id, non_empty, text_field, StudyFormat};
use crate::domain::{sentinel, Flashcard, GenerationOptions, TransformationType};
use crate::ports::PortResult;
use crate::text::{char_len, first_words};

const PROMPT_TEMPLATE: &str = r#"Generate {count} flashcards from this text. Format as JSON array with objects containing "question" and "answer" fields.

Text: {text}

Example format:
[
  {
    "question": "What is photosynthesis?",
    "answer": "The process by which plants convert light energy into chemical energy"
  }
]"#;

/// Segments shorter than this are not worth a card.
const MIN_SENTENCE_CHARS: usize = 10;

pub struct FlashcardFormat;

impl StudyFormat for FlashcardFormat {
    type Output = Vec<Flashcard>;

    const KIND: TransformationType = TransformationType::Flashcards;

    fn prompt(text: &str, options: &GenerationOptions) -> String {
        PROMPT_TEMPLATE
            .replace("{count}", &options.card_count().to_string())
            .replace("{text}", text)
    }

    fn coerce(value: Value, options: &GenerationOptions) -> PortResult<Self::Output> {
        let cards = into_array(value, "flashcards")?
            .iter()
            .take(options.card_count())
            .map(|card| Flashcard {
                id: new_id(),
                question: text_field(card, "question", "Question not generated"),
                answer: text_field(card, "answer", "Answer not generated"),
            })
            .collect();
        non_empty(cards, "flashcards")
    }

    fn fallback(text: &str, options: &GenerationOptions) -> PortResult<Self::Output> {
        let cards: Vec<Flashcard> = text
            .split('.')
            .take(options.card_count())
            .map(str::trim)
            .filter(|line| char_len(line) > MIN_SENTENCE_CHARS)
            .map(|line| Flashcard {
                id: new_id(),
                question: format!("What is important about {}...?", first_words(line, 3)),
                answer: line.to_string(),
            })
            .collect();

        if cards.is_empty() {
            return Ok(generic_flashcards(
                options.subject_or("the subject"),
                options.card_count(),
            ));
        }
        Ok(cards)
    }

    fn error_placeholder() -> Self::Output {
        vec![Flashcard {
            id: new_id(),
            question: sentinel::FLASHCARDS.to_string(),
            answer: sentinel::RETRY_HINT.to_string(),
        }]
    }
}

/// At most five cards: there are only five generic prompts.
fn generic_flashcards(subject: &str, count: usize) -> Vec<Flashcard> {
    [
        (
            format!("What is {}?", subject),
            "The study material provided discusses this topic in detail.",
        ),
        (
            format!("Name a key concept in {}.", subject),
            "Key concepts include the main ideas presented in the study material.",
        ),
        (
            format!("How would you define {}?", subject),
            "It can be defined based on the content provided in your study material.",
        ),
        (
            format!("What's an example of {} in practice?", subject),
            "The study material may provide examples of practical applications.",
        ),
        (
            format!("Why is {} important?", subject),
            "Its importance is related to the context described in your study material.",
        ),
    ]
    .into_iter()
    .take(count)
    .map(|(question, answer)| Flashcard {
        id: new_id(),
        question,
        answer: answer.to_string(),
    })
    .collect()
}
