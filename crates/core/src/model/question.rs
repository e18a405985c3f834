use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::QuestionId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question text cannot be empty")]
    EmptyText,

    #[error("a question needs at least two options, got {len}")]
    TooFewOptions { len: usize },

    #[error("answer index {index} is out of range for {len} options")]
    AnswerOutOfRange { index: usize, len: usize },
}

/// A single multiple-choice question.
///
/// Everything except `user_answer` is immutable after construction;
/// `user_answer` may be set and overwritten while the learner revisits
/// the question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestQuestion {
    id: QuestionId,
    #[serde(rename = "question")]
    text: String,
    options: Vec<String>,
    correct_answer: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user_answer: Option<usize>,
}

impl TestQuestion {
    /// Builds a question, checking that the correct answer points at a real option.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` for empty text, fewer than two options, or a
    /// correct-answer index outside the options.
    pub fn new(
        id: QuestionId,
        text: impl Into<String>,
        options: Vec<String>,
        correct_answer: usize,
    ) -> Result<Self, QuestionError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(QuestionError::EmptyText);
        }
        if options.len() < 2 {
            return Err(QuestionError::TooFewOptions { len: options.len() });
        }
        if correct_answer >= options.len() {
            return Err(QuestionError::AnswerOutOfRange {
                index: correct_answer,
                len: options.len(),
            });
        }

        Ok(Self {
            id,
            text,
            options,
            correct_answer,
            user_answer: None,
        })
    }

    #[must_use]
    pub fn id(&self) -> &QuestionId {
        &self.id
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn correct_answer(&self) -> usize {
        self.correct_answer
    }

    #[must_use]
    pub fn user_answer(&self) -> Option<usize> {
        self.user_answer
    }

    /// Records the learner's choice. Overwrites any earlier choice.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::AnswerOutOfRange` if `index` does not point at
    /// an option.
    pub fn set_user_answer(&mut self, index: usize) -> Result<(), QuestionError> {
        if index >= self.options.len() {
            return Err(QuestionError::AnswerOutOfRange {
                index,
                len: self.options.len(),
            });
        }
        self.user_answer = Some(index);
        Ok(())
    }

    /// Removes any recorded choice, used when a fresh session starts.
    pub fn clear_user_answer(&mut self) {
        self.user_answer = None;
    }

    /// True when the learner picked the correct option. Unanswered counts as
    /// incorrect.
    #[must_use]
    pub fn is_correct(&self) -> bool {
        self.user_answer == Some(self.correct_answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_question() -> TestQuestion {
        TestQuestion::new(
            QuestionId::new("1"),
            "Какова минимальная высота для работ на высоте?",
            vec!["1 метр".into(), "1.8 метра".into(), "2 метра".into()],
            1,
        )
        .unwrap()
    }

    #[test]
    fn unanswered_is_incorrect() {
        let q = build_question();
        assert!(!q.is_correct());
    }

    #[test]
    fn answer_can_be_overwritten() {
        let mut q = build_question();
        q.set_user_answer(0).unwrap();
        assert!(!q.is_correct());
        q.set_user_answer(1).unwrap();
        assert!(q.is_correct());
    }

    #[test]
    fn out_of_range_answer_is_rejected() {
        let mut q = build_question();
        let err = q.set_user_answer(3).unwrap_err();
        assert!(matches!(err, QuestionError::AnswerOutOfRange { .. }));
        assert_eq!(q.user_answer(), None);
    }

    #[test]
    fn correct_answer_must_point_at_option() {
        let err = TestQuestion::new(
            QuestionId::new("1"),
            "Q",
            vec!["a".into(), "b".into()],
            2,
        )
        .unwrap_err();
        assert!(matches!(err, QuestionError::AnswerOutOfRange { .. }));
    }

    #[test]
    fn serializes_with_camel_case_fields() {
        let q = build_question();
        let json = serde_json::to_value(&q).unwrap();
        assert!(json.get("correctAnswer").is_some());
        assert!(json.get("userAnswer").is_none());
    }
}
