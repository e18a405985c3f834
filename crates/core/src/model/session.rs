use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::question::{QuestionError, TestQuestion};

/// Seconds on the clock when an exam starts (45 minutes).
pub const EXAM_DURATION_SECS: u32 = 45 * 60;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no questions available for this test")]
    Empty,

    #[error("session is not in progress")]
    NotInProgress,

    #[error(transparent)]
    Question(#[from] QuestionError),
}

/// How a test run is taken. Practice has no time pressure; the exam starts
/// with a 45-minute countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestMode {
    Practice,
    Exam,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionStatus {
    NotStarted,
    InProgress,
    Completed,
}

/// Raw correctness of a finished session, before scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionResult {
    pub correct: usize,
    pub total: usize,
}

/// In-memory test run for one learner.
///
/// Lives only as long as the taking flow; a page reload or unmount discards
/// it. Only the derived protocol record survives. `Completed` is terminal:
/// another attempt means building a brand-new session via `start`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestSession {
    mode: TestMode,
    questions: Vec<TestQuestion>,
    current: usize,
    time_remaining_secs: u32,
    status: SessionStatus,
}

impl TestSession {
    /// Starts a session over the given question set.
    ///
    /// Any answers left on the questions from an earlier run are cleared, the
    /// pointer moves to the first question, and the exam countdown is armed
    /// when `mode` is `Exam`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` if no questions are provided.
    pub fn start(mode: TestMode, mut questions: Vec<TestQuestion>) -> Result<Self, SessionError> {
        if questions.is_empty() {
            return Err(SessionError::Empty);
        }
        for question in &mut questions {
            question.clear_user_answer();
        }

        Ok(Self {
            mode,
            questions,
            current: 0,
            time_remaining_secs: match mode {
                TestMode::Exam => EXAM_DURATION_SECS,
                TestMode::Practice => 0,
            },
            status: SessionStatus::InProgress,
        })
    }

    #[must_use]
    pub fn mode(&self) -> TestMode {
        self.mode
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    #[must_use]
    pub fn questions(&self) -> &[TestQuestion] {
        &self.questions
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_question(&self) -> &TestQuestion {
        &self.questions[self.current]
    }

    #[must_use]
    pub fn time_remaining_secs(&self) -> u32 {
        self.time_remaining_secs
    }

    /// Number of questions with a recorded answer.
    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.questions
            .iter()
            .filter(|q| q.user_answer().is_some())
            .count()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.status == SessionStatus::Completed
    }

    /// Records an answer on the current question without advancing.
    ///
    /// Overwrites any earlier answer on the same question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotInProgress` outside an active run, or a
    /// `QuestionError` for an option index out of range.
    pub fn answer(&mut self, option_index: usize) -> Result<(), SessionError> {
        if self.status != SessionStatus::InProgress {
            return Err(SessionError::NotInProgress);
        }
        self.questions[self.current].set_user_answer(option_index)?;
        Ok(())
    }

    /// Moves to the next question. No-op at the last question.
    pub fn next(&mut self) {
        if self.current + 1 < self.questions.len() {
            self.current += 1;
        }
    }

    /// Moves to the previous question. No-op at the first question.
    pub fn prev(&mut self) {
        self.current = self.current.saturating_sub(1);
    }

    /// Counts down the exam clock, saturating at zero.
    ///
    /// Returns the remaining seconds. Whether to force `finish` on expiry is
    /// the caller's policy.
    pub fn tick(&mut self, elapsed_secs: u32) -> u32 {
        if self.status == SessionStatus::InProgress {
            self.time_remaining_secs = self.time_remaining_secs.saturating_sub(elapsed_secs);
        }
        self.time_remaining_secs
    }

    /// True when an exam clock has run out mid-session.
    #[must_use]
    pub fn time_expired(&self) -> bool {
        self.mode == TestMode::Exam
            && self.status == SessionStatus::InProgress
            && self.time_remaining_secs == 0
    }

    /// Ends the run and counts correct answers; unanswered questions count as
    /// incorrect. The session becomes `Completed`, which is terminal.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotInProgress` when called before `start` took
    /// effect or after the session already completed.
    pub fn finish(&mut self) -> Result<SessionResult, SessionError> {
        if self.status != SessionStatus::InProgress {
            return Err(SessionError::NotInProgress);
        }
        self.status = SessionStatus::Completed;

        Ok(SessionResult {
            correct: self.questions.iter().filter(|q| q.is_correct()).count(),
            total: self.questions.len(),
        })
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::QuestionId;

    fn build_questions(n: usize) -> Vec<TestQuestion> {
        (0..n)
            .map(|i| {
                TestQuestion::new(
                    QuestionId::new(format!("{}", i + 1)),
                    format!("Q{}", i + 1),
                    vec!["a".into(), "b".into(), "c".into()],
                    0,
                )
                .unwrap()
            })
            .collect()
    }

    #[test]
    fn empty_question_set_is_rejected() {
        let err = TestSession::start(TestMode::Practice, Vec::new()).unwrap_err();
        assert!(matches!(err, SessionError::Empty));
    }

    #[test]
    fn exam_arms_the_countdown_practice_does_not() {
        let exam = TestSession::start(TestMode::Exam, build_questions(2)).unwrap();
        assert_eq!(exam.time_remaining_secs(), 2700);

        let practice = TestSession::start(TestMode::Practice, build_questions(2)).unwrap();
        assert_eq!(practice.time_remaining_secs(), 0);
    }

    #[test]
    fn start_clears_stale_answers() {
        let mut questions = build_questions(2);
        questions[0].set_user_answer(1).unwrap();

        let session = TestSession::start(TestMode::Practice, questions).unwrap();
        assert_eq!(session.answered_count(), 0);
    }

    #[test]
    fn navigation_clamps_at_boundaries() {
        let mut session = TestSession::start(TestMode::Practice, build_questions(2)).unwrap();
        session.prev();
        assert_eq!(session.current_index(), 0);
        session.next();
        session.next();
        session.next();
        assert_eq!(session.current_index(), 1);
    }

    #[test]
    fn answer_does_not_advance_and_is_overwritable() {
        let mut session = TestSession::start(TestMode::Practice, build_questions(2)).unwrap();
        session.answer(1).unwrap();
        assert_eq!(session.current_index(), 0);
        session.answer(0).unwrap();
        assert_eq!(session.current_question().user_answer(), Some(0));
    }

    #[test]
    fn finish_counts_unanswered_as_incorrect() {
        let mut session = TestSession::start(TestMode::Practice, build_questions(3)).unwrap();
        session.answer(0).unwrap(); // correct
        session.next();
        session.answer(2).unwrap(); // incorrect
        // third question left unanswered

        let result = session.finish().unwrap();
        assert_eq!(result.correct, 1);
        assert_eq!(result.total, 3);
    }

    #[test]
    fn finish_is_rejected_when_already_completed() {
        let mut session = TestSession::start(TestMode::Practice, build_questions(1)).unwrap();
        session.finish().unwrap();
        let err = session.finish().unwrap_err();
        assert!(matches!(err, SessionError::NotInProgress));
    }

    #[test]
    fn answer_after_finish_is_rejected() {
        let mut session = TestSession::start(TestMode::Practice, build_questions(1)).unwrap();
        session.finish().unwrap();
        let err = session.answer(0).unwrap_err();
        assert!(matches!(err, SessionError::NotInProgress));
    }

    #[test]
    fn tick_saturates_and_reports_expiry() {
        let mut session = TestSession::start(TestMode::Exam, build_questions(1)).unwrap();
        assert_eq!(session.tick(2_699), 1);
        assert!(!session.time_expired());
        assert_eq!(session.tick(10), 0);
        assert!(session.time_expired());
    }
}
