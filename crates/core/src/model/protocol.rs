use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::session::SessionResult;
use crate::model::{ProtocolId, TestId};

/// Minimum score percentage required to mark a test as passed.
pub const PASSING_THRESHOLD: u8 = 80;

/// Score as a whole percentage, rounded half-up: `round(100 * correct / total)`.
///
/// An empty test scores zero.
#[must_use]
pub fn score_percentage(correct: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let rounded = (200 * correct + total) / (2 * total);
    u8::try_from(rounded).unwrap_or(100)
}

/// Record of one completed test attempt.
///
/// Appended to the protocol registry when a session finishes; identity is
/// `id`, while `protocol_number` is the human-facing label shown on paper
/// protocols. Field names serialize in camelCase to match the persisted
/// registry entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtocolRecord {
    id: ProtocolId,
    protocol_number: String,
    test_id: TestId,
    test_title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    listener_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    listener_position: Option<String>,
    percentage: u8,
    passed: bool,
    completed_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
}

impl ProtocolRecord {
    /// Derives a protocol from a finished session result.
    ///
    /// Scoring follows §`score_percentage`; `passed` is the threshold check
    /// against [`PASSING_THRESHOLD`].
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn from_result(
        id: ProtocolId,
        protocol_number: impl Into<String>,
        test_id: TestId,
        test_title: impl Into<String>,
        listener_name: Option<String>,
        listener_position: Option<String>,
        result: SessionResult,
        completed_at: DateTime<Utc>,
    ) -> Self {
        let percentage = score_percentage(result.correct, result.total);
        Self {
            id,
            protocol_number: protocol_number.into(),
            test_id,
            test_title: test_title.into(),
            listener_name,
            listener_position,
            percentage,
            passed: percentage >= PASSING_THRESHOLD,
            completed_at,
            created_at: completed_at,
        }
    }

    #[must_use]
    pub fn id(&self) -> &ProtocolId {
        &self.id
    }

    #[must_use]
    pub fn protocol_number(&self) -> &str {
        &self.protocol_number
    }

    #[must_use]
    pub fn test_id(&self) -> &TestId {
        &self.test_id
    }

    #[must_use]
    pub fn test_title(&self) -> &str {
        &self.test_title
    }

    #[must_use]
    pub fn listener_name(&self) -> Option<&str> {
        self.listener_name.as_deref()
    }

    #[must_use]
    pub fn listener_position(&self) -> Option<&str> {
        self.listener_position.as_deref()
    }

    #[must_use]
    pub fn percentage(&self) -> u8 {
        self.percentage
    }

    #[must_use]
    pub fn passed(&self) -> bool {
        self.passed
    }

    #[must_use]
    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
