use serde::{Deserialize, Serialize};

/// Role string passed around the portal. No authorization model beyond this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Listener,
}

/// Staff account as returned by the remote user API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub full_name: String,
    pub position: Option<String>,
    pub department: Option<String>,
    pub role: Role,
    pub email: Option<String>,
}

/// Payload for creating a staff account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserDraft {
    pub full_name: String,
    pub position: String,
    pub department: String,
    pub role: Role,
    pub email: String,
}

/// Training program as returned by the remote API, with aggregate
/// assignment counters the backend computes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    /// Human-readable duration, e.g. `40 часов`.
    pub duration: String,
    #[serde(rename = "passingScore")]
    pub passing_score: u8,
    pub students: u32,
    pub progress: u8,
}

/// Assignment row scoped to one learner (`?user_id=` query).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearnerAssignment {
    pub id: i64,
    pub title: String,
    pub deadline: Option<String>,
    pub status: String,
    pub progress: u8,
}

/// Assignment row in the admin overview (all learners).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentOverview {
    pub id: i64,
    #[serde(rename = "studentName")]
    pub student_name: String,
    #[serde(rename = "programTitle")]
    pub program_title: String,
    pub deadline: Option<String>,
    pub status: String,
}

/// Payload for assigning a program to a learner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssignmentDraft {
    pub user_id: i64,
    pub program_id: i64,
    pub assigned_by: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Listener).unwrap(), "\"listener\"");
    }

    #[test]
    fn assignment_overview_parses_wire_shape() {
        let json = r#"{
            "id": 7,
            "studentName": "Иванов Иван",
            "programTitle": "Работа на высоте",
            "deadline": "2026-09-01",
            "status": "assigned"
        }"#;
        let row: AssignmentOverview = serde_json::from_str(json).unwrap();
        assert_eq!(row.program_title, "Работа на высоте");
        assert_eq!(row.deadline.as_deref(), Some("2026-09-01"));
    }

    #[test]
    fn assignment_draft_omits_missing_deadline() {
        let draft = AssignmentDraft {
            user_id: 1,
            program_id: 2,
            assigned_by: 1,
            deadline: None,
        };
        let json = serde_json::to_string(&draft).unwrap();
        assert!(!json.contains("deadline"));
    }
}
