use serde::{Deserialize, Serialize};

/// Kind of instructional document the portal manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstructionKind {
    /// Occupational-safety instruction (ИОТ).
    Iot,
    /// Job description.
    Job,
    /// Equipment operating instruction.
    Equipment,
}

/// Catalog entry returned by the remote instruction API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instruction {
    pub id: i64,
    pub title: String,
    pub category: String,
    pub industry: Option<String>,
    pub profession: Option<String>,
    #[serde(rename = "lastUpdated")]
    pub last_updated: Option<String>,
}

/// Payload for creating an instruction on the remote API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstructionDraft {
    pub title: String,
    pub category: String,
    pub industry: String,
    pub profession: String,
    pub content: String,
    pub created_by: i64,
}

/// Request for the AI generation endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationRequest {
    #[serde(rename = "type")]
    pub kind: InstructionKind,
    pub profession: String,
    pub industry: String,
    pub additional_info: String,
}

/// Document produced by the AI generation endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GeneratedInstruction {
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub industry: String,
    pub profession: String,
    pub content: String,
}

impl GeneratedInstruction {
    /// Converts the generated document into a create payload for the
    /// instruction catalog.
    #[must_use]
    pub fn into_draft(self, created_by: i64) -> InstructionDraft {
        InstructionDraft {
            title: self.title,
            category: self.kind,
            industry: self.industry,
            profession: self.profession,
            content: self.content,
            created_by,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_request_uses_wire_field_names() {
        let request = GenerationRequest {
            kind: InstructionKind::Iot,
            profession: "Электрик".into(),
            industry: "Энергетика".into(),
            additional_info: String::new(),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["type"], "iot");
        assert!(json.get("additional_info").is_some());
    }

    #[test]
    fn generated_document_becomes_a_draft() {
        let generated = GeneratedInstruction {
            title: "ИОТ для электрика".into(),
            kind: "iot".into(),
            industry: "Энергетика".into(),
            profession: "Электрик".into(),
            content: "1. Общие требования...".into(),
        };
        let draft = generated.into_draft(1);
        assert_eq!(draft.category, "iot");
        assert_eq!(draft.created_by, 1);
    }
}
