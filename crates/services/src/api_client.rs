use portal_core::model::{
    AssignmentDraft, AssignmentOverview, Instruction, InstructionDraft, LearnerAssignment,
    Program, Role, User, UserDraft,
};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// Env var naming the portal backend base URL.
pub const API_URL_ENV: &str = "PORTAL_API_URL";

const DEFAULT_API_URL: &str = "http://localhost:3001/api/data";

#[derive(Debug, Deserialize)]
struct UsersEnvelope {
    users: Vec<User>,
}

#[derive(Debug, Deserialize)]
struct InstructionsEnvelope {
    instructions: Vec<Instruction>,
}

#[derive(Debug, Deserialize)]
struct ProgramsEnvelope {
    programs: Vec<Program>,
}

#[derive(Debug, Deserialize)]
struct AssignmentsEnvelope<T> {
    assignments: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct CreatedId {
    id: i64,
}

/// Client for the portal's CRUD backend.
///
/// The backend multiplexes every resource behind one endpoint; the resource
/// is selected with a `path` query parameter and filters ride along as
/// further parameters.
#[derive(Debug, Clone)]
pub struct PortalApi {
    client: reqwest::Client,
    base_url: String,
}

impl PortalApi {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Builds a client from `PORTAL_API_URL`, falling back to the local dev
    /// backend.
    #[must_use]
    pub fn from_env() -> Self {
        let base_url =
            std::env::var(API_URL_ENV).unwrap_or_else(|_| DEFAULT_API_URL.to_owned());
        Self::new(base_url)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(query)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::HttpStatus(status));
        }
        Ok(response.json().await?)
    }

    async fn post_json<B: serde::Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self
            .client
            .post(&self.base_url)
            .query(&[("path", path)])
            .json(body)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::HttpStatus(status));
        }
        Ok(response.json().await?)
    }

    /// Staff accounts, optionally restricted to one role.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on a non-2xx response or transport failure.
    pub async fn list_users(&self, role: Option<Role>) -> Result<Vec<User>, ApiError> {
        let envelope: UsersEnvelope = match role {
            Some(Role::Admin) => {
                self.get_json(&[("path", "users"), ("role", "admin")]).await?
            }
            Some(Role::Listener) => {
                self.get_json(&[("path", "users"), ("role", "listener")])
                    .await?
            }
            None => self.get_json(&[("path", "users")]).await?,
        };
        Ok(envelope.users)
    }

    /// Creates a staff account and returns its id.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on a non-2xx response or transport failure.
    pub async fn create_user(&self, draft: &UserDraft) -> Result<i64, ApiError> {
        let created: CreatedId = self.post_json("users", draft).await?;
        Ok(created.id)
    }

    /// Instruction catalog, optionally filtered by category and industry.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on a non-2xx response or transport failure.
    pub async fn list_instructions(
        &self,
        category: Option<&str>,
        industry: Option<&str>,
    ) -> Result<Vec<Instruction>, ApiError> {
        let mut query = vec![("path", "instructions")];
        if let Some(category) = category {
            query.push(("category", category));
        }
        if let Some(industry) = industry {
            query.push(("industry", industry));
        }
        let envelope: InstructionsEnvelope = self.get_json(&query).await?;
        Ok(envelope.instructions)
    }

    /// Saves an instruction document and returns its id.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on a non-2xx response or transport failure.
    pub async fn create_instruction(&self, draft: &InstructionDraft) -> Result<i64, ApiError> {
        let created: CreatedId = self.post_json("instructions", draft).await?;
        Ok(created.id)
    }

    /// Training programs with their assignment counters.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on a non-2xx response or transport failure.
    pub async fn list_programs(&self) -> Result<Vec<Program>, ApiError> {
        let envelope: ProgramsEnvelope = self.get_json(&[("path", "programs")]).await?;
        Ok(envelope.programs)
    }

    /// Admin view over every assignment.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on a non-2xx response or transport failure.
    pub async fn list_assignments(&self) -> Result<Vec<AssignmentOverview>, ApiError> {
        let envelope: AssignmentsEnvelope<AssignmentOverview> =
            self.get_json(&[("path", "assignments")]).await?;
        Ok(envelope.assignments)
    }

    /// Assignments scoped to one learner.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on a non-2xx response or transport failure.
    pub async fn learner_assignments(
        &self,
        user_id: i64,
    ) -> Result<Vec<LearnerAssignment>, ApiError> {
        let user_id = user_id.to_string();
        let envelope: AssignmentsEnvelope<LearnerAssignment> = self
            .get_json(&[("path", "assignments"), ("user_id", &user_id)])
            .await?;
        Ok(envelope.assignments)
    }

    /// Assigns a program to a learner and returns the assignment id.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on a non-2xx response or transport failure.
    pub async fn create_assignment(&self, draft: &AssignmentDraft) -> Result<i64, ApiError> {
        let created: CreatedId = self.post_json("assignments", draft).await?;
        Ok(created.id)
    }
}
