use portal_core::model::{GeneratedInstruction, GenerationRequest, InstructionKind};

use crate::error::GeneratorError;

/// Env var naming the generation endpoint.
pub const GENERATOR_URL_ENV: &str = "PORTAL_AI_URL";

const DEFAULT_GENERATOR_URL: &str = "http://localhost:3001/api/generate-instruction";

/// Client for the AI instruction generation endpoint.
#[derive(Debug, Clone)]
pub struct AiGenerator {
    client: reqwest::Client,
    endpoint: String,
}

impl AiGenerator {
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    /// Builds a generator from `PORTAL_AI_URL`, falling back to the local dev
    /// endpoint.
    #[must_use]
    pub fn from_env() -> Self {
        let endpoint =
            std::env::var(GENERATOR_URL_ENV).unwrap_or_else(|_| DEFAULT_GENERATOR_URL.to_owned());
        Self::new(endpoint)
    }

    /// Asks the backend to draft an instruction document.
    ///
    /// The profession is validated locally; the generator produces garbage
    /// without one, so an empty profession never reaches the wire.
    ///
    /// # Errors
    ///
    /// Returns `GeneratorError::MissingProfession` for a blank profession,
    /// `HttpStatus` for a non-2xx response, or `Http` for transport failures.
    pub async fn generate(
        &self,
        kind: InstructionKind,
        profession: &str,
        industry: &str,
        additional_info: &str,
    ) -> Result<GeneratedInstruction, GeneratorError> {
        if profession.trim().is_empty() {
            return Err(GeneratorError::MissingProfession);
        }

        let request = GenerationRequest {
            kind,
            profession: profession.to_owned(),
            industry: industry.to_owned(),
            additional_info: additional_info.to_owned(),
        };

        let response = self.client.post(&self.endpoint).json(&request).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(GeneratorError::HttpStatus(status));
        }
        Ok(response.json().await?)
    }
}
