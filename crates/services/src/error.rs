//! Shared error types for the services crate.

use thiserror::Error;

use portal_core::model::{SessionError, TestId};
use storage::kv::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by the portal CRUD API client.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    #[error("portal api request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors emitted by the AI instruction generator client.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GeneratorError {
    #[error("profession is required for generation")]
    MissingProfession,
    #[error("generation request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors emitted by the video upload client.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum UploadError {
    #[error("upload rejected: {0}")]
    Rejected(String),
    #[error("upload request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by the test-taking flow.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TestingError {
    #[error("test {0} is not in the catalog")]
    UnknownTest(TestId),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
