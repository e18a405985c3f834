use portal_core::Clock;
use portal_core::model::{
    ProtocolId, ProtocolRecord, TestId, TestMeta, TestMode, TestSession,
};
use storage::stores::{ProtocolRegistryStore, TestsCatalogStore};

use crate::error::TestingError;

/// Who is taking the test, as far as the protocol needs to know.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listener {
    pub name: Option<String>,
    pub position: Option<String>,
}

impl Listener {
    #[must_use]
    pub fn named(name: impl Into<String>, position: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            position: Some(position.into()),
        }
    }
}

/// Next human-facing protocol label for a registry.
///
/// Scans existing `№ N` labels and issues max+1, so numbers stay unique
/// within one registry without extra persisted state. Labels that are not
/// of that form are ignored.
#[must_use]
pub fn next_protocol_number(records: &[ProtocolRecord]) -> String {
    let max = records
        .iter()
        .filter_map(|r| r.protocol_number().strip_prefix("№ "))
        .filter_map(|n| n.trim().parse::<u64>().ok())
        .max()
        .unwrap_or(0);
    format!("№ {}", max + 1)
}

/// Orchestrates one test attempt: session start from the catalog, and the
/// finish step that derives and persists the protocol.
#[derive(Clone)]
pub struct TestingService {
    clock: Clock,
    tests: TestsCatalogStore,
    protocols: ProtocolRegistryStore,
}

impl TestingService {
    #[must_use]
    pub fn new(clock: Clock, tests: TestsCatalogStore, protocols: ProtocolRegistryStore) -> Self {
        Self {
            clock,
            tests,
            protocols,
        }
    }

    /// Starts a fresh session over a catalog test's questions.
    ///
    /// Every attempt gets a brand-new session; nothing of a previous run
    /// carries over.
    ///
    /// # Errors
    ///
    /// Returns `TestingError::UnknownTest` if the id is not in the catalog,
    /// or a `SessionError` if the test has no questions.
    pub async fn start(
        &self,
        test_id: &TestId,
        mode: TestMode,
    ) -> Result<(TestMeta, TestSession), TestingError> {
        let test = self
            .tests
            .get(test_id)
            .await
            .ok_or_else(|| TestingError::UnknownTest(test_id.clone()))?;
        let session = TestSession::start(mode, test.questions.clone())?;
        Ok((test, session))
    }

    /// Ends the session, scores it, and appends the derived protocol to the
    /// registry. The session is left `Completed` and is not touched further.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the session is not in progress, or a
    /// `StorageError` if the registry write fails (in which case no protocol
    /// was recorded).
    pub async fn finish(
        &self,
        test: &TestMeta,
        session: &mut TestSession,
        listener: Listener,
    ) -> Result<ProtocolRecord, TestingError> {
        let result = session.finish()?;

        let existing = self.protocols.list().await;
        let record = ProtocolRecord::from_result(
            ProtocolId::generate(),
            next_protocol_number(&existing),
            test.id.clone(),
            test.title.clone(),
            listener.name,
            listener.position,
            result,
            self.clock.now(),
        );
        self.protocols.append(&record).await?;

        tracing::debug!(
            protocol = %record.protocol_number(),
            percentage = record.percentage(),
            passed = record.passed(),
            "test finished"
        );
        Ok(record)
    }
}
