//! The session store contract and an in-memory implementation.

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, instrument};

use crate::{SessionError, SessionPatch, SessionRecord, TallyKey};

/// Read/merge-write access to the session record.
///
/// Callers treat every method as best-effort: a failure is logged and
/// dropped, never shown to the player.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Returns the current record, creating the default one if none exists.
    async fn read_session(&self) -> Result<SessionRecord, SessionError>;

    /// Merges `patch` into the record and persists the whole result.
    async fn write_session(&self, patch: SessionPatch) -> Result<(), SessionError>;

    /// Adds one game to the given tally.
    ///
    /// The default reads the record, increments locally, and writes the
    /// full tally back.
    async fn record_winner(&self, key: TallyKey) -> Result<(), SessionError> {
        let record = self.read_session().await?;
        let wins = record.recorded_wins().incremented(key);
        self.write_session(SessionPatch::default().with_recorded_wins(wins))
            .await
    }

    /// Replaces the record with the default and returns it.
    async fn reset(&self) -> Result<SessionRecord, SessionError>;
}

/// Session store held in process memory.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    record: Mutex<SessionRecord>,
}

impl MemorySessionStore {
    /// Creates a store holding the default record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded with `record`.
    pub fn with_record(record: SessionRecord) -> Self {
        Self {
            record: Mutex::new(record),
        }
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    #[instrument(skip(self))]
    async fn read_session(&self) -> Result<SessionRecord, SessionError> {
        Ok(*self.record.lock().await)
    }

    #[instrument(skip(self))]
    async fn write_session(&self, patch: SessionPatch) -> Result<(), SessionError> {
        let patch = patch.validated()?;
        let mut record = self.record.lock().await;
        *record = record.merged(patch);
        debug!(record = ?*record, "Session updated in memory");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn record_winner(&self, key: TallyKey) -> Result<(), SessionError> {
        let mut record = self.record.lock().await;
        let wins = record.recorded_wins().incremented(key);
        *record = record.merged(SessionPatch::default().with_recorded_wins(wins));
        Ok(())
    }

    #[instrument(skip(self))]
    async fn reset(&self) -> Result<SessionRecord, SessionError> {
        let mut record = self.record.lock().await;
        *record = SessionRecord::default();
        Ok(*record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RecordedWins;

    /// Store that only implements the required methods, to exercise the
    /// default `record_winner`.
    struct Minimal(MemorySessionStore);

    #[async_trait]
    impl SessionStore for Minimal {
        async fn read_session(&self) -> Result<SessionRecord, SessionError> {
            self.0.read_session().await
        }
        async fn write_session(&self, patch: SessionPatch) -> Result<(), SessionError> {
            self.0.write_session(patch).await
        }
        async fn reset(&self) -> Result<SessionRecord, SessionError> {
            self.0.reset().await
        }
    }

    #[tokio::test]
    async fn test_default_record_winner_increments() {
        let store = Minimal(MemorySessionStore::new());
        store.record_winner(TallyKey::O).await.expect("Write failed");
        store.record_winner(TallyKey::O).await.expect("Write failed");
        let record = store.read_session().await.expect("Read failed");
        assert_eq!(*record.recorded_wins(), RecordedWins::new(0, 2, 0));
    }

    #[tokio::test]
    async fn test_memory_merge_and_reset() {
        let store = MemorySessionStore::new();
        store
            .write_session(SessionPatch::default().with_dimensions(7))
            .await
            .expect("Write failed");
        store.record_winner(TallyKey::Draw).await.expect("Write failed");

        let record = store.read_session().await.expect("Read failed");
        assert_eq!(*record.dimensions(), 7);
        assert_eq!(record.recorded_wins().none, 1);

        let record = store.reset().await.expect("Reset failed");
        assert_eq!(record, SessionRecord::default());
    }

    #[tokio::test]
    async fn test_memory_rejects_bad_dimension() {
        let store = MemorySessionStore::new();
        let result = store
            .write_session(SessionPatch::default().with_dimensions(0))
            .await;
        assert!(result.expect_err("Zero rejected").is_invalid_input());
        assert_eq!(*store.read_session().await.expect("Read failed").dimensions(), 3);
    }
}
