//! JSON flat-file session store.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::{SessionError, SessionPatch, SessionRecord, SessionStore, TallyKey};

/// Session store backed by a single JSON file.
///
/// Every write replaces the whole file through a temporary sibling and a
/// rename, so readers never observe a half-written record. A missing file
/// is created with the default record; an unreadable or invalid one is
/// logged and replaced by the default.
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileSessionStore {
    /// Creates a store for the file at `path`. Nothing is touched until
    /// the first call.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn new(path: impl AsRef<Path>) -> Self {
        info!("Creating FileSessionStore");
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the record; caller must hold `lock`.
    async fn load(&self) -> Result<SessionRecord, SessionError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %self.path.display(), "No session file, writing default record");
                let record = SessionRecord::default();
                self.persist(&record).await?;
                return Ok(record);
            }
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_str::<SessionRecord>(&content)
            .map_err(SessionError::from)
            .and_then(SessionRecord::validated)
        {
            Ok(record) => {
                debug!(?record, "Session record loaded");
                Ok(record)
            }
            Err(e) => {
                warn!(
                    error = %e,
                    path = %self.path.display(),
                    "Malformed session file, restoring default record"
                );
                let record = SessionRecord::default();
                self.persist(&record).await?;
                Ok(record)
            }
        }
    }

    /// Writes the full record; caller must hold `lock`.
    async fn persist(&self, record: &SessionRecord) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut tmp: OsString = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        let json = serde_json::to_string_pretty(record)?;
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        debug!(?record, "Session record persisted");
        Ok(())
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn read_session(&self) -> Result<SessionRecord, SessionError> {
        let _guard = self.lock.lock().await;
        self.load().await
    }

    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn write_session(&self, patch: SessionPatch) -> Result<(), SessionError> {
        let patch = patch.validated()?;
        let _guard = self.lock.lock().await;
        let record = self.load().await?.merged(patch);
        self.persist(&record).await?;
        info!(?record, "Session record updated");
        Ok(())
    }

    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn record_winner(&self, key: TallyKey) -> Result<(), SessionError> {
        let _guard = self.lock.lock().await;
        let record = self.load().await?;
        let wins = record.recorded_wins().incremented(key);
        let record = record.merged(SessionPatch::default().with_recorded_wins(wins));
        self.persist(&record).await?;
        info!(%key, total = record.recorded_wins().get(key), "Win recorded");
        Ok(())
    }

    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn reset(&self) -> Result<SessionRecord, SessionError> {
        let _guard = self.lock.lock().await;
        let record = SessionRecord::default();
        self.persist(&record).await?;
        info!("Session record reset");
        Ok(record)
    }
}
