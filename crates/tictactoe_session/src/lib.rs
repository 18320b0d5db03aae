//! Session persistence for the tic-tac-toe client.
//!
//! A session is one small record: the board dimension the player last
//! chose and how many games each side (or nobody) has won. Persistence is
//! best-effort; gameplay never depends on a write succeeding.
//!
//! - [`SessionStore`]: the read/merge-write contract the client depends on
//! - [`FileSessionStore`]: JSON flat file, used by the server
//! - [`HttpSessionStore`]: talks to the server over HTTP
//! - [`MemorySessionStore`]: in-process, for tests and non-persisting clients

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod file;
mod http;
mod record;
mod store;

pub use error::{SessionError, SessionErrorKind};
pub use file::FileSessionStore;
pub use http::HttpSessionStore;
pub use record::{
    DEFAULT_DIMENSION, DimensionsResponse, MAX_DIMENSION, RecordedWins, SessionPatch,
    SessionRecord, TallyKey, WinnerRequest,
};
pub use store::{MemorySessionStore, SessionStore};
