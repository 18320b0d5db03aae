//! Session store error types.

use derive_more::{Display, Error};

/// What went wrong talking to a session store.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum SessionErrorKind {
    /// Reading or writing the backing file failed.
    #[display("I/O failure: {}", _0)]
    Io(String),
    /// A record or request body could not be (de)serialized.
    #[display("Decode failure: {}", _0)]
    Decode(String),
    /// A record was well-formed JSON but violates the record's rules.
    #[display("Invalid record: {}", _0)]
    Invalid(String),
    /// The HTTP round trip failed or returned a non-success status.
    #[display("Transport failure: {}", _0)]
    Transport(String),
}

/// Session store error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Session error: {} at {}:{}", kind, file, line)]
pub struct SessionError {
    /// Error category and message.
    pub kind: SessionErrorKind,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl SessionError {
    /// Creates a new session error with caller location tracking.
    #[track_caller]
    pub fn new(kind: SessionErrorKind) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// Shorthand for [`SessionErrorKind::Invalid`].
    #[track_caller]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::new(SessionErrorKind::Invalid(message.into()))
    }

    /// True for errors caused by the record's content rather than I/O.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self.kind,
            SessionErrorKind::Invalid(_) | SessionErrorKind::Decode(_)
        )
    }
}

impl From<std::io::Error> for SessionError {
    #[track_caller]
    fn from(err: std::io::Error) -> Self {
        Self::new(SessionErrorKind::Io(err.to_string()))
    }
}

impl From<serde_json::Error> for SessionError {
    #[track_caller]
    fn from(err: serde_json::Error) -> Self {
        Self::new(SessionErrorKind::Decode(err.to_string()))
    }
}

impl From<reqwest::Error> for SessionError {
    #[track_caller]
    fn from(err: reqwest::Error) -> Self {
        Self::new(SessionErrorKind::Transport(err.to_string()))
    }
}
