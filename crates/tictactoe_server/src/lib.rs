//! Session server for the tic-tac-toe client.
//!
//! Exposes the session record over a handful of JSON routes:
//!
//! | Method | Path | Purpose |
//! |---|---|---|
//! | GET | `/` | reset the record to its default |
//! | GET | `/session` | read the whole record |
//! | GET | `/dimensions` | read the board dimension |
//! | POST | `/state` | merge-write partial fields |
//! | POST | `/winner` | increment one tally |
//! | GET | `/tic-tac-toe/{version}` | page describing a client variant |

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod routes;
mod server;
mod variant;

pub use error::ApiError;
pub use server::{AppState, router, serve, serve_on};
pub use variant::ClientVariant;
