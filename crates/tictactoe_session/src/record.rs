//! The persisted session record and its wire types.

use derive_getters::Getters;
use derive_new::new;
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use tictactoe_core::{Outcome, Player};
use tracing::instrument;

use crate::SessionError;

/// Board dimension of a fresh session.
pub const DEFAULT_DIMENSION: u32 = 3;

/// Largest dimension a session may record.
pub const MAX_DIMENSION: u32 = 15;

/// Which tally a finished game counts towards.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TallyKey {
    /// Won by X.
    X,
    /// Won by O.
    O,
    /// Drawn; stored under the `none` key.
    #[serde(rename = "none")]
    #[strum(serialize = "none")]
    Draw,
}

impl From<Outcome> for TallyKey {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Winner(Player::X) => TallyKey::X,
            Outcome::Winner(Player::O) => TallyKey::O,
            Outcome::Draw => TallyKey::Draw,
        }
    }
}

/// Win counts by identity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, new)]
pub struct RecordedWins {
    /// Games won by X.
    pub x: u64,
    /// Games won by O.
    pub o: u64,
    /// Games drawn.
    pub none: u64,
}

impl RecordedWins {
    /// Count for one tally.
    pub fn get(&self, key: TallyKey) -> u64 {
        match key {
            TallyKey::X => self.x,
            TallyKey::O => self.o,
            TallyKey::Draw => self.none,
        }
    }

    /// Copy with one tally increased by one. Tallies stop at `u64::MAX`.
    pub fn incremented(mut self, key: TallyKey) -> Self {
        let tally = match key {
            TallyKey::X => &mut self.x,
            TallyKey::O => &mut self.o,
            TallyKey::Draw => &mut self.none,
        };
        *tally = tally.saturating_add(1);
        self
    }

    /// Games recorded in total, saturating at `u64::MAX`.
    pub fn total(&self) -> u64 {
        self.x.saturating_add(self.o).saturating_add(self.none)
    }
}

/// Everything a session persists.
///
/// Serialized as `{ "dimensions": 3, "recordedWins": { "x": 0, "o": 0, "none": 0 } }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Getters, new)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    /// Board dimension last chosen.
    dimensions: u32,
    /// Cumulative tallies.
    recorded_wins: RecordedWins,
}

impl Default for SessionRecord {
    fn default() -> Self {
        Self {
            dimensions: DEFAULT_DIMENSION,
            recorded_wins: RecordedWins::default(),
        }
    }
}

impl SessionRecord {
    /// Checks the record's own rules.
    ///
    /// # Errors
    ///
    /// Returns an invalid-record [`SessionError`] if the dimension is zero
    /// or larger than [`MAX_DIMENSION`].
    #[instrument]
    pub fn validated(self) -> Result<Self, SessionError> {
        validate_dimension(self.dimensions)?;
        Ok(self)
    }

    /// Shallow top-level merge: fields present in `patch` replace ours.
    #[instrument]
    pub fn merged(self, patch: SessionPatch) -> Self {
        Self {
            dimensions: patch.dimensions.unwrap_or(self.dimensions),
            recorded_wins: patch.recorded_wins.unwrap_or(self.recorded_wins),
        }
    }
}

fn validate_dimension(dimensions: u32) -> Result<(), SessionError> {
    if dimensions == 0 || dimensions > MAX_DIMENSION {
        return Err(SessionError::invalid(format!(
            "dimensions must be between 1 and {}, got {}",
            MAX_DIMENSION, dimensions
        )));
    }
    Ok(())
}

/// Partial update for [`SessionRecord`]; absent fields are left alone.
///
/// Unknown fields in the JSON body are ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Setters)]
#[serde(rename_all = "camelCase")]
#[setters(strip_option, prefix = "with_")]
pub struct SessionPatch {
    /// New board dimension.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<u32>,
    /// Replacement tallies, already incremented by the caller.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recorded_wins: Option<RecordedWins>,
}

impl SessionPatch {
    /// Checks the fields the patch sets.
    ///
    /// # Errors
    ///
    /// Returns an invalid-record [`SessionError`] for an out-of-range dimension.
    pub fn validated(self) -> Result<Self, SessionError> {
        if let Some(dimensions) = self.dimensions {
            validate_dimension(dimensions)?;
        }
        Ok(self)
    }
}

/// Body of `GET /dimensions`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionsResponse {
    /// Current board dimension.
    pub dimensions: u32,
}

/// Body of `POST /winner`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinnerRequest {
    /// Tally to increment.
    pub winner: TallyKey,
}
