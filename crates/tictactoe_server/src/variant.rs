//! Client variants selectable through `/tic-tac-toe/{version}`.

use serde::{Deserialize, Serialize};

/// Progressively richer flavours of the terminal client.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
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
pub enum ClientVariant {
    /// Fixed board size, nothing persisted.
    #[default]
    Basic,
    /// Board can be resized between games, nothing persisted.
    Advanced,
    /// Board size and win tallies live in the session store.
    Stateful,
}

impl ClientVariant {
    /// Whether the player may change the board dimension.
    pub fn can_resize(self) -> bool {
        matches!(self, ClientVariant::Advanced | ClientVariant::Stateful)
    }

    /// Whether the client reads and writes the session store.
    pub fn persists(self) -> bool {
        matches!(self, ClientVariant::Stateful)
    }

    /// One-line description shown on the variant page and in the client.
    pub fn summary(self) -> &'static str {
        match self {
            ClientVariant::Basic => "Fixed board, nothing remembered between runs.",
            ClientVariant::Advanced => {
                "Resize the board with + and -; each resize starts a new game."
            }
            ClientVariant::Stateful => {
                "Board size and win tallies are kept by the session server."
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_variant_names() {
        assert_eq!("stateful".parse::<ClientVariant>().ok(), Some(ClientVariant::Stateful));
        assert_eq!(ClientVariant::Advanced.to_string(), "advanced");
        assert!("stencil".parse::<ClientVariant>().is_err());
    }

    #[test]
    fn test_capabilities() {
        assert!(!ClientVariant::Basic.can_resize());
        assert!(ClientVariant::Advanced.can_resize());
        assert!(!ClientVariant::Advanced.persists());
        assert!(ClientVariant::Stateful.persists());
    }
}
