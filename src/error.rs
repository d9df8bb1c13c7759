//! Error types for match construction and configuration.
//!
//! The per-frame tick never fails; only setting up a match can.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using [`SimError`].
pub type Result<T> = std::result::Result<T, SimError>;

/// Which entity pool a placement failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnKind {
    Cell,
    Antibody,
}

impl std::fmt::Display for SpawnKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpawnKind::Cell => f.write_str("cell"),
            SpawnKind::Antibody => f.write_str("antibody"),
        }
    }
}

#[derive(Debug, Error)]
pub enum SimError {
    /// Could not find a spot far enough from already placed entities.
    #[error("failed to place {kind} #{index} after {attempts} attempts")]
    PlacementExhausted {
        kind: SpawnKind,
        index: usize,
        attempts: u32,
    },

    /// Settings parsed but describe an unplayable match.
    #[error("invalid match settings: {0}")]
    InvalidSettings(String),

    #[error("failed to parse match settings: {0}")]
    SettingsParse(#[from] serde_json::Error),

    #[error("failed to read settings file '{path}': {source}")]
    SettingsIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
