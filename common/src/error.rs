use thiserror::Error;

use crate::results::BasicDiagnosis;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("invalid direction code {0}")]
    InvalidDirection(u8),
    #[error("failed to parse game data: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaybackError {
    #[error("no snapshots available for visualization")]
    NoSnapshots,
    #[error("invalid snapshot index {index} (have {len} snapshots)")]
    InvalidIndex { index: usize, len: usize },
    #[error("playback timer could not start: {0}")]
    TimerUnavailable(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unknown results mode `{0}`")]
    UnknownMode(String),
    #[error("basic output is malformed: {}", .0.title())]
    MalformedBasic(BasicDiagnosis),
}
