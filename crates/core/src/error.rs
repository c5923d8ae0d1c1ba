//! Error taxonomy
//!
//! None of these are fatal. Each failure class has a defined fallback that
//! the component raising it applies after logging.

use std::fmt;
use thiserror::Error;
use userguide_types::Surface;

/// A host call that did not succeed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    #[error("{command} rejected by host: {reason}")]
    Rejected {
        command: &'static str,
        reason: String,
    },
    #[error("host transport error: {0}")]
    Transport(String),
}

pub type HostResult<T> = Result<T, HostError>;

/// Why a remote catalog could not be used
#[derive(Debug, Error)]
pub enum FetchFailure {
    #[error("request failed: {0}")]
    Transport(#[source] HostError),
    #[error("unexpected HTTP status {0}")]
    Status(u16),
    #[error("catalog is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Overlay primitive that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayOp {
    Display,
    Clear,
}

impl fmt::Display for OverlayOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverlayOp::Display => f.write_str("display"),
            OverlayOp::Clear => f.write_str("clear"),
        }
    }
}

#[derive(Debug, Error)]
pub enum SyncError {
    /// Remote catalog unreachable, non-200 or unparsable; the previous
    /// catalog is retained
    #[error("fetching catalog from {url} failed: {reason}")]
    FetchFailure {
        url: String,
        #[source]
        reason: FetchFailure,
    },
    /// Inventory unavailable; requests resolve to the main display
    #[error("peripheral query failed: {0}")]
    PeripheralQueryFailure(#[source] HostError),
    /// Display or clear rejected; the operation is abandoned
    #[error("overlay {op} on {surface} failed: {source}")]
    OverlayOpFailure {
        op: OverlayOp,
        surface: Surface,
        #[source]
        source: HostError,
    },
}
