//! Construction and query errors.
//!
//! None of these are transient: the caller fixes the input and tries again
//! with a fresh network.

use super::types::{LineId, ServiceId, StationId, Weighting};

pub type Result<T> = std::result::Result<T, MetroError>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MetroError {
    /// The network already holds stations
    #[error("cannot import twice into the same network")]
    AlreadyImported,

    /// A leg does not start where the service currently ends
    #[error("leg from {found} to {target} could not be added to {service}: service ends at {expected}")]
    NonContiguousLeg {
        service: ServiceId,
        expected: StationId,
        found: StationId,
        target: StationId,
    },

    #[error("invalid weighting '{0}', expected 'time' or 'distance'")]
    InvalidWeighting(String),

    /// Transfer edges only make sense on a temporal graph
    #[error("transfer-aware routing requires time weighting, got {0}")]
    TransfersRequireTime(Weighting),

    #[error("{0} not found")]
    UnknownStation(StationId),

    #[error("{0} not found")]
    UnknownLine(LineId),

    #[error("{0} already exists")]
    DuplicateStation(StationId),

    #[error("{0} already exists")]
    DuplicateLine(LineId),

    #[error("robustness simulation needs at least one run")]
    InvalidRunCount,
}
