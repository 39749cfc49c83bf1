//! Core types for the metro model
//!
//! Identifiers are thin wrappers so stations, lines and nodes can't be mixed up.

use std::fmt;
use std::str::FromStr;

use super::error::MetroError;

/// Walking and dwell time charged for moving between two platforms of a station
pub const TRANSFER_WEIGHT: f64 = 4.9;

/// Cost of passing through an entrance or exit
pub const ACCESS_WEIGHT: f64 = 0.0;

/// A path visiting any station through more nodes than this is rejected.
/// Hand-picked: stricter or looser caps change which alternatives survive.
pub const MAX_STATION_VISITS: usize = 2;

/// Station identifier as given by the input tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StationId(pub u32);

/// Line identifier as given by the input tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LineId(pub u32);

/// Services are numbered per line, so the line is part of the key
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ServiceId {
    pub line: LineId,
    pub number: u32,
}

impl ServiceId {
    pub fn new(line: LineId, number: u32) -> Self {
        Self { line, number }
    }
}

/// Arena key for entrance, exit and platform nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub usize);

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "station {}", self.0)
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}", self.0)
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "service {} on line {}", self.number, self.line.0)
    }
}

/// What a node stands for inside its station
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Way in from the street
    Entrance,
    /// Way out to the street
    Exit,
    /// Stopping point of one service
    Platform(ServiceId),
}

impl NodeKind {
    /// Entrances and exits are access nodes
    pub fn is_access(&self) -> bool {
        matches!(self, NodeKind::Entrance | NodeKind::Exit)
    }

    pub fn service(&self) -> Option<ServiceId> {
        match self {
            NodeKind::Platform(service) => Some(*service),
            _ => None,
        }
    }
}

/// How edges between consecutive stops are weighted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Weighting {
    /// Timetabled travel time of the leg
    #[default]
    Time,
    /// Great-circle distance between the two stations, in km
    Distance,
}

impl FromStr for Weighting {
    type Err = MetroError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "time" => Ok(Weighting::Time),
            "distance" => Ok(Weighting::Distance),
            other => Err(MetroError::InvalidWeighting(other.to_string())),
        }
    }
}

impl fmt::Display for Weighting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Weighting::Time => f.write_str("time"),
            Weighting::Distance => f.write_str("distance"),
        }
    }
}
