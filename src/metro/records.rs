//! Plain input rows handed over by a data loader

use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StationRecord {
    pub id: u32,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LineRecord {
    pub id: u32,
    pub name: String,
    pub color: String,
}

/// One leg of a service, from `origin` to `destination`.
///
/// Legs of the same (line, service) must come in stop order.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LegRecord {
    pub origin: u32,
    pub destination: u32,
    pub line: u32,
    pub service: u32,
    pub timetabled: f64,
}

/// The three input tables
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NetworkRecords {
    pub stations: Vec<StationRecord>,
    pub lines: Vec<LineRecord>,
    pub legs: Vec<LegRecord>,
}

impl StationRecord {
    pub fn new(id: u32, name: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self {
            id,
            name: name.into(),
            lat,
            lon,
        }
    }
}

impl LineRecord {
    pub fn new(id: u32, name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            color: color.into(),
        }
    }
}

impl LegRecord {
    pub fn new(origin: u32, destination: u32, line: u32, service: u32, timetabled: f64) -> Self {
        Self {
            origin,
            destination,
            line,
            service,
            timetabled,
        }
    }
}
