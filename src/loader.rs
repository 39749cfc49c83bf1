//! CSV input for the three network tables
//!
//! Expects `stations.csv` (`id,name,lat,lon`), `lines.csv` (`id,name,color`)
//! and `services.csv` (`origin,destination,line,service,timetabled`), each
//! with a header row.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::path::Path;

use crate::metro::{LegRecord, LineRecord, NetworkRecords, StationRecord};

pub const STATIONS_FILE: &str = "stations.csv";
pub const LINES_FILE: &str = "lines.csv";
pub const SERVICES_FILE: &str = "services.csv";

/// Read all three tables from a directory
pub fn read_dir(dir: &Path) -> Result<NetworkRecords> {
    read_files(
        &dir.join(STATIONS_FILE),
        &dir.join(LINES_FILE),
        &dir.join(SERVICES_FILE),
    )
}

pub fn read_files(stations: &Path, lines: &Path, services: &Path) -> Result<NetworkRecords> {
    Ok(NetworkRecords {
        stations: read_table::<StationRecord>(stations)?,
        lines: read_table::<LineRecord>(lines)?,
        legs: read_table::<LegRecord>(services)?,
    })
}

/// Deserialize every row of a headed CSV file
pub fn read_table<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;

    reader
        .deserialize()
        .enumerate()
        .map(|(row, record)| {
            record.with_context(|| format!("Bad row {} in {}", row + 1, path.display()))
        })
        .collect()
}
