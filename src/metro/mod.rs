//! Metro network model, routing and robustness analysis
//!
//! The entity model is populated first (usually from [`NetworkRecords`]),
//! then materialized into a [`TransferGraph`] or [`StationGraph`] for path
//! search and failure simulation.

mod entities;
mod error;
mod geo;
mod graph;
mod network;
mod paths;
mod records;
mod robustness;
mod types;

pub use entities::{Line, Node, Service, Station};
pub use error::{MetroError, Result};
pub use geo::{haversine_km, Coordinates, EARTH_RADIUS_KM};
pub use graph::{MetroGraph, RoutingGraph, StationGraph, TransferGraph, Vertex};
pub use network::Network;
pub use paths::{station_path, PathSearch, RankedPath};
pub use records::{LegRecord, LineRecord, NetworkRecords, StationRecord};
pub use robustness::{
    global_efficiency, largest_component, Metric, RobustnessCurve, RobustnessSimulator,
};
pub use types::{
    LineId, NodeId, NodeKind, ServiceId, StationId, Weighting, ACCESS_WEIGHT, MAX_STATION_VISITS,
    TRANSFER_WEIGHT,
};
