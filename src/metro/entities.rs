//! Stations, lines, services and their nodes
//!
//! Records only hold ids of the things they own; the [`Network`] arena
//! resolves them. All mutation goes through the network so ownership sets
//! stay consistent.
//!
//! [`Network`]: super::network::Network

use std::collections::{BTreeMap, BTreeSet};

use super::geo::Coordinates;
use super::types::{LineId, NodeId, NodeKind, ServiceId, StationId};

/// A station with its access nodes and platforms
#[derive(Debug, Clone)]
pub struct Station {
    pub id: StationId,
    pub name: String,
    pub position: Coordinates,
    pub(crate) lines: BTreeSet<LineId>,
    pub(crate) services: BTreeSet<ServiceId>,
    pub(crate) nodes: BTreeSet<NodeId>,
    pub(crate) entrance: NodeId,
    pub(crate) exit: NodeId,
}

impl Station {
    pub(crate) fn new(
        id: StationId,
        name: String,
        position: Coordinates,
        entrance: NodeId,
        exit: NodeId,
    ) -> Self {
        Self {
            id,
            name,
            position,
            lines: BTreeSet::new(),
            services: BTreeSet::new(),
            nodes: BTreeSet::from([entrance, exit]),
            entrance,
            exit,
        }
    }

    pub fn lines(&self) -> &BTreeSet<LineId> {
        &self.lines
    }

    pub fn services(&self) -> &BTreeSet<ServiceId> {
        &self.services
    }

    /// Entrance, exit and every platform anchored here
    pub fn nodes(&self) -> &BTreeSet<NodeId> {
        &self.nodes
    }

    pub fn entrance(&self) -> NodeId {
        self.entrance
    }

    pub fn exit(&self) -> NodeId {
        self.exit
    }

    /// Great-circle distance to another station, in km
    pub fn distance(&self, other: &Station) -> f64 {
        self.position.distance(&other.position)
    }
}

/// A line groups services under one name and colour
#[derive(Debug, Clone)]
pub struct Line {
    pub id: LineId,
    pub name: String,
    /// HTML colour tag, e.g. `#12a3f3`
    pub color: String,
    pub(crate) services: BTreeSet<ServiceId>,
    pub(crate) stations: BTreeSet<StationId>,
    pub(crate) nodes: BTreeSet<NodeId>,
}

impl Line {
    pub(crate) fn new(id: LineId, name: String, color: String) -> Self {
        Self {
            id,
            name,
            color,
            services: BTreeSet::new(),
            stations: BTreeSet::new(),
            nodes: BTreeSet::new(),
        }
    }

    pub fn services(&self) -> &BTreeSet<ServiceId> {
        &self.services
    }

    pub fn stations(&self) -> &BTreeSet<StationId> {
        &self.stations
    }

    /// Platforms of every service on this line
    pub fn nodes(&self) -> &BTreeSet<NodeId> {
        &self.nodes
    }
}

/// An ordered stop sequence with travel times between consecutive stops.
///
/// Built one leg at a time; `stations.len() == times.len() + 1` once the
/// first leg is in.
#[derive(Debug, Clone)]
pub struct Service {
    pub id: ServiceId,
    pub(crate) stations: Vec<StationId>,
    pub(crate) times: Vec<f64>,
    pub(crate) platforms: BTreeMap<StationId, NodeId>,
}

impl Service {
    pub(crate) fn new(id: ServiceId) -> Self {
        Self {
            id,
            stations: Vec::new(),
            times: Vec::new(),
            platforms: BTreeMap::new(),
        }
    }

    pub fn line(&self) -> LineId {
        self.id.line
    }

    /// Stop sequence in travel order
    pub fn stations(&self) -> &[StationId] {
        &self.stations
    }

    /// `times()[i]` is the travel time from stop `i` to stop `i + 1`
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// The platform this service uses at a station
    pub fn platform_at(&self, station: StationId) -> Option<NodeId> {
        self.platforms.get(&station).copied()
    }

    pub fn platforms(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.platforms.values().copied()
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    pub fn contains(&self, station: StationId) -> bool {
        self.stations.contains(&station)
    }

    /// Stop after the first visit of `station`, `None` at the terminus
    pub fn next_stop(&self, station: StationId) -> Option<StationId> {
        let index = self.stations.iter().position(|s| *s == station)?;
        self.stations.get(index + 1).copied()
    }

    /// Stop before the first visit of `station`, `None` at the origin
    pub fn previous_stop(&self, station: StationId) -> Option<StationId> {
        let index = self.stations.iter().position(|s| *s == station)?;
        index.checked_sub(1).map(|i| self.stations[i])
    }

    /// Consecutive stop pairs with their travel time
    pub fn legs(&self) -> impl Iterator<Item = (StationId, StationId, f64)> + '_ {
        self.stations
            .windows(2)
            .zip(&self.times)
            .map(|(pair, time)| (pair[0], pair[1], *time))
    }

    pub(crate) fn last_stop(&self) -> Option<StationId> {
        self.stations.last().copied()
    }
}

/// A graph node anchored at a station
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Node {
    pub id: NodeId,
    pub station: StationId,
    pub kind: NodeKind,
}

impl Node {
    pub fn is_access(&self) -> bool {
        self.kind.is_access()
    }

    pub fn service(&self) -> Option<ServiceId> {
        self.kind.service()
    }

    pub fn line(&self) -> Option<LineId> {
        self.service().map(|service| service.line)
    }
}
