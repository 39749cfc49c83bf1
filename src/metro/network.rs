//! The network aggregate: owns every station, line, service and node
//!
//! Entities live in id-keyed arenas. Ownership sets store ids, and every
//! release walks those sets so no owner keeps a dangling id.

use log::{debug, info, warn};
use std::collections::{BTreeMap, BTreeSet, HashMap};

use super::entities::{Line, Node, Service, Station};
use super::error::{MetroError, Result};
use super::geo::Coordinates;
use super::graph::{RoutingGraph, StationGraph, TransferGraph};
use super::paths::{PathSearch, RankedPath};
use super::records::NetworkRecords;
use super::types::{LineId, NodeId, NodeKind, ServiceId, StationId, Weighting};

/// A metro network with its stations, lines, services and nodes
#[derive(Debug, Clone, Default)]
pub struct Network {
    pub name: String,
    stations: BTreeMap<StationId, Station>,
    lines: BTreeMap<LineId, Line>,
    services: BTreeMap<ServiceId, Service>,
    nodes: BTreeMap<NodeId, Node>,

    /// Next node id to assign
    next_node_id: usize,

    /// Passenger counts keyed by (origin, destination)
    entries: HashMap<(StationId, StationId), u64>,
}

impl Network {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Build a network from the three input tables in one go
    pub fn from_records(name: impl Into<String>, records: &NetworkRecords) -> Result<Self> {
        let mut network = Self::new(name);
        network.import(records)?;
        Ok(network)
    }

    /// Populate an empty network from input records.
    ///
    /// Either every record is applied or the network is left untouched.
    /// Lines that end up without any service are released afterwards.
    pub fn import(&mut self, records: &NetworkRecords) -> Result<()> {
        if !self.stations.is_empty() {
            return Err(MetroError::AlreadyImported);
        }

        let mut staged = Network::new(self.name.clone());
        for station in &records.stations {
            staged.add_station(
                StationId(station.id),
                station.name.clone(),
                Coordinates::new(station.lat, station.lon),
            )?;
        }
        for line in &records.lines {
            staged.add_line(LineId(line.id), line.name.clone(), line.color.clone())?;
        }
        for leg in &records.legs {
            staged.add_leg(
                ServiceId::new(LineId(leg.line), leg.service),
                StationId(leg.origin),
                StationId(leg.destination),
                leg.timetabled,
            )?;
        }

        let idle_lines: Vec<LineId> = staged
            .lines
            .values()
            .filter(|line| line.services.is_empty())
            .map(|line| line.id)
            .collect();
        for line in idle_lines {
            warn!("{} has no services, releasing it", line);
            staged.release_line(line);
        }

        info!(
            "Imported network '{}': {} stations, {} lines, {} services, {} nodes",
            staged.name,
            staged.stations.len(),
            staged.lines.len(),
            staged.services.len(),
            staged.nodes.len()
        );

        *self = staged;
        Ok(())
    }

    fn next_node(&mut self, station: StationId, kind: NodeKind) -> NodeId {
        let id = NodeId(self.next_node_id);
        self.next_node_id += 1;
        self.nodes.insert(id, Node { id, station, kind });
        id
    }

    /// Add a station together with its entrance and exit
    pub fn add_station(
        &mut self,
        id: StationId,
        name: impl Into<String>,
        position: Coordinates,
    ) -> Result<StationId> {
        if self.stations.contains_key(&id) {
            return Err(MetroError::DuplicateStation(id));
        }

        let entrance = self.next_node(id, NodeKind::Entrance);
        let exit = self.next_node(id, NodeKind::Exit);
        let station = Station::new(id, name.into(), position, entrance, exit);
        self.stations.insert(id, station);
        Ok(id)
    }

    pub fn add_line(
        &mut self,
        id: LineId,
        name: impl Into<String>,
        color: impl Into<String>,
    ) -> Result<LineId> {
        if self.lines.contains_key(&id) {
            return Err(MetroError::DuplicateLine(id));
        }

        self.lines.insert(id, Line::new(id, name.into(), color.into()));
        Ok(id)
    }

    /// Append a leg to a service, creating the service on its first leg.
    ///
    /// A leg must start where the service currently ends.
    pub fn add_leg(
        &mut self,
        service: ServiceId,
        origin: StationId,
        destination: StationId,
        time: f64,
    ) -> Result<()> {
        if !self.lines.contains_key(&service.line) {
            return Err(MetroError::UnknownLine(service.line));
        }
        for station in [origin, destination] {
            if !self.stations.contains_key(&station) {
                return Err(MetroError::UnknownStation(station));
            }
        }

        let last_stop = self.services.get(&service).and_then(Service::last_stop);
        if let Some(last_stop) = last_stop {
            if last_stop != origin {
                return Err(MetroError::NonContiguousLeg {
                    service,
                    expected: last_stop,
                    found: origin,
                    target: destination,
                });
            }
        }

        if !self.services.contains_key(&service) {
            debug!("Creating {}", service);
            self.services.insert(service, Service::new(service));
            if let Some(line) = self.lines.get_mut(&service.line) {
                line.services.insert(service);
            }
        }

        if last_stop.is_none() {
            self.push_stop(service, origin, None);
        }
        self.push_stop(service, destination, Some(time));
        Ok(())
    }

    /// Append a stop and bind the service to the station, creating the
    /// platform if this service doesn't stop there yet
    fn push_stop(&mut self, service_id: ServiceId, station_id: StationId, time: Option<f64>) {
        let has_platform = match self.services.get_mut(&service_id) {
            Some(service) => {
                service.stations.push(station_id);
                if let Some(time) = time {
                    service.times.push(time);
                }
                service.platforms.contains_key(&station_id)
            }
            None => return,
        };

        if !has_platform {
            let platform = self.next_node(station_id, NodeKind::Platform(service_id));
            if let Some(service) = self.services.get_mut(&service_id) {
                service.platforms.insert(station_id, platform);
            }
            if let Some(line) = self.lines.get_mut(&service_id.line) {
                line.nodes.insert(platform);
            }
            if let Some(station) = self.stations.get_mut(&station_id) {
                station.nodes.insert(platform);
            }
        }

        if let Some(station) = self.stations.get_mut(&station_id) {
            station.services.insert(service_id);
            station.lines.insert(service_id.line);
        }
        if let Some(line) = self.lines.get_mut(&service_id.line) {
            line.stations.insert(station_id);
        }
    }

    /// Release a service and everything that depended on it alone.
    ///
    /// Stations and the line left without services are released too.
    /// Returns `false` if the service was already gone.
    pub fn release_service(&mut self, id: ServiceId) -> bool {
        let Some(service) = self.services.remove(&id) else {
            return false;
        };
        debug!("Releasing {}", id);

        for platform in service.platforms.values() {
            self.release_node(*platform);
        }

        if let Some(line) = self.lines.get_mut(&id.line) {
            line.services.remove(&id);
        }

        let stops: BTreeSet<StationId> = service.stations.iter().copied().collect();
        let mut orphaned = Vec::new();
        for station_id in stops {
            let Some(station) = self.stations.get_mut(&station_id) else {
                continue;
            };
            station.services.remove(&id);
            if !station.services.iter().any(|s| s.line == id.line) {
                station.lines.remove(&id.line);
                if let Some(line) = self.lines.get_mut(&id.line) {
                    line.stations.remove(&station_id);
                }
            }
            if station.services.is_empty() {
                orphaned.push(station_id);
            }
        }
        for station_id in orphaned {
            self.release_station(station_id);
        }

        if self
            .lines
            .get(&id.line)
            .is_some_and(|line| line.services.is_empty())
        {
            self.release_line(id.line);
        }
        true
    }

    /// Release a line and all of its services
    pub fn release_line(&mut self, id: LineId) -> bool {
        let Some(line) = self.lines.remove(&id) else {
            return false;
        };
        debug!("Releasing {}", id);

        for service in &line.services {
            self.release_service(*service);
        }
        for station_id in &line.stations {
            if let Some(station) = self.stations.get_mut(station_id) {
                station.lines.remove(&id);
            }
        }
        for node in &line.nodes {
            self.release_node(*node);
        }
        true
    }

    /// Release a station with its nodes.
    ///
    /// Services stopping here can't keep a hole in their stop sequence, so
    /// they are released as well.
    pub fn release_station(&mut self, id: StationId) -> bool {
        let Some(station) = self.stations.remove(&id) else {
            return false;
        };
        debug!("Releasing {}", id);

        for service in &station.services {
            self.release_service(*service);
        }
        for node in &station.nodes {
            self.release_node(*node);
        }
        for line_id in &station.lines {
            if let Some(line) = self.lines.get_mut(line_id) {
                line.stations.remove(&id);
            }
        }
        self.entries
            .retain(|(origin, destination), _| *origin != id && *destination != id);
        true
    }

    /// Remove a node from the arena and from every owner that lists it
    fn release_node(&mut self, id: NodeId) -> bool {
        let Some(node) = self.nodes.remove(&id) else {
            return false;
        };

        if let Some(station) = self.stations.get_mut(&node.station) {
            station.nodes.remove(&id);
        }
        if let NodeKind::Platform(service_id) = node.kind {
            if let Some(line) = self.lines.get_mut(&service_id.line) {
                line.nodes.remove(&id);
            }
            if let Some(service) = self.services.get_mut(&service_id) {
                service.platforms.retain(|_, platform| *platform != id);
            }
        }
        true
    }

    /// Add passengers travelling from `origin` to `destination`
    pub fn record_entries(
        &mut self,
        origin: StationId,
        destination: StationId,
        count: u64,
    ) -> Result<()> {
        for station in [origin, destination] {
            if !self.stations.contains_key(&station) {
                return Err(MetroError::UnknownStation(station));
            }
        }
        *self.entries.entry((origin, destination)).or_insert(0) += count;
        Ok(())
    }

    /// Passengers entering at a station, over all destinations
    pub fn total_entry(&self, station: StationId) -> u64 {
        self.entries
            .iter()
            .filter(|((origin, _), _)| *origin == station)
            .map(|(_, count)| count)
            .sum()
    }

    /// Passengers leaving at a station, over all origins
    pub fn total_exit(&self, station: StationId) -> u64 {
        self.entries
            .iter()
            .filter(|((_, destination), _)| *destination == station)
            .map(|(_, count)| count)
            .sum()
    }

    pub fn station(&self, id: StationId) -> Option<&Station> {
        self.stations.get(&id)
    }

    pub fn station_by_name(&self, name: &str) -> Option<&Station> {
        self.stations.values().find(|station| station.name == name)
    }

    pub fn line(&self, id: LineId) -> Option<&Line> {
        self.lines.get(&id)
    }

    pub fn service(&self, id: ServiceId) -> Option<&Service> {
        self.services.get(&id)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn entrance_of(&self, station: StationId) -> Option<NodeId> {
        self.stations.get(&station).map(Station::entrance)
    }

    pub fn exit_of(&self, station: StationId) -> Option<NodeId> {
        self.stations.get(&station).map(Station::exit)
    }

    pub fn stations(&self) -> impl Iterator<Item = &Station> {
        self.stations.values()
    }

    pub fn lines(&self) -> impl Iterator<Item = &Line> {
        self.lines.values()
    }

    pub fn services(&self) -> impl Iterator<Item = &Service> {
        self.services.values()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn station_count(&self) -> usize {
        self.stations.len()
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn service_count(&self) -> usize {
        self.services.len()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    /// Node-level graph with transfer and access edges
    pub fn transfer_graph(&self) -> TransferGraph {
        TransferGraph::build(self)
    }

    /// Station-level graph for connectivity analysis
    pub fn station_graph(&self, weighting: Weighting) -> StationGraph {
        StationGraph::build(self, weighting)
    }

    /// Materialize the graph for the requested routing mode
    pub fn graph(&self, weighting: Weighting, transfers: bool) -> Result<RoutingGraph> {
        if transfers {
            if weighting != Weighting::Time {
                return Err(MetroError::TransfersRequireTime(weighting));
            }
            Ok(RoutingGraph::Transfer(self.transfer_graph()))
        } else {
            Ok(RoutingGraph::Station(self.station_graph(weighting)))
        }
    }

    /// The `k` best alternative routes between two stations.
    ///
    /// Always returns exactly `k` entries; missing routes are placeholders.
    pub fn shortest_paths(
        &self,
        source: StationId,
        target: StationId,
        k: usize,
        weighting: Weighting,
        transfers: bool,
    ) -> Result<Vec<RankedPath>> {
        let graph = self.graph(weighting, transfers)?;
        graph.shortest_paths(&PathSearch::new(k), source, target)
    }
}
