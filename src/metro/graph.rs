//! Routable graphs materialized from a [`Network`]
//!
//! Two flavours share one representation:
//! - [`TransferGraph`]: directed, one vertex per entrance, exit and platform,
//!   with explicit transfer and access edges.
//! - [`StationGraph`]: undirected, one vertex per station.

use petgraph::algo::astar;
use petgraph::graph::{EdgeIndex, Graph, NodeIndex};
use petgraph::visit::{EdgeFiltered, EdgeRef};
use petgraph::{Directed, EdgeType, Undirected};
use std::collections::{BTreeMap, HashMap, HashSet};

use super::error::Result;
use super::network::Network;
use super::paths::{PathSearch, RankedPath};
use super::types::{
    NodeId, NodeKind, StationId, Weighting, ACCESS_WEIGHT, TRANSFER_WEIGHT,
};

/// A graph vertex
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Vertex {
    /// Entrance, exit or platform of a station
    Node { id: NodeId, station: StationId },
    /// A whole station
    Station(StationId),
}

impl Vertex {
    pub fn station(&self) -> StationId {
        match self {
            Vertex::Node { station, .. } => *station,
            Vertex::Station(station) => *station,
        }
    }

    pub fn node(&self) -> Option<NodeId> {
        match self {
            Vertex::Node { id, .. } => Some(*id),
            Vertex::Station(_) => None,
        }
    }
}

/// Edges and vertices hidden from one shortest-path search
#[derive(Debug, Default)]
pub(crate) struct Exclusion {
    edges: HashSet<EdgeIndex>,
    nodes: HashSet<NodeIndex>,
}

impl Exclusion {
    fn allows(&self, edge: EdgeIndex, source: NodeIndex, target: NodeIndex) -> bool {
        !self.edges.contains(&edge) && !self.nodes.contains(&source) && !self.nodes.contains(&target)
    }

    pub(crate) fn has_edges(&self) -> bool {
        !self.edges.is_empty()
    }

    pub(crate) fn exclude_nodes(&mut self, nodes: &[NodeIndex]) {
        self.nodes.extend(nodes.iter().copied());
    }
}

/// Weighted graph over [`Vertex`] values
#[derive(Debug, Clone)]
pub struct MetroGraph<Ty: EdgeType> {
    graph: Graph<Vertex, f64, Ty>,

    /// Maps vertices to their index in the graph
    index: HashMap<Vertex, NodeIndex>,

    /// Every vertex anchored at a station
    by_station: BTreeMap<StationId, Vec<NodeIndex>>,

    /// Where journeys start and end at each station
    endpoints: HashMap<StationId, (NodeIndex, NodeIndex)>,

    weighting: Weighting,
}

/// Directed node-level graph used for transfer-aware routing
pub type TransferGraph = MetroGraph<Directed>;

/// Undirected station-level graph
pub type StationGraph = MetroGraph<Undirected>;

impl<Ty: EdgeType> MetroGraph<Ty> {
    fn empty(weighting: Weighting) -> Self {
        Self {
            graph: Graph::default(),
            index: HashMap::new(),
            by_station: BTreeMap::new(),
            endpoints: HashMap::new(),
            weighting,
        }
    }

    fn add_vertex(&mut self, vertex: Vertex) -> NodeIndex {
        if let Some(index) = self.index.get(&vertex) {
            return *index;
        }

        let index = self.graph.add_node(vertex);
        self.index.insert(vertex, index);
        self.by_station
            .entry(vertex.station())
            .or_default()
            .push(index);
        index
    }

    /// Adds an edge, overwriting the weight of an existing one
    fn set_edge(&mut self, from: NodeIndex, to: NodeIndex, weight: f64) {
        self.graph.update_edge(from, to, weight);
    }

    /// The underlying petgraph graph
    pub fn graph(&self) -> &Graph<Vertex, f64, Ty> {
        &self.graph
    }

    pub fn weighting(&self) -> Weighting {
        self.weighting
    }

    /// Node-level graphs are the directed ones
    pub fn is_transfer_aware(&self) -> bool {
        Ty::is_directed()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn vertex(&self, index: NodeIndex) -> Option<Vertex> {
        self.graph.node_weight(index).copied()
    }

    pub fn index_of(&self, vertex: Vertex) -> Option<NodeIndex> {
        self.index.get(&vertex).copied()
    }

    pub(crate) fn station_of(&self, index: NodeIndex) -> StationId {
        self.graph[index].station()
    }

    /// All vertices anchored at a station
    pub fn station_vertices(&self, station: StationId) -> &[NodeIndex] {
        self.by_station
            .get(&station)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Vertex a journey from this station starts at
    pub fn origin(&self, station: StationId) -> Option<NodeIndex> {
        self.endpoints.get(&station).map(|(origin, _)| *origin)
    }

    /// Vertex a journey to this station ends at
    pub fn destination(&self, station: StationId) -> Option<NodeIndex> {
        self.endpoints.get(&station).map(|(_, destination)| *destination)
    }

    pub fn edge_weight(&self, from: NodeIndex, to: NodeIndex) -> Option<f64> {
        self.graph
            .find_edge(from, to)
            .and_then(|edge| self.graph.edge_weight(edge).copied())
    }

    pub fn has_edge(&self, from: NodeIndex, to: NodeIndex) -> bool {
        self.graph.find_edge(from, to).is_some()
    }

    /// Sum of edge weights along consecutive vertices
    pub fn path_weight(&self, path: &[NodeIndex]) -> f64 {
        path.windows(2)
            .filter_map(|pair| self.edge_weight(pair[0], pair[1]))
            .sum()
    }

    /// Hide the edges from `from` to `to`
    pub(crate) fn exclude_edge(&self, exclusion: &mut Exclusion, from: NodeIndex, to: NodeIndex) {
        exclusion
            .edges
            .extend(self.graph.edges_connecting(from, to).map(|edge| edge.id()));
    }

    /// Hide every edge from any vertex of one station to any vertex of another
    pub(crate) fn exclude_between_stations(
        &self,
        exclusion: &mut Exclusion,
        from: StationId,
        to: StationId,
    ) {
        for source in self.station_vertices(from) {
            for target in self.station_vertices(to) {
                self.exclude_edge(exclusion, *source, *target);
            }
        }
    }

    /// Dijkstra (A* with a null heuristic) that skips excluded edges and vertices.
    ///
    /// Returns the total weight and the vertex sequence including both ends,
    /// or `None` when `to` is unreachable.
    pub(crate) fn shortest_path(
        &self,
        from: NodeIndex,
        to: NodeIndex,
        exclusion: &Exclusion,
    ) -> Option<(f64, Vec<NodeIndex>)> {
        let filtered = EdgeFiltered::from_fn(&self.graph, |edge| {
            exclusion.allows(edge.id(), edge.source(), edge.target())
        });

        astar(
            &filtered,
            from,
            |node| node == to,
            |edge| *edge.weight(),
            |_| 0.0, // Null heuristic = Dijkstra
        )
    }
}

impl TransferGraph {
    /// Expand every station into its entrance, exit and platforms.
    ///
    /// Inside a station: platform to platform costs [`TRANSFER_WEIGHT`],
    /// entrance to platform and platform to exit cost [`ACCESS_WEIGHT`].
    /// Entrance to exit and anything into an entrance or out of an exit
    /// don't exist. Consecutive platforms of a service are linked both ways.
    pub fn build(network: &Network) -> Self {
        let mut transfer = Self::empty(Weighting::Time);

        for node in network.nodes() {
            transfer.add_vertex(Vertex::Node {
                id: node.id,
                station: node.station,
            });
        }

        for station in network.stations() {
            let members: Vec<(NodeIndex, NodeKind)> = station
                .nodes()
                .iter()
                .filter_map(|id| {
                    let node = network.node(*id)?;
                    let index = transfer.index_of(Vertex::Node {
                        id: *id,
                        station: station.id,
                    })?;
                    Some((index, node.kind))
                })
                .collect();

            for (from, from_kind) in &members {
                for (to, to_kind) in &members {
                    if from == to {
                        continue;
                    }
                    if let Some(weight) = intra_station_weight(*from_kind, *to_kind) {
                        transfer.set_edge(*from, *to, weight);
                    }
                }
            }

            let vertex = |id| Vertex::Node {
                id,
                station: station.id,
            };
            if let (Some(entrance), Some(exit)) = (
                transfer.index_of(vertex(station.entrance())),
                transfer.index_of(vertex(station.exit())),
            ) {
                transfer.endpoints.insert(station.id, (entrance, exit));
            }
        }

        for service in network.services() {
            for (from, to, time) in service.legs() {
                let platforms = service.platform_at(from).zip(service.platform_at(to));
                let Some((from_platform, to_platform)) = platforms else {
                    continue;
                };
                let from_index = transfer.index_of(Vertex::Node {
                    id: from_platform,
                    station: from,
                });
                let to_index = transfer.index_of(Vertex::Node {
                    id: to_platform,
                    station: to,
                });
                if let (Some(u), Some(v)) = (from_index, to_index) {
                    if u == v {
                        continue;
                    }
                    transfer.set_edge(u, v, time);
                    transfer.set_edge(v, u, time);
                }
            }
        }

        transfer
    }
}

/// Weight of the edge between two nodes of the same station, if allowed
fn intra_station_weight(from: NodeKind, to: NodeKind) -> Option<f64> {
    match (from, to) {
        (NodeKind::Platform(_), NodeKind::Platform(_)) => Some(TRANSFER_WEIGHT),
        (NodeKind::Entrance, NodeKind::Platform(_)) => Some(ACCESS_WEIGHT),
        (NodeKind::Platform(_), NodeKind::Exit) => Some(ACCESS_WEIGHT),
        _ => None,
    }
}

impl StationGraph {
    /// One vertex per station, consecutive stops of each service linked
    pub fn build(network: &Network, weighting: Weighting) -> Self {
        let mut stations = Self::empty(weighting);

        for station in network.stations() {
            let index = stations.add_vertex(Vertex::Station(station.id));
            stations.endpoints.insert(station.id, (index, index));
        }

        for service in network.services() {
            for (from, to, time) in service.legs() {
                if from == to {
                    continue;
                }
                let weight = match weighting {
                    Weighting::Time => time,
                    Weighting::Distance => match (network.station(from), network.station(to)) {
                        (Some(a), Some(b)) => a.distance(b),
                        _ => continue,
                    },
                };
                let u = stations.index_of(Vertex::Station(from));
                let v = stations.index_of(Vertex::Station(to));
                if let (Some(u), Some(v)) = (u, v) {
                    stations.set_edge(u, v, weight);
                }
            }
        }

        stations
    }
}

/// A materialized graph for either routing mode
#[derive(Debug, Clone)]
pub enum RoutingGraph {
    Transfer(TransferGraph),
    Station(StationGraph),
}

impl RoutingGraph {
    pub fn is_transfer_aware(&self) -> bool {
        matches!(self, RoutingGraph::Transfer(_))
    }

    pub fn node_count(&self) -> usize {
        match self {
            RoutingGraph::Transfer(graph) => graph.node_count(),
            RoutingGraph::Station(graph) => graph.node_count(),
        }
    }

    pub fn edge_count(&self) -> usize {
        match self {
            RoutingGraph::Transfer(graph) => graph.edge_count(),
            RoutingGraph::Station(graph) => graph.edge_count(),
        }
    }

    pub fn shortest_paths(
        &self,
        search: &PathSearch,
        source: StationId,
        target: StationId,
    ) -> Result<Vec<RankedPath>> {
        match self {
            RoutingGraph::Transfer(graph) => search.run(graph, source, target),
            RoutingGraph::Station(graph) => search.run(graph, source, target),
        }
    }
}
