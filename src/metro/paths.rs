//! K shortest loopless paths with transfer-aware filtering
//!
//! Yen's algorithm over a [`MetroGraph`]. Every accepted path is the source of
//! new candidates: for each spur index the continuation that previously
//! accepted paths took is hidden and the cheapest other way to the target is
//! searched. Hidden edges live in a per-attempt [`Exclusion`], so nothing
//! needs restoring when a spur search comes up empty.
//!
//! On a transfer graph two extra rules apply to candidates before they are
//! returned: their station sequence must be new, and no station may appear
//! more than [`MAX_STATION_VISITS`] times among their nodes.

use log::debug;
use ordered_float::OrderedFloat;
use petgraph::graph::NodeIndex;
use petgraph::EdgeType;
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};

use super::error::{MetroError, Result};
use super::graph::{Exclusion, MetroGraph, Vertex};
use super::types::{NodeId, StationId, MAX_STATION_VISITS};

/// One route of a K-shortest result
#[derive(Debug, Clone, PartialEq)]
pub struct RankedPath {
    /// Total edge weight, infinite for placeholders
    pub weight: f64,
    /// Full vertex sequence from origin to destination
    pub vertices: Vec<Vertex>,
    /// Vertex sequence with consecutive vertices of the same station collapsed
    pub stations: Vec<StationId>,
}

impl RankedPath {
    /// Filler for slots with no route
    pub fn placeholder() -> Self {
        Self {
            weight: f64::INFINITY,
            vertices: Vec::new(),
            stations: Vec::new(),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Entity nodes visited, empty on a station graph
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.vertices.iter().filter_map(Vertex::node)
    }

    /// How often the most visited station shows up among the vertices
    pub fn max_station_visits(&self) -> usize {
        let mut counts: HashMap<StationId, usize> = HashMap::new();
        for vertex in &self.vertices {
            *counts.entry(vertex.station()).or_insert(0) += 1;
        }
        counts.values().copied().max().unwrap_or(0)
    }
}

/// Collapse consecutive vertices of the same station into one stop
pub fn station_path(vertices: &[Vertex]) -> Vec<StationId> {
    let mut stations: Vec<StationId> = vertices.iter().map(Vertex::station).collect();
    stations.dedup();
    stations
}

/// Parameters of a K-shortest query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathSearch {
    /// Number of routes to return
    pub k: usize,
    /// Transfer cap, only applied on transfer graphs
    pub max_station_visits: usize,
}

impl PathSearch {
    pub fn new(k: usize) -> Self {
        Self {
            k,
            max_station_visits: MAX_STATION_VISITS,
        }
    }

    pub fn with_max_station_visits(mut self, visits: usize) -> Self {
        self.max_station_visits = visits;
        self
    }

    /// Routes from `source` to `target`, always exactly `k` entries.
    ///
    /// On a transfer graph the route enters through the source's entrance and
    /// leaves through the target's exit.
    pub fn run<Ty: EdgeType>(
        &self,
        graph: &MetroGraph<Ty>,
        source: StationId,
        target: StationId,
    ) -> Result<Vec<RankedPath>> {
        let from = graph
            .origin(source)
            .ok_or(MetroError::UnknownStation(source))?;
        let to = graph
            .destination(target)
            .ok_or(MetroError::UnknownStation(target))?;
        Ok(self.between(graph, from, to))
    }

    /// Routes between two graph vertices, padded to `k` entries
    pub fn between<Ty: EdgeType>(
        &self,
        graph: &MetroGraph<Ty>,
        from: NodeIndex,
        to: NodeIndex,
    ) -> Vec<RankedPath> {
        let mut results = self.search(graph, from, to);
        // Stable, so ties keep the order they were found in
        results.sort_by(|a, b| a.weight.total_cmp(&b.weight));
        results.resize_with(self.k, RankedPath::placeholder);
        results
    }

    fn search<Ty: EdgeType>(
        &self,
        graph: &MetroGraph<Ty>,
        from: NodeIndex,
        to: NodeIndex,
    ) -> Vec<RankedPath> {
        let mut results: Vec<RankedPath> = Vec::new();
        if self.k == 0 {
            return results;
        }

        let Some(first) = graph.shortest_path(from, to, &Exclusion::default()) else {
            debug!("No path from {:?} to {:?}", graph.vertex(from), graph.vertex(to));
            return results;
        };

        let transfer_aware = graph.is_transfer_aware();
        let mut seen: HashSet<Vec<NodeIndex>> = HashSet::from([first.1.clone()]);
        let mut accepted: Vec<(f64, Vec<NodeIndex>)> = vec![first];

        // Min-heap on (weight, insertion order)
        let mut candidates: BinaryHeap<Reverse<(OrderedFloat<f64>, u64, Vec<NodeIndex>)>> =
            BinaryHeap::new();
        let mut pushed: u64 = 0;

        loop {
            let (weight, path) = &accepted[accepted.len() - 1];
            let ranked = self.rank(graph, *weight, path);
            if !transfer_aware || self.admits(&ranked, &results) {
                results.push(ranked);
                if results.len() == self.k {
                    break;
                }
            }

            for i in 0..path.len().saturating_sub(1) {
                let root = &path[..=i];
                let mut exclusion = Exclusion::default();

                for (_, previous) in &accepted {
                    if previous.len() <= i + 1 || previous[..=i] != *root {
                        continue;
                    }
                    let (u, v) = (previous[i], previous[i + 1]);
                    if transfer_aware {
                        let (from_station, to_station) = (graph.station_of(u), graph.station_of(v));
                        // Moving within one station is never excluded
                        if from_station == to_station {
                            continue;
                        }
                        graph.exclude_between_stations(&mut exclusion, from_station, to_station);
                    } else {
                        graph.exclude_edge(&mut exclusion, u, v);
                    }
                }

                if !exclusion.has_edges() {
                    continue;
                }
                exclusion.exclude_nodes(&root[..i]);

                let Some((spur_weight, spur_path)) = graph.shortest_path(path[i], to, &exclusion)
                else {
                    continue;
                };

                let mut total: Vec<NodeIndex> = root.to_vec();
                total.extend_from_slice(&spur_path[1..]);
                if seen.insert(total.clone()) {
                    let total_weight = graph.path_weight(root) + spur_weight;
                    candidates.push(Reverse((OrderedFloat(total_weight), pushed, total)));
                    pushed += 1;
                }
            }

            let Some(Reverse((weight, _, path))) = candidates.pop() else {
                break;
            };
            debug!(
                "Promoting candidate of weight {} ({} still queued)",
                weight,
                candidates.len()
            );
            accepted.push((weight.into_inner(), path));
        }

        debug!(
            "Found {} of {} requested paths after examining {} candidates",
            results.len(),
            self.k,
            accepted.len()
        );
        results
    }

    fn rank<Ty: EdgeType>(
        &self,
        graph: &MetroGraph<Ty>,
        weight: f64,
        path: &[NodeIndex],
    ) -> RankedPath {
        let vertices: Vec<Vertex> = path.iter().filter_map(|index| graph.vertex(*index)).collect();
        let stations = station_path(&vertices);
        RankedPath {
            weight,
            vertices,
            stations,
        }
    }

    /// New station sequence and within the transfer cap
    fn admits(&self, candidate: &RankedPath, results: &[RankedPath]) -> bool {
        results
            .iter()
            .all(|accepted| accepted.stations != candidate.stations)
            && candidate.max_station_visits() <= self.max_station_visits
    }
}
