//! Percolation-style robustness simulation
//!
//! Each run removes stations one at a time, uniformly at random, from its own
//! copy of a [`StationGraph`] and measures what is left after every removal.
//! Runs are independent and averaged, so they execute in parallel.

use log::debug;
use petgraph::algo::dijkstra;
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::unionfind::UnionFind;
use petgraph::visit::EdgeRef;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use std::collections::HashMap;

use super::error::{MetroError, Result};
use super::graph::{StationGraph, Vertex};

/// What is measured after each removal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    /// Size of the largest connected component over the original station count
    LargestCluster,
    /// Mean reciprocal hop distance over all ordered station pairs
    GlobalEfficiency,
}

/// Averaged metric indexed by number of stations removed
#[derive(Debug, Clone, PartialEq)]
pub struct RobustnessCurve {
    pub metric: Metric,
    /// `removed_fraction[i] == i / station count`
    pub removed_fraction: Vec<f64>,
    /// `values[i]` is the metric after `i` removals
    pub values: Vec<f64>,
}

/// Runs repeated random-failure experiments on a station graph
#[derive(Debug, Clone, Copy)]
pub struct RobustnessSimulator {
    runs: usize,
    metric: Metric,
    /// Seeded runs are reproducible
    seed: Option<u64>,
}

impl RobustnessSimulator {
    pub fn new(runs: usize, metric: Metric) -> Self {
        Self {
            runs,
            metric,
            seed: None,
        }
    }

    /// Create a simulator whose runs use seeded RNGs
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    fn rng_for(&self, run: usize) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(run as u64)),
            None => StdRng::from_os_rng(),
        }
    }

    /// Average the metric curve over all runs.
    ///
    /// The curve has one entry per removal count, from 0 to the number of
    /// stations. An empty graph yields the single value 0.
    pub fn simulate(&self, graph: &StationGraph) -> Result<RobustnessCurve> {
        if self.runs == 0 {
            return Err(MetroError::InvalidRunCount);
        }

        let base = graph.graph();
        let stations = base.node_count();
        debug!(
            "Simulating {} runs of {:?} on {} stations",
            self.runs, self.metric, stations
        );

        // Collected in run order so seeded results don't depend on scheduling
        let curves: Vec<Vec<f64>> = (0..self.runs)
            .into_par_iter()
            .map(|run| {
                let mut rng = self.rng_for(run);
                percolate(base, self.metric, &mut rng)
            })
            .collect();

        let mut totals = vec![0.0; stations + 1];
        for curve in curves {
            for (total, value) in totals.iter_mut().zip(curve) {
                *total += value;
            }
        }

        let values = totals
            .into_iter()
            .map(|total| total / self.runs as f64)
            .collect();
        let removed_fraction = (0..=stations)
            .map(|removed| {
                if stations == 0 {
                    0.0
                } else {
                    removed as f64 / stations as f64
                }
            })
            .collect();

        Ok(RobustnessCurve {
            metric: self.metric,
            removed_fraction,
            values,
        })
    }
}

/// One run: measure, remove a random station, repeat until empty
fn percolate<R: Rng>(base: &UnGraph<Vertex, f64>, metric: Metric, rng: &mut R) -> Vec<f64> {
    let original = base.node_count();
    let mut working = base.clone();
    let mut values = Vec::with_capacity(original + 1);

    loop {
        let value = match metric {
            Metric::LargestCluster if original > 0 => {
                largest_component(&working) as f64 / original as f64
            }
            Metric::LargestCluster => 0.0,
            Metric::GlobalEfficiency => global_efficiency(&working),
        };
        values.push(value);

        if working.node_count() == 0 {
            break;
        }
        let victim = NodeIndex::new(rng.random_range(0..working.node_count()));
        working.remove_node(victim);
    }

    values
}

/// Number of nodes in the largest connected component
pub fn largest_component<N, E>(graph: &UnGraph<N, E>) -> usize {
    let mut components = UnionFind::<usize>::new(graph.node_count());
    for edge in graph.edge_references() {
        components.union(edge.source().index(), edge.target().index());
    }

    let mut sizes: HashMap<usize, usize> = HashMap::new();
    for label in components.into_labeling() {
        *sizes.entry(label).or_insert(0) += 1;
    }
    sizes.values().copied().max().unwrap_or(0)
}

/// Mean of `1 / hops(u, v)` over ordered pairs of distinct nodes.
///
/// Unreachable pairs contribute 0. Graphs with fewer than two nodes have
/// efficiency 0.
pub fn global_efficiency<N, E>(graph: &UnGraph<N, E>) -> f64 {
    let nodes = graph.node_count();
    if nodes < 2 {
        return 0.0;
    }

    let mut total = 0.0f64;
    for source in graph.node_indices() {
        let hops = dijkstra(graph, source, None, |_| 1usize);
        total += graph
            .node_indices()
            .filter(|node| *node != source)
            .filter_map(|node| hops.get(&node))
            .map(|distance| 1.0 / *distance as f64)
            .sum::<f64>();
    }

    total / (nodes * (nodes - 1)) as f64
}
