//! Metro Network Analysis Library
//!
//! Models a metro network as a multi-layer graph, finds the K best
//! alternative routes between stations and measures how the network
//! degrades under random station failures.

pub mod loader;
pub mod metro;
