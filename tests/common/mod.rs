//! Small networks shared by the integration tests

#![allow(dead_code)]

use metro_net::metro::{LegRecord, LineRecord, Network, NetworkRecords, StationRecord};

pub fn stations(ids: &[u32]) -> Vec<StationRecord> {
    ids.iter()
        .map(|id| StationRecord::new(*id, format!("S{id}"), 51.5 + *id as f64 * 0.01, -0.1))
        .collect()
}

/// A(1) -> B(2) -> C(3) -> A(1), one service, every leg 1
pub fn loop_records() -> NetworkRecords {
    NetworkRecords {
        stations: stations(&[1, 2, 3]),
        lines: vec![LineRecord::new(1, "Circle", "#ffd300")],
        legs: vec![
            LegRecord::new(1, 2, 1, 1, 1.0),
            LegRecord::new(2, 3, 1, 1, 1.0),
            LegRecord::new(3, 1, 1, 1, 1.0),
        ],
    }
}

/// A(1) - B(2) on line 1, C(3) - D(4) on line 2, nothing in between
pub fn disconnected_records() -> NetworkRecords {
    NetworkRecords {
        stations: stations(&[1, 2, 3, 4]),
        lines: vec![
            LineRecord::new(1, "West", "#e32017"),
            LineRecord::new(2, "East", "#003688"),
        ],
        legs: vec![
            LegRecord::new(1, 2, 1, 1, 2.0),
            LegRecord::new(3, 4, 2, 1, 2.0),
        ],
    }
}

/// Two lines crossing at X(2): line 1 runs 1 -> 2 -> 3, line 2 runs 4 -> 2 -> 5
pub fn crossing_records() -> NetworkRecords {
    NetworkRecords {
        stations: stations(&[1, 2, 3, 4, 5]),
        lines: vec![
            LineRecord::new(1, "Central", "#e32017"),
            LineRecord::new(2, "Victoria", "#0098d4"),
        ],
        legs: vec![
            LegRecord::new(1, 2, 1, 1, 2.0),
            LegRecord::new(2, 3, 1, 1, 2.0),
            LegRecord::new(4, 2, 2, 1, 3.0),
            LegRecord::new(2, 5, 2, 1, 3.0),
        ],
    }
}

/// Line 1 runs 1 -> 2 -> 3 -> 4, line 2 branches 2 -> 5 -> 4
pub fn branch_records() -> NetworkRecords {
    NetworkRecords {
        stations: stations(&[1, 2, 3, 4, 5]),
        lines: vec![
            LineRecord::new(1, "Main", "#00782a"),
            LineRecord::new(2, "Branch", "#9b0056"),
        ],
        legs: vec![
            LegRecord::new(1, 2, 1, 1, 2.0),
            LegRecord::new(2, 3, 1, 1, 2.0),
            LegRecord::new(3, 4, 1, 1, 2.0),
            LegRecord::new(2, 5, 2, 1, 1.0),
            LegRecord::new(5, 4, 2, 1, 1.0),
        ],
    }
}

/// Stations 1..=n on a single line, every leg 1
pub fn line_records(n: u32) -> NetworkRecords {
    let ids: Vec<u32> = (1..=n).collect();
    NetworkRecords {
        stations: stations(&ids),
        lines: vec![LineRecord::new(1, "Straight", "#000000")],
        legs: (1..n).map(|i| LegRecord::new(i, i + 1, 1, 1, 1.0)).collect(),
    }
}

pub fn build(records: &NetworkRecords) -> Network {
    Network::from_records("test", records).expect("fixture should import")
}

/// Every id held by an owner resolves to a live entity
pub fn assert_no_dangling(network: &Network) {
    for station in network.stations() {
        for node in station.nodes() {
            assert!(network.node(*node).is_some(), "{} lists dead node {:?}", station.id, node);
        }
        for service in station.services() {
            assert!(network.service(*service).is_some(), "{} lists dead {}", station.id, service);
        }
        for line in station.lines() {
            assert!(network.line(*line).is_some(), "{} lists dead {}", station.id, line);
        }
    }
    for line in network.lines() {
        for service in line.services() {
            assert!(network.service(*service).is_some(), "{} lists dead {}", line.id, service);
        }
        for station in line.stations() {
            assert!(network.station(*station).is_some(), "{} lists dead {}", line.id, station);
        }
        for node in line.nodes() {
            assert!(network.node(*node).is_some(), "{} lists dead node {:?}", line.id, node);
        }
    }
    for service in network.services() {
        assert!(network.line(service.line()).is_some());
        for station in service.stations() {
            assert!(network.station(*station).is_some(), "{} stops at dead {}", service.id, station);
        }
        for platform in service.platforms() {
            assert!(network.node(platform).is_some(), "{} lists dead node {:?}", service.id, platform);
        }
    }
    for node in network.nodes() {
        assert!(network.station(node.station).is_some(), "node {:?} at dead station", node.id);
        if let Some(service) = node.service() {
            assert!(network.service(service).is_some(), "node {:?} of dead {}", node.id, service);
        }
    }
}
