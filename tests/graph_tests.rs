//! Graph materialization for both routing modes

mod common;

use common::{build, crossing_records, loop_records};
use metro_net::metro::{
    LineId, MetroError, NodeKind, ServiceId, StationId, Vertex, Weighting, ACCESS_WEIGHT,
    TRANSFER_WEIGHT,
};

#[test]
fn test_transfer_graph_edges_inside_interchange() {
    let network = build(&crossing_records());
    let graph = network.transfer_graph();
    let interchange = network.station(StationId(2)).unwrap();

    let index = |id| {
        graph
            .index_of(Vertex::Node {
                id,
                station: StationId(2),
            })
            .unwrap()
    };
    let entrance = index(interchange.entrance());
    let exit = index(interchange.exit());
    let central = index(
        network
            .service(ServiceId::new(LineId(1), 1))
            .unwrap()
            .platform_at(StationId(2))
            .unwrap(),
    );
    let victoria = index(
        network
            .service(ServiceId::new(LineId(2), 1))
            .unwrap()
            .platform_at(StationId(2))
            .unwrap(),
    );

    for platform in [central, victoria] {
        assert_eq!(graph.edge_weight(entrance, platform), Some(ACCESS_WEIGHT));
        assert_eq!(graph.edge_weight(platform, exit), Some(ACCESS_WEIGHT));
        assert!(!graph.has_edge(platform, entrance), "nothing flows into an entrance");
        assert!(!graph.has_edge(exit, platform), "nothing flows out of an exit");
    }
    assert_eq!(graph.edge_weight(central, victoria), Some(TRANSFER_WEIGHT));
    assert_eq!(graph.edge_weight(victoria, central), Some(TRANSFER_WEIGHT));
    assert!(!graph.has_edge(entrance, exit), "no walking straight through");
    assert!(!graph.has_edge(exit, entrance));
}

#[test]
fn test_transfer_graph_links_platforms_both_ways() {
    let network = build(&crossing_records());
    let graph = network.transfer_graph();
    let victoria = network.service(ServiceId::new(LineId(2), 1)).unwrap();

    let platform = |station| {
        graph
            .index_of(Vertex::Node {
                id: victoria.platform_at(station).unwrap(),
                station,
            })
            .unwrap()
    };

    assert_eq!(graph.edge_weight(platform(StationId(4)), platform(StationId(2))), Some(3.0));
    assert_eq!(graph.edge_weight(platform(StationId(2)), platform(StationId(4))), Some(3.0));
    assert_eq!(graph.edge_weight(platform(StationId(2)), platform(StationId(5))), Some(3.0));
    assert!(!graph.has_edge(platform(StationId(4)), platform(StationId(5))));
}

#[test]
fn test_transfer_graph_counts() {
    let network = build(&loop_records());
    let graph = network.transfer_graph();

    assert!(graph.is_transfer_aware());
    assert_eq!(graph.node_count(), network.node_count());
    // Entrance -> platform and platform -> exit per station, plus three legs both ways
    assert_eq!(graph.edge_count(), 3 * 2 + 3 * 2);

    for station in network.stations() {
        let origin = graph.origin(station.id).unwrap();
        let destination = graph.destination(station.id).unwrap();
        assert_eq!(graph.vertex(origin).and_then(|v| v.node()), Some(station.entrance()));
        assert_eq!(graph.vertex(destination).and_then(|v| v.node()), Some(station.exit()));
        assert_eq!(graph.station_vertices(station.id).len(), 3);
    }
}

#[test]
fn test_transfer_graph_only_uses_entity_nodes() {
    let network = build(&crossing_records());
    let graph = network.transfer_graph();

    for index in graph.graph().node_indices() {
        let vertex = graph.vertex(index).unwrap();
        let node = network.node(vertex.node().unwrap()).unwrap();
        assert_eq!(node.station, vertex.station());
        if let NodeKind::Platform(service) = node.kind {
            assert!(network.service(service).unwrap().contains(node.station));
        }
    }
}

#[test]
fn test_station_graph_time_weighting() {
    let network = build(&crossing_records());
    let graph = network.station_graph(Weighting::Time);

    assert!(!graph.is_transfer_aware());
    assert_eq!(graph.node_count(), 5);
    assert_eq!(graph.edge_count(), 4);

    let index = |id| graph.index_of(Vertex::Station(StationId(id))).unwrap();
    assert_eq!(graph.edge_weight(index(1), index(2)), Some(2.0));
    assert_eq!(graph.edge_weight(index(2), index(1)), Some(2.0), "undirected");
    assert_eq!(graph.edge_weight(index(4), index(2)), Some(3.0));
    assert!(!graph.has_edge(index(1), index(3)));
    assert_eq!(graph.origin(StationId(1)), graph.destination(StationId(1)));
}

#[test]
fn test_station_graph_distance_weighting() {
    let network = build(&crossing_records());
    let graph = network.station_graph(Weighting::Distance);
    assert_eq!(graph.weighting(), Weighting::Distance);

    let a = network.station(StationId(1)).unwrap();
    let b = network.station(StationId(2)).unwrap();
    let index = |id| graph.index_of(Vertex::Station(id)).unwrap();

    let weight = graph.edge_weight(index(a.id), index(b.id)).unwrap();
    assert!((weight - a.distance(b)).abs() < 1e-12);
    assert!(weight > 1.0 && weight < 1.2, "0.01 degree of latitude is ~1.1 km, got {weight}");
}

#[test]
fn test_loop_station_graph_has_three_edges() {
    let network = build(&loop_records());
    let graph = network.station_graph(Weighting::Time);
    assert_eq!(graph.edge_count(), 3);
}

#[test]
fn test_weighting_parsing() {
    assert_eq!("time".parse::<Weighting>(), Ok(Weighting::Time));
    assert_eq!("distance".parse::<Weighting>(), Ok(Weighting::Distance));
    assert_eq!(
        "hops".parse::<Weighting>(),
        Err(MetroError::InvalidWeighting("hops".to_string()))
    );
}

#[test]
fn test_transfers_require_time_weighting() {
    let network = build(&loop_records());

    assert_eq!(
        network.graph(Weighting::Distance, true).unwrap_err(),
        MetroError::TransfersRequireTime(Weighting::Distance)
    );
    assert!(network.graph(Weighting::Time, true).unwrap().is_transfer_aware());
    assert!(!network.graph(Weighting::Distance, false).unwrap().is_transfer_aware());
}
