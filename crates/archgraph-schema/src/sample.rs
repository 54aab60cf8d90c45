//! Built-in sample architecture, used by the CLI and as a test fixture.

use crate::kinds::{DataFlow, DetailLevel, EdgeKind, HealthStatus, LayoutType, NodeKind};
use crate::types::{AnalysisEnvelope, DefaultView, Edge, Graph, Layout, Node, NodeMetrics, Vec3};

/// A small e-commerce system: gateway, three services with nested modules,
/// a database, a cache, a queue and an external payment provider.
pub fn sample_graph() -> Graph {
    let mut gateway = Node::new("gateway", "API Gateway", NodeKind::Gateway)
        .with_description("Routes public traffic to backend services");
    gateway.technology = Some("nginx".into());
    gateway.position = Some(Vec3::new(0.0, 6.0, 0.0));

    let mut orders = Node::new("orders", "Order Service", NodeKind::Service)
        .with_description("Order lifecycle and checkout")
        .with_child(
            Node::new("orders.api", "HTTP Handlers", NodeKind::Module)
                .with_child(Node::new("orders.api.create", "create_order", NodeKind::Function)),
        )
        .with_child(
            Node::new("orders.domain", "Domain", NodeKind::Module)
                .with_child(Node::new("orders.domain.order", "Order", NodeKind::Class))
                .with_child(Node::new("orders.domain.line", "LineItem", NodeKind::Class)),
        );
    orders.language = Some("rust".into());
    orders.framework = Some("axum".into());
    orders.status = Some(HealthStatus::Healthy);
    orders.instances = Some(3);
    orders.region = Some("eu-west-1".into());
    orders.metrics = Some(NodeMetrics {
        requests_per_second: Some(120.0),
        latency_ms: Some(35.0),
        error_rate: Some(0.002),
        ..NodeMetrics::default()
    });

    let mut catalog = Node::new("catalog", "Catalog Service", NodeKind::Service)
        .with_child(Node::new("catalog.search", "Search", NodeKind::Module));
    catalog.language = Some("go".into());
    catalog.status = Some(HealthStatus::Degraded);

    let notifications = Node::new("notify", "Notification Worker", NodeKind::Service);

    let mut db = Node::new("orders-db", "Orders DB", NodeKind::Database);
    db.technology = Some("postgresql".into());

    let mut cache = Node::new("cache", "Catalog Cache", NodeKind::Cache);
    cache.technology = Some("redis".into());

    let mut queue = Node::new("events", "Order Events", NodeKind::Queue);
    queue.technology = Some("kafka".into());

    let payments = Node::new("payments", "Payment Provider", NodeKind::External);

    let mut place = Edge::new("e-gw-orders", "gateway", "orders", EdgeKind::Http)
        .with_label("POST /orders");
    place.data_flow = Some(DataFlow::Request);

    let mut publish = Edge::new("e-orders-events", "orders", "events", EdgeKind::Queue)
        .with_label("order.created");
    publish.data_flow = Some(DataFlow::Event);

    let mut cache_rw = Edge::new("e-catalog-cache", "catalog", "cache", EdgeKind::Database);
    cache_rw.bidirectional = Some(true);

    Graph {
        name: "Sample Shop".into(),
        version: "1.0.0".into(),
        description: Some("Reference architecture shipped with archgraph".into()),
        generated_at: None,
        source_repository: None,
        nodes: vec![
            gateway,
            orders,
            catalog,
            notifications,
            db,
            cache,
            queue,
            payments,
        ],
        edges: vec![
            place,
            Edge::new("e-gw-catalog", "gateway", "catalog", EdgeKind::Http),
            Edge::new("e-orders-db", "orders", "orders-db", EdgeKind::Database),
            publish,
            Edge::new("e-events-notify", "events", "notify", EdgeKind::Event),
            cache_rw,
            Edge::new("e-orders-payments", "orders", "payments", EdgeKind::Http)
                .with_label("charge"),
            Edge::new("e-orders-catalog", "orders", "catalog", EdgeKind::Grpc),
            Edge::new(
                "e-api-domain",
                "orders.api",
                "orders.domain",
                EdgeKind::Import,
            ),
            Edge::new(
                "e-line-order",
                "orders.domain.line",
                "orders.domain.order",
                EdgeKind::Composition,
            ),
        ],
        layout: Some(Layout {
            layout_type: LayoutType::Hierarchical,
            spacing: Some(8.0),
            layers: Some(vec![
                vec!["gateway".into()],
                vec!["orders".into(), "catalog".into(), "notify".into()],
                vec![
                    "orders-db".into(),
                    "cache".into(),
                    "events".into(),
                    "payments".into(),
                ],
            ]),
        }),
        default_view: Some(DefaultView {
            position: Vec3::new(0.0, 20.0, 40.0),
            target: Vec3::default(),
            detail_level: DetailLevel::Service,
        }),
    }
}

pub fn sample_envelope() -> AnalysisEnvelope {
    AnalysisEnvelope {
        architecture: sample_graph(),
        summary: "Gateway-fronted order and catalog services backed by Postgres, Redis and Kafka."
            .into(),
        insights: vec![
            "Order creation is decoupled from notifications through an event queue.".into(),
        ],
        warnings: vec!["Orders calls the payment provider synchronously.".into()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::validate;

    #[test]
    fn test_sample_validates_and_round_trips() {
        let envelope = sample_envelope();
        let value = serde_json::to_value(&envelope).unwrap();
        let decoded = validate(&value).unwrap();
        assert_eq!(decoded, envelope);
    }

    #[test]
    fn test_sample_is_nested() {
        let graph = sample_graph();
        let orders = graph.nodes.iter().find(|n| n.id == "orders").unwrap();
        assert_eq!(orders.children().len(), 2);
        assert!(orders.children()[1].children()[0].children().is_empty());
    }
}
