//! Test fixtures for catalog integration tests
//!
//! A small shop model (customers, orders, order lines, a reporting view)
//! with cyclic references between customers and orders.

#![allow(dead_code)]

use ctxdump_catalog::{ConnectionDescriptor, EntityMetadata, Snapshot};
use ctxdump_core::{FieldValue, ObjectGraph, ObjectRecord};

/// Entity metadata of the shop model
pub fn shop_entities() -> Vec<EntityMetadata> {
    vec![
        EntityMetadata::table("Customers", "Shop.Customer")
            .with_column("customer_id", "Id")
            .with_column("full_name", "Name"),
        EntityMetadata::table("Orders", "Shop.Order")
            .with_column("order_id", "Id")
            .with_column("customer_id", "CustomerId")
            .with_column("placed_at", "PlacedAt"),
        EntityMetadata::table("OrderLines", "Shop.OrderLine")
            .with_column("order_line_id", "Id")
            .with_column("order_id", "OrderId")
            .with_column("product", "Product"),
        EntityMetadata::view("v_customer_totals", "Shop.CustomerTotal")
            .with_column("customer_id", "CustomerId")
            .with_column("total", "Total"),
    ]
}

/// Records of the shop model: one customer with two orders
pub fn shop_objects() -> ObjectGraph {
    let mut graph = ObjectGraph::new();
    let customer = graph.insert(ObjectRecord::new("Shop.Customer").with_field("Id", 1i64).with_field("Name", "Ada"));
    let first = graph.insert(
        ObjectRecord::new("Shop.Order")
            .with_field("Id", 10i64)
            .with_field("Customer", customer),
    );
    let second = graph.insert(
        ObjectRecord::new("Shop.Order")
            .with_field("Id", 11i64)
            .with_field("Customer", customer),
    );
    if let Some(record) = graph.get_mut(customer) {
        record.set_field("Orders", FieldValue::references([first, second]));
    }
    graph
}

/// Complete shop snapshot
pub fn shop_snapshot() -> Snapshot {
    let objects = shop_objects();
    let customers = vec![ctxdump_core::ObjectId::new(0)];
    let orders = vec![ctxdump_core::ObjectId::new(1), ctxdump_core::ObjectId::new(2)];

    shop_entities().into_iter().fold(
        Snapshot::new(ConnectionDescriptor::new("localhost", "shop"), "ShopContext"),
        |snapshot, entity| snapshot.with_entity(entity),
    )
    .with_collection("Customers", "Shop.Customer", customers)
    .with_collection("Orders", "Shop.Order", orders)
    .with_collection("OrderLines", "Shop.OrderLine", Vec::new())
    .with_objects(objects)
}
