//! Test fixtures for export integration tests

#![allow(dead_code)]

use ctxdump_catalog::{ConnectionDescriptor, EntityMetadata, Snapshot};
use ctxdump_core::{FieldValue, ObjectGraph, ObjectId, ObjectRecord};

/// Shop snapshot: one customer, two orders pointing back at it, one line
pub fn shop_snapshot() -> Snapshot {
    let mut objects = ObjectGraph::new();
    let customer = objects.insert(ObjectRecord::new("Shop.Customer").with_field("Id", 1i64).with_field("Name", "Ada"));
    let first = objects.insert(
        ObjectRecord::new("Shop.Order")
            .with_field("Id", 10i64)
            .with_field("Customer", customer),
    );
    let second = objects.insert(
        ObjectRecord::new("Shop.Order")
            .with_field("Id", 11i64)
            .with_field("Customer", customer),
    );
    let line = objects.insert(
        ObjectRecord::new("Shop.OrderLine")
            .with_field("Id", 100i64)
            .with_field("Product", "Tea")
            .with_field("Order", first),
    );
    if let Some(record) = objects.get_mut(customer) {
        record.set_field("Orders", FieldValue::references([first, second]));
    }

    Snapshot::new(ConnectionDescriptor::new("localhost", "shop"), "ShopContext")
        .with_entity(EntityMetadata::table("Customers", "Shop.Customer").with_column("customer_id", "Id"))
        .with_entity(EntityMetadata::table("Orders", "Shop.Order").with_column("order_id", "Id"))
        .with_entity(EntityMetadata::table("OrderLines", "Shop.OrderLine").with_column("order_line_id", "Id"))
        .with_collection("Customers", "Shop.Customer", vec![customer])
        .with_collection("Orders", "Shop.Order", vec![first, second])
        .with_collection("OrderLines", "Shop.OrderLine", vec![line])
        .with_objects(objects)
}

/// Snapshot of `n` independent tables `T0..Tn`, one record each
pub fn wide_snapshot(n: usize) -> Snapshot {
    let mut objects = ObjectGraph::new();
    let mut snapshot = Snapshot::new(ConnectionDescriptor::new("localhost", "wide"), "WideContext");

    for i in 0..n {
        let entity = format!("Wide.T{}", i);
        let id = objects.insert(ObjectRecord::new(entity.as_str()).with_field("Index", i as i64));
        snapshot = snapshot
            .with_entity(EntityMetadata::table(format!("t{}", i), entity.as_str()))
            .with_collection(format!("T{}s", i), entity.as_str(), vec![id]);
    }

    snapshot.with_objects(objects)
}

/// Snapshot whose only collection points at a record that does not exist
pub fn dangling_snapshot() -> Snapshot {
    Snapshot::new(ConnectionDescriptor::new("localhost", "broken"), "BrokenContext")
        .with_entity(EntityMetadata::table("Ghosts", "Broken.Ghost"))
        .with_collection("Ghosts", "Broken.Ghost", vec![ObjectId::new(7)])
}
