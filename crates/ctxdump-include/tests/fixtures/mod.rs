//! Test fixtures for include-path integration tests
//!
//! Type models covering the shapes the traversal has to survive: plain
//! trees, self references, mutual cycles, diamonds and long chains.

#![allow(dead_code)]

use ctxdump_core::{TypeDescriptor, TypeRegistry};

/// Order / Customer / OrderLine with a Customer -> Orders back-reference
pub fn shop_model() -> TypeRegistry {
    let mut registry = TypeRegistry::with_builtins();
    registry.register(
        TypeDescriptor::object("Shop.Order")
            .with_property("Id", "int")
            .with_property("Customer", "Shop.Customer")
            .with_property("Lines", "List<Shop.OrderLine>"),
    );
    registry.register(
        TypeDescriptor::object("Shop.Customer")
            .with_property("Name", "string")
            .with_property("Orders", "List<Shop.Order>"),
    );
    registry.register(TypeDescriptor::object("Shop.OrderLine").with_property("Product", "string"));
    registry.register(TypeDescriptor::collection("List<Shop.Order>", "Shop.Order"));
    registry.register(TypeDescriptor::collection("List<Shop.OrderLine>", "Shop.OrderLine"));
    registry
}

/// `Node { Next: Node, Children: List<Node> }`
pub fn self_referencing_model() -> TypeRegistry {
    let mut registry = TypeRegistry::with_builtins();
    registry.register(
        TypeDescriptor::object("Graph.Node")
            .with_property("Next", "Graph.Node")
            .with_property("Children", "List<Graph.Node>"),
    );
    registry.register(TypeDescriptor::collection("List<Graph.Node>", "Graph.Node"));
    registry
}

/// `A -> B -> A`
pub fn mutual_cycle_model() -> TypeRegistry {
    let mut registry = TypeRegistry::with_builtins();
    registry.register(TypeDescriptor::object("Cycle.A").with_property("B", "Cycle.B"));
    registry.register(TypeDescriptor::object("Cycle.B").with_property("A", "Cycle.A"));
    registry
}

/// `Root -> Left -> Shared`, `Root -> Right -> Shared`, `Shared -> Root`
pub fn diamond_model() -> TypeRegistry {
    let mut registry = TypeRegistry::with_builtins();
    registry.register(
        TypeDescriptor::object("D.Root")
            .with_property("Left", "D.Left")
            .with_property("Right", "D.Right"),
    );
    registry.register(TypeDescriptor::object("D.Left").with_property("Shared", "D.Shared"));
    registry.register(TypeDescriptor::object("D.Right").with_property("Shared", "D.Shared"));
    registry.register(TypeDescriptor::object("D.Shared").with_property("Root", "D.Root"));
    registry
}

/// `Chain.T0 -> Chain.T1 -> ... -> Chain.T{len-1}`
pub fn chain_model(len: usize) -> TypeRegistry {
    let mut registry = TypeRegistry::with_builtins();
    for i in 0..len {
        let mut descriptor = TypeDescriptor::object(format!("Chain.T{}", i)).with_property("Id", "int");
        if i + 1 < len {
            descriptor = descriptor.with_property("Next", format!("Chain.T{}", i + 1));
        }
        registry.register(descriptor);
    }
    registry
}

/// Densely connected model: every type references every other type
pub fn mesh_model(size: usize) -> TypeRegistry {
    let mut registry = TypeRegistry::with_builtins();
    for i in 0..size {
        let mut descriptor = TypeDescriptor::object(format!("Mesh.T{}", i));
        for j in 0..size {
            descriptor = descriptor
                .with_property(format!("To{}", j), format!("Mesh.T{}", j))
                .with_property(format!("Many{}", j), format!("List<Mesh.T{}>", j));
        }
        registry.register(descriptor);
        registry.register(TypeDescriptor::collection(
            format!("List<Mesh.T{}>", i),
            format!("Mesh.T{}", i),
        ));
    }
    registry
}
