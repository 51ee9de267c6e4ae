//! Benchmarks for include-tree construction
//!
//! These benchmarks measure how the builder scales with densely connected
//! type models, with and without the cycle guard doing the pruning.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ctxdump_core::{TypeDescriptor, TypeRegistry};
use ctxdump_include::{BuildOptions, IncludeTreeBuilder, RegistryReflector};

/// Generate a model of N types where every type references every other type,
/// both directly and through a collection
fn generate_mesh(size: usize) -> TypeRegistry {
    let mut registry = TypeRegistry::with_builtins();

    for i in 0..size {
        let mut descriptor = TypeDescriptor::object(format!("Bench.T{}", i)).with_property("Id", "int");
        for j in 0..size {
            descriptor = descriptor
                .with_property(format!("One{}", j), format!("Bench.T{}", j))
                .with_property(format!("Many{}", j), format!("List<Bench.T{}>", j));
        }
        registry.register(descriptor);
        registry.register(TypeDescriptor::collection(
            format!("List<Bench.T{}>", i),
            format!("Bench.T{}", i),
        ));
    }

    registry
}

fn bench_guarded_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("guarded_build");

    for size in [10, 50, 100] {
        let registry = generate_mesh(size);
        let reflector = RegistryReflector::new(&registry);
        let root = registry.handle("Bench.T0").unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| {
                let tree = IncludeTreeBuilder::new(&reflector, BuildOptions::new("Bench."))
                    .build_tree(black_box(root));
                black_box(tree.paths())
            })
        });
    }

    group.finish();
}

fn bench_depth_bounded_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("depth_bounded_build");
    let registry = generate_mesh(8);
    let reflector = RegistryReflector::new(&registry);
    let root = registry.handle("Bench.T0").unwrap();

    for depth in [1, 2, 3] {
        group.bench_with_input(BenchmarkId::from_parameter(depth), &depth, |b, &depth| {
            b.iter(|| {
                let options = BuildOptions::new("Bench.")
                    .with_ignore_list(false)
                    .with_max_depth(depth);
                let tree = IncludeTreeBuilder::new(&reflector, options).build_tree(black_box(root));
                black_box(tree.len())
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_guarded_build, bench_depth_bounded_build);
criterion_main!(benches);
