use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde::{Deserialize, Serialize};
use yaml_tree::{emit_json, emit_yaml, from_tree, parse_in_arena, parse_in_place, to_tree, Tree};

#[derive(Serialize, Deserialize, Clone)]
struct Product {
    sku: String,
    name: String,
    price: f64,
    quantity: u32,
}

fn products(size: u32) -> Vec<Product> {
    (0..size)
        .map(|i| Product {
            sku: format!("SKU{}", i),
            name: format!("Product {}", i),
            price: 9.99 + f64::from(i),
            quantity: i,
        })
        .collect()
}

fn benchmark_build_by_hand(c: &mut Criterion) {
    c.bench_function("build_map_by_hand", |b| {
        b.iter(|| {
            let mut tree = Tree::new();
            tree.root_mut().set_map().unwrap();
            for i in 0..100u32 {
                let mut root = tree.root_mut();
                let mut child = root.append_child().unwrap();
                child.write_key(&i).unwrap();
                child.write(&(i * 3)).unwrap();
            }
            black_box(tree)
        })
    });
}

fn benchmark_to_tree(c: &mut Criterion) {
    let mut group = c.benchmark_group("to_tree");
    for size in [10, 100, 500].iter() {
        let data = products(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &data, |b, data| {
            b.iter(|| to_tree(black_box(data)))
        });
    }
    group.finish();
}

fn benchmark_emit(c: &mut Criterion) {
    let mut group = c.benchmark_group("emit");
    for size in [10, 100, 500].iter() {
        let tree = to_tree(&products(*size)).unwrap();
        group.bench_with_input(BenchmarkId::new("json", size), &tree, |b, tree| {
            b.iter(|| emit_json(black_box(tree)))
        });
        group.bench_with_input(BenchmarkId::new("yaml", size), &tree, |b, tree| {
            b.iter(|| emit_yaml(black_box(tree)))
        });
    }
    group.finish();
}

fn benchmark_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    let tree = to_tree(&products(100)).unwrap();
    let json = emit_json(&tree).unwrap();
    let yaml = emit_yaml(&tree).unwrap();

    group.bench_function("json_in_place", |b| b.iter(|| parse_in_place(black_box(&json))));
    group.bench_function("json_in_arena", |b| b.iter(|| parse_in_arena(black_box(&json))));
    group.bench_function("yaml_in_place", |b| b.iter(|| parse_in_place(black_box(&yaml))));
    group.finish();
}

fn benchmark_from_tree(c: &mut Criterion) {
    let tree = to_tree(&products(100)).unwrap();
    c.bench_function("from_tree_products", |b| {
        b.iter(|| from_tree::<Vec<Product>>(black_box(&tree)))
    });
}

fn benchmark_comparison_with_serde_json(c: &mut Criterion) {
    let data = products(100);
    let mut group = c.benchmark_group("comparison");

    group.bench_function("yaml_tree_json", |b| {
        b.iter(|| to_tree(black_box(&data)).and_then(|t| emit_json(&t)))
    });
    group.bench_function("serde_json", |b| {
        b.iter(|| serde_json::to_string(black_box(&data)))
    });
    group.finish();
}

criterion_group!(
    benches,
    benchmark_build_by_hand,
    benchmark_to_tree,
    benchmark_emit,
    benchmark_parse,
    benchmark_from_tree,
    benchmark_comparison_with_serde_json
);
criterion_main!(benches);
