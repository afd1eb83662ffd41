//! Parser Benchmark
//!
//! Measures annotation parsing throughput from simple keywords up to nested
//! shapes and callables.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use tyshape::{ParserConfig, TypeScope, parse_type, parse_type_in_scope};

const ANNOTATIONS: &[(&str, &str)] = &[
    ("keyword", "non-empty-string"),
    ("nullable", "?App\\Model\\User"),
    ("generic", "array<int, list<string>>"),
    (
        "shape",
        "array{id: positive-int, name: non-empty-string, tags?: list<string>, meta: array<string, mixed>, ...}",
    ),
    (
        "callable",
        "Closure(int, string=, array{key: int-mask<1, 2, 4>}...): (App\\Result<int>|null)",
    ),
    (
        "union",
        "int<0, 100>|'draft'|'published'|App\\Status::Archived|class-string<App\\Model>|null",
    ),
];

fn bench_parse(c: &mut Criterion) {
    let config = ParserConfig::default();
    let mut group = c.benchmark_group("parse");
    for (name, text) in ANNOTATIONS {
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), text, |b, text| {
            b.iter(|| black_box(parse_type(black_box(text), &config)))
        });
    }
    group.finish();
}

fn bench_parse_with_templates(c: &mut Criterion) {
    let config = ParserConfig::default();
    let scope = TypeScope::new()
        .with_template("TKey", "fn-bench", tyshape::TUnion::array_key())
        .with_template("TValue", "fn-bench", tyshape::TUnion::mixed());
    c.bench_function("parse_templated", |b| {
        b.iter(|| {
            black_box(parse_type_in_scope(
                black_box("iterable<TKey, TValue>|array<TKey, list<TValue>>"),
                &config,
                &scope,
            ))
        })
    });
}

criterion_group!(benches, bench_parse, bench_parse_with_templates);
criterion_main!(benches);
