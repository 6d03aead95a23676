use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use query_to_pg::{generate_sql_and_params, parse_query_string, query_string_to_sql, PrefixMap};
use serde_json::json;

/// Benchmark compiling single-feature filters
fn bench_simple_filters(c: &mut Criterion) {
    let mut group = c.benchmark_group("simple_filters");

    let equality = json!({"status": "active"});
    group.bench_function("equality", |b| {
        b.iter(|| generate_sql_and_params(black_box("SELECT * FROM users"), black_box(&equality), None))
    });

    let comparison = json!({"age": {"$gte": 18, "$lt": 65}});
    group.bench_function("comparison", |b| {
        b.iter(|| generate_sql_and_params(black_box("SELECT * FROM users"), black_box(&comparison), None))
    });

    let disjunction = json!({"$or": [{"status": "active"}, {"status": "pending"}]});
    group.bench_function("disjunction", |b| {
        b.iter(|| generate_sql_and_params(black_box("SELECT * FROM users"), black_box(&disjunction), None))
    });

    let pagination = json!({"$sort": {"created_at": -1}, "$limit": 20, "$skip": 40});
    group.bench_function("pagination", |b| {
        b.iter(|| generate_sql_and_params(black_box("SELECT * FROM users"), black_box(&pagination), None))
    });

    group.finish();
}

/// Benchmark query-string decoding
fn bench_decoding(c: &mut Criterion) {
    let mut group = c.benchmark_group("decoding");

    group.bench_function("flat", |b| {
        b.iter(|| parse_query_string(black_box("name=bob&age=42&active=true")))
    });

    group.bench_function("nested", |b| {
        b.iter(|| {
            parse_query_string(black_box(
                "age[$gte]=18&$or[0][status]=active&$or[1][status]=pending&$sort[name]=1",
            ))
        })
    });

    group.finish();
}

/// Benchmark end-to-end performance across varying filter sizes
fn bench_filter_size_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter_size_scaling");

    for num_fields in [1, 3, 5, 10].iter() {
        group.bench_with_input(
            BenchmarkId::from_parameter(num_fields),
            num_fields,
            |b, &num_fields| {
                let mut filter = serde_json::Map::new();
                for i in 0..num_fields {
                    filter.insert(format!("field{}", i), json!({"$gt": i, "$ne": null}));
                }
                let filter = serde_json::Value::Object(filter);

                b.iter(|| generate_sql_and_params(black_box("SELECT * FROM t"), black_box(&filter), None))
            },
        );
    }

    group.finish();
}

/// Benchmark realistic workload scenarios
fn bench_realistic_workloads(c: &mut Criterion) {
    let mut group = c.benchmark_group("realistic_workloads");

    let prefixes = PrefixMap::new()
        .with_prefix("name", "u")
        .and_then(|prefixes| prefixes.with_prefix("total", "o"))
        .unwrap();

    group.bench_function("joined_search", |b| {
        let filter = json!({
            "name": "john",
            "total": {"$gte": 100},
            "$or": [{"status": "completed"}, {"status": "shipped"}],
            "$sort": {"total": -1},
            "$limit": 25
        });
        b.iter(|| {
            generate_sql_and_params(
                black_box("SELECT * FROM users u JOIN orders o ON o.user_id = u.id"),
                black_box(&filter),
                Some(&prefixes),
            )
        })
    });

    group.bench_function("query_string_listing", |b| {
        b.iter(|| {
            query_string_to_sql(
                black_box("SELECT * FROM posts"),
                black_box("published=true&created_at[$gte]=2024-01-01&$sort[created_at]=-1&$limit=50&$skip=100"),
                None,
            )
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_simple_filters,
    bench_decoding,
    bench_filter_size_scaling,
    bench_realistic_workloads
);
criterion_main!(benches);
