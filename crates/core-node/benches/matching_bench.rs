use core_node::{MatchSettings, Node, Query};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn benchmark_decode(c: &mut Criterion) {
    let inputs = [
        ("bare", "essentials.fly"),
        ("scoped", "survival-nether/essentials.fly$1999999999"),
        ("contexts", "survival/(region=spawn,mode=pvp)build.place"),
    ];

    let mut group = c.benchmark_group("decode");
    for (name, input) in inputs {
        group.bench_with_input(BenchmarkId::from_parameter(name), input, |b, input| {
            b.iter(|| Node::from_serialized(black_box(input), true));
        });
    }
    group.finish();
}

fn benchmark_scope_matching(c: &mut Criterion) {
    let node = Node::from_serialized("survival-nether/essentials.fly", true).unwrap();

    c.bench_function("server_exact", |b| {
        b.iter(|| node.should_apply_on_server(black_box(Some("SURVIVAL")), false, false));
    });

    c.bench_function("server_alternation", |b| {
        b.iter(|| {
            node.should_apply_on_server(black_box(Some("(lobby|creative|survival)")), false, false)
        });
    });

    // Regex queries are compiled on every call
    c.bench_function("server_regex", |b| {
        b.iter(|| node.should_apply_on_server(black_box(Some("r=surv.*")), false, true));
    });
}

fn benchmark_applies_to(c: &mut Criterion) {
    let node = Node::from_serialized("survival-nether/(region=spawn)build.place$1999999999", true)
        .unwrap();
    let settings = MatchSettings::default();
    let query = Query::new()
        .server("survival")
        .world("nether")
        .with_context("region", "spawn")
        .at(1_700_000_000);

    c.bench_function("applies_to_full_query", |b| {
        b.iter(|| node.applies_to(black_box(&query), black_box(&settings)));
    });
}

fn benchmark_wildcard(c: &mut Criterion) {
    let node = Node::from_serialized("essentials.*", true).unwrap();
    let candidates: Vec<String> = (0..1000)
        .map(|i| {
            if i % 2 == 0 {
                format!("essentials.command{}", i)
            } else {
                format!("worldedit.command{}", i)
            }
        })
        .collect();

    c.bench_function("resolve_wildcard_1000", |b| {
        b.iter(|| node.resolve_wildcard(black_box(Some(&candidates[..]))));
    });
}

criterion_group!(
    benches,
    benchmark_decode,
    benchmark_scope_matching,
    benchmark_applies_to,
    benchmark_wildcard
);
criterion_main!(benches);
