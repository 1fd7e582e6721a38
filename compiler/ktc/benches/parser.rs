//! Parser benchmarks.
//!
//! Measures lexing plus parsing for typical declarations, long files, deep
//! nesting and lazy doc-comment expansion.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

const CLASS_WITH_MEMBERS: &str = r#"
package bench.sample

import kotlin.math.max

/**
 * A point.
 * @property x horizontal
 * @property y vertical
 */
data class Point(val x: Int, val y: Int) : Comparable<Point> {
    override fun compareTo(other: Point): Int = when {
        x != other.x -> x - other.x
        else -> y - other.y
    }

    fun scaled(by: Int) = Point(x * by, y * by)
}
"#;

const EXPRESSIONS: &str = r#"
fun main() {
    val items = listOf(1, 2, 3).map { it * 2 }.filter { it > 2 }
    val label = if (items.isEmpty()) "none" else "${items.size} items"
    for ((i, v) in items.withIndex()) println("$i: $v")
    val total = items.fold(0) { acc, x -> acc + x } ?: 0
}
"#;

fn generate_n_functions(n: usize) -> String {
    (0..n)
        .map(|i| format!("fun f{i}(x: Int): Int = x + {i}\n"))
        .collect()
}

fn generate_nested_ifs(depth: usize) -> String {
    let mut expr = "x".to_string();
    for i in 0..depth {
        expr = format!("if (x > {i}) {expr} else {i}");
    }
    format!("fun nested(x: Int) = {expr}\n")
}

fn bench_samples(c: &mut Criterion) {
    c.bench_function("parser/class_with_members", |b| {
        b.iter(|| black_box(kt_parse::parse_source(black_box(CLASS_WITH_MEMBERS))));
    });
    c.bench_function("parser/expressions", |b| {
        b.iter(|| black_box(kt_parse::parse_source(black_box(EXPRESSIONS))));
    });
}

fn bench_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser/functions");
    for n in [10, 100, 1000] {
        let source = generate_n_functions(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &source, |b, source| {
            b.iter(|| black_box(kt_parse::parse_source(source)));
        });
    }
    group.finish();

    let mut group = c.benchmark_group("parser/nested_if");
    for depth in [10, 50, 200] {
        let source = generate_nested_ifs(depth);
        group.bench_with_input(BenchmarkId::from_parameter(depth), &source, |b, source| {
            b.iter(|| black_box(kt_parse::parse_source(source)));
        });
    }
    group.finish();
}

fn bench_doc_expansion(c: &mut Criterion) {
    c.bench_function("parser/expand_docs", |b| {
        b.iter(|| {
            let Ok(parse) = kt_parse::parse_source(CLASS_WITH_MEMBERS) else {
                return;
            };
            for token in parse.tree().deferred_tokens() {
                let _ = black_box(parse.tree().parse_embedded(token));
            }
        });
    });
}

criterion_group!(benches, bench_samples, bench_scaling, bench_doc_expansion);
criterion_main!(benches);
