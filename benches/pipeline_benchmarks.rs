//! Criterion benchmarks for fanlog

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use fanlog::prelude::*;

// ============================================================================
// Enqueue Path Benchmarks
// ============================================================================

fn bench_enqueue(c: &mut Criterion) {
    let mut group = c.benchmark_group("enqueue");
    group.throughput(Throughput::Elements(1));

    let logger = Logger::builder()
        .capacity(100_000)
        .destination(MemoryDestination::new("sink"))
        .build()
        .expect("build");

    group.bench_function("rendered_message", |b| {
        b.iter(|| {
            logger.info(black_box("benchmark message")).unwrap();
        });
    });

    group.bench_function("deferred_template", |b| {
        b.iter(|| {
            logger
                .infof(black_box("request {} took {}ms"), vec![
                    AttrValue::Int(42),
                    AttrValue::Int(7),
                ])
                .unwrap();
        });
    });

    group.bench_function("with_call_attrs", |b| {
        b.iter(|| {
            logger
                .info_with(
                    black_box("tagged message"),
                    vec![],
                    AttrSet::new().with("request_id", "r-1").with("attempt", 1),
                )
                .unwrap();
        });
    });

    group.finish();
    logger.flush();
}

fn bench_enqueue_under_overflow(c: &mut Criterion) {
    let mut group = c.benchmark_group("enqueue_overflow");
    group.throughput(Throughput::Elements(1));

    // Tiny queue so most enqueues evict; measures the drop-oldest path
    let logger = Logger::builder().capacity(16).build().expect("build");

    group.bench_function("drop_oldest", |b| {
        b.iter(|| {
            logger.info(black_box("overflowing message")).unwrap();
        });
    });

    group.finish();
}

// ============================================================================
// Attribute Benchmarks
// ============================================================================

fn bench_attr_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("attr_merge");
    group.throughput(Throughput::Elements(1));

    let mut base = AttrSet::new();
    let mut overlay = AttrSet::new();
    for i in 0..10 {
        base.set(format!("base_{}", i), i as i64);
        overlay.set(format!("overlay_{}", i), i as i64);
    }
    // Half the overlay collides with the base
    for i in 0..5 {
        overlay.set(format!("base_{}", i), -1i64);
    }

    group.bench_function("merged_10_over_10", |b| {
        b.iter(|| black_box(base.merged(&overlay)));
    });

    group.finish();
}

fn bench_adapter_layering(c: &mut Criterion) {
    use std::sync::Arc;

    let mut group = c.benchmark_group("adapter");
    group.throughput(Throughput::Elements(1));

    let logger = Arc::new(
        Logger::builder()
            .capacity(100_000)
            .attr("service", "bench")
            .build()
            .expect("build"),
    );
    let adapter = Adapter::new(logger);
    adapter.set_attr("component", "pipeline");

    group.bench_function("scoped_info", |b| {
        b.iter(|| {
            adapter.info(black_box("scoped message")).unwrap();
        });
    });

    group.finish();
}

// ============================================================================
// Rendering Benchmarks
// ============================================================================

fn bench_render(c: &mut Criterion) {
    use chrono::Utc;

    let mut group = c.benchmark_group("render");
    group.throughput(Throughput::Elements(1));

    let template = Envelope::new(
        Level::Info,
        Utc::now(),
        MessageBody::template(
            "user {} performed {} in {}ms",
            vec![
                AttrValue::Str("alice".into()),
                AttrValue::Str("login".into()),
                AttrValue::Int(12),
            ],
        ),
        AttrSet::new(),
    );

    group.bench_function("template_three_args", |b| {
        b.iter(|| black_box(template.render()));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_enqueue,
    bench_enqueue_under_overflow,
    bench_attr_merge,
    bench_adapter_layering,
    bench_render
);
criterion_main!(benches);
