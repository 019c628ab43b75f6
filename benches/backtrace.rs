//! Benchmarks for backtrace parsing and source map resolution.
//!
//! Covers the three costs a host pays per exception:
//! - Scanning the engine's backtrace text
//! - Decoding a source map (first request only when cached)
//! - Resolving and rendering frames against an already decoded map

extern crate jsbacktrace;

use criterion::{criterion_group, criterion_main, Criterion};
use jsbacktrace::{
    sourcemap::vlq, Backtrace, BacktraceResolver, ResolverConfig, SourceMap,
};
use std::hint::black_box;

/// A synthetic bundle map: `lines` generated lines with `per_line` segments each.
fn synthetic_map(lines: usize, per_line: usize) -> String {
    let mut mappings = String::new();
    for line in 0..lines {
        if line > 0 {
            mappings.push(';');
        }
        for segment in 0..per_line {
            if segment > 0 {
                mappings.push(',');
            }
            mappings.push_str(&vlq::encode(&[4, 0, i64::from(segment == 0), 2, 1]));
        }
    }
    let names: Vec<String> = (0..lines * per_line).map(|i| format!("\"fn{}\"", i)).collect();
    format!(
        r#"{{"version":3,"sources":["src/app.ts"],"names":[{}],"mappings":"{}"}}"#,
        names.join(","),
        mappings
    )
}

fn synthetic_backtrace(frames: usize) -> String {
    let mut text = String::from("TypeError: cannot read property 'length' of undefined\n");
    for i in 0..frames {
        text.push_str(&format!("    at fn{} (bundle.js:{}:{})\n", i, i + 1, (i * 7) % 200 + 1));
    }
    text.push_str("    at <anonymous> (native)\n");
    text
}

/// Benchmark scanning a 32-frame backtrace without a source map.
fn bench_parse_backtrace(c: &mut Criterion) {
    let text = synthetic_backtrace(32);

    c.bench_function("parse_backtrace_32_frames", |b| {
        b.iter(|| {
            let bt = Backtrace::parse(black_box(&text));
            black_box(bt)
        });
    });
}

/// Benchmark decoding a 2 000 x 50 segment source map.
fn bench_decode_source_map(c: &mut Criterion) {
    let map = synthetic_map(2_000, 50);
    let config = ResolverConfig::default();

    c.bench_function("decode_source_map_100k_segments", |b| {
        b.iter(|| {
            let map = SourceMap::parse(black_box(&map), &config).unwrap();
            black_box(map)
        });
    });
}

/// Benchmark resolving and rendering through a warm resolver cache.
fn bench_format_cached(c: &mut Criterion) {
    let map = synthetic_map(2_000, 50);
    let text = synthetic_backtrace(32);
    let resolver = BacktraceResolver::new(ResolverConfig::default());
    resolver.source_map(&map).unwrap();

    c.bench_function("format_cached_32_frames", |b| {
        b.iter(|| {
            let pretty = resolver.format(Some(black_box(map.as_str())), black_box(&text)).unwrap();
            black_box(pretty)
        });
    });
}

/// Benchmark JSON output through a warm resolver cache.
fn bench_parse_json_cached(c: &mut Criterion) {
    let map = synthetic_map(2_000, 50);
    let text = synthetic_backtrace(32);
    let resolver = BacktraceResolver::new(ResolverConfig::default());
    resolver.source_map(&map).unwrap();

    c.bench_function("parse_json_cached_32_frames", |b| {
        b.iter(|| {
            let json = resolver.parse(Some(black_box(map.as_str())), black_box(&text)).unwrap();
            black_box(json)
        });
    });
}

criterion_group!(
    benches,
    bench_parse_backtrace,
    bench_decode_source_map,
    bench_format_cached,
    bench_parse_json_cached
);
criterion_main!(benches);
