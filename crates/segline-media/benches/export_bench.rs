//! Benchmarks for the interchange exports.
//!
//! Run with: cargo bench -p segline-media

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use segline_core::Segment;
use segline_media::{build_csv, build_edl, ExportMeta};
use segline_timeline::{compute_clips, TrimMap, TrimRange};

fn bench_exports(c: &mut Criterion) {
    let segments: Vec<Segment> = (0..500)
        .map(|i| {
            let mut s = Segment::done(
                1 + (i / 8) as u32,
                (i % 8) as u32,
                4.0 + (i % 5) as f64,
                format!("https://cdn.example/{i}.mp4"),
            );
            s.prompt = "A slow push through the market at dusk, lanterns swaying".into();
            s
        })
        .collect();
    let order: Vec<_> = segments.iter().map(|s| s.id).collect();
    let trim: TrimMap = order
        .iter()
        .step_by(4)
        .map(|id| (*id, TrimRange::new(0.25, 0.5)))
        .collect();
    let clips = compute_clips(&segments, &order, &trim);
    let meta = ExportMeta {
        title: "Night Market".into(),
        episode_label: "Episode 1".into(),
        ..ExportMeta::default()
    };

    c.bench_function("build_edl_500", |b| {
        b.iter(|| build_edl(black_box(&meta), black_box(&clips)));
    });

    c.bench_function("build_csv_500", |b| {
        b.iter(|| build_csv(black_box(&meta), black_box(&segments), black_box(&order), black_box(&trim)));
    });
}

criterion_group!(benches, bench_exports);
criterion_main!(benches);
