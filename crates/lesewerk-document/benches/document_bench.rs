// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the lesewerk-document crate. Measures how long a
// camera frame takes to become a recognition-ready PNG payload, with and
// without preprocessing.

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use lesewerk_core::{RawFrame, SourceOrigin};
use lesewerk_document::ImageProcessor;

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// A 640x480 frame: light page with a dark band where the text would be.
fn synthetic_frame() -> RawFrame {
    let (width, height) = (640u32, 480u32);
    let mut rgba = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        for _ in 0..width {
            let v = if (200..280).contains(&y) { 40 } else { 220 };
            rgba.extend_from_slice(&[v, v, v, 255]);
        }
    }
    RawFrame { width, height, rgba }
}

fn bench_frame_to_source(c: &mut Criterion) {
    let frame = synthetic_frame();

    c.bench_function("frame_to_source (640x480)", |b| {
        b.iter(|| {
            let source = ImageProcessor::from_frame(black_box(frame.clone()))
                .and_then(|p| p.prepare_for_recognition(false).into_source(SourceOrigin::Camera));
            black_box(source.ok());
        });
    });

    c.bench_function("frame_to_source_preprocessed (640x480)", |b| {
        b.iter(|| {
            let source = ImageProcessor::from_frame(black_box(frame.clone()))
                .and_then(|p| p.prepare_for_recognition(true).into_source(SourceOrigin::Camera));
            black_box(source.ok());
        });
    });
}

criterion_group!(benches, bench_frame_to_source);
criterion_main!(benches);
