// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the raster pipeline and PDF assembly.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use image::{DynamicImage, Rgba, RgbaImage};

use quickconv_core::MimeType;
use quickconv_image::{DocumentAssembler, FilterSettings, ImageAsset, RasterPipeline, TransformSpec};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// A 640x480 gradient, large enough for the resize and filter paths to matter.
fn gradient(width: u32, height: u32) -> ImageAsset {
    let img = RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8, 255])
    });
    // A freshly built buffer always has positive dimensions here.
    match ImageAsset::from_image(DynamicImage::ImageRgba8(img), MimeType::Png) {
        Ok(asset) => asset,
        Err(err) => panic!("fixture: {err}"),
    }
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

fn bench_compress(c: &mut Criterion) {
    let asset = gradient(640, 480);
    let pipeline = RasterPipeline::new(320);
    c.bench_function("compress jpeg (640x480 -> 320)", |b| {
        b.iter(|| black_box(pipeline.compress(black_box(&asset), 0.7, Some(MimeType::Jpeg))));
    });
}

fn bench_filters(c: &mut Criterion) {
    let asset = gradient(640, 480);
    let pipeline = RasterPipeline::default();
    let ops = [
        TransformSpec::FilterAdjust(FilterSettings::new(120.0, 130.0, 80.0)),
        TransformSpec::EncodeQuality {
            mime: MimeType::Png,
            quality: 1.0,
        },
    ];
    c.bench_function("filters + png (640x480)", |b| {
        b.iter(|| black_box(pipeline.process(black_box(&asset), &ops)));
    });
}

fn bench_assemble(c: &mut Criterion) {
    let assembler = DocumentAssembler::default();
    let mut document = assembler.new_document();
    for i in 0..10 {
        document.push(format!("page-{i}"), gradient(200, 150));
    }
    c.bench_function("images to pdf (10 pages)", |b| {
        b.iter(|| black_box(assembler.render(black_box(&document))));
    });
}

criterion_group!(benches, bench_compress, bench_filters, bench_assemble);
criterion_main!(benches);
