// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for document processing in the blattwerk-document crate:
// splitting a synthetic PDF and compressing a synthetic photo-sized image.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use image::{DynamicImage, RgbImage};
use lopdf::{Dictionary, Document, Object, Stream};

use blattwerk_core::{ImageFormatChoice, SplitMode};
use blattwerk_document::{
    CompressionOptions, ImageCompressor, PdfReader, PdfSplitter, SplitRequest,
};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// A bare N-page PDF with one tiny content stream per page.
fn synthetic_pdf(num_pages: u32) -> Vec<u8> {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();
    let mut kids = Vec::new();
    for i in 0..num_pages {
        let content = format!("BT /F1 12 Tf 72 720 Td (Page {}) Tj ET", i + 1);
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content.into_bytes()));
        let page_id = doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            ("Contents", Object::Reference(content_id)),
        ]));
        kids.push(Object::Reference(page_id));
    }
    doc.objects.insert(
        pages_id,
        Object::Dictionary(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Count", Object::Integer(num_pages as i64)),
            ("Kids", Object::Array(kids)),
        ])),
    );
    let catalog_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).expect("serialise synthetic PDF");
    buffer
}

fn synthetic_png(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, ((x ^ y) % 256) as u8])
    });
    let mut buffer = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_to(&mut std::io::Cursor::new(&mut buffer), image::ImageFormat::Png)
        .expect("encode synthetic PNG");
    buffer
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// Split a 200-page document into 20 ten-page outputs.
fn bench_split_every_ten(c: &mut Criterion) {
    let pdf = synthetic_pdf(200);
    let reader = PdfReader::from_bytes(&pdf).expect("load synthetic PDF");
    let request = SplitRequest::new(SplitMode::EveryN, "10");

    c.bench_function("split every 10 pages (200 pages)", |b| {
        b.iter(|| {
            let outcome = PdfSplitter::split(black_box(&reader), &request).expect("split");
            black_box(outcome.documents.len());
        });
    });
}

/// Compress a 1024x768 image to a 100 KB JPEG budget.
fn bench_compress_jpeg(c: &mut Criterion) {
    let png = synthetic_png(1024, 768);
    let options = CompressionOptions {
        target_kb: 100,
        format: ImageFormatChoice::Jpeg,
        ..CompressionOptions::default()
    };

    c.bench_function("compress to 100 KB JPEG (1024x768)", |b| {
        b.iter(|| {
            let result = ImageCompressor::compress(black_box(&png), &options).expect("compress");
            black_box(result.bytes.len());
        });
    });
}

criterion_group!(benches, bench_split_every_ten, bench_compress_jpeg);
criterion_main!(benches);
