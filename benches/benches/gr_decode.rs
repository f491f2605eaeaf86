//! Benchmark suite for GR archive decoding
//!
//! Measures nibble RLE decompression, archive parsing and BMP conversion.
//!
//! Run with: cargo bench --manifest-path benches/Cargo.toml

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use uw2gr_benches::{generate_archive, generate_rle8_bmp, generate_rle_stream, sizes};
use uw2gr_types::file::gr::decode::{decompress_nibbles, decompress_rle};
use uw2gr_types::prelude::*;

/// Benchmark nibble RLE decompression at several sizes
fn bench_decompress_rle(c: &mut Criterion) {
	let mut group = c.benchmark_group("gr_decompress_rle");
	let aux = AuxPalette(std::array::from_fn(|k| k as u8 * 3));

	for (name, (width, height)) in
		[("small", sizes::SMALL), ("portrait", sizes::PORTRAIT), ("panel", sizes::PANEL), ("max", sizes::MAX)]
	{
		let pixels = usize::from(width) * usize::from(height);
		let (payload, nibble_count) = generate_rle_stream(pixels);

		group.throughput(Throughput::Elements(pixels as u64));
		group.bench_with_input(BenchmarkId::new("decompress", name), &payload, |b, payload| {
			b.iter(|| black_box(decompress_rle(black_box(payload), nibble_count, pixels, &aux)));
		});
	}

	group.finish();
}

/// Benchmark plain nibble expansion
fn bench_decompress_nibbles(c: &mut Criterion) {
	let mut group = c.benchmark_group("gr_decompress_nibbles");
	let payload: Vec<u8> = (0..32768).map(|i| (i % 256) as u8).collect();
	let nibble_count = payload.len() * 2;

	group.throughput(Throughput::Elements(nibble_count as u64));
	group.bench_function("expand", |b| {
		b.iter(|| black_box(decompress_nibbles(black_box(&payload), nibble_count)));
	});

	group.finish();
}

/// Benchmark archive parsing and serialization
fn bench_archive(c: &mut Criterion) {
	let mut group = c.benchmark_group("gr_archive");
	let resource = Resource::new("BENCH.GR", 0, false);
	let data = generate_archive(64, sizes::PORTRAIT.0, sizes::PORTRAIT.1);

	group.throughput(Throughput::Bytes(data.len() as u64));
	group.bench_function("parse", |b| {
		b.iter(|| black_box(GrFile::from_bytes(black_box(&data), &resource)));
	});

	let Ok(archive) = GrFile::from_bytes(&data, &resource) else {
		eprintln!("Warning: Could not parse generated archive");
		return;
	};
	group.bench_function("to_bytes", |b| {
		b.iter(|| black_box(archive.to_bytes()));
	});

	group.finish();
}

/// Benchmark BMP conversion in both directions
fn bench_bmp(c: &mut Criterion) {
	let mut group = c.benchmark_group("gr_bmp");
	let (width, height) = sizes::MAX;
	let pixels = usize::from(width) * usize::from(height);

	let rle8 = generate_rle8_bmp(width, height);
	group.throughput(Throughput::Elements(pixels as u64));
	group.bench_function("decode_rle8", |b| {
		b.iter(|| black_box(decode_bmp(black_box(&rle8))));
	});

	let Ok(image) = IndexedImage::new(u16::from(width), u16::from(height), vec![7; pixels]) else {
		return;
	};
	let palette = Palette::grayscale();
	group.bench_function("encode", |b| {
		b.iter(|| black_box(encode_bmp(black_box(&image), &palette)));
	});

	let encoded = encode_bmp(&image, &palette);
	group.bench_function("decode_rgb", |b| {
		b.iter(|| black_box(decode_bmp(black_box(&encoded))));
	});

	group.finish();
}

/// Export every record of an archive, as the extract command does
fn bench_export_workload(c: &mut Criterion) {
	let mut group = c.benchmark_group("gr_realistic");
	let data = generate_archive(32, sizes::PANEL.0, sizes::PANEL.1);
	let palettes = PaletteSet::new(vec![Palette::grayscale(); PaletteSet::COUNT]);
	let aux_palettes = AuxPaletteSet::default();

	let Ok(session) = ArchiveSession::new(Resource::new("BENCH.GR", 0, false), &data, &palettes, &aux_palettes)
	else {
		eprintln!("Warning: Could not load generated archive");
		return;
	};

	group.throughput(Throughput::Bytes(data.len() as u64));
	group.sample_size(50);
	group.bench_function("export_all", |b| {
		b.iter(|| {
			let exported: Vec<_> =
				(0..session.archive().bitmap_count()).map(|index| session.export_bitmap(index)).collect();
			black_box(exported)
		});
	});

	group.finish();
}

criterion_group!(
	benches,
	bench_decompress_rle,
	bench_decompress_nibbles,
	bench_archive,
	bench_bmp,
	bench_export_workload,
);

criterion_main!(benches);
