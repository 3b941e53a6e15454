//! Benchmark suite for map conversion
//!
//! Measures record decoding, full metatile conversion and tile-grid
//! conversion over synthetic maps.
//!
//! Run with: cargo bench --manifest-path benches/Cargo.toml

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use metatiled_benches::{generate_animations, generate_grid, generate_metatiles, generate_tileset};
use metatiled_types::{
	anim::AnimationLibrary,
	convert::{MapConverter, MapInput},
	record::{decode_map_grid, decode_tile_refs},
};

const SIZES: [usize; 3] = [16, 64, 128];

/// Benchmark binary record decoding
fn bench_decode_records(c: &mut Criterion) {
	let mut group = c.benchmark_group("decode_records");

	for size in SIZES {
		let grid = generate_grid(size, size, 512);
		group.throughput(Throughput::Elements((size * size) as u64));
		group.bench_with_input(BenchmarkId::new("map_grid", size), &grid, |b, grid| {
			b.iter(|| decode_map_grid(black_box(grid), size, size));
		});
	}

	let table = generate_metatiles(512, 512);
	group.throughput(Throughput::Elements(512 * 8));
	group.bench_function("metatile_table", |b| b.iter(|| decode_tile_refs(black_box(&table))));

	group.finish();
}

/// Benchmark metatile conversion with and without animations
fn bench_convert(c: &mut Criterion) {
	let mut group = c.benchmark_group("convert");
	group.sample_size(20);

	let primary = generate_tileset(512);
	let animations = generate_animations();
	let still = AnimationLibrary::new();
	let converter = MapConverter::default();

	for size in SIZES {
		let grid = generate_grid(size, size, 512);
		group.throughput(Throughput::Elements((size * size) as u64));
		for (label, library) in [("still", &still), ("animated", &animations)] {
			let input = MapInput {
				name: "bench",
				width: size,
				height: size,
				grid: &grid,
				border: None,
				primary: &primary,
				secondary: None,
				animations: library,
			};
			group.bench_with_input(BenchmarkId::new(label, size), &input, |b, input| {
				b.iter(|| converter.convert(black_box(input)));
			});
		}
	}

	group.finish();
}

/// Benchmark tile-grid conversion
fn bench_convert_tile_grid(c: &mut Criterion) {
	let mut group = c.benchmark_group("convert_tile_grid");
	group.sample_size(20);

	let primary = generate_tileset(512);
	let animations = generate_animations();
	let converter = MapConverter::default();

	for size in SIZES {
		let grid = generate_grid(size, size, 512);
		let input = MapInput {
			name: "bench",
			width: size,
			height: size,
			grid: &grid,
			border: None,
			primary: &primary,
			secondary: None,
			animations: &animations,
		};
		group.throughput(Throughput::Elements((size * size * 4) as u64));
		group.bench_with_input(BenchmarkId::from_parameter(size), &input, |b, input| {
			b.iter(|| converter.convert_tile_grid(black_box(input)));
		});
	}

	group.finish();
}

criterion_group!(benches, bench_decode_records, bench_convert, bench_convert_tile_grid);
criterion_main!(benches);
