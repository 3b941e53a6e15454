//! Benchmark helper utilities for metatiled
//!
//! This module generates synthetic map and tileset data for the benchmark
//! suite. Everything is deterministic so runs are comparable; no game data is
//! needed.

use image::{Rgba, RgbaImage};
use metatiled_types::{
	anim::{AnimationDefinition, AnimationLibrary, FrameKind, FrameSet, LoadedAnimation},
	convert::TilesetResources,
	error::Resource,
	graphics::{IndexedImage, Palette, TileBank, TilesetGraphics},
	metatile::TilesetRole,
	record::{LayerType, MetatileAttribute, encode_words},
};

/// Water animation of the general tileset
pub const WATER: AnimationDefinition = AnimationDefinition::new("water", 432, 30).with_sequence(&[0, 1, 2, 3, 4, 5, 6, 7]);

/// Generates a `map.bin` grid cycling through `metatiles` ids
///
/// Ids are spread with a multiplicative step so neighbouring cells differ.
pub fn generate_grid(width: usize, height: usize, metatiles: u16) -> Vec<u8> {
	let metatiles = metatiles.max(1);
	encode_words((0..width * height).map(|cell| ((cell * 37 + cell / width) % metatiles as usize) as u16))
}

/// Generates a `metatiles.bin` table of `count` metatiles over a bank of `tiles` tiles
///
/// Every eighth metatile draws water tiles so the animation path is exercised.
pub fn generate_metatiles(count: u16, tiles: u16) -> Vec<u8> {
	let words = (0..count).flat_map(move |metatile| {
		(0..8u16).map(move |position| {
			let tile_id = if metatile % 8 == 0 && position < 4 {
				WATER.base_tile_id + (metatile / 8 + position) % WATER.num_tiles
			} else {
				(metatile * 8 + position) % tiles
			};
			tile_id | ((position % 4) << 10) | ((metatile % 6) << 12)
		})
	});
	encode_words(words)
}

/// Generates a `metatile_attributes.bin` table cycling through the layer types
pub fn generate_attributes(count: u16) -> Vec<u8> {
	let types = [LayerType::Normal, LayerType::Covered, LayerType::Split];
	encode_words(
		(0..count).map(|metatile| MetatileAttribute::with_layer_type(types[metatile as usize % 3]).to_word()),
	)
}

/// Generates a 16-column tile sheet of `tiles` tiles with noisy indices
pub fn generate_graphics(tiles: u32) -> TilesetGraphics {
	let width = 128;
	let height = tiles.div_ceil(16) * 8;
	let indices = (0..width * height).map(|i| ((i * 7 + i / width * 3) % 16) as u8).collect();
	let palettes = (0..16u8).map(|slot| Palette::from_rgb(&[[slot * 16, 64, 255 - slot * 16]; 16])).collect();
	let sheet = match IndexedImage::new(width, height, indices, Resource::TileSheet) {
		Ok(sheet) => sheet,
		Err(err) => panic!("synthetic sheet: {err}"),
	};
	TilesetGraphics::new(TileBank::new(sheet), palettes)
}

/// Generates a primary tileset of `metatiles` metatiles over 512 tiles
pub fn generate_tileset(metatiles: u16) -> TilesetResources {
	TilesetResources::new("gTileset_General", generate_metatiles(metatiles, 512))
		.with_attributes(generate_attributes(metatiles))
		.with_graphics(generate_graphics(512))
}

/// Generates eight frames of the water animation
pub fn generate_animations() -> AnimationLibrary {
	let tiles = (0..8u8)
		.flat_map(|frame| {
			(0..WATER.num_tiles).map(move |tile| RgbaImage::from_pixel(8, 8, Rgba([frame * 30, tile as u8 * 8, 200, 255])))
		})
		.collect();
	let mut library = AnimationLibrary::new();
	library.push(LoadedAnimation {
		role: TilesetRole::Primary,
		definition: WATER,
		frames: FrameSet::new(FrameKind::Tiles, tiles),
	});
	library
}
