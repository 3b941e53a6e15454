//! Synthetic tilesets and scratch directories

use std::{fs, path::PathBuf};

use image::{Rgba, RgbaImage};
use metatiled::prelude::*;
use metatiled::metatiled_types::record::{MetatileAttribute, encode_words};

/// Sheet of `tiles` tiles, 16 per row; tile `i` is filled with index `1 + (first + i) % 15`
pub fn graphics(tiles: u32, first: u32) -> TilesetGraphics {
	let columns = 16.min(tiles);
	let rows = tiles.div_ceil(columns);
	let (width, height) = (columns * 8, rows * 8);
	let indices = (0..width * height)
		.map(|i| {
			let (x, y) = (i % width, i / width);
			let tile = (y / 8) * columns + x / 8;
			fill_index(first + tile)
		})
		.collect();
	let sheet = IndexedImage::new(width, height, indices, Resource::TileSheet).unwrap();
	TilesetGraphics::new(TileBank::new(sheet), vec![Palette::grayscale(); 16])
}

fn fill_index(n: u32) -> u8 {
	1 + (n % 15) as u8
}

/// Color of tile `tile` in a sheet built by [`graphics`] with `first`
pub fn tile_color(first: u32, tile: u32) -> Rgba<u8> {
	let value = fill_index(first + tile) * 17;
	Rgba([value, value, value, 255])
}

/// Bottom half all `bottom`, top half all `top`
pub fn uniform(bottom: u16, top: u16) -> [TileRef; 8] {
	let (bottom, top) = (TileRef::new(bottom), TileRef::new(top));
	[bottom, bottom, bottom, bottom, top, top, top, top]
}

/// Little-endian words
pub fn encode(words: &[u16]) -> Vec<u8> {
	encode_words(words.iter().copied())
}

/// Tileset resources with a 64-tile sheet starting at color 1
pub fn tileset(name: &str, metatiles: &[[TileRef; 8]], layer_types: &[LayerType]) -> TilesetResources {
	let table = encode_words(metatiles.iter().flatten().map(|tile| tile.to_word()));
	let attributes =
		encode_words(layer_types.iter().map(|layer_type| MetatileAttribute::with_layer_type(*layer_type).to_word()));
	TilesetResources::new(name, table).with_attributes(attributes).with_graphics(graphics(64, 1))
}

/// Per-test directory under the system temp dir, removed on drop
pub struct Scratch {
	root: PathBuf,
}

impl Scratch {
	pub fn new(name: &str) -> Self {
		let root = std::env::temp_dir().join(format!("metatiled-it-{}-{name}", std::process::id()));
		let _ = fs::remove_dir_all(&root);
		fs::create_dir_all(&root).unwrap();
		Self {
			root,
		}
	}

	pub fn path(&self, relative: &str) -> PathBuf {
		self.root.join(relative)
	}

	pub fn write_png(&self, relative: &str, image: &RgbaImage) {
		let path = self.path(relative);
		if let Some(parent) = path.parent() {
			fs::create_dir_all(parent).unwrap();
		}
		image.save(&path).unwrap();
	}
}

impl Drop for Scratch {
	fn drop(&mut self) {
		let _ = fs::remove_dir_all(&self.root);
	}
}
