//! Tile banks and palette selection.

use image::{RgbaImage, imageops};

use super::{indexed::IndexedImage, palette::Palette};
use crate::{
	constants::{PALETTES_PER_TILESET, TILE_SIZE},
	record::Flip,
};

/// An indexed tile sheet cut into 8x8 tiles, row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileBank {
	sheet: IndexedImage,
}

impl TileBank {
	/// Wraps a decoded sheet
	pub fn new(sheet: IndexedImage) -> Self {
		Self {
			sheet,
		}
	}

	/// The underlying sheet
	pub fn sheet(&self) -> &IndexedImage {
		&self.sheet
	}

	/// Tiles per sheet row
	pub fn columns(&self) -> u32 {
		self.sheet.width() / TILE_SIZE
	}

	/// Number of whole tiles in the sheet
	pub fn tile_count(&self) -> usize {
		(self.columns() * (self.sheet.height() / TILE_SIZE)) as usize
	}

	/// Highest valid bank-local tile id, `None` for a sheet too small to hold a tile
	pub fn max_tile_id(&self) -> Option<u16> {
		self.tile_count().checked_sub(1).map(|max| max.min(u16::MAX as usize) as u16)
	}

	/// Whether a bank-local id names a tile of this sheet
	pub fn contains(&self, local_id: u16) -> bool {
		(local_id as usize) < self.tile_count()
	}

	/// Renders a tile with a palette and flips; `None` if the id is outside the sheet
	pub fn render_tile(&self, local_id: u16, flip: Flip, palette: &Palette) -> Option<RgbaImage> {
		if !self.contains(local_id) {
			return None;
		}
		let columns = self.columns();
		let origin_x = (local_id as u32 % columns) * TILE_SIZE;
		let origin_y = (local_id as u32 / columns) * TILE_SIZE;
		let mut tile = RgbaImage::from_fn(TILE_SIZE, TILE_SIZE, |x, y| {
			palette.pixel(self.sheet.index(origin_x + x, origin_y + y))
		});
		apply_flip(&mut tile, flip);
		Some(tile)
	}
}

/// Mirrors an image in place according to flip flags.
pub fn apply_flip(image: &mut RgbaImage, flip: Flip) {
	if flip.horizontal() {
		imageops::flip_horizontal_in_place(image);
	}
	if flip.vertical() {
		imageops::flip_vertical_in_place(image);
	}
}

/// Palette slots as the hardware loads them for a tileset pair
///
/// Slots below `primary_count` come from the primary tileset, the rest from the
/// secondary tileset. Without a secondary tileset, or when it has no palette
/// in a slot, the primary tileset's palette serves it.
#[derive(Debug, Clone, Copy)]
pub struct PaletteSet<'a> {
	primary: &'a [Palette],
	secondary: Option<&'a [Palette]>,
	primary_count: usize,
}

impl<'a> PaletteSet<'a> {
	/// Creates the palette view for a pair
	pub fn new(primary: &'a [Palette], secondary: Option<&'a [Palette]>, primary_count: usize) -> Self {
		Self {
			primary,
			secondary,
			primary_count: primary_count.min(PALETTES_PER_TILESET),
		}
	}

	/// Palette loaded in a slot, if any tileset provides it
	pub fn get(&self, slot: u8) -> Option<&'a Palette> {
		let slot = slot as usize;
		match self.secondary {
			Some(secondary) if slot >= self.primary_count => secondary.get(slot).or_else(|| self.primary.get(slot)),
			_ => self.primary.get(slot),
		}
	}
}
