//! Rendering metatile halves to 16x16 images.

use std::borrow::Cow;

use image::{RgbaImage, imageops};

use super::{
	bank::{PaletteSet, TileBank},
	palette::Palette,
};
use crate::{
	constants::{METATILE_SIZE, PALETTE_COLORS, TILE_SIZE},
	metatile::{Half, MetatileDefinition, TilesetRole, quadrant_offset},
	record::TileRef,
	route::{Bank, route},
};

/// Graphics of one tileset: its tile sheet and palettes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TilesetGraphics {
	/// Indexed tile sheet
	pub bank: TileBank,
	/// Palettes by slot (up to 16)
	pub palettes: Vec<Palette>,
}

impl TilesetGraphics {
	/// Creates tileset graphics
	pub fn new(bank: TileBank, palettes: Vec<Palette>) -> Self {
		Self {
			bank,
			palettes,
		}
	}
}

/// Renders metatiles of a tileset pair
///
/// Tile ids are routed to a bank first. Tiles the bank cannot provide render
/// fully transparent; palette slots nobody provides fall back to the sheet's
/// embedded palette, then to grays.
#[derive(Debug, Clone, Copy)]
pub struct MetatileRenderer<'a> {
	primary: Option<&'a TilesetGraphics>,
	secondary: Option<&'a TilesetGraphics>,
	palettes: PaletteSet<'a>,
}

impl<'a> MetatileRenderer<'a> {
	/// Creates a renderer; either tileset's graphics may be missing
	pub fn new(
		primary: Option<&'a TilesetGraphics>,
		secondary: Option<&'a TilesetGraphics>,
		primary_palette_count: usize,
	) -> Self {
		let primary_palettes = primary.map(|graphics| graphics.palettes.as_slice()).unwrap_or(&[]);
		let secondary_palettes = secondary.map(|graphics| graphics.palettes.as_slice());
		Self {
			primary,
			secondary,
			palettes: PaletteSet::new(primary_palettes, secondary_palettes, primary_palette_count),
		}
	}

	/// Tile bank behind a bank id, if loaded
	pub fn bank(&self, bank: Bank) -> Option<&'a TileBank> {
		match bank {
			Bank::Primary => self.primary.map(|graphics| &graphics.bank),
			Bank::Secondary => self.secondary.map(|graphics| &graphics.bank),
		}
	}

	/// Palette used for a slot when drawing from a bank
	pub fn palette(&self, slot: u8, bank: Bank) -> Cow<'a, Palette> {
		if let Some(palette) = self.palettes.get(slot) {
			return Cow::Borrowed(palette);
		}
		match self.bank(bank).and_then(|bank| bank.sheet().embedded_palette()) {
			Some(colors) => {
				let start = slot as usize * PALETTE_COLORS;
				let window = colors.get(start..).filter(|rest| !rest.is_empty()).unwrap_or(colors);
				Cow::Owned(Palette::from_colors(window))
			}
			None => Cow::Owned(Palette::grayscale()),
		}
	}

	/// Renders an already-routed tile; `None` if the bank cannot provide it
	pub fn render_local(&self, bank: Bank, local_id: u16, tile: TileRef) -> Option<RgbaImage> {
		let palette = self.palette(tile.palette, bank);
		self.bank(bank)?.render_tile(local_id, tile.flip, &palette)
	}

	/// Renders one tile reference of a metatile owned by `owner`
	pub fn render_tile(&self, tile: TileRef, owner: TilesetRole) -> Option<RgbaImage> {
		let (bank, local_id) = route(tile.tile_id, owner);
		self.render_local(bank, local_id, tile)
	}

	/// Renders a metatile half to a 16x16 image
	pub fn render_half(&self, metatile: &MetatileDefinition, half: Half, owner: TilesetRole) -> RgbaImage {
		let mut image = RgbaImage::new(METATILE_SIZE, METATILE_SIZE);
		for (position, tile) in metatile.half(half).iter().enumerate() {
			if let Some(rendered) = self.render_tile(*tile, owner) {
				let (x, y) = quadrant_offset(position);
				imageops::replace(&mut image, &rendered, i64::from(x), i64::from(y));
			}
		}
		image
	}

	/// Renders both halves, bottom first
	pub fn render_metatile(&self, metatile: &MetatileDefinition, owner: TilesetRole) -> [RgbaImage; 2] {
		Half::ALL.map(|half| self.render_half(metatile, half, owner))
	}
}

/// A transparent 8x8 tile
pub fn blank_tile() -> RgbaImage {
	RgbaImage::new(TILE_SIZE, TILE_SIZE)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{error::Resource, graphics::IndexedImage};

	/// Sheet of `count` tiles in one row, tile `n` filled with index `n % 15 + 1`
	fn graphics(count: u32, red: u8) -> TilesetGraphics {
		let width = count * 8;
		let indices = (0..width * 8).map(|i| ((i % width) / 8 % 15 + 1) as u8).collect();
		let sheet = IndexedImage::new(width, 8, indices, Resource::TileSheet).unwrap();
		let colors: Vec<[u8; 3]> = (0..16).map(|i| [red, i * 10, 0]).collect();
		TilesetGraphics::new(TileBank::new(sheet), vec![Palette::from_rgb(&colors); 16])
	}

	#[test]
	fn test_render_half_routes_tiles() {
		let primary = graphics(4, 1);
		let secondary = graphics(2, 2);
		let renderer = MetatileRenderer::new(Some(&primary), Some(&secondary), 6);

		let bottom = [TileRef::new(1), TileRef::new(513), TileRef::new(7).with_palette(7), TileRef::new(0)];
		let metatile = MetatileDefinition::from_halves(bottom, [TileRef::EMPTY; 4]);
		let image = renderer.render_half(&metatile, Half::Bottom, TilesetRole::Secondary);

		// primary tile 1, palette slot 0 from the primary tileset
		assert_eq!(image.get_pixel(0, 0).0, [1, 20, 0, 255]);
		// secondary tile 1 (513), still palette slot 0 from the primary tileset
		assert_eq!(image.get_pixel(8, 0).0, [1, 20, 0, 255]);
		// primary tile 7 does not exist
		assert_eq!(image.get_pixel(0, 8).0[3], 0);
		// primary tile 0, index 1
		assert_eq!(image.get_pixel(8, 8).0, [1, 10, 0, 255]);
	}

	#[test]
	fn test_secondary_palette_slots() {
		let primary = graphics(2, 1);
		let secondary = graphics(2, 2);
		let renderer = MetatileRenderer::new(Some(&primary), Some(&secondary), 6);
		let tile = renderer.render_tile(TileRef::new(0).with_palette(9), TilesetRole::Primary).unwrap();
		assert_eq!(tile.get_pixel(3, 3).0, [2, 10, 0, 255]);
	}

	#[test]
	fn test_missing_graphics_render_transparent() {
		let renderer = MetatileRenderer::new(None, None, 6);
		let [bottom, top] = renderer.render_metatile(&MetatileDefinition::EMPTY, TilesetRole::Primary);
		assert!(bottom.pixels().all(|p| p.0[3] == 0));
		assert!(top.pixels().all(|p| p.0[3] == 0));
	}
}
