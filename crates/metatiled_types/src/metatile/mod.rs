//! Metatile definitions and background layer composition.
//!
//! A metatile is 16x16 pixels made of eight 8x8 tile references. The first four
//! form the bottom half, the last four the top half; each half is a 2x2 block in
//! top-left, top-right, bottom-left, bottom-right order. The metatile's
//! [`LayerType`] decides which of the three background layers each half lands on:
//!
//! ```text
//! layer type  back (A)  middle (B)  front (C)
//! ----------  --------  ----------  ---------
//! NORMAL      empty     bottom      top
//! COVERED     bottom    top         empty
//! SPLIT       bottom    empty       top
//! ```

pub mod tileset;

use serde::Serialize;

use crate::{
	constants::{METATILE_SIZE, TILE_SIZE, TILES_PER_HALF, TILES_PER_METATILE},
	record::{LayerType, TileRef},
};

pub use tileset::{MetatileKey, ResolvedMetatile, Tileset, TilesetPair, TilesetRole};

/// One of the two 2x2 halves of a metatile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Half {
	/// Tile positions 0-3
	Bottom,
	/// Tile positions 4-7
	Top,
}

impl Half {
	/// Both halves, bottom first
	pub const ALL: [Half; 2] = [Half::Bottom, Half::Top];

	/// Half containing a metatile tile position (0-7)
	pub const fn of_position(position: usize) -> Self {
		if position < TILES_PER_HALF { Half::Bottom } else { Half::Top }
	}

	/// First metatile tile position of this half
	pub const fn first_position(self) -> usize {
		match self {
			Half::Bottom => 0,
			Half::Top => TILES_PER_HALF,
		}
	}

	/// Whether this is the top half
	pub const fn is_top(self) -> bool {
		matches!(self, Half::Top)
	}
}

/// Output background layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum BgLayer {
	/// Rearmost layer (BG3)
	Back,
	/// Middle layer (BG2)
	Middle,
	/// Frontmost layer (BG1)
	Front,
}

impl BgLayer {
	/// All layers, back to front
	pub const ALL: [BgLayer; 3] = [BgLayer::Back, BgLayer::Middle, BgLayer::Front];

	/// Index into back-to-front arrays
	pub const fn index(self) -> usize {
		self as usize
	}

	/// Conventional name of the layer
	pub const fn name(self) -> &'static str {
		match self {
			BgLayer::Back => "Bg3",
			BgLayer::Middle => "Bg2",
			BgLayer::Front => "Bg1",
		}
	}

	/// Layer a metatile half is drawn on
	///
	/// Every layer type maps the two halves to two distinct layers.
	pub const fn for_half(layer_type: LayerType, half: Half) -> BgLayer {
		match (layer_type, half) {
			(LayerType::Normal, Half::Bottom) => BgLayer::Middle,
			(LayerType::Normal | LayerType::Split, Half::Top) => BgLayer::Front,
			(LayerType::Covered | LayerType::Split, Half::Bottom) => BgLayer::Back,
			(LayerType::Covered, Half::Top) => BgLayer::Middle,
		}
	}

	/// Half drawn on this layer for a layer type, if any
	pub fn half_for(self, layer_type: LayerType) -> Option<Half> {
		Half::ALL.into_iter().find(|half| BgLayer::for_half(layer_type, *half) == self)
	}
}

/// A 2x2 block of tile references (top-left, top-right, bottom-left, bottom-right)
pub type TileBlock = [TileRef; TILES_PER_HALF];

/// The all-zero block placed on layers a metatile does not use
pub const EMPTY_BLOCK: TileBlock = [TileRef::EMPTY; TILES_PER_HALF];

/// Pixel offset of a position (0-3) within a half
pub const fn quadrant_offset(position: usize) -> (u32, u32) {
	(((position % 2) as u32) * TILE_SIZE, ((position / 2) as u32) * TILE_SIZE)
}

/// Eight tile references making up a metatile
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MetatileDefinition {
	tiles: [TileRef; TILES_PER_METATILE],
}

impl MetatileDefinition {
	/// Metatile whose every reference is tile 0
	pub const EMPTY: Self = Self {
		tiles: [TileRef::EMPTY; TILES_PER_METATILE],
	};

	/// Creates a definition from its eight references
	pub const fn new(tiles: [TileRef; TILES_PER_METATILE]) -> Self {
		Self {
			tiles,
		}
	}

	/// Creates a definition from bottom and top blocks
	pub fn from_halves(bottom: TileBlock, top: TileBlock) -> Self {
		let mut tiles = [TileRef::EMPTY; TILES_PER_METATILE];
		tiles[..TILES_PER_HALF].copy_from_slice(&bottom);
		tiles[TILES_PER_HALF..].copy_from_slice(&top);
		Self {
			tiles,
		}
	}

	/// Splits a decoded metatile table into definitions
	///
	/// A trailing group of fewer than eight references cannot form a metatile and is ignored.
	pub fn from_table(tiles: &[TileRef]) -> Vec<Self> {
		tiles
			.chunks_exact(TILES_PER_METATILE)
			.map(|chunk| {
				let mut refs = [TileRef::EMPTY; TILES_PER_METATILE];
				refs.copy_from_slice(chunk);
				Self::new(refs)
			})
			.collect()
	}

	/// All eight references
	pub fn tiles(&self) -> &[TileRef; TILES_PER_METATILE] {
		&self.tiles
	}

	/// Reference at a position (0-7)
	pub fn tile(&self, position: usize) -> TileRef {
		self.tiles[position]
	}

	/// The 2x2 block of one half
	pub fn half(&self, half: Half) -> TileBlock {
		let start = half.first_position();
		let mut block = EMPTY_BLOCK;
		block.copy_from_slice(&self.tiles[start..start + TILES_PER_HALF]);
		block
	}

	/// Routes both halves onto the three background layers
	pub fn compose(&self, layer_type: LayerType) -> ComposedMetatile {
		let mut layers = [EMPTY_BLOCK; 3];
		for half in Half::ALL {
			layers[BgLayer::for_half(layer_type, half).index()] = self.half(half);
		}
		ComposedMetatile {
			layer_type,
			layers,
		}
	}
}

/// Routes a metatile's halves onto the back, middle and front layers
pub fn compose(metatile: &MetatileDefinition, layer_type: LayerType) -> (TileBlock, TileBlock, TileBlock) {
	let composed = metatile.compose(layer_type);
	let [back, middle, front] = composed.layers;
	(back, middle, front)
}

/// A metatile with its halves assigned to background layers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComposedMetatile {
	layer_type: LayerType,
	layers: [TileBlock; 3],
}

impl ComposedMetatile {
	/// Layer type used for routing
	pub fn layer_type(&self) -> LayerType {
		self.layer_type
	}

	/// Block placed on a layer (all-empty if unused)
	pub fn layer(&self, layer: BgLayer) -> &TileBlock {
		&self.layers[layer.index()]
	}

	/// Tile-grid placements for the metatile at map cell `(x, y)`
	///
	/// Yields `(layer, tile_x, tile_y, tile)` for every position of every used
	/// layer; each map cell covers tiles `(2x..2x+1, 2y..2y+1)`.
	pub fn tile_placements(&self, x: usize, y: usize) -> impl Iterator<Item = (BgLayer, usize, usize, TileRef)> + '_ {
		BgLayer::ALL.into_iter().filter_map(move |layer| layer.half_for(self.layer_type).map(|_| layer)).flat_map(
			move |layer| {
				self.layers[layer.index()].iter().enumerate().map(move |(position, tile)| {
					(layer, x * 2 + position % 2, y * 2 + position / 2, *tile)
				})
			},
		)
	}

	/// Pixel placements for the metatile at map cell `(x, y)`
	///
	/// Yields `(layer, pixel_x, pixel_y, tile)` with each tile's 8x8 quadrant
	/// inside the cell's 16x16 block at `(16x, 16y)`.
	pub fn pixel_placements(&self, x: usize, y: usize) -> impl Iterator<Item = (BgLayer, u32, u32, TileRef)> + '_ {
		self.tile_placements(x, y).map(|(layer, tx, ty, tile)| {
			debug_assert_eq!(METATILE_SIZE, TILE_SIZE * 2);
			(layer, tx as u32 * TILE_SIZE, ty as u32 * TILE_SIZE, tile)
		})
	}
}
