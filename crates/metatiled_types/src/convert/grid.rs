//! Tile-grid output: the map as three layers of routed 8x8 tiles.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use super::{MapConverter, MapInput};
use crate::{
	animate::{AnimationTimeline, tile_timeline},
	atlas::{Atlas, Gid},
	constants::{NUM_TILES_IN_PRIMARY, TILE_SIZE},
	error::{ConvertError, Diagnostics},
	metatile::BgLayer,
	record::{Flip, TileRef},
	route::{Bank, UsedTiles},
};

/// Tiled flag for a horizontally flipped tile
pub const FLIP_HORIZONTAL_BIT: u32 = 0x8000_0000;

/// Tiled flag for a vertically flipped tile
pub const FLIP_VERTICAL_BIT: u32 = 0x4000_0000;

/// A tile reference after routing to its bank
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PlacedTile {
	/// Bank the tile image comes from
	pub bank: Bank,
	/// Id within that bank
	pub local_id: u16,
	/// The reference as stored in the metatile table
	pub tile: TileRef,
}

impl PlacedTile {
	/// Combined-space id of the tile
	pub fn combined_id(&self) -> u16 {
		combined_id(self.bank, self.local_id)
	}
}

/// One background layer at tile granularity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TileGridLayer {
	/// Conventional layer name
	pub name: &'static str,
	/// Layer
	#[serde(skip)]
	pub layer: BgLayer,
	/// Width in tiles
	pub width: usize,
	/// Height in tiles
	pub height: usize,
	/// Routed tiles, row-major; `None` where nothing is drawn
	#[serde(skip)]
	pub tiles: Vec<Option<PlacedTile>>,
	/// Tiled GIDs with flip flags, 0 for empty cells
	pub data: Vec<u32>,
}

impl TileGridLayer {
	fn new(layer: BgLayer, width: usize, height: usize) -> Self {
		Self {
			name: layer.name(),
			layer,
			width,
			height,
			tiles: vec![None; width * height],
			data: vec![0; width * height],
		}
	}

	/// Tile at tile coordinates
	pub fn get(&self, x: usize, y: usize) -> Option<&PlacedTile> {
		if x >= self.width {
			return None;
		}
		self.tiles.get(y * self.width + x)?.as_ref()
	}
}

/// Result of a tile-grid conversion
#[derive(Debug, Clone)]
pub struct TileGridMap {
	/// Map name
	pub name: String,
	/// Width in tiles (twice the metatile width)
	pub width: usize,
	/// Height in tiles
	pub height: usize,
	/// Back, middle and front layers
	pub layers: [TileGridLayer; 3],
	/// 8x8 images, one per distinct `(bank, local id, palette)` plus animation frames
	pub atlas: Atlas,
	/// Timelines of animated tiles
	pub timelines: Vec<AnimationTimeline>,
	/// Reconciled tiles per bank
	pub used_tiles: UsedTiles,
	/// Recoverable problems met along the way
	pub diagnostics: Diagnostics,
}

impl TileGridMap {
	/// Layer by id
	pub fn layer(&self, layer: BgLayer) -> &TileGridLayer {
		&self.layers[layer.index()]
	}
}

/// Tiled GID of a tile image with the reference's flips folded in
pub fn flagged_gid(gid: Gid, flip: Flip) -> u32 {
	if gid.is_none() {
		return 0;
	}
	let mut value = gid.0;
	if flip.horizontal() {
		value |= FLIP_HORIZONTAL_BIT;
	}
	if flip.vertical() {
		value |= FLIP_VERTICAL_BIT;
	}
	value
}

fn combined_id(bank: Bank, local_id: u16) -> u16 {
	match bank {
		Bank::Primary => local_id,
		Bank::Secondary => local_id + NUM_TILES_IN_PRIMARY,
	}
}

impl MapConverter {
	/// Converts one map into three layers of 8x8 tiles
	///
	/// # Errors
	///
	/// Same fatal conditions as [`MapConverter::convert`].
	pub fn convert_tile_grid(&self, input: &MapInput<'_>) -> Result<TileGridMap, ConvertError> {
		let mut diagnostics = Diagnostics::new();
		let (grid, pair) = self.prepare(input, &mut diagnostics)?;
		let renderer = self.renderer(input, &mut diagnostics);

		let (width, height) = (input.width * 2, input.height * 2);
		let mut layers = BgLayer::ALL.map(|layer| TileGridLayer::new(layer, width, height));
		let mut used_tiles = UsedTiles::new();
		for (x, y, entry) in grid.cells() {
			let resolved = pair.resolve(entry.metatile_id);
			let composed = resolved.definition.compose(resolved.key.layer_type);
			for (layer, tx, ty, tile) in composed.tile_placements(x, y) {
				if tile.is_empty() {
					continue;
				}
				let (bank, local_id) = used_tiles.insert(tile, resolved.key.role);
				layers[layer.index()].tiles[ty * width + tx] = Some(PlacedTile {
					bank,
					local_id,
					tile,
				});
			}
		}

		let max_id = |bank| renderer.bank(bank).and_then(|bank| bank.max_tile_id());
		used_tiles.reconcile(max_id(Bank::Primary), max_id(Bank::Secondary), &mut diagnostics);

		let mut atlas = Atlas::new(TILE_SIZE);
		let mut gids: HashMap<(Bank, u16, u8), Gid> = HashMap::new();
		for (bank, local_id, palette) in used_tiles.iter() {
			let plain = TileRef::new(combined_id(bank, local_id)).with_palette(palette);
			if let Some(image) = renderer.render_local(bank, local_id, plain) {
				gids.insert((bank, local_id, palette), atlas.allocate(image));
			}
		}

		// Tiles dropped by reconcile have no entry and leave the cell empty
		let lookup = |placed: &PlacedTile| gids.get(&(placed.bank, placed.local_id, placed.tile.palette)).copied();
		for layer in &mut layers {
			for (cell, placed) in layer.data.iter_mut().zip(&layer.tiles) {
				*cell = placed
					.as_ref()
					.and_then(|placed| lookup(placed).map(|gid| flagged_gid(gid, placed.tile.flip)))
					.unwrap_or(0);
			}
		}

		let mut tiles: Vec<((Bank, u16, u8), Gid)> = gids.into_iter().collect();
		tiles.sort_unstable_by_key(|(_, gid)| *gid);
		let mut timelines = Vec::new();
		let mut animated = HashSet::new();
		for ((bank, local_id, _), gid) in tiles {
			// Keys sharing an image share its timeline
			if !animated.insert(gid) {
				continue;
			}
			let tile_id = combined_id(bank, local_id);
			let timeline = input
				.animations
				.iter()
				.filter(|animation| Bank::from(animation.role) == bank)
				.find_map(|animation| tile_timeline(animation, tile_id, gid, &mut atlas));
			timelines.extend(timeline);
		}

		log::debug!(
			"{}: {}x{} tiles, {} images, {} animated",
			input.name,
			width,
			height,
			atlas.len(),
			timelines.len()
		);

		Ok(TileGridMap {
			name: input.name.to_string(),
			width,
			height,
			layers,
			atlas,
			timelines,
			used_tiles,
			diagnostics,
		})
	}
}
