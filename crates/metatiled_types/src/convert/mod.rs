//! Map conversion.
//!
//! [`MapConverter::convert`] turns one map's binary resources into three
//! background layers of 16x16 half-metatile GIDs, the deduplicated image atlas
//! behind them and the animation timelines of animated GIDs.
//! [`MapConverter::convert_tile_grid`] produces the same layers at 8x8 tile
//! granularity instead.
//!
//! Only the map grid and the primary metatile table are required. Everything
//! else degrades to a recorded [`Anomaly`](crate::error::Anomaly) when missing
//! or malformed.

mod border;
mod grid;

use std::collections::BTreeSet;

use serde::Serialize;

use crate::{
	anim::AnimationLibrary,
	animate::{AnimationEngine, AnimationTimeline, RenderedMetatile, RenderedMetatiles, TileIndex},
	atlas::{Atlas, Gid},
	constants::METATILE_SIZE,
	error::{ConvertError, Diagnostics, Resource},
	graphics::{MetatileRenderer, TilesetGraphics},
	metatile::{BgLayer, Half, MetatileKey, Tileset, TilesetPair},
	options::ConvertOptions,
	record::{MapGrid, decode_map_grid},
	route::UsedTiles,
};

pub use border::{Border, BorderCell, BorderCorner};
pub use grid::{FLIP_HORIZONTAL_BIT, FLIP_VERTICAL_BIT, PlacedTile, TileGridLayer, TileGridMap, flagged_gid};

/// Binary resources and graphics of one tileset, as loaded by the caller
#[derive(Debug, Clone, Default)]
pub struct TilesetResources {
	/// Tileset name, used for animation lookups and messages
	pub name: String,
	/// `metatiles.bin`
	pub metatiles: Vec<u8>,
	/// `metatile_attributes.bin`, if present
	pub attributes: Option<Vec<u8>>,
	/// Tile sheet and palettes, if present
	pub graphics: Option<TilesetGraphics>,
}

impl TilesetResources {
	/// Creates resources without attributes or graphics
	pub fn new(name: impl Into<String>, metatiles: Vec<u8>) -> Self {
		Self {
			name: name.into(),
			metatiles,
			..Self::default()
		}
	}

	/// Adds the attribute table
	pub fn with_attributes(mut self, attributes: Vec<u8>) -> Self {
		self.attributes = Some(attributes);
		self
	}

	/// Adds the graphics
	pub fn with_graphics(mut self, graphics: TilesetGraphics) -> Self {
		self.graphics = Some(graphics);
		self
	}
}

/// Everything needed to convert one map
#[derive(Debug, Clone, Copy)]
pub struct MapInput<'a> {
	/// Map name, used in messages
	pub name: &'a str,
	/// Width in metatiles
	pub width: usize,
	/// Height in metatiles
	pub height: usize,
	/// `map.bin`
	pub grid: &'a [u8],
	/// `border.bin`, if present
	pub border: Option<&'a [u8]>,
	/// Primary tileset
	pub primary: &'a TilesetResources,
	/// Secondary tileset, if present
	pub secondary: Option<&'a TilesetResources>,
	/// Animation frames of the pair's tilesets
	pub animations: &'a AnimationLibrary,
}

/// GIDs of one background layer, row-major
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MapLayer {
	/// Conventional layer name (`Bg3`, `Bg2`, `Bg1`)
	pub name: &'static str,
	/// Layer
	#[serde(skip)]
	pub layer: BgLayer,
	/// One GID per map cell, [`Gid::NONE`] where the layer is empty
	pub gids: Vec<Gid>,
}

/// Result of converting a map
#[derive(Debug, Clone)]
pub struct ConvertedMap {
	/// Map name
	pub name: String,
	/// Width in metatiles
	pub width: usize,
	/// Height in metatiles
	pub height: usize,
	/// Back, middle and front layers
	pub layers: [MapLayer; 3],
	/// Border metatiles, if a border table was usable
	pub border: Option<Border>,
	/// Images of every GID referenced by the layers, border and timelines
	pub atlas: Atlas,
	/// Animation timelines, at most one per GID
	pub timelines: Vec<AnimationTimeline>,
	/// Tile id to the GIDs drawing it
	pub tile_index: TileIndex,
	/// Tiles referenced by the map's metatiles after routing
	pub used_tiles: UsedTiles,
	/// Recoverable problems met along the way
	pub diagnostics: Diagnostics,
}

impl ConvertedMap {
	/// Layer by id
	pub fn layer(&self, layer: BgLayer) -> &MapLayer {
		&self.layers[layer.index()]
	}

	/// GID placed at a map cell on a layer
	pub fn gid_at(&self, x: usize, y: usize, layer: BgLayer) -> Option<Gid> {
		if x >= self.width || y >= self.height {
			return None;
		}
		self.layer(layer).gids.get(y * self.width + x).copied()
	}

	/// Timeline attached to a GID
	pub fn timeline(&self, gid: Gid) -> Option<&AnimationTimeline> {
		self.timelines.iter().find(|timeline| timeline.gid == gid)
	}
}

/// Outcome of converting several maps
#[derive(Debug, Default)]
pub struct BatchReport {
	/// Successfully converted maps, in input order
	pub converted: Vec<ConvertedMap>,
	/// Maps that failed, with their errors
	pub failed: Vec<(String, ConvertError)>,
}

/// Converts maps with a fixed set of options
#[derive(Debug, Clone, Default)]
pub struct MapConverter {
	options: ConvertOptions,
}

impl MapConverter {
	/// Creates a converter
	pub fn new(options: ConvertOptions) -> Self {
		Self {
			options,
		}
	}

	/// Options in use
	pub fn options(&self) -> &ConvertOptions {
		&self.options
	}

	/// Converts one map into pre-rendered half-metatile layers
	///
	/// # Errors
	///
	/// Fails on invalid dimensions, a malformed or mis-sized map grid, and a
	/// missing or malformed primary metatile table.
	pub fn convert(&self, input: &MapInput<'_>) -> Result<ConvertedMap, ConvertError> {
		let mut diagnostics = Diagnostics::new();
		let (grid, pair) = self.prepare(input, &mut diagnostics)?;
		let renderer = self.renderer(input, &mut diagnostics);

		let mut builder = MapBuilder::new(&pair, renderer);
		let cells = input.width * input.height;
		let mut layers: [Vec<Gid>; 3] = std::array::from_fn(|_| vec![Gid::NONE; cells]);
		for (x, y, entry) in grid.cells() {
			let (key, gids) = builder.place(entry.metatile_id);
			for half in Half::ALL {
				layers[BgLayer::for_half(key.layer_type, half).index()][y * input.width + x] = gids[half as usize];
			}
		}

		let mut border = input.border.and_then(|data| Border::build(data, &mut builder, &mut diagnostics));

		let MapBuilder {
			mut atlas,
			mut metatiles,
			mut index,
			mut used_tiles,
			used,
			..
		} = builder;

		used_tiles.reconcile(
			input.primary.graphics.as_ref().and_then(|graphics| graphics.bank.max_tile_id()),
			input.secondary.and_then(|secondary| secondary.graphics.as_ref()).and_then(|graphics| graphics.bank.max_tile_id()),
			&mut diagnostics,
		);

		let engine = AnimationEngine::new(input.animations, &self.options);
		let timelines = engine.run(&mut atlas, &metatiles, &index, &used);

		let mut retained = used;
		retained.extend(timelines.iter().flat_map(AnimationTimeline::frame_gids));
		let before = atlas.len();
		let remap = atlas.prune(&retained);
		for layer in &mut layers {
			remap.apply(layer);
		}
		if let Some(border) = border.as_mut() {
			border.remap(&remap);
		}
		let timelines: Vec<AnimationTimeline> =
			timelines.into_iter().filter_map(|timeline| timeline.remap(&remap)).collect();
		index.remap(&remap);
		metatiles.remap(&remap);

		log::debug!(
			"{}: {}x{} cells, {} metatiles, {} images ({} pruned), {} timelines",
			input.name,
			input.width,
			input.height,
			metatiles.len(),
			atlas.len(),
			before - atlas.len(),
			timelines.len()
		);

		let [back, middle, front] = layers;
		Ok(ConvertedMap {
			name: input.name.to_string(),
			width: input.width,
			height: input.height,
			layers: [
				map_layer(BgLayer::Back, back),
				map_layer(BgLayer::Middle, middle),
				map_layer(BgLayer::Front, front),
			],
			border,
			atlas,
			timelines,
			tile_index: index,
			used_tiles,
			diagnostics,
		})
	}

	/// Converts many maps, carrying on past failures
	///
	/// Each failure is logged at error level and collected with its map name.
	pub fn convert_batch<'a>(&self, inputs: impl IntoIterator<Item = MapInput<'a>>) -> BatchReport {
		let mut report = BatchReport::default();
		for input in inputs {
			match self.convert(&input) {
				Ok(map) => report.converted.push(map),
				Err(err) => {
					log::error!("{}: {err}", input.name);
					report.failed.push((input.name.to_string(), err));
				}
			}
		}
		report
	}

	/// Validates dimensions and decodes the grid and tileset pair
	fn prepare(&self, input: &MapInput<'_>, diagnostics: &mut Diagnostics) -> Result<(MapGrid, TilesetPair), ConvertError> {
		let max = self.options.max_map_dimension;
		if !(1..=max).contains(&input.width) || !(1..=max).contains(&input.height) {
			return Err(ConvertError::InvalidDimensions {
				width: input.width,
				height: input.height,
				max,
			});
		}
		if input.grid.is_empty() {
			return Err(ConvertError::MissingResource(Resource::MapGrid));
		}
		let grid = decode_map_grid(input.grid, input.width, input.height)?;

		if input.primary.metatiles.is_empty() {
			return Err(ConvertError::MissingResource(Resource::Metatiles));
		}
		let primary = decode_tileset(input.primary, diagnostics)?;

		let secondary = match input.secondary {
			Some(resources) => match decode_tileset(resources, diagnostics) {
				Ok(tileset) => Some(tileset),
				Err(err) => {
					diagnostics.missing(Resource::SecondaryTileset, format!("{}: {err}", resources.name));
					None
				}
			},
			None => None,
		};
		if secondary.is_none() && grid.entries().iter().any(|entry| entry.is_secondary()) {
			diagnostics.missing(Resource::SecondaryTileset, "map uses secondary metatiles, rendered empty");
		}

		Ok((grid, TilesetPair::new(primary, secondary)))
	}

	fn renderer<'a>(&self, input: &MapInput<'a>, diagnostics: &mut Diagnostics) -> MetatileRenderer<'a> {
		let primary = input.primary.graphics.as_ref();
		if primary.is_none() {
			diagnostics.missing(Resource::TileSheet, format!("{}: no primary graphics", input.primary.name));
		}
		let secondary = input.secondary.and_then(|resources| resources.graphics.as_ref());
		MetatileRenderer::new(primary, secondary, self.options.primary_palette_count)
	}
}

/// Decodes a tileset; a malformed attribute table only costs the layer types
fn decode_tileset(resources: &TilesetResources, diagnostics: &mut Diagnostics) -> Result<Tileset, ConvertError> {
	let tileset = Tileset::from_bytes(&resources.name, &resources.metatiles, None)?;
	let Some(data) = resources.attributes.as_deref() else {
		return Ok(tileset);
	};
	match Tileset::from_bytes(&resources.name, &resources.metatiles, Some(data)) {
		Ok(with_attributes) => Ok(with_attributes),
		Err(err) => {
			diagnostics.missing(Resource::MetatileAttributes, format!("{}: {err}", resources.name));
			Ok(tileset)
		}
	}
}

fn map_layer(layer: BgLayer, gids: Vec<Gid>) -> MapLayer {
	MapLayer {
		name: layer.name(),
		layer,
		gids,
	}
}

/// Per-map accumulator: renders each distinct metatile once and hands out GIDs
pub(crate) struct MapBuilder<'a> {
	pair: &'a TilesetPair,
	renderer: MetatileRenderer<'a>,
	pub(crate) atlas: Atlas,
	pub(crate) metatiles: RenderedMetatiles,
	pub(crate) index: TileIndex,
	pub(crate) used_tiles: UsedTiles,
	pub(crate) used: BTreeSet<Gid>,
}

impl<'a> MapBuilder<'a> {
	fn new(pair: &'a TilesetPair, renderer: MetatileRenderer<'a>) -> Self {
		Self {
			pair,
			renderer,
			atlas: Atlas::new(METATILE_SIZE),
			metatiles: RenderedMetatiles::new(),
			index: TileIndex::new(),
			used_tiles: UsedTiles::new(),
			used: BTreeSet::new(),
		}
	}

	/// Resolves a combined metatile id, rendering it on first use, and marks its GIDs used
	pub(crate) fn place(&mut self, metatile_id: u16) -> (MetatileKey, [Gid; 2]) {
		let resolved = self.pair.resolve(metatile_id);
		let key = resolved.key;
		let gids = match self.metatiles.get(&key) {
			Some(rendered) => rendered.gids,
			None => {
				let halves = self.renderer.render_metatile(&resolved.definition, key.role);
				let gids = [self.atlas.allocate(halves[0].clone()), self.atlas.allocate(halves[1].clone())];
				self.index.record_metatile(key, &resolved.definition, gids);
				for tile in resolved.definition.tiles() {
					self.used_tiles.insert(*tile, key.role);
				}
				self.metatiles.insert(key, RenderedMetatile {
					definition: resolved.definition,
					halves,
					gids,
				});
				gids
			}
		};
		self.used.extend(gids);
		(key, gids)
	}
}
