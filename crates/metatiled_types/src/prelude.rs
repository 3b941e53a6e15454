//! Prelude module for `metatiled_types`.
//!
//! This module provides a convenient way to import commonly used types, traits, and constants.
//!
//! # Examples
//!
//! ```no_run
//! use metatiled_types::prelude::*;
//!
//! let options = ConvertOptions::default();
//! let converter = MapConverter::new(options);
//! let table = AnimationTable::builtin();
//! ```

#[doc(inline)]
pub use crate::{
	anim::{AnimationDefinition, AnimationLibrary, AnimationTable, FrameKind, FrameSet, LoadedAnimation},
	animate::{AnimationTimeline, TimelineFrame},
	atlas::{Atlas, Gid, GidRemap},
	constants::{METATILE_SIZE, NUM_METATILES_IN_PRIMARY, NUM_TILES_IN_PRIMARY, TILE_SIZE},
	convert::{
		BatchReport, Border, ConvertedMap, MapConverter, MapInput, MapLayer, TileGridMap, TilesetResources,
	},
	error::{Anomaly, ConvertError, Diagnostics, Resource},
	graphics::{IndexedImage, Palette, TileBank, TilesetGraphics},
	metatile::{BgLayer, Half, MetatileDefinition, Tileset, TilesetPair, TilesetRole},
	options::ConvertOptions,
	record::{Flip, GridEntry, LayerType, MapGrid, TileRef},
	route::{Bank, UsedTiles},
};
