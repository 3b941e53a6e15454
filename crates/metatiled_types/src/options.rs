//! Conversion options.

use serde::Deserialize;

use crate::constants;

/// Tunables for a conversion run
///
/// All fields have defaults matching the original hardware behaviour, so an empty
/// configuration source deserializes to [`ConvertOptions::default`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ConvertOptions {
	/// Steps in the shared 8x8 strip animation cycle
	pub cycle_frames: usize,
	/// Duration of each strip animation step in milliseconds
	pub cycle_frame_ms: u32,
	/// Columns used when packing the atlas into a sheet
	pub atlas_columns: u32,
	/// Largest accepted map width or height in metatiles
	pub max_map_dimension: usize,
	/// Palette slots served by the primary tileset
	pub primary_palette_count: usize,
}

impl Default for ConvertOptions {
	fn default() -> Self {
		Self {
			cycle_frames: constants::ANIMATION_CYCLE_FRAMES,
			cycle_frame_ms: constants::ANIMATION_FRAME_MS,
			atlas_columns: 16,
			max_map_dimension: 1000,
			primary_palette_count: constants::NUM_PALETTES_IN_PRIMARY,
		}
	}
}
