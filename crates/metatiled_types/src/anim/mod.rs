//! Tile animations.
//!
//! Animated tiles are contiguous tile id ranges whose pixels are swapped every
//! few frames. Each definition names the range, the folder holding its frame
//! images and the order the frames play in. Definitions are looked up by
//! tileset name; see [`AnimationTable`].

pub mod extract;
pub mod library;
pub mod table;

use std::{collections::HashMap, sync::LazyLock};

use regex::Regex;
use serde::Serialize;

use crate::constants::{ANIMATION_FRAME_MS, NUM_TILES_IN_PRIMARY};

pub use extract::{FrameKind, FrameSet, extract_frames};
pub use library::{AnimationLibrary, LoadedAnimation, load_frame_image, scan_frame_folder};

/// Static description of one animated tile range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct AnimationDefinition {
	/// Animation name, unique within its tileset
	pub name: &'static str,
	/// First animated tile id, bank-local for secondary animations
	pub base_tile_id: u16,
	/// Length of the animated tile range
	pub num_tiles: u16,
	/// Whether `base_tile_id` is local to the secondary bank
	pub is_secondary: bool,
	/// Display time of each frame
	pub duration_ms: u32,
	/// Playback order of frame indices; `None` plays frames in order
	pub frame_sequence: Option<&'static [usize]>,
	/// Folder holding the frame images, relative to the tileset's animation folder
	pub folder: &'static str,
}

impl AnimationDefinition {
	/// Creates a primary-bank animation with a 200ms linear cycle, stored in a folder named after it
	pub const fn new(name: &'static str, base_tile_id: u16, num_tiles: u16) -> Self {
		Self {
			name,
			base_tile_id,
			num_tiles,
			is_secondary: false,
			duration_ms: ANIMATION_FRAME_MS,
			frame_sequence: None,
			folder: name,
		}
	}

	/// Marks the base tile id as secondary-bank local
	pub const fn secondary(mut self) -> Self {
		self.is_secondary = true;
		self
	}

	/// Sets an explicit playback order
	pub const fn with_sequence(mut self, sequence: &'static [usize]) -> Self {
		self.frame_sequence = Some(sequence);
		self
	}

	/// Sets the per-frame duration
	pub const fn with_duration(mut self, duration_ms: u32) -> Self {
		self.duration_ms = duration_ms;
		self
	}

	/// Sets the frame folder
	pub const fn with_folder(mut self, folder: &'static str) -> Self {
		self.folder = folder;
		self
	}

	/// First animated tile id in the combined (metatile reference) id space
	pub const fn combined_base(&self) -> u16 {
		if self.is_secondary { self.base_tile_id + NUM_TILES_IN_PRIMARY } else { self.base_tile_id }
	}

	/// Whether a combined-space tile id falls inside the animated range
	pub const fn contains(&self, tile_id: u16) -> bool {
		let base = self.combined_base();
		tile_id >= base && tile_id - base < self.num_tiles
	}

	/// Frame shown at a playback step
	///
	/// With a sequence, `sequence[step % len]`. Without one, frames play in order
	/// and wrap after `frames_available` frames. A degenerate frame count (no
	/// frames) shows frame 0.
	pub fn frame_at(&self, step: usize, frames_available: usize) -> usize {
		match self.frame_sequence {
			Some(sequence) if !sequence.is_empty() => sequence[step % sequence.len()],
			_ if frames_available > 0 => step % frames_available,
			_ => 0,
		}
	}

	/// Frame indices in playback order for a set of `frames_available` frames
	pub fn playback_order(&self, frames_available: usize) -> Vec<usize> {
		match self.frame_sequence {
			Some(sequence) if !sequence.is_empty() => sequence.to_vec(),
			_ => (0..frames_available).collect(),
		}
	}
}

/// Animation definitions keyed by normalized tileset name
///
/// Definition order within a tileset is preserved; callers that stop at the
/// first match depend on it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnimationTable {
	tilesets: HashMap<String, Vec<AnimationDefinition>>,
}

static BUILTIN: LazyLock<AnimationTable> = LazyLock::new(|| {
	let mut table = AnimationTable::new();
	for (tileset, definitions) in table::BUILTIN_ANIMATIONS {
		table.insert(tileset, definitions.to_vec());
	}
	table
});

impl AnimationTable {
	/// Creates an empty table
	pub fn new() -> Self {
		Self::default()
	}

	/// The animations of the stock tilesets
	pub fn builtin() -> &'static AnimationTable {
		&BUILTIN
	}

	/// Registers the definitions of a tileset, replacing any previous ones
	pub fn insert(&mut self, tileset_name: &str, definitions: Vec<AnimationDefinition>) {
		self.tilesets.insert(normalize_tileset_name(tileset_name), definitions);
	}

	/// Definitions of a tileset; unknown tilesets have none
	pub fn get(&self, tileset_name: &str) -> &[AnimationDefinition] {
		self.tilesets.get(&normalize_tileset_name(tileset_name)).map(Vec::as_slice).unwrap_or(&[])
	}

	/// Number of tilesets with animations
	pub fn len(&self) -> usize {
		self.tilesets.len()
	}

	/// Whether no tileset has animations
	pub fn is_empty(&self) -> bool {
		self.tilesets.is_empty()
	}
}

/// Definitions of a stock tileset, in table order
pub fn get_definitions(tileset_name: &str) -> &'static [AnimationDefinition] {
	AnimationTable::builtin().get(tileset_name)
}

const TILESET_PREFIXES: [&str; 3] = ["gTileset_", "Tileset_", "g_tileset_"];

static LOWER_UPPER: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"([a-z0-9])([A-Z])").ok());
static UPPER_WORD: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"(.)([A-Z][a-z]+)").ok());

/// Converts `CamelCase` to `snake_case` at word boundaries.
pub fn camel_to_snake(name: &str) -> String {
	let (Some(upper_word), Some(lower_upper)) = (UPPER_WORD.as_ref(), LOWER_UPPER.as_ref()) else {
		return name.to_lowercase();
	};
	let split = upper_word.replace_all(name, "${1}_${2}");
	lower_upper.replace_all(&split, "${1}_${2}").to_lowercase()
}

/// Normalizes a tileset name for lookups
///
/// Strips the first matching symbol prefix (`gTileset_`, `Tileset_`,
/// `g_tileset_`), converts to `snake_case` and lowercases, so
/// `gTileset_BattleFrontierOutsideWest` becomes `battle_frontier_outside_west`.
pub fn normalize_tileset_name(tileset_name: &str) -> String {
	let stripped = TILESET_PREFIXES
		.iter()
		.find_map(|prefix| tileset_name.strip_prefix(prefix))
		.unwrap_or(tileset_name);
	camel_to_snake(stripped).to_lowercase()
}
