//! Map grid and border entries.

use serde::Serialize;

use super::{WORD_SIZE, decode_words};
use crate::{
	constants::{BORDER_ENTRIES, NUM_METATILES_IN_PRIMARY},
	error::{ConvertError, Resource},
};

/// One cell of a map grid
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct GridEntry {
	/// Metatile id in the combined primary/secondary space (0-1023)
	pub metatile_id: u16,
	/// Collision bits (0-3)
	pub collision: u8,
	/// Elevation (0-15)
	pub elevation: u8,
}

impl GridEntry {
	/// Creates an entry for a metatile with no collision at elevation 0
	pub const fn new(metatile_id: u16) -> Self {
		Self {
			metatile_id,
			collision: 0,
			elevation: 0,
		}
	}

	/// Decodes an entry from its 16-bit word
	pub const fn from_word(word: u16) -> Self {
		Self {
			metatile_id: word & 0x03FF,
			collision: ((word >> 10) & 0x03) as u8,
			elevation: ((word >> 12) & 0x0F) as u8,
		}
	}

	/// Encodes the entry back into its 16-bit word
	pub const fn to_word(self) -> u16 {
		(self.metatile_id & 0x03FF)
			| ((self.collision as u16 & 0x03) << 10)
			| ((self.elevation as u16 & 0x0F) << 12)
	}

	/// Whether the metatile lives in the secondary tileset
	pub const fn is_secondary(&self) -> bool {
		self.metatile_id >= NUM_METATILES_IN_PRIMARY
	}
}

/// Rectangular, row-major map grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapGrid {
	width: usize,
	height: usize,
	entries: Vec<GridEntry>,
}

impl MapGrid {
	/// Creates a grid from row-major entries
	pub fn new(width: usize, height: usize, entries: Vec<GridEntry>) -> Result<Self, ConvertError> {
		if entries.len() != width * height {
			return Err(ConvertError::count_mismatch(Resource::MapGrid, width * height, entries.len()));
		}
		Ok(Self {
			width,
			height,
			entries,
		})
	}

	/// Width in metatiles
	pub fn width(&self) -> usize {
		self.width
	}

	/// Height in metatiles
	pub fn height(&self) -> usize {
		self.height
	}

	/// Entries in row-major order
	pub fn entries(&self) -> &[GridEntry] {
		&self.entries
	}

	/// Entry at `(x, y)`, if inside the grid
	pub fn get(&self, x: usize, y: usize) -> Option<&GridEntry> {
		if x >= self.width || y >= self.height {
			return None;
		}
		self.entries.get(y * self.width + x)
	}

	/// Iterates `(x, y, entry)` in row-major order
	pub fn cells(&self) -> impl Iterator<Item = (usize, usize, &GridEntry)> + '_ {
		self.entries.iter().enumerate().map(|(i, entry)| (i % self.width, i / self.width, entry))
	}

	/// Serializes the grid back to its binary form
	pub fn to_bytes(&self) -> Vec<u8> {
		super::encode_words(self.entries.iter().map(|entry| entry.to_word()))
	}
}

/// Decodes a `map.bin` grid of `width * height` entries
///
/// Any length that is not exactly `width * height` whole records is a format error.
pub fn decode_map_grid(data: &[u8], width: usize, height: usize) -> Result<MapGrid, ConvertError> {
	let words = decode_words(data, WORD_SIZE, Resource::MapGrid)?;
	let entries = words.into_iter().map(GridEntry::from_word).collect();
	MapGrid::new(width, height, entries)
}

/// Decodes the four corner entries of a border table
///
/// Border tables may be larger than 2x2; only the first four entries are used.
pub fn decode_border(data: &[u8]) -> Result<[GridEntry; BORDER_ENTRIES], ConvertError> {
	let words = decode_words(data, WORD_SIZE, Resource::Border)?;
	if words.len() < BORDER_ENTRIES {
		return Err(ConvertError::count_mismatch(Resource::Border, BORDER_ENTRIES, words.len()));
	}
	Ok(std::array::from_fn(|i| GridEntry::from_word(words[i])))
}
