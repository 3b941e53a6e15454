//! Tile references stored in the metatile table.

use serde::Serialize;

use super::{RecordLayout, WORD_SIZE, decode_words};
use crate::error::{ConvertError, Resource};

/// Flip applied to a tile when it is drawn
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[repr(u8)]
pub enum Flip {
	/// Drawn as stored
	#[default]
	None = 0,
	/// Mirrored left-right
	Horizontal = 1,
	/// Mirrored top-bottom
	Vertical = 2,
	/// Mirrored both ways
	Both = 3,
}

impl Flip {
	/// Builds a flip from its 2-bit encoding
	pub const fn from_bits(bits: u8) -> Self {
		match bits & 0x03 {
			0 => Flip::None,
			1 => Flip::Horizontal,
			2 => Flip::Vertical,
			_ => Flip::Both,
		}
	}

	/// Returns the 2-bit encoding
	pub const fn bits(self) -> u8 {
		self as u8
	}

	/// Whether the tile is mirrored left-right
	pub const fn horizontal(self) -> bool {
		self.bits() & 0x01 != 0
	}

	/// Whether the tile is mirrored top-bottom
	pub const fn vertical(self) -> bool {
		self.bits() & 0x02 != 0
	}
}

/// One 8x8 tile reference of a metatile
///
/// ```text
/// Bits   Field
/// -----  -------------
/// 0-9    tile id (0-1023, primary and secondary banks share this space)
/// 10-11  flip flags
/// 12-15  palette index
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TileRef {
	/// Tile id in the combined primary/secondary id space
	pub tile_id: u16,
	/// Flip flags
	pub flip: Flip,
	/// Palette slot (0-15)
	pub palette: u8,
}

impl TileRef {
	/// Empty reference (tile 0, no flip, palette 0)
	pub const EMPTY: Self = Self {
		tile_id: 0,
		flip: Flip::None,
		palette: 0,
	};

	/// Creates a reference without flip in palette 0
	pub const fn new(tile_id: u16) -> Self {
		Self {
			tile_id,
			flip: Flip::None,
			palette: 0,
		}
	}

	/// Returns a copy with the given flip
	pub const fn with_flip(mut self, flip: Flip) -> Self {
		self.flip = flip;
		self
	}

	/// Returns a copy with the given palette
	pub const fn with_palette(mut self, palette: u8) -> Self {
		self.palette = palette & 0x0F;
		self
	}

	/// Decodes a reference from its 16-bit word
	pub const fn from_word(word: u16) -> Self {
		Self {
			tile_id: word & 0x03FF,
			flip: Flip::from_bits(((word >> 10) & 0x03) as u8),
			palette: ((word >> 12) & 0x0F) as u8,
		}
	}

	/// Encodes the reference back into its 16-bit word
	pub const fn to_word(self) -> u16 {
		(self.tile_id & 0x03FF) | ((self.flip.bits() as u16) << 10) | ((self.palette as u16 & 0x0F) << 12)
	}

	/// Whether this references tile 0 (drawn as nothing by the tile-grid output)
	pub const fn is_empty(&self) -> bool {
		self.tile_id == 0
	}
}

impl From<u16> for TileRef {
	fn from(word: u16) -> Self {
		Self::from_word(word)
	}
}

impl From<TileRef> for u16 {
	fn from(tile: TileRef) -> Self {
		tile.to_word()
	}
}

/// Decodes a metatile table into its flat list of tile references
pub fn decode_tile_refs(data: &[u8]) -> Result<Vec<TileRef>, ConvertError> {
	debug_assert_eq!(RecordLayout::TILE_REF.record_size(), WORD_SIZE);
	let words = decode_words(data, WORD_SIZE, Resource::Metatiles)?;
	Ok(words.into_iter().map(TileRef::from_word).collect())
}
