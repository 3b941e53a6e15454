//! Metatile attributes (behavior and layer type).

use serde::Serialize;

use super::{WORD_SIZE, decode_words};
use crate::error::{ConvertError, Resource};

/// Selects which background layers the two halves of a metatile are drawn on
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[repr(u8)]
pub enum LayerType {
	/// Bottom half on the middle layer, top half on the front layer
	#[default]
	Normal = 0,
	/// Bottom half on the back layer, top half on the middle layer
	Covered = 1,
	/// Bottom half on the back layer, top half on the front layer
	Split = 2,
}

impl LayerType {
	/// Maps a raw layer type value; anything unknown is treated as [`LayerType::Normal`]
	pub const fn from_raw(value: u8) -> Self {
		match value {
			1 => LayerType::Covered,
			2 => LayerType::Split,
			_ => LayerType::Normal,
		}
	}
}

/// Attribute word of one metatile
///
/// ```text
/// Bits   Field
/// -----  ----------
/// 0-7    behavior
/// 8-11   unused
/// 12-15  layer type
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MetatileAttribute {
	/// Movement/interaction behavior id
	pub behavior: u8,
	/// Bits 8-11, preserved for re-encoding
	pub unused: u8,
	/// Raw layer type nibble as stored
	pub raw_layer_type: u8,
}

impl MetatileAttribute {
	/// Creates an attribute with the given layer type and no behavior
	pub const fn with_layer_type(layer_type: LayerType) -> Self {
		Self {
			behavior: 0,
			unused: 0,
			raw_layer_type: layer_type as u8,
		}
	}

	/// Decodes an attribute from its 16-bit word
	pub const fn from_word(word: u16) -> Self {
		Self {
			behavior: (word & 0xFF) as u8,
			unused: ((word >> 8) & 0x0F) as u8,
			raw_layer_type: ((word >> 12) & 0x0F) as u8,
		}
	}

	/// Encodes the attribute back into its 16-bit word
	pub const fn to_word(self) -> u16 {
		self.behavior as u16 | ((self.unused as u16 & 0x0F) << 8) | ((self.raw_layer_type as u16 & 0x0F) << 12)
	}

	/// Effective layer type
	pub const fn layer_type(&self) -> LayerType {
		LayerType::from_raw(self.raw_layer_type)
	}
}

/// Decodes a metatile attribute table
pub fn decode_attributes(data: &[u8]) -> Result<Vec<MetatileAttribute>, ConvertError> {
	let words = decode_words(data, WORD_SIZE, Resource::MetatileAttributes)?;
	Ok(words.into_iter().map(MetatileAttribute::from_word).collect())
}
