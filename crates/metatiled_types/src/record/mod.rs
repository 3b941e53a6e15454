//! Fixed-width little-endian record decoding.
//!
//! Every binary resource of the map format is an array of 16-bit little-endian
//! words. A record spans one or more words and packs several bit fields:
//!
//! ```text
//! Resource                  Bits 0-9      Bits 10-11    Bits 12-15
//! ------------------------  ------------  ------------  -------------
//! map grid / border         metatile id   collision     elevation
//! metatile table            tile id       flip flags    palette index
//! metatile attributes       behavior (0-7), unused (8-11), layer type
//! ```
//!
//! [`RecordLayout`] decodes arbitrary layouts into field tuples; the typed
//! records in [`tile`], [`grid`] and [`attribute`] are thin wrappers over
//! single-word layouts.

pub mod attribute;
pub mod grid;
pub mod tile;

use std::borrow::Cow;

use crate::error::{ConvertError, Resource};

pub use attribute::{LayerType, MetatileAttribute, decode_attributes};
pub use grid::{GridEntry, MapGrid, decode_border, decode_map_grid};
pub use tile::{Flip, TileRef, decode_tile_refs};

/// Size of one record word in bytes
pub const WORD_SIZE: usize = 2;

/// One bit field of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldSpec {
	/// Field name, for diagnostics
	pub name: &'static str,
	/// Index of the 16-bit word holding the field
	pub word: usize,
	/// Bit offset within the word
	pub offset: u8,
	/// Width in bits
	pub width: u8,
}

impl FieldSpec {
	/// Creates a field in the first word of a record
	pub const fn new(name: &'static str, offset: u8, width: u8) -> Self {
		Self {
			name,
			word: 0,
			offset,
			width,
		}
	}

	/// Creates a field in an arbitrary word of a record
	pub const fn in_word(name: &'static str, word: usize, offset: u8, width: u8) -> Self {
		Self {
			name,
			word,
			offset,
			width,
		}
	}

	/// Mask of the field after shifting it down to bit 0
	pub const fn mask(&self) -> u16 {
		if self.width >= 16 {
			u16::MAX
		} else {
			(1u16 << self.width) - 1
		}
	}

	/// Extracts the field value from a record's words
	#[inline]
	pub fn extract(&self, words: &[u16]) -> u16 {
		(words[self.word] >> self.offset) & self.mask()
	}

	/// Inserts `value` into a record's words, truncating it to the field width
	#[inline]
	pub fn insert(&self, words: &mut [u16], value: u16) {
		let mask = self.mask() << self.offset;
		words[self.word] = (words[self.word] & !mask) | ((value << self.offset) & mask);
	}
}

const TILE_REF_FIELDS: &[FieldSpec] = &[
	FieldSpec::new("tile_id", 0, 10),
	FieldSpec::new("flip", 10, 2),
	FieldSpec::new("palette", 12, 4),
];

const GRID_ENTRY_FIELDS: &[FieldSpec] = &[
	FieldSpec::new("metatile_id", 0, 10),
	FieldSpec::new("collision", 10, 2),
	FieldSpec::new("elevation", 12, 4),
];

const METATILE_ATTRIBUTE_FIELDS: &[FieldSpec] = &[
	FieldSpec::new("behavior", 0, 8),
	FieldSpec::new("unused", 8, 4),
	FieldSpec::new("layer_type", 12, 4),
];

/// Decoded field values of one record, in layout order
pub type FieldValues = Vec<u16>;

/// Description of a fixed-width record made of bit fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordLayout {
	words: usize,
	fields: Cow<'static, [FieldSpec]>,
}

impl RecordLayout {
	/// Layout of a tile reference inside the metatile table
	pub const TILE_REF: Self = Self::from_static(1, TILE_REF_FIELDS);

	/// Layout of a map grid (or border) entry
	pub const GRID_ENTRY: Self = Self::from_static(1, GRID_ENTRY_FIELDS);

	/// Layout of a metatile attribute
	pub const METATILE_ATTRIBUTE: Self = Self::from_static(1, METATILE_ATTRIBUTE_FIELDS);

	/// Builds a layout from a static field table without validation
	pub const fn from_static(words: usize, fields: &'static [FieldSpec]) -> Self {
		Self {
			words,
			fields: Cow::Borrowed(fields),
		}
	}

	/// Builds a layout, checking that every field fits in its word
	pub fn new(words: usize, fields: Vec<FieldSpec>) -> Result<Self, ConvertError> {
		if words == 0 {
			return Err(ConvertError::InvalidLayout("a record needs at least one word".into()));
		}
		for field in &fields {
			if field.width == 0 || field.offset as usize + field.width as usize > 16 {
				return Err(ConvertError::InvalidLayout(format!(
					"field `{}` ({} bits at offset {}) does not fit a 16-bit word",
					field.name, field.width, field.offset
				)));
			}
			if field.word >= words {
				return Err(ConvertError::InvalidLayout(format!(
					"field `{}` refers to word {} of a {}-word record",
					field.name, field.word, words
				)));
			}
		}
		Ok(Self {
			words,
			fields: Cow::Owned(fields),
		})
	}

	/// Record width in bytes
	pub fn record_size(&self) -> usize {
		self.words * WORD_SIZE
	}

	/// Field specifications in layout order
	pub fn fields(&self) -> &[FieldSpec] {
		&self.fields
	}

	/// Decodes every record in `data`
	///
	/// Fails with [`ConvertError::TruncatedRecord`] if the buffer does not hold a
	/// whole number of records; a partial trailing record is never dropped silently.
	pub fn decode(&self, data: &[u8], resource: Resource) -> Result<Vec<FieldValues>, ConvertError> {
		let words = decode_words(data, self.record_size(), resource)?;
		Ok(words
			.chunks_exact(self.words)
			.map(|record| self.fields.iter().map(|field| field.extract(record)).collect())
			.collect())
	}

	/// Encodes records back to bytes; missing trailing values encode as zero
	pub fn encode(&self, records: &[FieldValues]) -> Vec<u8> {
		let mut buffer = Vec::with_capacity(records.len() * self.record_size());
		let mut words = vec![0u16; self.words];
		for record in records {
			words.fill(0);
			for (field, value) in self.fields.iter().zip(record) {
				field.insert(&mut words, *value);
			}
			for word in &words {
				buffer.extend_from_slice(&word.to_le_bytes());
			}
		}
		buffer
	}
}

/// Splits `data` into little-endian words after checking record alignment
pub fn decode_words(
	data: &[u8],
	record_size: usize,
	resource: Resource,
) -> Result<Vec<u16>, ConvertError> {
	if record_size == 0 || data.len() % record_size != 0 {
		return Err(ConvertError::truncated(resource, data.len(), record_size));
	}
	Ok(data.chunks_exact(WORD_SIZE).map(|word| u16::from_le_bytes([word[0], word[1]])).collect())
}

/// Serializes words back to little-endian bytes
pub fn encode_words(words: impl IntoIterator<Item = u16>) -> Vec<u8> {
	words.into_iter().flat_map(u16::to_le_bytes).collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_decode_tile_ref_fields() {
		// tile 0x155, hflip, palette 9
		let word: u16 = 0x155 | (1 << 10) | (9 << 12);
		let records = RecordLayout::TILE_REF.decode(&word.to_le_bytes(), Resource::Metatiles).unwrap();
		assert_eq!(records, vec![vec![0x155, 1, 9]]);
	}

	#[test]
	fn test_decode_rejects_partial_record() {
		let err = RecordLayout::GRID_ENTRY.decode(&[1, 2, 3], Resource::MapGrid).unwrap_err();
		assert!(matches!(err, ConvertError::TruncatedRecord {
			len: 3,
			record_size: 2,
			..
		}));
	}

	#[test]
	fn test_multi_word_layout() {
		let layout = RecordLayout::new(2, vec![
			FieldSpec::in_word("low", 0, 0, 16),
			FieldSpec::in_word("kind", 1, 0, 3),
			FieldSpec::in_word("flag", 1, 15, 1),
		])
		.unwrap();
		assert_eq!(layout.record_size(), 4);

		let data = [0x34, 0x12, 0x05, 0x80, 0xFF, 0xFF, 0x00, 0x00];
		let records = layout.decode(&data, Resource::MapGrid).unwrap();
		assert_eq!(records, vec![vec![0x1234, 5, 1], vec![0xFFFF, 0, 0]]);
		assert_eq!(layout.encode(&records), data);

		// Six bytes is one and a half records
		assert!(layout.decode(&data[..6], Resource::MapGrid).is_err());
	}

	#[test]
	fn test_layout_validation() {
		assert!(RecordLayout::new(1, vec![FieldSpec::new("wide", 10, 8)]).is_err());
		assert!(RecordLayout::new(1, vec![FieldSpec::in_word("far", 1, 0, 4)]).is_err());
		assert!(RecordLayout::new(0, vec![]).is_err());
	}

	#[test]
	fn test_roundtrip_every_word() {
		let data = encode_words(0..=u16::MAX);
		for layout in [RecordLayout::TILE_REF, RecordLayout::GRID_ENTRY, RecordLayout::METATILE_ATTRIBUTE] {
			let records = layout.decode(&data, Resource::Metatiles).unwrap();
			assert_eq!(layout.encode(&records), data);
		}
	}
}
