//! Primary/secondary tileset pairs and combined metatile id resolution.

use std::fmt;

use serde::Serialize;

use super::MetatileDefinition;
use crate::{
	constants::NUM_METATILES_IN_PRIMARY,
	error::ConvertError,
	record::{LayerType, MetatileAttribute, decode_attributes, decode_tile_refs},
};

/// Which tileset of a pair a metatile belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum TilesetRole {
	/// Shared tileset, metatile ids 0-511
	Primary,
	/// Map-specific tileset, metatile ids 512-1023
	Secondary,
}

impl fmt::Display for TilesetRole {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			TilesetRole::Primary => f.write_str("primary"),
			TilesetRole::Secondary => f.write_str("secondary"),
		}
	}
}

/// Decoded metatile and attribute tables of one tileset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tileset {
	name: String,
	metatiles: Vec<MetatileDefinition>,
	attributes: Vec<MetatileAttribute>,
}

impl Tileset {
	/// Creates a tileset from decoded tables
	pub fn new(name: impl Into<String>, metatiles: Vec<MetatileDefinition>, attributes: Vec<MetatileAttribute>) -> Self {
		Self {
			name: name.into(),
			metatiles,
			attributes,
		}
	}

	/// Decodes a tileset from `metatiles.bin` and, if present, `metatile_attributes.bin`
	///
	/// Without an attribute table every metatile is [`LayerType::Normal`].
	pub fn from_bytes(
		name: impl Into<String>,
		metatiles: &[u8],
		attributes: Option<&[u8]>,
	) -> Result<Self, ConvertError> {
		let refs = decode_tile_refs(metatiles)?;
		let attributes = match attributes {
			Some(data) => decode_attributes(data)?,
			None => Vec::new(),
		};
		Ok(Self::new(name, MetatileDefinition::from_table(&refs), attributes))
	}

	/// Tileset name as given by the map layout
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Number of defined metatiles
	pub fn len(&self) -> usize {
		self.metatiles.len()
	}

	/// Whether the tileset defines no metatiles
	pub fn is_empty(&self) -> bool {
		self.metatiles.is_empty()
	}

	/// Definition of a tileset-local metatile; undefined ids yield [`MetatileDefinition::EMPTY`]
	pub fn metatile(&self, local_id: u16) -> MetatileDefinition {
		self.metatiles.get(local_id as usize).copied().unwrap_or(MetatileDefinition::EMPTY)
	}

	/// Attribute of a tileset-local metatile, if the table covers it
	pub fn attribute(&self, local_id: u16) -> Option<MetatileAttribute> {
		self.attributes.get(local_id as usize).copied()
	}

	/// Layer type of a tileset-local metatile; uncovered ids are [`LayerType::Normal`]
	pub fn layer_type(&self, local_id: u16) -> LayerType {
		self.attribute(local_id).map(|attribute| attribute.layer_type()).unwrap_or_default()
	}
}

/// Identity of a rendered metatile: owning tileset, local id and layer type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct MetatileKey {
	/// Owning tileset
	pub role: TilesetRole,
	/// Tileset-local metatile id
	pub metatile_id: u16,
	/// Layer type from the attribute table
	pub layer_type: LayerType,
}

/// A combined-space metatile id resolved against a tileset pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedMetatile {
	/// Identity of the metatile
	pub key: MetatileKey,
	/// Its eight tile references
	pub definition: MetatileDefinition,
}

/// The two tilesets a map layout draws from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TilesetPair {
	primary: Tileset,
	secondary: Option<Tileset>,
}

impl TilesetPair {
	/// Creates a pair; the secondary tileset is optional
	pub fn new(primary: Tileset, secondary: Option<Tileset>) -> Self {
		Self {
			primary,
			secondary,
		}
	}

	/// Primary tileset
	pub fn primary(&self) -> &Tileset {
		&self.primary
	}

	/// Secondary tileset, if loaded
	pub fn secondary(&self) -> Option<&Tileset> {
		self.secondary.as_ref()
	}

	/// Tileset playing a role, if loaded
	pub fn get(&self, role: TilesetRole) -> Option<&Tileset> {
		match role {
			TilesetRole::Primary => Some(&self.primary),
			TilesetRole::Secondary => self.secondary.as_ref(),
		}
	}

	/// Splits a combined metatile id into `(role, local id)`
	pub const fn split_id(metatile_id: u16) -> (TilesetRole, u16) {
		if metatile_id < NUM_METATILES_IN_PRIMARY {
			(TilesetRole::Primary, metatile_id)
		} else {
			(TilesetRole::Secondary, metatile_id - NUM_METATILES_IN_PRIMARY)
		}
	}

	/// Resolves a combined metatile id to its definition and key
	///
	/// Ids that the owning tileset does not define (or a missing secondary
	/// tileset) resolve to an all-empty definition with layer type NORMAL.
	pub fn resolve(&self, metatile_id: u16) -> ResolvedMetatile {
		let (role, local_id) = Self::split_id(metatile_id);
		let (definition, layer_type) = match self.get(role) {
			Some(tileset) => (tileset.metatile(local_id), tileset.layer_type(local_id)),
			None => (MetatileDefinition::EMPTY, LayerType::Normal),
		};
		ResolvedMetatile {
			key: MetatileKey {
				role,
				metatile_id: local_id,
				layer_type,
			},
			definition,
		}
	}
}
