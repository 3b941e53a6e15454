//! Cross-tileset tile routing.
//!
//! Primary and secondary tile sheets share one 10-bit tile id space. Tiles
//! referenced by a primary metatile always come from the primary bank. Tiles
//! referenced by a secondary metatile come from the primary bank below id 512
//! and from the secondary bank (rebased to 0) from 512 upwards.

use std::{
	collections::{BTreeMap, BTreeSet},
	fmt,
};

use serde::Serialize;

use crate::{
	constants::NUM_TILES_IN_PRIMARY,
	error::{Anomaly, Diagnostics},
	metatile::TilesetRole,
	record::TileRef,
};

/// Tile image bank
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Bank {
	/// Tiles of the primary tileset
	Primary,
	/// Tiles of the secondary tileset
	Secondary,
}

impl fmt::Display for Bank {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Bank::Primary => f.write_str("primary"),
			Bank::Secondary => f.write_str("secondary"),
		}
	}
}

impl From<TilesetRole> for Bank {
	fn from(role: TilesetRole) -> Self {
		match role {
			TilesetRole::Primary => Bank::Primary,
			TilesetRole::Secondary => Bank::Secondary,
		}
	}
}

/// Resolves a tile id referenced by a metatile of `owner` to `(bank, bank-local id)`
pub const fn route(tile_id: u16, owner: TilesetRole) -> (Bank, u16) {
	match owner {
		TilesetRole::Primary => (Bank::Primary, tile_id),
		TilesetRole::Secondary if tile_id < NUM_TILES_IN_PRIMARY => (Bank::Primary, tile_id),
		TilesetRole::Secondary => (Bank::Secondary, tile_id - NUM_TILES_IN_PRIMARY),
	}
}

/// Tiles referenced by a map, per bank, with the palettes they are drawn in
///
/// Primary tiles are keyed by their bank-local id. Secondary tiles are keyed
/// by the global id the metatile referenced (bank-local id + 512), so an id
/// that never belonged to the secondary bank stays recognisable until
/// [`UsedTiles::reconcile`] runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsedTiles {
	primary: BTreeMap<u16, BTreeSet<u8>>,
	secondary: BTreeMap<u16, BTreeSet<u8>>,
}

impl UsedTiles {
	/// Creates an empty set
	pub fn new() -> Self {
		Self::default()
	}

	fn bank_mut(&mut self, bank: Bank) -> &mut BTreeMap<u16, BTreeSet<u8>> {
		match bank {
			Bank::Primary => &mut self.primary,
			Bank::Secondary => &mut self.secondary,
		}
	}

	/// Records a tile referenced by a metatile of `owner`, routing it first
	pub fn insert(&mut self, tile: TileRef, owner: TilesetRole) -> (Bank, u16) {
		let (bank, local_id) = route(tile.tile_id, owner);
		self.insert_local(bank, local_id, tile.palette);
		(bank, local_id)
	}

	/// Records an already-routed tile
	pub fn insert_local(&mut self, bank: Bank, local_id: u16, palette: u8) {
		self.insert_global(bank, global_id(bank, local_id), palette);
	}

	/// Records a tile under its global id without routing it
	///
	/// A secondary entry below 512 is misrouted; `reconcile` moves it to the
	/// primary bank.
	pub fn insert_global(&mut self, bank: Bank, tile_id: u16, palette: u8) {
		self.bank_mut(bank).entry(tile_id).or_default().insert(palette);
	}

	/// Whether a bank-local tile is recorded
	pub fn contains(&self, bank: Bank, local_id: u16) -> bool {
		self.palettes(bank, local_id).is_some()
	}

	/// Palettes a bank-local tile is drawn in
	pub fn palettes(&self, bank: Bank, local_id: u16) -> Option<&BTreeSet<u8>> {
		match bank {
			Bank::Primary => self.primary.get(&local_id),
			Bank::Secondary => self.secondary.get(&global_id(bank, local_id)),
		}
	}

	/// Iterates `(bank, local id, palette)` over every recorded tile
	///
	/// Misrouted secondary entries are skipped until `reconcile` has moved them.
	pub fn iter(&self) -> impl Iterator<Item = (Bank, u16, u8)> + '_ {
		let primary = self.primary.iter().map(|(id, palettes)| (Bank::Primary, *id, palettes));
		let secondary = self
			.secondary
			.iter()
			.filter_map(|(id, palettes)| Some((Bank::Secondary, id.checked_sub(NUM_TILES_IN_PRIMARY)?, palettes)));
		primary.chain(secondary).flat_map(|(bank, id, palettes)| palettes.iter().map(move |palette| (bank, id, *palette)))
	}

	/// Drops ids that no bank can hold, repairing misrouted ids on the way
	///
	/// `primary_max`/`secondary_max` are the highest valid bank-local ids (from
	/// the sheet dimensions); `None` skips validation for that bank. Secondary
	/// entries whose global id is below 512 reference the primary sheet and move
	/// to the primary bank; this is reported as [`Anomaly::Routing`]. Anything
	/// still out of range is dropped and reported as [`Anomaly::InvalidTile`]
	/// with bank-local ids. Running it twice changes nothing the second time.
	pub fn reconcile(&mut self, primary_max: Option<u16>, secondary_max: Option<u16>, diagnostics: &mut Diagnostics) {
		let misrouted: Vec<u16> = self.secondary.range(..NUM_TILES_IN_PRIMARY).map(|(id, _)| *id).collect();
		if !misrouted.is_empty() {
			for id in &misrouted {
				if let Some(palettes) = self.secondary.remove(id) {
					self.primary.entry(*id).or_default().extend(palettes);
				}
			}
			diagnostics.record(Anomaly::Routing {
				ids: misrouted,
			});
		}
		if let Some(max) = secondary_max {
			Self::drop_invalid(&mut self.secondary, Bank::Secondary, max, diagnostics);
		}
		if let Some(max) = primary_max {
			Self::drop_invalid(&mut self.primary, Bank::Primary, max, diagnostics);
		}
	}

	fn drop_invalid(
		tiles: &mut BTreeMap<u16, BTreeSet<u8>>,
		bank: Bank,
		max: u16,
		diagnostics: &mut Diagnostics,
	) {
		let last = global_id(bank, max);
		if last == u16::MAX {
			return;
		}
		let invalid: Vec<u16> = tiles.range(last + 1..).map(|(id, _)| *id).collect();
		if invalid.is_empty() {
			return;
		}
		tiles.retain(|id, _| *id <= last);
		diagnostics.record(Anomaly::InvalidTile {
			bank,
			max,
			ids: invalid.into_iter().map(|id| id - global_id(bank, 0)).collect(),
		});
	}
}

fn global_id(bank: Bank, local_id: u16) -> u16 {
	match bank {
		Bank::Primary => local_id,
		Bank::Secondary => local_id.saturating_add(NUM_TILES_IN_PRIMARY),
	}
}
