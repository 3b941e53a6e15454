//! Border metatiles drawn around the outside of a map.

use serde::Serialize;

use super::MapBuilder;
use crate::{
	atlas::{Gid, GidRemap},
	error::{Diagnostics, Resource},
	metatile::{BgLayer, Half},
	record::decode_border,
};

/// Corner of the 2x2 border pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BorderCorner {
	/// Top-left
	TopLeft,
	/// Top-right
	TopRight,
	/// Bottom-left
	BottomLeft,
	/// Bottom-right
	BottomRight,
}

impl BorderCorner {
	/// Corners in table order
	pub const ALL: [BorderCorner; 4] = [
		BorderCorner::TopLeft,
		BorderCorner::TopRight,
		BorderCorner::BottomLeft,
		BorderCorner::BottomRight,
	];
}

/// One rendered border metatile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BorderCell {
	/// Corner it fills
	pub corner: BorderCorner,
	/// Combined-space metatile id
	pub metatile_id: u16,
	/// Layer each half lands on
	pub layers: [BgLayer; 2],
	/// Bottom and top half GIDs
	pub gids: [Gid; 2],
}

impl BorderCell {
	/// GID drawn on `layer`, [`Gid::NONE`] if neither half uses it
	pub fn gid_on(&self, layer: BgLayer) -> Gid {
		Half::ALL
			.into_iter()
			.find(|half| self.layers[*half as usize] == layer)
			.map_or(Gid::NONE, |half| self.gids[half as usize])
	}
}

/// The four corner metatiles of a map border
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Border {
	/// Cells in [`BorderCorner::ALL`] order
	pub cells: [BorderCell; 4],
}

impl Border {
	/// Decodes and renders a border table
	///
	/// An unusable table is recorded as a missing border and yields `None`.
	pub(crate) fn build(data: &[u8], builder: &mut MapBuilder<'_>, diagnostics: &mut Diagnostics) -> Option<Self> {
		let entries = match decode_border(data) {
			Ok(entries) => entries,
			Err(err) => {
				diagnostics.missing(Resource::Border, err.to_string());
				return None;
			}
		};
		let cells = std::array::from_fn(|i| {
			let metatile_id = entries[i].metatile_id;
			let (key, gids) = builder.place(metatile_id);
			BorderCell {
				corner: BorderCorner::ALL[i],
				metatile_id,
				layers: Half::ALL.map(|half| BgLayer::for_half(key.layer_type, half)),
				gids,
			}
		});
		Some(Self {
			cells,
		})
	}

	/// Cell of a corner
	pub fn cell(&self, corner: BorderCorner) -> &BorderCell {
		&self.cells[corner as usize]
	}

	pub(crate) fn remap(&mut self, remap: &GidRemap) {
		for cell in &mut self.cells {
			remap.apply(&mut cell.gids);
		}
	}
}
