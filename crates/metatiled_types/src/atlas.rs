//! Image atlas with content-based global tile id (GID) allocation.

use std::{
	collections::{BTreeSet, HashMap},
	fmt,
};

use image::{RgbaImage, imageops};
use serde::Serialize;

/// Global tile id: 1-based index into an [`Atlas`]; 0 means "no tile"
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Gid(pub u32);

impl Gid {
	/// The empty cell
	pub const NONE: Gid = Gid(0);

	/// Whether this is the empty cell
	pub const fn is_none(self) -> bool {
		self.0 == 0
	}

	/// Zero-based atlas index, `None` for [`Gid::NONE`]
	pub const fn index(self) -> Option<usize> {
		match self.0 {
			0 => None,
			gid => Some(gid as usize - 1),
		}
	}

	/// GID of a zero-based atlas index
	pub const fn from_index(index: usize) -> Self {
		Gid(index as u32 + 1)
	}
}

impl fmt::Display for Gid {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

/// Deduplicating image atlas
///
/// Two images are the same tile iff their raw RGBA bytes are equal. Images are
/// kept in GID order.
#[derive(Debug, Clone, Default)]
pub struct Atlas {
	tile_size: u32,
	images: Vec<RgbaImage>,
	by_content: HashMap<Vec<u8>, Gid>,
}

impl Atlas {
	/// Creates an empty atlas of `tile_size` square cells
	pub fn new(tile_size: u32) -> Self {
		Self {
			tile_size,
			images: Vec::new(),
			by_content: HashMap::new(),
		}
	}

	/// Edge length of a cell in pixels
	pub fn tile_size(&self) -> u32 {
		self.tile_size
	}

	/// Returns the GID of an image, allocating the next one for novel content
	pub fn allocate(&mut self, image: RgbaImage) -> Gid {
		if let Some(gid) = self.by_content.get(image.as_raw()) {
			return *gid;
		}
		let gid = Gid::from_index(self.images.len());
		self.by_content.insert(image.as_raw().clone(), gid);
		self.images.push(image);
		gid
	}

	/// GID already holding this content, if any
	pub fn lookup(&self, image: &RgbaImage) -> Option<Gid> {
		self.by_content.get(image.as_raw()).copied()
	}

	/// Image of a GID
	pub fn get(&self, gid: Gid) -> Option<&RgbaImage> {
		self.images.get(gid.index()?)
	}

	/// GID the next novel image will receive
	pub fn next_gid(&self) -> Gid {
		Gid::from_index(self.images.len())
	}

	/// Number of images
	pub fn len(&self) -> usize {
		self.images.len()
	}

	/// Whether the atlas holds no image
	pub fn is_empty(&self) -> bool {
		self.images.is_empty()
	}

	/// Images with their GIDs, in GID order
	pub fn iter(&self) -> impl Iterator<Item = (Gid, &RgbaImage)> {
		self.images.iter().enumerate().map(|(index, image)| (Gid::from_index(index), image))
	}

	/// Packs the images in GID order into one sheet `columns` cells wide
	///
	/// GID `n` lands in cell `n - 1`. An empty atlas yields a single empty row.
	pub fn to_sheet(&self, columns: u32) -> RgbaImage {
		let columns = columns.max(1);
		let rows = (self.images.len() as u32).div_ceil(columns).max(1);
		let mut sheet = RgbaImage::new(columns * self.tile_size, rows * self.tile_size);
		for (index, image) in self.images.iter().enumerate() {
			let x = (index as u32 % columns) * self.tile_size;
			let y = (index as u32 / columns) * self.tile_size;
			imageops::replace(&mut sheet, image, i64::from(x), i64::from(y));
		}
		sheet
	}

	/// Drops every image whose GID is not retained and renumbers the rest densely
	///
	/// Relative order is kept. The returned remap must be applied to everything
	/// that stores GIDs of this atlas.
	pub fn prune(&mut self, retained: &BTreeSet<Gid>) -> GidRemap {
		let mut mapping = Vec::with_capacity(self.images.len());
		let mut kept = Vec::with_capacity(retained.len());
		for (index, image) in std::mem::take(&mut self.images).into_iter().enumerate() {
			if retained.contains(&Gid::from_index(index)) {
				kept.push(image);
				mapping.push(Gid::from_index(kept.len() - 1));
			} else {
				mapping.push(Gid::NONE);
			}
		}
		self.images = kept;
		self.by_content =
			self.images.iter().enumerate().map(|(index, image)| (image.as_raw().clone(), Gid::from_index(index))).collect();
		GidRemap {
			mapping,
		}
	}
}

/// Old-to-new GID mapping produced by [`Atlas::prune`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GidRemap {
	mapping: Vec<Gid>,
}

impl GidRemap {
	/// New GID of an old one; dropped and unknown GIDs map to [`Gid::NONE`]
	pub fn get(&self, old: Gid) -> Gid {
		old.index().and_then(|index| self.mapping.get(index).copied()).unwrap_or(Gid::NONE)
	}

	/// Rewrites GIDs in place
	pub fn apply(&self, gids: &mut [Gid]) {
		for gid in gids {
			*gid = self.get(*gid);
		}
	}

	/// Number of GIDs that survived
	pub fn retained(&self) -> usize {
		self.mapping.iter().filter(|gid| !gid.is_none()).count()
	}
}
