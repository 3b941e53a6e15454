//! Splitting animation frame images into frames.

use image::{RgbaImage, imageops};

use super::AnimationDefinition;
use crate::{
	constants::{METATILE_SIZE, TILE_SIZE},
	error::{Anomaly, Diagnostics},
	graphics::blank_tile,
};

/// What an animation's frames are
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
	/// Complete 16x16 metatile images
	Metatile,
	/// 8x8 tiles, `num_tiles` per frame, frames concatenated
	Tiles,
}

/// How the tiles of one frame image are arranged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileLayout {
	/// One tile wide, stacked top to bottom
	Column,
	/// One tile high, left to right
	Row,
	/// Rows of tiles, left to right then top to bottom
	Grid,
	/// None of the above; as many tiles as fit, padded
	Partial,
}

impl TileLayout {
	/// Layout of a `width x height` image holding `num_tiles` tiles
	pub fn detect(width: u32, height: u32, num_tiles: usize) -> Self {
		let columns = (width / TILE_SIZE) as usize;
		let rows = (height / TILE_SIZE) as usize;
		if columns == 1 && rows >= num_tiles {
			TileLayout::Column
		} else if rows == 1 && columns >= num_tiles {
			TileLayout::Row
		} else if columns * rows >= num_tiles {
			TileLayout::Grid
		} else {
			TileLayout::Partial
		}
	}
}

/// Extracted frames of one animation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameSet {
	kind: FrameKind,
	frames: Vec<RgbaImage>,
}

impl FrameSet {
	/// Creates a frame set
	pub fn new(kind: FrameKind, frames: Vec<RgbaImage>) -> Self {
		Self {
			kind,
			frames,
		}
	}

	/// Kind of frames
	pub fn kind(&self) -> FrameKind {
		self.kind
	}

	/// Whether the frames are whole metatiles
	pub fn is_metatile(&self) -> bool {
		self.kind == FrameKind::Metatile
	}

	/// Frame images; for tile animations, `num_tiles` consecutive tiles per frame
	pub fn frames(&self) -> &[RgbaImage] {
		&self.frames
	}

	/// Number of images
	pub fn len(&self) -> usize {
		self.frames.len()
	}

	/// Whether nothing was extracted
	pub fn is_empty(&self) -> bool {
		self.frames.is_empty()
	}

	/// Whole frames available for a tile animation of `num_tiles` tiles
	pub fn frames_per_cycle(&self, num_tiles: usize) -> usize {
		if num_tiles == 0 { 0 } else { self.frames.len() / num_tiles }
	}

	/// Tile `offset` of frame `frame`, if that many tiles were extracted
	pub fn tile(&self, frame: usize, offset: usize, num_tiles: usize) -> Option<&RgbaImage> {
		self.frames.get(frame.checked_mul(num_tiles)?.checked_add(offset)?)
	}
}

/// Splits frame images into the frames of an animation
///
/// A 16x16 image is a whole metatile frame, and any such image makes the
/// animation a metatile animation; other images in it are skipped as
/// [`Anomaly::FrameLayout`]. Otherwise each image is cut into
/// `num_tiles` 8x8 tiles following [`TileLayout::detect`]. Images that fit no
/// layout contribute the tiles they have, padded with transparent tiles, and
/// are reported as [`Anomaly::FrameLayout`].
pub fn extract_frames(
	definition: &AnimationDefinition,
	images: &[RgbaImage],
	diagnostics: &mut Diagnostics,
) -> FrameSet {
	let num_tiles = definition.num_tiles as usize;
	let is_metatile_frame = |image: &RgbaImage| image.dimensions() == (METATILE_SIZE, METATILE_SIZE);

	if images.iter().any(is_metatile_frame) {
		let mut frames = Vec::with_capacity(images.len());
		for (index, image) in images.iter().enumerate() {
			if is_metatile_frame(image) {
				frames.push(image.clone());
			} else {
				diagnostics.record(Anomaly::FrameLayout {
					animation: definition.name.to_string(),
					frame: index,
					width: image.width(),
					height: image.height(),
					num_tiles,
					padded: 0,
				});
			}
		}
		return FrameSet::new(FrameKind::Metatile, frames);
	}

	let mut frames = Vec::with_capacity(images.len() * num_tiles);
	for (index, image) in images.iter().enumerate() {
		let layout = TileLayout::detect(image.width(), image.height(), num_tiles);
		let tiles = cut_tiles(image, num_tiles);
		let padded = num_tiles - tiles.len();
		if layout == TileLayout::Partial {
			diagnostics.record(Anomaly::FrameLayout {
				animation: definition.name.to_string(),
				frame: index,
				width: image.width(),
				height: image.height(),
				num_tiles,
				padded,
			});
		} else {
			log::trace!("{} frame {index}: {layout:?}", definition.name);
		}
		frames.extend(tiles);
		frames.extend(std::iter::repeat_with(blank_tile).take(padded));
	}
	FrameSet::new(FrameKind::Tiles, frames)
}

/// Up to `count` tiles in row-major order, using the image's own tile columns
fn cut_tiles(image: &RgbaImage, count: usize) -> Vec<RgbaImage> {
	let columns = image.width() / TILE_SIZE;
	let rows = image.height() / TILE_SIZE;
	let available = (columns * rows) as usize;
	(0..count.min(available))
		.map(|index| {
			let x = (index as u32 % columns) * TILE_SIZE;
			let y = (index as u32 / columns) * TILE_SIZE;
			imageops::crop_imm(image, x, y, TILE_SIZE, TILE_SIZE).to_image()
		})
		.collect()
}
