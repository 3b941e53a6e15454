//! Per-step compositing of animated tiles onto a base half.

use image::{RgbaImage, imageops};

use crate::{
	anim::LoadedAnimation,
	graphics::apply_flip,
	metatile::quadrant_offset,
	record::TileRef,
};

/// An animated tile at one position of a half
#[derive(Debug, Clone, Copy)]
pub struct AnimatedTile<'a> {
	/// Position within the half (0-3)
	pub position: usize,
	/// The metatile's reference at that position, for its tile id and flips
	pub tile: TileRef,
	/// Animation whose range holds the tile id
	pub animation: &'a LoadedAnimation,
}

impl AnimatedTile<'_> {
	/// Frame tile shown at a step, flipped like the reference; `None` if the frame set is too short
	pub fn frame_tile(&self, step: usize) -> Option<RgbaImage> {
		let definition = &self.animation.definition;
		let frames = &self.animation.frames;
		let num_tiles = definition.num_tiles as usize;
		let frame = definition.frame_at(step, frames.frames_per_cycle(num_tiles));
		let offset = self.tile.tile_id.checked_sub(definition.combined_base())? as usize;
		let mut tile = frames.tile(frame, offset, num_tiles)?.clone();
		apply_flip(&mut tile, self.tile.flip);
		Some(tile)
	}
}

/// Copy of `base` with every animated tile replaced by its frame for `step`
///
/// Frame tiles are alpha-blended over the base, so their transparent pixels
/// show the base half through.
pub fn composite_step(base: &RgbaImage, tiles: &[AnimatedTile<'_>], step: usize) -> RgbaImage {
	let mut image = base.clone();
	for animated in tiles {
		let Some(tile) = animated.frame_tile(step) else {
			continue;
		};
		let (x, y) = quadrant_offset(animated.position);
		imageops::overlay(&mut image, &tile, i64::from(x), i64::from(y));
	}
	image
}
