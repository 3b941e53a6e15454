//! Animation compositing.
//!
//! After a map's metatile halves have their GIDs, every half occurrence whose
//! tiles fall inside a loaded animation's range gets a timeline of freshly
//! allocated frame images:
//!
//! - Metatile animations (16x16 frames) contribute their frames directly.
//!   Only the first metatile animation claiming a metatile is used.
//! - Tile animations are composited: for each step of the shared cycle, every
//!   animated tile of the half is replaced by its frame tile for that step.
//!   Bottom and top halves are handled independently.
//!
//! Timelines attach to the GID of the half that actually holds the animated
//! tiles. When several metatiles share a GID, the first timeline wins.

mod composite;
#[cfg(test)]
mod tests;

use std::collections::{BTreeSet, HashMap, HashSet};

use image::RgbaImage;
use serde::Serialize;

use crate::{
	anim::{AnimationLibrary, LoadedAnimation},
	atlas::{Atlas, Gid, GidRemap},
	constants::TILES_PER_HALF,
	metatile::{Half, MetatileDefinition, MetatileKey},
	options::ConvertOptions,
	route::{Bank, route},
};

pub use composite::{AnimatedTile, composite_step};

/// One frame of a timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimelineFrame {
	/// Image shown
	pub gid: Gid,
	/// Display time in milliseconds
	pub duration_ms: u32,
}

/// Frames played in place of one GID
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnimationTimeline {
	/// GID the animation is attached to
	pub gid: Gid,
	/// Frames in playback order
	pub frames: Vec<TimelineFrame>,
}

impl AnimationTimeline {
	/// GIDs of all frames
	pub fn frame_gids(&self) -> impl Iterator<Item = Gid> + '_ {
		self.frames.iter().map(|frame| frame.gid)
	}

	/// Total duration of one loop
	pub fn total_ms(&self) -> u64 {
		self.frames.iter().map(|frame| u64::from(frame.duration_ms)).sum()
	}

	/// Renumbers the timeline; `None` if its own GID was dropped
	pub fn remap(mut self, remap: &GidRemap) -> Option<Self> {
		self.gid = remap.get(self.gid);
		if self.gid.is_none() {
			return None;
		}
		for frame in &mut self.frames {
			frame.gid = remap.get(frame.gid);
		}
		self.frames.retain(|frame| !frame.gid.is_none());
		Some(self)
	}
}

/// A tile id as it was routed: bank plus the combined-space id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TileKey {
	/// Bank the id was routed to
	pub bank: Bank,
	/// Tile id as stored in the metatile (combined id space)
	pub tile_id: u16,
}

/// One place a tile id was drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TileOccurrence {
	/// GID of the rendered half containing the tile
	pub gid: Gid,
	/// Metatile the half belongs to
	pub key: MetatileKey,
	/// Position within the metatile (0-7)
	pub position: usize,
}

/// Where each tile id ended up: tile id to the GIDs of the halves drawing it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TileIndex {
	occurrences: HashMap<TileKey, Vec<TileOccurrence>>,
}

impl TileIndex {
	/// Creates an empty index
	pub fn new() -> Self {
		Self::default()
	}

	/// Records every tile of a rendered metatile
	pub fn record_metatile(&mut self, key: MetatileKey, definition: &MetatileDefinition, gids: [Gid; 2]) {
		for (position, tile) in definition.tiles().iter().enumerate() {
			let (bank, _) = route(tile.tile_id, key.role);
			let half = Half::of_position(position);
			self.occurrences
				.entry(TileKey {
					bank,
					tile_id: tile.tile_id,
				})
				.or_default()
				.push(TileOccurrence {
					gid: gids[half as usize],
					key,
					position,
				});
		}
	}

	/// Occurrences of a tile id
	pub fn get(&self, key: TileKey) -> &[TileOccurrence] {
		self.occurrences.get(&key).map(Vec::as_slice).unwrap_or(&[])
	}

	/// All entries, unordered
	pub fn iter(&self) -> impl Iterator<Item = (&TileKey, &[TileOccurrence])> {
		self.occurrences.iter().map(|(key, occurrences)| (key, occurrences.as_slice()))
	}

	/// Number of distinct tile ids
	pub fn len(&self) -> usize {
		self.occurrences.len()
	}

	/// Whether nothing was recorded
	pub fn is_empty(&self) -> bool {
		self.occurrences.is_empty()
	}

	/// Renumbers GIDs, dropping occurrences whose GID was pruned
	pub fn remap(&mut self, remap: &GidRemap) {
		for occurrences in self.occurrences.values_mut() {
			for occurrence in occurrences.iter_mut() {
				occurrence.gid = remap.get(occurrence.gid);
			}
			occurrences.retain(|occurrence| !occurrence.gid.is_none());
		}
		self.occurrences.retain(|_, occurrences| !occurrences.is_empty());
	}
}

/// A metatile rendered for a map: its references, half images and their GIDs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMetatile {
	/// Tile references
	pub definition: MetatileDefinition,
	/// Bottom and top images
	pub halves: [RgbaImage; 2],
	/// Bottom and top GIDs
	pub gids: [Gid; 2],
}

/// Rendered metatiles in first-use order
#[derive(Debug, Clone, Default)]
pub struct RenderedMetatiles {
	order: Vec<MetatileKey>,
	entries: HashMap<MetatileKey, RenderedMetatile>,
}

impl RenderedMetatiles {
	/// Creates an empty collection
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a metatile unless its key is already present
	pub fn insert(&mut self, key: MetatileKey, rendered: RenderedMetatile) {
		if !self.entries.contains_key(&key) {
			self.order.push(key);
			self.entries.insert(key, rendered);
		}
	}

	/// Rendered metatile of a key
	pub fn get(&self, key: &MetatileKey) -> Option<&RenderedMetatile> {
		self.entries.get(key)
	}

	/// Whether a key was rendered
	pub fn contains(&self, key: &MetatileKey) -> bool {
		self.entries.contains_key(key)
	}

	/// Entries in first-use order
	pub fn iter(&self) -> impl Iterator<Item = (&MetatileKey, &RenderedMetatile)> {
		self.order.iter().filter_map(|key| self.entries.get(key).map(|rendered| (key, rendered)))
	}

	/// Number of rendered metatiles
	pub fn len(&self) -> usize {
		self.order.len()
	}

	/// Whether nothing was rendered
	pub fn is_empty(&self) -> bool {
		self.order.is_empty()
	}

	/// Renumbers the stored GIDs
	pub fn remap(&mut self, remap: &GidRemap) {
		for rendered in self.entries.values_mut() {
			remap.apply(&mut rendered.gids);
		}
	}
}

/// An animation found on one tile position of a metatile
#[derive(Debug, Clone, Copy)]
struct Claim<'a> {
	animation: &'a LoadedAnimation,
	gid: Gid,
	position: usize,
}

/// Generates animation timelines for a map's metatiles
#[derive(Debug, Clone, Copy)]
pub struct AnimationEngine<'a> {
	library: &'a AnimationLibrary,
	cycle_frames: usize,
	frame_ms: u32,
}

impl<'a> AnimationEngine<'a> {
	/// Creates an engine using the cycle settings of `options`
	pub fn new(library: &'a AnimationLibrary, options: &ConvertOptions) -> Self {
		Self {
			library,
			cycle_frames: options.cycle_frames,
			frame_ms: options.cycle_frame_ms,
		}
	}

	/// Builds the timelines of all used GIDs, allocating frame images in `atlas`
	///
	/// `used` holds the GIDs placed on the map; occurrences under other GIDs are
	/// ignored. The result holds at most one timeline per GID, in discovery order.
	pub fn run(
		&self,
		atlas: &mut Atlas,
		metatiles: &RenderedMetatiles,
		index: &TileIndex,
		used: &BTreeSet<Gid>,
	) -> Vec<AnimationTimeline> {
		let claims = self.collect_claims(index, used);

		let mut timelines = Vec::new();
		for (key, claims) in &claims {
			let Some(rendered) = metatiles.get(key) else {
				continue;
			};
			if claims.iter().any(|claim| claim.animation.frames.is_metatile()) {
				self.metatile_timeline(atlas, claims, used, &mut timelines);
			} else {
				self.strip_timelines(atlas, rendered, claims, used, &mut timelines);
			}
		}

		let mut seen = HashSet::new();
		timelines.retain(|timeline: &AnimationTimeline| seen.insert(timeline.gid));
		log::debug!("{} animation timelines, atlas now {} images", timelines.len(), atlas.len());
		timelines
	}

	/// Groups animation claims by metatile, in first-claim order
	///
	/// An animation is claimed at most once per metatile position.
	fn collect_claims(&self, index: &TileIndex, used: &BTreeSet<Gid>) -> Vec<(MetatileKey, Vec<Claim<'a>>)> {
		let mut claims: Vec<(MetatileKey, Vec<Claim<'a>>)> = Vec::new();
		let mut slots: HashMap<MetatileKey, usize> = HashMap::new();

		for animation in self.library.iter() {
			let definition = &animation.definition;
			let base = definition.combined_base();
			for tile_id in base..base.saturating_add(definition.num_tiles) {
				let key = TileKey {
					bank: animation.role.into(),
					tile_id,
				};
				for occurrence in index.get(key) {
					if !used.contains(&occurrence.gid) {
						continue;
					}
					let slot = *slots.entry(occurrence.key).or_insert_with(|| {
						claims.push((occurrence.key, Vec::new()));
						claims.len() - 1
					});
					let list = &mut claims[slot].1;
					let duplicate = list.iter().any(|claim| {
						std::ptr::eq(claim.animation, animation) && claim.position == occurrence.position
					});
					if !duplicate {
						list.push(Claim {
							animation,
							gid: occurrence.gid,
							position: occurrence.position,
						});
					}
				}
			}
		}
		claims
	}

	/// Uses the frames of the first metatile animation as-is
	fn metatile_timeline(
		&self,
		atlas: &mut Atlas,
		claims: &[Claim<'a>],
		used: &BTreeSet<Gid>,
		timelines: &mut Vec<AnimationTimeline>,
	) {
		let Some(claim) = claims.iter().find(|claim| claim.animation.frames.is_metatile()) else {
			return;
		};
		let definition = &claim.animation.definition;
		let frame_gids: Vec<Gid> =
			claim.animation.frames.frames().iter().map(|frame| atlas.allocate(frame.clone())).collect();
		let frames: Vec<TimelineFrame> = definition
			.playback_order(frame_gids.len())
			.into_iter()
			.filter_map(|index| frame_gids.get(index))
			.map(|gid| TimelineFrame {
				gid: *gid,
				duration_ms: definition.duration_ms,
			})
			.collect();
		if !frames.is_empty() && used.contains(&claim.gid) {
			timelines.push(AnimationTimeline {
				gid: claim.gid,
				frames,
			});
		}
	}

	/// Composites tile animations half by half
	fn strip_timelines(
		&self,
		atlas: &mut Atlas,
		rendered: &RenderedMetatile,
		claims: &[Claim<'a>],
		used: &BTreeSet<Gid>,
		timelines: &mut Vec<AnimationTimeline>,
	) {
		for half in Half::ALL {
			let mut slots: [Option<AnimatedTile<'a>>; TILES_PER_HALF] = [None; TILES_PER_HALF];
			let mut gids: Vec<Gid> = Vec::new();
			for claim in claims.iter().filter(|claim| Half::of_position(claim.position) == half) {
				let tile = rendered.definition.tile(claim.position);
				if !claim.animation.definition.contains(tile.tile_id) {
					continue;
				}
				// A later claim on the same position replaces an earlier one
				slots[claim.position - half.first_position()] = Some(AnimatedTile {
					position: claim.position - half.first_position(),
					tile,
					animation: claim.animation,
				});
				if !gids.contains(&claim.gid) {
					gids.push(claim.gid);
				}
			}
			let animated: Vec<AnimatedTile<'a>> = slots.into_iter().flatten().collect();
			if animated.is_empty() {
				continue;
			}

			let base = &rendered.halves[half as usize];
			let frames: Vec<TimelineFrame> = (0..self.cycle_frames)
				.map(|step| TimelineFrame {
					gid: atlas.allocate(composite_step(base, &animated, step)),
					duration_ms: self.frame_ms,
				})
				.collect();
			if frames.is_empty() {
				continue;
			}
			for gid in gids.into_iter().filter(|gid| used.contains(gid)) {
				timelines.push(AnimationTimeline {
					gid,
					frames: frames.clone(),
				});
			}
		}
	}
}

/// Timeline of a single animated 8x8 tile for tile-grid output
///
/// Frames follow the animation's playback order over the whole frames it has;
/// the frame tiles are allocated in `atlas` unflipped.
pub fn tile_timeline(animation: &LoadedAnimation, tile_id: u16, gid: Gid, atlas: &mut Atlas) -> Option<AnimationTimeline> {
	let definition = &animation.definition;
	if !definition.contains(tile_id) || animation.frames.is_metatile() {
		return None;
	}
	let num_tiles = definition.num_tiles as usize;
	let offset = (tile_id - definition.combined_base()) as usize;
	let frames: Vec<TimelineFrame> = definition
		.playback_order(animation.frames.frames_per_cycle(num_tiles))
		.into_iter()
		.filter_map(|frame| animation.frames.tile(frame, offset, num_tiles))
		.map(|tile| TimelineFrame {
			gid: atlas.allocate(tile.clone()),
			duration_ms: definition.duration_ms,
		})
		.collect();
	(!frames.is_empty()).then_some(AnimationTimeline {
		gid,
		frames,
	})
}
