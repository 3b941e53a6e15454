//! Unit tests for animation compositing

use image::{Rgba, RgbaImage, imageops};

use super::*;
use crate::{
	anim::{AnimationDefinition, FrameKind, FrameSet},
	metatile::TilesetRole,
	record::{Flip, LayerType, TileRef},
};

const WATER: AnimationDefinition = AnimationDefinition::new("water", 432, 30).with_sequence(&[0, 1, 2, 3, 4, 5, 6, 7]);

fn solid(r: u8, g: u8) -> RgbaImage {
	RgbaImage::from_pixel(8, 8, Rgba([r, g, 0, 255]))
}

/// Tile `offset` of water frame `frame`
fn water_tile(frame: usize, offset: usize) -> RgbaImage {
	solid((frame * 30 + offset) as u8, 1)
}

fn water() -> LoadedAnimation {
	let frames = (0..8).flat_map(|frame| (0..30).map(move |offset| water_tile(frame, offset))).collect();
	LoadedAnimation {
		role: TilesetRole::Primary,
		definition: WATER,
		frames: FrameSet::new(FrameKind::Tiles, frames),
	}
}

fn half(tiles: [&RgbaImage; 4]) -> RgbaImage {
	let mut image = RgbaImage::new(16, 16);
	for (position, tile) in tiles.iter().enumerate() {
		let (x, y) = crate::metatile::quadrant_offset(position);
		imageops::replace(&mut image, *tile, i64::from(x), i64::from(y));
	}
	image
}

fn key(metatile_id: u16) -> MetatileKey {
	MetatileKey {
		role: TilesetRole::Primary,
		metatile_id,
		layer_type: LayerType::Normal,
	}
}

/// Renders, allocates and indexes one metatile the way map conversion does
struct Fixture {
	atlas: Atlas,
	metatiles: RenderedMetatiles,
	index: TileIndex,
	used: BTreeSet<Gid>,
}

impl Fixture {
	fn new() -> Self {
		Self {
			atlas: Atlas::new(16),
			metatiles: RenderedMetatiles::new(),
			index: TileIndex::new(),
			used: BTreeSet::new(),
		}
	}

	fn add(&mut self, key: MetatileKey, definition: MetatileDefinition, halves: [RgbaImage; 2]) -> [Gid; 2] {
		let gids = [self.atlas.allocate(halves[0].clone()), self.atlas.allocate(halves[1].clone())];
		self.index.record_metatile(key, &definition, gids);
		self.used.extend(gids);
		self.metatiles.insert(key, RenderedMetatile {
			definition,
			halves,
			gids,
		});
		gids
	}

	fn run(&mut self, library: &AnimationLibrary) -> Vec<AnimationTimeline> {
		AnimationEngine::new(library, &ConvertOptions::default()).run(
			&mut self.atlas,
			&self.metatiles,
			&self.index,
			&self.used,
		)
	}
}

fn refs(ids: [u16; 4]) -> [TileRef; 4] {
	ids.map(TileRef::new)
}

#[test]
fn test_water_timeline() {
	let mut library = AnimationLibrary::new();
	library.push(water());

	let mut fixture = Fixture::new();
	let plain = [solid(250, 2), solid(251, 2), solid(252, 2), solid(253, 2)];
	let bottom = half([&water_tile(0, 0), &plain[0], &plain[1], &plain[2]]);
	let top = half([&plain[3]; 4]);
	let definition = MetatileDefinition::from_halves(refs([432, 1, 2, 3]), refs([4, 4, 4, 4]));
	let [bottom_gid, top_gid] = fixture.add(key(0), definition, [bottom.clone(), top]);

	let timelines = fixture.run(&library);
	assert_eq!(timelines.len(), 1);
	let timeline = &timelines[0];
	assert_eq!(timeline.gid, bottom_gid);
	assert_eq!(timeline.frames.len(), 8);
	assert!(timeline.frames.iter().all(|frame| frame.duration_ms == 200));
	assert_eq!(timeline.total_ms(), 1600);

	// Step 0 shows the unmodified base, so it dedups to the base GID
	assert_eq!(timeline.frames[0].gid, bottom_gid);
	assert_eq!(fixture.atlas.get(timeline.frames[0].gid), Some(&bottom));

	for (step, frame) in timeline.frames.iter().enumerate() {
		let image = fixture.atlas.get(frame.gid).unwrap();
		assert_eq!(image.get_pixel(0, 0).0[0], (step * 30) as u8);
		assert_eq!(image.get_pixel(8, 0).0[0], 250);
	}
	assert_ne!(timeline.gid, top_gid);
	// Two halves plus seven new frames
	assert_eq!(fixture.atlas.len(), 9);
}

#[test]
fn test_flips_apply_to_frame_tiles() {
	let mut library = AnimationLibrary::new();
	let frames: Vec<RgbaImage> = (0..8)
		.flat_map(|frame| {
			(0..30).map(move |_| {
				let mut tile = solid(frame as u8 + 1, 0);
				tile.put_pixel(0, 0, Rgba([99, 99, 99, 255]));
				tile
			})
		})
		.collect();
	library.push(LoadedAnimation {
		role: TilesetRole::Primary,
		definition: WATER,
		frames: FrameSet::new(FrameKind::Tiles, frames),
	});

	let mut fixture = Fixture::new();
	let mut bottom_refs = refs([0, 0, 0, 0]);
	bottom_refs[3] = TileRef::new(440).with_flip(Flip::Both);
	let definition = MetatileDefinition::from_halves(bottom_refs, refs([0; 4]));
	fixture.add(key(0), definition, [RgbaImage::new(16, 16), solid_half(5)]);

	let timelines = fixture.run(&library);
	let image = fixture.atlas.get(timelines[0].frames[2].gid).unwrap();
	assert_eq!(image.get_pixel(15, 15).0, [99, 99, 99, 255]);
	assert_eq!(image.get_pixel(8, 8).0, [3, 0, 0, 255]);
}

#[test]
fn test_halves_are_targeted_independently() {
	let mut library = AnimationLibrary::new();
	library.push(water());

	// Tile 432 and tile 9 render identically, so both metatiles share their half images
	let animated_look = water_tile(0, 0);
	let plain = solid(200, 3);
	let bottom = half([&animated_look, &plain, &plain, &plain]);
	let top = half([&plain, &animated_look, &plain, &plain]);

	let mut fixture = Fixture::new();
	let bottom_only = MetatileDefinition::from_halves(refs([432, 7, 7, 7]), refs([7, 9, 7, 7]));
	let top_only = MetatileDefinition::from_halves(refs([9, 7, 7, 7]), refs([7, 432, 7, 7]));
	let [a_bottom, a_top] = fixture.add(key(1), bottom_only, [bottom.clone(), top.clone()]);
	let [b_bottom, b_top] = fixture.add(key(2), top_only, [bottom, top]);
	assert_eq!((a_bottom, a_top), (b_bottom, b_top));

	let timelines = fixture.run(&library);
	assert_eq!(timelines.len(), 2);
	let bottom_timeline = timelines.iter().find(|t| t.gid == a_bottom).unwrap();
	let top_timeline = timelines.iter().find(|t| t.gid == a_top).unwrap();
	assert_ne!(bottom_timeline.frames, top_timeline.frames);

	// The bottom animation changes the top-left quadrant, the top one the top-right quadrant
	let bottom_step = fixture.atlas.get(bottom_timeline.frames[1].gid).unwrap();
	assert_eq!(bottom_step.get_pixel(0, 0).0[0], 30);
	assert_eq!(bottom_step.get_pixel(8, 0).0[0], 200);
	let top_step = fixture.atlas.get(top_timeline.frames[1].gid).unwrap();
	assert_eq!(top_step.get_pixel(0, 0).0[0], 200);
	assert_eq!(top_step.get_pixel(8, 0).0[0], 30);
}

#[test]
fn test_top_only_animation_has_no_bottom_timeline() {
	let mut library = AnimationLibrary::new();
	library.push(water());

	let mut fixture = Fixture::new();
	let definition = MetatileDefinition::from_halves(refs([1, 1, 1, 1]), refs([433, 1, 1, 1]));
	let [bottom_gid, top_gid] = fixture.add(key(0), definition, [solid_half(1), solid_half(2)]);

	let timelines = fixture.run(&library);
	assert_eq!(timelines.len(), 1);
	assert_eq!(timelines[0].gid, top_gid);
	assert!(timelines.iter().all(|t| t.gid != bottom_gid));
}

fn solid_half(value: u8) -> RgbaImage {
	RgbaImage::from_pixel(16, 16, Rgba([value, value, value, 255]))
}

#[test]
fn test_degenerate_frame_count_uses_first_frame() {
	let mut library = AnimationLibrary::new();
	let definition = AnimationDefinition::new("short", 100, 4);
	library.push(LoadedAnimation {
		role: TilesetRole::Primary,
		definition,
		frames: FrameSet::new(FrameKind::Tiles, vec![solid(10, 0), solid(11, 0), solid(12, 0)]),
	});

	let mut fixture = Fixture::new();
	let metatile = MetatileDefinition::from_halves(refs([100, 103, 102, 1]), refs([1; 4]));
	fixture.add(key(0), metatile, [solid_half(1), solid_half(2)]);

	let timelines = fixture.run(&library);
	assert_eq!(timelines.len(), 1);
	assert_eq!(timelines[0].frames.len(), 8);
	let first = timelines[0].frames[0].gid;
	assert!(timelines[0].frames.iter().all(|frame| frame.gid == first));

	let image = fixture.atlas.get(first).unwrap();
	assert_eq!(image.get_pixel(0, 0).0[0], 10);
	// Tile 103 would be the fourth tile of frame 0, which does not exist
	assert_eq!(image.get_pixel(8, 0).0[0], 1);
	assert_eq!(image.get_pixel(0, 8).0[0], 12);
}

#[test]
fn test_first_metatile_animation_wins() {
	let metatile_frames = |value: u8| FrameSet::new(FrameKind::Metatile, vec![solid_half(value), solid_half(value + 1)]);
	let mut library = AnimationLibrary::new();
	library.push(LoadedAnimation {
		role: TilesetRole::Primary,
		definition: AnimationDefinition::new("flower", 508, 4).with_sequence(&[0, 1, 0, 1]),
		frames: metatile_frames(50),
	});
	library.push(LoadedAnimation {
		role: TilesetRole::Primary,
		definition: AnimationDefinition::new("other", 500, 4),
		frames: metatile_frames(80),
	});

	let mut fixture = Fixture::new();
	let definition = MetatileDefinition::from_halves(refs([500, 508, 1, 1]), refs([1; 4]));
	let [bottom_gid, _] = fixture.add(key(0), definition, [solid_half(1), solid_half(2)]);

	let timelines = fixture.run(&library);
	assert_eq!(timelines.len(), 1);
	assert_eq!(timelines[0].gid, bottom_gid);
	let shown: Vec<u8> =
		timelines[0].frames.iter().map(|frame| fixture.atlas.get(frame.gid).unwrap().get_pixel(0, 0).0[0]).collect();
	assert_eq!(shown, [50, 51, 50, 51]);
	assert!(fixture.atlas.lookup(&solid_half(80)).is_none());
}

#[test]
fn test_shared_gid_keeps_first_timeline() {
	let mut library = AnimationLibrary::new();
	library.push(water());

	let same = solid_half(7);
	let mut fixture = Fixture::new();
	let first = MetatileDefinition::from_halves(refs([432, 1, 1, 1]), refs([1; 4]));
	let second = MetatileDefinition::from_halves(refs([1, 440, 1, 1]), refs([1; 4]));
	let [gid, _] = fixture.add(key(0), first, [same.clone(), solid_half(8)]);
	let [other, _] = fixture.add(key(1), second, [same, solid_half(8)]);
	assert_eq!(gid, other);

	let timelines = fixture.run(&library);
	assert_eq!(timelines.len(), 1);
	let step = fixture.atlas.get(timelines[0].frames[1].gid).unwrap();
	// Tile 432 of frame 1 at the top-left, as in the first metatile
	assert_eq!(step.get_pixel(0, 0).0[0], 30);
	assert_eq!(step.get_pixel(8, 0).0[0], 7);
}

#[test]
fn test_unused_gids_are_ignored() {
	let mut library = AnimationLibrary::new();
	library.push(water());

	let mut fixture = Fixture::new();
	let definition = MetatileDefinition::from_halves(refs([432, 1, 1, 1]), refs([1; 4]));
	fixture.add(key(0), definition, [solid_half(1), solid_half(2)]);
	fixture.used.clear();

	assert!(fixture.run(&library).is_empty());
	assert_eq!(fixture.atlas.len(), 2);
}

#[test]
fn test_tile_timeline() {
	let animation = water();
	let mut atlas = Atlas::new(8);
	let base = atlas.allocate(water_tile(0, 3));
	let timeline = tile_timeline(&animation, 435, base, &mut atlas).unwrap();
	assert_eq!(timeline.gid, base);
	assert_eq!(timeline.frames.len(), 8);
	assert_eq!(timeline.frames[0].gid, base);
	assert_eq!(atlas.get(timeline.frames[5].gid), Some(&water_tile(5, 3)));
	assert!(tile_timeline(&animation, 500, base, &mut atlas).is_none());
}

#[test]
fn test_timeline_remap() {
	let timeline = AnimationTimeline {
		gid: Gid(3),
		frames: vec![
			TimelineFrame {
				gid: Gid(3),
				duration_ms: 200,
			},
			TimelineFrame {
				gid: Gid(5),
				duration_ms: 200,
			},
		],
	};
	let mut atlas = Atlas::new(16);
	for value in 1..=5 {
		atlas.allocate(solid_half(value));
	}
	let remap = atlas.prune(&BTreeSet::from([Gid(3), Gid(5)]));
	let remapped = timeline.clone().remap(&remap).unwrap();
	assert_eq!(remapped.gid, Gid(1));
	assert_eq!(remapped.frame_gids().collect::<Vec<_>>(), [Gid(1), Gid(2)]);

	let remap = atlas.prune(&BTreeSet::from([Gid(2)]));
	assert!(remapped.remap(&remap).is_none());
}
