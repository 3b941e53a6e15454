//! End-to-end conversion tests for `metatiled`

mod fixtures;

use image::Rgba;
use metatiled::prelude::*;
use metatiled::metatiled_types::graphics::MetatileRenderer;

use crate::fixtures::{Scratch, encode, graphics, tile_color, tileset, uniform};

#[test_log::test]
fn test_secondary_tile_ids_draw_from_the_secondary_sheet() {
	let primary = graphics(64, 1);
	let secondary = graphics(112, 3);
	let renderer = MetatileRenderer::new(Some(&primary), Some(&secondary), 6);

	let drawn = renderer.render_tile(TileRef::new(600), TilesetRole::Secondary).unwrap();
	let local = secondary.bank.render_tile(88, Flip::None, &Palette::grayscale()).unwrap();
	assert_eq!(drawn, local);

	// Below 512 a secondary metatile still draws from the primary sheet
	let shared = renderer.render_tile(TileRef::new(5), TilesetRole::Secondary).unwrap();
	assert_eq!(shared, primary.bank.render_tile(5, Flip::None, &Palette::grayscale()).unwrap());
}

#[test_log::test]
fn test_convert_map_with_animation_frames_from_disk() {
	let scratch = Scratch::new("meadow");
	let flower = AnimationDefinition::new("flower", 1, 4);
	// Two frames of four tiles stacked in a column
	for frame in 0..2u8 {
		let mut image = image::RgbaImage::new(8, 32);
		for (_, y, pixel) in image.enumerate_pixels_mut() {
			*pixel = Rgba([200, frame * 100, (y / 8) as u8 * 40, 255]);
		}
		scratch.write_png(&format!("anim/flower/{frame}.png"), &image);
	}
	let mut table = AnimationTable::new();
	table.insert("gTileset_Meadow", vec![flower]);

	let mut diagnostics = Diagnostics::new();
	let mut animations = AnimationLibrary::new();
	animations.load_tileset(&table, "gTileset_Meadow", TilesetRole::Primary, &scratch.path("anim"), &mut diagnostics);
	assert!(diagnostics.is_empty());
	assert_eq!(animations.len(), 1);

	let mut animated = uniform(6, 7);
	for (position, tile) in animated.iter_mut().take(4).enumerate() {
		*tile = TileRef::new(1 + position as u16);
	}
	let primary = tileset("gTileset_Meadow", &[uniform(6, 7), animated], &[LayerType::Normal, LayerType::Split]);
	let grid = encode(&[0, 1, 1, 0]);
	let border = encode(&[0, 0, 0, 0]);
	let map = MapConverter::default()
		.convert(&MapInput {
			name: "Meadow",
			width: 2,
			height: 2,
			grid: &grid,
			border: Some(&border),
			primary: &primary,
			secondary: None,
			animations: &animations,
		})
		.unwrap();
	assert!(map.diagnostics.is_empty());

	// Split: animated bottom on Back, top on Front
	let animated_gid = map.gid_at(1, 0, BgLayer::Back).unwrap();
	assert_eq!(map.gid_at(0, 1, BgLayer::Back), Some(animated_gid));
	let timeline = map.timeline(animated_gid).unwrap();
	assert_eq!(timeline.frames.len(), 8);
	assert!(timeline.frames.iter().all(|frame| frame.duration_ms == 200));
	assert_eq!(timeline.frames[0].gid, timeline.frames[2].gid);
	assert_ne!(timeline.frames[0].gid, timeline.frames[1].gid);

	// Frame 1 shows the second frame's tile 2 in the bottom-left quadrant
	let frame = map.atlas.get(timeline.frames[1].gid).unwrap();
	assert_eq!(frame.get_pixel(0, 8), &Rgba([200, 100, 80, 255]));

	// Only the animated half has a timeline
	assert_eq!(map.timelines.len(), 1);
	assert!(map.timeline(map.gid_at(0, 0, BgLayer::Middle).unwrap()).is_none());

	// GIDs are dense after pruning
	let len = map.atlas.len() as u32;
	for layer in &map.layers {
		assert!(layer.gids.iter().all(|gid| gid.0 <= len));
	}
	assert!(timeline.frame_gids().all(|gid| (1..=len).contains(&gid.0)));
	assert_eq!(map.border.as_ref().unwrap().cells[0].gids[0], map.gid_at(0, 0, BgLayer::Middle).unwrap());
}

#[test]
fn test_serialized_output() {
	let primary = tileset("gTileset_General", &[uniform(1, 2)], &[LayerType::Normal]);
	let grid = encode(&[0, 0]);
	let animations = AnimationLibrary::new();
	let map = MapConverter::default()
		.convert(&MapInput {
			name: "Route",
			width: 2,
			height: 1,
			grid: &grid,
			border: None,
			primary: &primary,
			secondary: None,
			animations: &animations,
		})
		.unwrap();

	let layers = serde_json::to_value(&map.layers).unwrap();
	assert_eq!(layers[0]["name"], "Bg3");
	assert_eq!(layers[0]["gids"], serde_json::json!([0, 0]));
	assert_eq!(layers[1]["gids"], serde_json::json!([1, 1]));
	assert_eq!(layers[2]["gids"], serde_json::json!([2, 2]));

	let timeline = AnimationTimeline {
		gid: Gid(1),
		frames: vec![TimelineFrame {
			gid: Gid(3),
			duration_ms: 200,
		}],
	};
	assert_eq!(
		serde_json::to_value(&timeline).unwrap(),
		serde_json::json!({ "gid": 1, "frames": [{ "gid": 3, "duration_ms": 200 }] })
	);
}

#[test]
fn test_atlas_sheet_keeps_gid_order() {
	let primary = tileset("gTileset_General", &[uniform(1, 2), uniform(3, 0)], &[LayerType::Normal, LayerType::Normal]);
	let grid = encode(&[0, 1]);
	let animations = AnimationLibrary::new();
	let map = MapConverter::default()
		.convert(&MapInput {
			name: "Route",
			width: 2,
			height: 1,
			grid: &grid,
			border: None,
			primary: &primary,
			secondary: None,
			animations: &animations,
		})
		.unwrap();

	assert_eq!(map.atlas.len(), 4);
	let sheet = map.atlas.to_sheet(3);
	assert_eq!(sheet.dimensions(), (48, 32));
	assert_eq!(sheet.get_pixel(0, 0), &tile_color(1, 1));
	assert_eq!(sheet.get_pixel(16, 0), &tile_color(1, 2));
	assert_eq!(sheet.get_pixel(32, 0), &tile_color(1, 3));
	assert_eq!(sheet.get_pixel(0, 16), &tile_color(1, 0));
}

#[test_log::test]
fn test_tile_grid_routes_secondary_tiles() {
	let primary = tileset("gTileset_General", &[uniform(1, 2)], &[LayerType::Normal]);
	let mut mixed = uniform(600, 0);
	mixed[1] = TileRef::new(3).with_flip(Flip::Vertical);
	let mut secondary = tileset("gTileset_Petalburg", &[mixed], &[LayerType::Covered]);
	secondary.graphics = Some(graphics(112, 3));
	let grid = encode(&[512, 0]);
	let animations = AnimationLibrary::new();
	let map = MapConverter::default()
		.convert_tile_grid(&MapInput {
			name: "Petalburg",
			width: 2,
			height: 1,
			grid: &grid,
			border: None,
			primary: &primary,
			secondary: Some(&secondary),
			animations: &animations,
		})
		.unwrap();
	assert!(map.diagnostics.is_empty());

	let back = map.layer(BgLayer::Back);
	let placed = back.get(0, 0).unwrap();
	assert_eq!((placed.bank, placed.local_id), (Bank::Secondary, 88));
	assert_eq!(placed.combined_id(), 600);
	let shared = back.get(1, 0).unwrap();
	assert_eq!((shared.bank, shared.local_id), (Bank::Primary, 3));
	assert_eq!(back.data[1] & 0x4000_0000, 0x4000_0000);

	// Covered top holds only tile 0 and draws nothing
	assert!(map.layer(BgLayer::Middle).data[..2].iter().all(|gid| *gid == 0));
	assert!(map.used_tiles.contains(Bank::Secondary, 88));
}

#[test]
fn test_builtin_animation_table() {
	let general = AnimationTable::builtin().get("gTileset_General");
	let names: Vec<&str> = general.iter().map(|definition| definition.name).collect();
	assert_eq!(names.first(), Some(&"flower"));
	assert!(names.contains(&"water"));
	assert!(AnimationTable::builtin().get("gTileset_DoesNotExist").is_empty());
}
