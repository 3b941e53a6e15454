//! Animation definitions of the stock tilesets.
//!
//! Tile ranges and playback orders follow the game's tileset animation tables.
//! Every animation runs at 200ms per frame and keeps its frames in a folder
//! named after it.

use super::AnimationDefinition as Anim;

const LINEAR_4: &[usize] = &[0, 1, 2, 3];
const LINEAR_8: &[usize] = &[0, 1, 2, 3, 4, 5, 6, 7];

const GENERAL: &[Anim] = &[
	Anim::new("flower", 508, 4).with_sequence(&[0, 1, 0, 2]),
	Anim::new("water", 432, 30).with_sequence(LINEAR_8),
	// Ends on frame 0 so the loop closes smoothly
	Anim::new("sand_water_edge", 464, 10).with_sequence(&[0, 1, 2, 3, 4, 5, 6, 0]),
	Anim::new("waterfall", 496, 6).with_sequence(LINEAR_4),
	Anim::new("land_water_edge", 480, 10).with_sequence(LINEAR_4),
];

const BUILDING: &[Anim] = &[Anim::new("tv_turned_on", 496, 4)];

const RUSTBORO: &[Anim] =
	&[Anim::new("windy_water", 128, 8).secondary(), Anim::new("fountain", 448, 4).secondary()];

const DEWFORD: &[Anim] = &[Anim::new("flag", 170, 6).secondary()];

const SLATEPORT: &[Anim] = &[Anim::new("balloons", 224, 4).secondary()];

const MAUVILLE: &[Anim] =
	&[Anim::new("flower_1", 96, 4).secondary(), Anim::new("flower_2", 128, 4).secondary()];

const LAVARIDGE: &[Anim] = &[
	Anim::new("steam", 288, 4).secondary().with_sequence(LINEAR_4),
	Anim::new("lava", 160, 4).secondary().with_sequence(LINEAR_4),
];

const EVER_GRANDE: &[Anim] = &[Anim::new("flowers", 224, 4).secondary()];

const PACIFIDLOG: &[Anim] = &[
	// Ping-pong
	Anim::new("log_bridges", 464, 30).secondary().with_sequence(&[0, 1, 2, 1]),
	Anim::new("water_currents", 496, 8).secondary().with_sequence(LINEAR_8),
];

const SOOTOPOLIS: &[Anim] = &[Anim::new("stormy_water", 240, 96).secondary()];

const UNDERWATER: &[Anim] = &[Anim::new("seaweed", 496, 4).secondary().with_sequence(LINEAR_4)];

const CAVE: &[Anim] = &[Anim::new("lava", 416, 4).secondary().with_sequence(LINEAR_4)];

const BATTLE_FRONTIER_OUTSIDE: &[Anim] = &[Anim::new("flag", 218, 6).secondary()];

const MAUVILLE_GYM: &[Anim] = &[Anim::new("electric_gates", 144, 16).secondary()];

const SOOTOPOLIS_GYM: &[Anim] = &[
	Anim::new("side_waterfall", 496, 12).secondary(),
	Anim::new("front_waterfall", 464, 20).secondary(),
];

const ELITE_FOUR: &[Anim] =
	&[Anim::new("floor_light", 480, 4).secondary(), Anim::new("wall_lights", 504, 1).secondary()];

const BIKE_SHOP: &[Anim] = &[Anim::new("blinking_lights", 496, 9).secondary()];

const BATTLE_PYRAMID: &[Anim] =
	&[Anim::new("torch", 151, 8).secondary(), Anim::new("statue_shadow", 135, 8).secondary()];

/// `(normalized tileset name, definitions)` for every stock tileset with animations
pub const BUILTIN_ANIMATIONS: &[(&str, &[Anim])] = &[
	("general", GENERAL),
	("building", BUILDING),
	("rustboro", RUSTBORO),
	("dewford", DEWFORD),
	("slateport", SLATEPORT),
	("mauville", MAUVILLE),
	("lavaridge", LAVARIDGE),
	("ever_grande", EVER_GRANDE),
	("pacifidlog", PACIFIDLOG),
	("sootopolis", SOOTOPOLIS),
	("underwater", UNDERWATER),
	("cave", CAVE),
	("battle_frontier_outside_west", BATTLE_FRONTIER_OUTSIDE),
	("battle_frontier_outside_east", BATTLE_FRONTIER_OUTSIDE),
	("mauville_gym", MAUVILLE_GYM),
	("sootopolis_gym", SOOTOPOLIS_GYM),
	("elite_four", ELITE_FOUR),
	("bike_shop", BIKE_SHOP),
	("battle_pyramid", BATTLE_PYRAMID),
];
