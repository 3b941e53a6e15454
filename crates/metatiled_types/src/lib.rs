//! This crate provides the core types and conversion pipeline of the `metatiled` project.
//!
//! `metatiled` turns metatile-based map data (16x16 blocks of eight 8x8 tiles
//! drawn from a primary and a secondary tileset) into layered tilemaps with a
//! deduplicated image atlas and per-tile animation timelines.
//!
//! # Pipeline
//!
//! - [`record`]: bit-packed binary records (`map.bin`, `border.bin`,
//!   `metatiles.bin`, `metatile_attributes.bin`)
//! - [`metatile`]: metatile definitions, tilesets and layer composition
//! - [`route`]: cross-tileset tile routing and used-tile reconciliation
//! - [`graphics`]: palettes, indexed tile sheets and tile rendering
//! - [`anim`]: animation definitions, frame folders and frame extraction
//! - [`atlas`]: content-deduplicating GID allocation
//! - [`animate`]: animation compositing and timelines
//! - [`convert`]: per-map orchestration
//!
//! # Examples
//!
//! Using the prelude (recommended):
//!
//! ```no_run
//! use metatiled_types::prelude::*;
//!
//! let primary = TilesetResources::new("gTileset_General", std::fs::read("metatiles.bin")?);
//! let grid = std::fs::read("map.bin")?;
//! let animations = AnimationLibrary::new();
//! let map = MapConverter::default().convert(&MapInput {
//! 	name: "LittlerootTown",
//! 	width: 20,
//! 	height: 20,
//! 	grid: &grid,
//! 	border: None,
//! 	primary: &primary,
//! 	secondary: None,
//! 	animations: &animations,
//! })?;
//! println!("{} images", map.atlas.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Or use explicit paths:
//!
//! ```
//! use metatiled_types::route::{Bank, route};
//! use metatiled_types::metatile::TilesetRole;
//!
//! assert_eq!(route(600, TilesetRole::Secondary), (Bank::Secondary, 88));
//! ```

pub mod anim;
pub mod animate;
pub mod atlas;
pub mod constants;
pub mod convert;
pub mod error;
pub mod graphics;
pub mod metatile;
pub mod options;
pub mod record;
pub mod route;

/// `use metatiled_types::prelude::*;` to import commonly used items.
pub mod prelude;
