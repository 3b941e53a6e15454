//! Format constants shared across the conversion pipeline.

/// Number of metatiles a primary tileset may define; secondary ids start here
pub const NUM_METATILES_IN_PRIMARY: u16 = 512;

/// Number of 8x8 tiles addressable in the primary bank; secondary tile ids start here
pub const NUM_TILES_IN_PRIMARY: u16 = 512;

/// Largest value a 10-bit tile or metatile id can hold
pub const MAX_ID: u16 = 0x03FF;

/// Tile references per metatile (bottom 2x2 followed by top 2x2)
pub const TILES_PER_METATILE: usize = 8;

/// Tile references per metatile half
pub const TILES_PER_HALF: usize = 4;

/// Edge length of a tile in pixels
pub const TILE_SIZE: u32 = 8;

/// Edge length of a metatile in pixels
pub const METATILE_SIZE: u32 = 16;

/// Colors per palette
pub const PALETTE_COLORS: usize = 16;

/// Palettes per tileset
pub const PALETTES_PER_TILESET: usize = 16;

/// Palette slots owned by the primary tileset
pub const NUM_PALETTES_IN_PRIMARY: usize = 6;

/// Steps in one shared animation cycle
pub const ANIMATION_CYCLE_FRAMES: usize = 8;

/// Duration of one shared animation step in milliseconds
pub const ANIMATION_FRAME_MS: u32 = 200;

/// Entries read from a border table (top-left, top-right, bottom-left, bottom-right)
pub const BORDER_ENTRIES: usize = 4;
