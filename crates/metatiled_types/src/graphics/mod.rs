//! Tile graphics: palettes, indexed sheets and metatile rendering.

pub mod bank;
pub mod indexed;
pub mod palette;
pub mod render;

pub use bank::{PaletteSet, TileBank, apply_flip};
pub use indexed::IndexedImage;
pub use palette::{Color, Palette};
pub use render::{MetatileRenderer, TilesetGraphics, blank_tile};
