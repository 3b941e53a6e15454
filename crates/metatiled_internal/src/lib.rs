//! This module is separated into its own crate to enable simple dynamic linking for `metatiled`, and should not be used directly.

/// `use metatiled::prelude::*;` to import commonly used items.
pub mod prelude;

// Re-export metatiled_types for convenience
pub use metatiled_types;

// Re-export the conversion entry points at crate root
pub use metatiled_types::convert::{ConvertedMap, MapConverter, MapInput, TileGridMap, TilesetResources};
pub use metatiled_types::error::{ConvertError, Diagnostics};
pub use metatiled_types::options::ConvertOptions;
