//! Prelude module for `metatiled_internal`.
//!
//! This module provides a convenient way to import commonly used types and traits.
//!
//! # Examples
//!
//! ```rust
//! use metatiled_internal::prelude::*;
//!
//! let converter = MapConverter::new(ConvertOptions::default());
//! assert_eq!(converter.options().cycle_frames, 8);
//! assert_eq!(BgLayer::for_half(LayerType::Covered, Half::Top), BgLayer::Middle);
//! ```

// Re-export everything from metatiled_types::prelude
#[doc(inline)]
pub use metatiled_types::prelude::*;

// Re-export the entire metatiled_types module for advanced usage
#[doc(inline)]
pub use metatiled_types;
