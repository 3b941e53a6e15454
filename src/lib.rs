#![allow(clippy::single_component_path_imports)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! `metatiled` converts metatile-based map data into layered tilemaps.
//!
//! Each map cell references a 16x16 metatile built from eight 8x8 tiles. The
//! converter renders every distinct metatile half once, assigns it a global
//! tile id, places the halves on three background layers according to the
//! metatile's layer type, and composites tile animations into per-GID
//! timelines. See [`metatiled_types`] for the individual stages.
//!
pub use metatiled_internal::*;

#[cfg(all(feature = "dynamic_linking", not(target_family = "wasm")))]
#[allow(unused_imports)]
use metatiled_dylib;
