//! Forces dynamic linking of `metatiled` to speed up incremental builds.
//!
//! Enable with the `dynamic_linking` feature of the root crate; never depend on this crate directly.

#![allow(unused_imports)]
#![allow(clippy::single_component_path_imports)]

use metatiled_internal;
