//! Error and anomaly types for metatile map conversion.
//!
//! Two tiers exist:
//! - [`ConvertError`] is fatal for the map being converted (malformed required resources).
//! - [`Anomaly`] is recoverable. Anomalies are collected in [`Diagnostics`] and logged
//!   at warning level the moment they are recorded; conversion carries on with a fallback.

use std::fmt;

use thiserror::Error;

use crate::route::Bank;

/// Binary or image resource consumed during a conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
	/// `map.bin` grid of metatile references
	MapGrid,
	/// `border.bin` table of border metatiles
	Border,
	/// `metatiles.bin` tile reference table
	Metatiles,
	/// `metatile_attributes.bin` layer type table
	MetatileAttributes,
	/// Indexed tile sheet (`tiles.png`)
	TileSheet,
	/// JASC palette file
	Palette,
	/// Animation frame image
	AnimationFrame,
	/// Secondary tileset as a whole
	SecondaryTileset,
}

impl fmt::Display for Resource {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			Resource::MapGrid => "map grid",
			Resource::Border => "border table",
			Resource::Metatiles => "metatile table",
			Resource::MetatileAttributes => "metatile attribute table",
			Resource::TileSheet => "tile sheet",
			Resource::Palette => "palette",
			Resource::AnimationFrame => "animation frame",
			Resource::SecondaryTileset => "secondary tileset",
		};
		f.write_str(name)
	}
}

/// Fatal conversion errors
#[derive(Debug, Error)]
pub enum ConvertError {
	/// Buffer length is not a multiple of the record width
	#[error("{resource}: {len} bytes is not a multiple of the {record_size}-byte record size")]
	TruncatedRecord {
		/// Resource being decoded
		resource: Resource,
		/// Buffer length in bytes
		len: usize,
		/// Record width in bytes
		record_size: usize,
	},

	/// Number of decoded records does not match the externally supplied size
	#[error("{resource}: expected {expected} records, found {actual}")]
	RecordCountMismatch {
		/// Resource being decoded
		resource: Resource,
		/// Expected record count (`width * height` for grids)
		expected: usize,
		/// Actual decoded record count
		actual: usize,
	},

	/// Map dimensions out of the accepted range
	#[error("Invalid map dimensions {width}x{height} (each side must be within 1..={max})")]
	InvalidDimensions {
		/// Width in metatiles
		width: usize,
		/// Height in metatiles
		height: usize,
		/// Largest accepted side
		max: usize,
	},

	/// A resource required for conversion is absent or empty
	#[error("Required {0} is missing or empty")]
	MissingResource(Resource),

	/// Malformed palette text
	#[error("Palette line {line}: {reason}")]
	Palette {
		/// 1-based line number
		line: usize,
		/// What was wrong with it
		reason: String,
	},

	/// Image cannot be read as palette indices
	#[error("{resource} must be a palette-indexed or grayscale PNG of at most 8 bits, found {color}")]
	UnindexedImage {
		/// Resource being decoded
		resource: Resource,
		/// Color type and bit depth that were found
		color: String,
	},

	/// Pixel buffer length does not match the image dimensions
	#[error("{resource}: {len} pixels do not fill a {width}x{height} image")]
	PixelCountMismatch {
		/// Resource being built
		resource: Resource,
		/// Image width in pixels
		width: u32,
		/// Image height in pixels
		height: u32,
		/// Supplied pixel count
		len: usize,
	},

	/// Record layout is not representable
	#[error("Invalid record layout: {0}")]
	InvalidLayout(String),

	/// PNG decoding failure
	#[error(transparent)]
	Png(#[from] png::DecodingError),

	/// Image decoding or encoding failure
	#[error(transparent)]
	Image(#[from] image::ImageError),

	/// IO error
	#[error(transparent)]
	Io(#[from] std::io::Error),
}

impl ConvertError {
	/// Creates a truncated-record error
	pub fn truncated(resource: Resource, len: usize, record_size: usize) -> Self {
		Self::TruncatedRecord {
			resource,
			len,
			record_size,
		}
	}

	/// Creates a record count mismatch error
	pub fn count_mismatch(resource: Resource, expected: usize, actual: usize) -> Self {
		Self::RecordCountMismatch {
			resource,
			expected,
			actual,
		}
	}

	/// Creates a palette syntax error
	pub fn palette(line: usize, reason: impl Into<String>) -> Self {
		Self::Palette {
			line,
			reason: reason.into(),
		}
	}

	/// Returns `true` for the format errors that make a binary resource unusable
	pub fn is_format_error(&self) -> bool {
		matches!(self, Self::TruncatedRecord { .. } | Self::RecordCountMismatch { .. })
	}
}

/// Recoverable problems encountered during conversion
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Anomaly {
	/// Tile ids below the primary bank size were queued for the secondary bank
	/// and have been moved back to the primary bank
	#[error("moved {} misrouted tile ids from the secondary to the primary bank: {:?}", ids.len(), ids)]
	Routing {
		/// Repaired tile ids
		ids: Vec<u16>,
	},

	/// Tile ids beyond what a bank's sheet holds were dropped
	#[error("dropped {} tile ids outside the {bank} bank (max {max}): {:?}", ids.len(), ids)]
	InvalidTile {
		/// Bank the ids were routed to
		bank: Bank,
		/// Highest valid bank-local id
		max: u16,
		/// Dropped bank-local ids
		ids: Vec<u16>,
	},

	/// An animation frame did not match any known tile layout
	#[error(
		"frame {frame} of {animation} ({width}x{height}) does not fit {num_tiles} tiles, padded {padded}"
	)]
	FrameLayout {
		/// Animation name
		animation: String,
		/// Frame index within the animation folder
		frame: usize,
		/// Frame width in pixels
		width: u32,
		/// Frame height in pixels
		height: u32,
		/// Tiles the definition expects per frame
		num_tiles: usize,
		/// Transparent tiles appended to fill the frame
		padded: usize,
	},

	/// An optional resource is absent or unreadable; the dependent feature is skipped
	#[error("{resource} unavailable ({detail}), feature skipped")]
	MissingResource {
		/// Resource that could not be used
		resource: Resource,
		/// Free-form detail (path, decoder message)
		detail: String,
	},
}

/// Per-map collection of recoverable anomalies
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
	anomalies: Vec<Anomaly>,
}

impl Diagnostics {
	/// Creates an empty collection
	pub fn new() -> Self {
		Self::default()
	}

	/// Records an anomaly and logs it as a warning
	pub fn record(&mut self, anomaly: Anomaly) {
		log::warn!("{anomaly}");
		self.anomalies.push(anomaly);
	}

	/// Records a missing optional resource
	pub fn missing(&mut self, resource: Resource, detail: impl Into<String>) {
		self.record(Anomaly::MissingResource {
			resource,
			detail: detail.into(),
		});
	}

	/// Moves all anomalies of `other` into this collection without logging them again
	pub fn absorb(&mut self, other: Diagnostics) {
		self.anomalies.extend(other.anomalies);
	}

	/// Returns the recorded anomalies in the order they occurred
	pub fn anomalies(&self) -> &[Anomaly] {
		&self.anomalies
	}

	/// Returns `true` if nothing was recorded
	pub fn is_empty(&self) -> bool {
		self.anomalies.is_empty()
	}

	/// Number of recorded anomalies
	pub fn len(&self) -> usize {
		self.anomalies.len()
	}
}
