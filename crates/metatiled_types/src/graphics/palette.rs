//! Tileset palettes.
//!
//! Tilesets ship their palettes as JASC-PAL text files:
//!
//! ```text
//! JASC-PAL
//! 0100
//! 16
//! 255 0 255
//! ...
//! ```
//!
//! Color index 0 is the transparent color of every palette.

use std::{fmt, path::Path};

use image::Rgba;

use crate::{constants::PALETTE_COLORS, error::ConvertError};

/// RGBA color
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
	/// Red component
	pub r: u8,
	/// Green component
	pub g: u8,
	/// Blue component
	pub b: u8,
	/// Alpha component
	pub a: u8,
}

impl Color {
	/// Creates a new RGBA color.
	pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
		Self {
			r,
			g,
			b,
			a,
		}
	}

	/// Creates an opaque color.
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self::new(r, g, b, 255)
	}

	/// Creates an opaque gray.
	pub const fn gray(value: u8) -> Self {
		Self::rgb(value, value, value)
	}

	/// Transparent black.
	pub const fn transparent() -> Self {
		Self::new(0, 0, 0, 0)
	}

	/// Same color with alpha forced to zero
	pub const fn cleared(self) -> Self {
		Self::new(self.r, self.g, self.b, 0)
	}
}

impl From<Color> for Rgba<u8> {
	fn from(color: Color) -> Self {
		Rgba([color.r, color.g, color.b, color.a])
	}
}

impl fmt::Display for Color {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "RGBA({}, {}, {}, {})", self.r, self.g, self.b, self.a)
	}
}

/// 16-color palette
///
/// Colors beyond those defined by the source stay opaque black.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
	colors: [Color; PALETTE_COLORS],
}

impl Palette {
	/// Magic first line of a JASC palette
	pub const JASC_MAGIC: &'static str = "JASC-PAL";

	/// Version line of a JASC palette
	pub const JASC_VERSION: &'static str = "0100";

	/// Creates a palette with every color opaque black.
	pub fn new() -> Self {
		Self {
			colors: [Color::rgb(0, 0, 0); PALETTE_COLORS],
		}
	}

	/// Creates a palette from RGB triples; extra entries are ignored.
	pub fn from_rgb(colors: &[[u8; 3]]) -> Self {
		let mut palette = Self::new();
		for (slot, [r, g, b]) in palette.colors.iter_mut().zip(colors) {
			*slot = Color::rgb(*r, *g, *b);
		}
		palette
	}

	/// Creates a palette from colors; extra entries are ignored.
	pub fn from_colors(colors: &[Color]) -> Self {
		let mut palette = Self::new();
		for (slot, color) in palette.colors.iter_mut().zip(colors) {
			*slot = *color;
		}
		palette
	}

	/// Creates a palette from packed `r g b` bytes, as found in a PNG `PLTE` chunk.
	pub fn from_packed_rgb(data: &[u8]) -> Self {
		let mut palette = Self::new();
		for (slot, rgb) in palette.colors.iter_mut().zip(data.chunks_exact(3)) {
			*slot = Color::rgb(rgb[0], rgb[1], rgb[2]);
		}
		palette
	}

	/// Evenly spaced grays, used when no palette is available.
	pub fn grayscale() -> Self {
		let mut palette = Self::new();
		for (index, slot) in palette.colors.iter_mut().enumerate() {
			*slot = Color::gray((index * 17) as u8);
		}
		palette
	}

	/// Loads a JASC palette file.
	pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConvertError> {
		let text = std::fs::read_to_string(path)?;
		Self::parse_jasc(&text)
	}

	/// Parses JASC palette text.
	///
	/// # Errors
	///
	/// Fails on a wrong header, a color count that does not match the color
	/// lines, or a component outside 0-255. More than 16 colors are accepted
	/// and the surplus ignored.
	pub fn parse_jasc(text: &str) -> Result<Self, ConvertError> {
		let mut lines = text.lines().map(str::trim).enumerate().filter(|(_, line)| !line.is_empty());

		match lines.next() {
			Some((_, Self::JASC_MAGIC)) => {}
			Some((index, other)) => {
				return Err(ConvertError::palette(index + 1, format!("expected {}, found {other:?}", Self::JASC_MAGIC)));
			}
			None => return Err(ConvertError::palette(1, "empty palette")),
		}
		match lines.next() {
			Some((_, Self::JASC_VERSION)) => {}
			Some((index, other)) => {
				return Err(ConvertError::palette(
					index + 1,
					format!("unsupported version {other:?}"),
				));
			}
			None => return Err(ConvertError::palette(2, "missing version")),
		}
		let (count_line, count) = match lines.next() {
			Some((index, line)) => (
				index + 1,
				line.parse::<usize>().map_err(|_| ConvertError::palette(index + 1, format!("bad color count {line:?}")))?,
			),
			None => return Err(ConvertError::palette(3, "missing color count")),
		};

		let mut colors = Vec::with_capacity(count);
		for (index, line) in lines {
			let components: Vec<&str> = line.split_whitespace().collect();
			let [r, g, b] = components.as_slice() else {
				return Err(ConvertError::palette(index + 1, format!("expected three components, found {line:?}")));
			};
			let parse = |value: &str| {
				value.parse::<u8>().map_err(|_| ConvertError::palette(index + 1, format!("bad component {value:?}")))
			};
			colors.push([parse(r)?, parse(g)?, parse(b)?]);
		}
		if colors.len() != count {
			return Err(ConvertError::palette(
				count_line,
				format!("header declares {count} colors, found {}", colors.len()),
			));
		}

		Ok(Self::from_rgb(&colors))
	}

	/// Color at an index, as stored
	#[inline]
	pub fn get(&self, index: u8) -> Color {
		self.colors[index as usize % PALETTE_COLORS]
	}

	/// Color an index renders as: index 0 is always fully transparent
	#[inline]
	pub fn pixel(&self, index: u8) -> Rgba<u8> {
		if index == 0 { self.get(0).cleared().into() } else { self.get(index).into() }
	}

	/// Returns a reference to the color array.
	pub fn colors(&self) -> &[Color; PALETTE_COLORS] {
		&self.colors
	}
}

impl Default for Palette {
	fn default() -> Self {
		Self::new()
	}
}
