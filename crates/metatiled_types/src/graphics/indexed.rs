//! Palette-indexed images.
//!
//! Tile sheets and animation frames are 4bpp or 8bpp indexed PNGs. They are
//! decoded with the `png` crate's identity transformations so the palette
//! indices survive; index 0 becomes fully transparent on conversion to RGBA
//! whatever the file's own transparency chunk says.

use std::{fs::File, io::BufReader, io::Read, path::Path};

use image::{Rgba, RgbaImage};

use super::palette::{Color, Palette};
use crate::error::{ConvertError, Resource};

/// An image of palette indices with the palette it was saved with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedImage {
	width: u32,
	height: u32,
	indices: Vec<u8>,
	palette: Option<Vec<Color>>,
}

impl IndexedImage {
	/// Creates an image from row-major indices.
	pub fn new(width: u32, height: u32, indices: Vec<u8>, resource: Resource) -> Result<Self, ConvertError> {
		if indices.len() != width as usize * height as usize {
			return Err(ConvertError::PixelCountMismatch {
				resource,
				width,
				height,
				len: indices.len(),
			});
		}
		Ok(Self {
			width,
			height,
			indices,
			palette: None,
		})
	}

	/// Attaches an embedded palette.
	pub fn with_palette(mut self, colors: Vec<Color>) -> Self {
		self.palette = Some(colors);
		self
	}

	/// Opens and decodes an indexed PNG file.
	pub fn open<P: AsRef<Path>>(path: P, resource: Resource) -> Result<Self, ConvertError> {
		let file = File::open(path)?;
		Self::decode_png(BufReader::new(file), resource)
	}

	/// Decodes an indexed (or grayscale, read as indices) PNG stream.
	pub fn decode_png<R: Read>(reader: R, resource: Resource) -> Result<Self, ConvertError> {
		let mut decoder = png::Decoder::new(reader);
		decoder.set_transformations(png::Transformations::IDENTITY);
		let mut reader = decoder.read_info()?;
		let mut buf = vec![0; reader.output_buffer_size()];
		let frame = reader.next_frame(&mut buf)?;

		let indexed = matches!(frame.color_type, png::ColorType::Indexed | png::ColorType::Grayscale);
		if !indexed || frame.bit_depth == png::BitDepth::Sixteen {
			return Err(ConvertError::UnindexedImage {
				resource,
				color: format!("{:?} at {} bits", frame.color_type, frame.bit_depth as u8),
			});
		}
		let depth = frame.bit_depth as u8;

		let mut indices = Vec::with_capacity(frame.width as usize * frame.height as usize);
		for row in buf[..frame.buffer_size()].chunks(frame.line_size).take(frame.height as usize) {
			indices.extend(unpack_row(row, depth, frame.width as usize));
		}
		let mut image = Self::new(frame.width, frame.height, indices, resource)?;

		if let Some(plte) = reader.info().palette.as_ref() {
			let colors = plte.chunks_exact(3).map(|rgb| Color::rgb(rgb[0], rgb[1], rgb[2])).collect();
			image = image.with_palette(colors);
		}
		Ok(image)
	}

	/// Width in pixels
	pub fn width(&self) -> u32 {
		self.width
	}

	/// Height in pixels
	pub fn height(&self) -> u32 {
		self.height
	}

	/// Index at a pixel; out-of-bounds reads yield index 0
	#[inline]
	pub fn index(&self, x: u32, y: u32) -> u8 {
		if x >= self.width || y >= self.height {
			return 0;
		}
		self.indices[(y * self.width + x) as usize]
	}

	/// Row-major indices
	pub fn indices(&self) -> &[u8] {
		&self.indices
	}

	/// Embedded palette colors, if the file carried any
	pub fn embedded_palette(&self) -> Option<&[Color]> {
		self.palette.as_deref()
	}

	/// Converts through a 16-color palette, index 0 transparent.
	pub fn to_rgba_with(&self, palette: &Palette) -> RgbaImage {
		RgbaImage::from_fn(self.width, self.height, |x, y| palette.pixel(self.index(x, y)))
	}

	/// Converts through the embedded palette, index 0 transparent.
	///
	/// Indices the embedded palette does not cover (or every index, without
	/// one) are rendered as grays.
	pub fn to_rgba(&self) -> RgbaImage {
		RgbaImage::from_fn(self.width, self.height, |x, y| {
			let index = self.index(x, y);
			let color = self
				.palette
				.as_ref()
				.and_then(|colors| colors.get(index as usize).copied())
				.unwrap_or(Color::gray(index));
			if index == 0 { Rgba::from(color.cleared()) } else { Rgba::from(color) }
		})
	}
}

/// Expands one packed scanline to one index per pixel.
fn unpack_row(row: &[u8], depth: u8, width: usize) -> impl Iterator<Item = u8> + '_ {
	let depth = depth as usize;
	let mask = ((1u16 << depth) - 1) as u8;
	(0..width).map(move |x| {
		let bit = x * depth;
		let byte = row.get(bit / 8).copied().unwrap_or(0);
		let shift = 8 - depth - bit % 8;
		(byte >> shift) & mask
	})
}
