//! Loading animation frames from disk.
//!
//! Each animation keeps its frames as numbered images (`0.png`, `1.png`, ...)
//! in its own folder under the tileset's animation folder.

use std::{
	fs,
	path::{Path, PathBuf},
};

use image::RgbaImage;

use super::{AnimationDefinition, AnimationTable, FrameSet, extract_frames};
use crate::{
	error::{ConvertError, Diagnostics, Resource},
	graphics::IndexedImage,
	metatile::TilesetRole,
};

/// Lists the frame images of a folder in frame order
///
/// Only `*.png` files whose stem is an integer count as frames; they are
/// sorted by that integer, so `10.png` follows `9.png`.
pub fn scan_frame_folder<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>, ConvertError> {
	let mut frames = Vec::new();
	for entry in fs::read_dir(dir)? {
		let path = entry?.path();
		if !path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("png")) {
			continue;
		}
		let Some(number) = path.file_stem().and_then(|stem| stem.to_str()).and_then(|stem| stem.parse::<u32>().ok())
		else {
			continue;
		};
		frames.push((number, path));
	}
	frames.sort();
	Ok(frames.into_iter().map(|(_, path)| path).collect())
}

/// Decodes a frame image to RGBA
///
/// Palette-indexed images get index 0 fully transparent; anything else,
/// grayscale included, is converted as is.
pub fn decode_frame_image(data: &[u8]) -> Result<RgbaImage, ConvertError> {
	let color_type = png::Decoder::new(data).read_info()?.info().color_type;
	if color_type == png::ColorType::Indexed {
		return Ok(IndexedImage::decode_png(data, Resource::AnimationFrame)?.to_rgba());
	}
	Ok(image::load_from_memory(data)?.to_rgba8())
}

/// Reads and decodes a frame image file
pub fn load_frame_image<P: AsRef<Path>>(path: P) -> Result<RgbaImage, ConvertError> {
	let data = fs::read(path)?;
	decode_frame_image(&data)
}

/// An animation whose frames were found, with the tileset that owns it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedAnimation {
	/// Owning tileset
	pub role: TilesetRole,
	/// Static definition
	pub definition: AnimationDefinition,
	/// Extracted frames (never empty)
	pub frames: FrameSet,
}

/// Frames of every usable animation of a tileset pair, primary first, table order within a tileset
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnimationLibrary {
	animations: Vec<LoadedAnimation>,
}

impl AnimationLibrary {
	/// Creates an empty library
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds an already extracted animation
	pub fn push(&mut self, animation: LoadedAnimation) {
		self.animations.push(animation);
	}

	/// Adds an animation from decoded frame images; nothing is added if no frame could be extracted
	pub fn add_images(
		&mut self,
		role: TilesetRole,
		definition: AnimationDefinition,
		images: &[RgbaImage],
		diagnostics: &mut Diagnostics,
	) {
		let frames = extract_frames(&definition, images, diagnostics);
		if frames.is_empty() {
			diagnostics.missing(Resource::AnimationFrame, format!("{}: no usable frames", definition.name));
			return;
		}
		self.push(LoadedAnimation {
			role,
			definition,
			frames,
		});
	}

	/// Loads every animation a tileset defines from its animation folder
	///
	/// Missing folders and unreadable frames are recorded as
	/// [`crate::error::Anomaly::MissingResource`] and skipped.
	pub fn load_tileset(
		&mut self,
		table: &AnimationTable,
		tileset_name: &str,
		role: TilesetRole,
		anim_dir: &Path,
		diagnostics: &mut Diagnostics,
	) {
		for definition in table.get(tileset_name) {
			let folder = anim_dir.join(definition.folder);
			let paths = match scan_frame_folder(&folder) {
				Ok(paths) if !paths.is_empty() => paths,
				Ok(_) => {
					diagnostics.missing(Resource::AnimationFrame, format!("{}: no frames", folder.display()));
					continue;
				}
				Err(err) => {
					diagnostics.missing(Resource::AnimationFrame, format!("{}: {err}", folder.display()));
					continue;
				}
			};

			let mut images = Vec::with_capacity(paths.len());
			for path in &paths {
				match load_frame_image(path) {
					Ok(image) => images.push(image),
					Err(err) => diagnostics.missing(Resource::AnimationFrame, format!("{}: {err}", path.display())),
				}
			}
			log::debug!("{tileset_name}/{}: {} frame images", definition.name, images.len());
			self.add_images(role, *definition, &images, diagnostics);
		}
	}

	/// Loaded animations in lookup order
	pub fn iter(&self) -> impl Iterator<Item = &LoadedAnimation> {
		self.animations.iter()
	}

	/// Number of loaded animations
	pub fn len(&self) -> usize {
		self.animations.len()
	}

	/// Whether nothing was loaded
	pub fn is_empty(&self) -> bool {
		self.animations.is_empty()
	}
}
