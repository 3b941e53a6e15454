//! Map conversion front end.
//!
//! Converts one map from explicit file paths and writes:
//! - `<name>.png`: the packed atlas
//! - `<name>.json`: layers, border, timelines and anomalies
//!
//! Options are read from an optional TOML file, then `METATILED_*` environment
//! variables, then command-line overrides.

use std::{
	fs,
	path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use metatiled::prelude::*;
use serde_json::json;

#[derive(Parser)]
#[command(name = "convert")]
#[command(author = "metatiled project")]
#[command(version)]
#[command(about = "Convert a metatile map into layered tilemap data", long_about = None)]
struct Cli {
	/// Map grid (`map.bin`)
	#[arg(long, value_name = "FILE")]
	grid: PathBuf,

	/// Map width in metatiles
	#[arg(long)]
	width: usize,

	/// Map height in metatiles
	#[arg(long)]
	height: usize,

	/// Border table (`border.bin`)
	#[arg(long, value_name = "FILE")]
	border: Option<PathBuf>,

	/// Primary tileset name (for example `gTileset_General`)
	#[arg(long, value_name = "NAME")]
	primary: String,

	/// Primary tileset directory holding `metatiles.bin`, `tiles.png`, `palettes/` and `anim/`
	#[arg(long, value_name = "DIR")]
	primary_dir: PathBuf,

	/// Secondary tileset name
	#[arg(long, value_name = "NAME", requires = "secondary_dir")]
	secondary: Option<String>,

	/// Secondary tileset directory
	#[arg(long, value_name = "DIR", requires = "secondary")]
	secondary_dir: Option<PathBuf>,

	/// Output directory
	#[arg(short, long, value_name = "DIR", default_value = "out")]
	out: PathBuf,

	/// Emit 8x8 tile layers instead of pre-rendered metatile halves
	#[arg(long, default_value_t = false)]
	tile_grid: bool,

	/// TOML file with conversion options
	#[arg(short, long, value_name = "FILE", env = "METATILED_CONFIG")]
	config: Option<PathBuf>,

	/// Override the atlas width in tiles
	#[arg(long, value_name = "COUNT")]
	atlas_columns: Option<u32>,

	/// Override the number of strip animation steps
	#[arg(long, value_name = "COUNT")]
	cycle_frames: Option<usize>,
}

fn main() -> Result<()> {
	env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

	let cli = Cli::parse();
	let mut options = load_options(cli.config.as_deref())?;
	if let Some(columns) = cli.atlas_columns {
		options.atlas_columns = columns;
	}
	if let Some(frames) = cli.cycle_frames {
		options.cycle_frames = frames;
	}

	let grid = fs::read(&cli.grid).with_context(|| format!("Failed to read {}", cli.grid.display()))?;
	let border = cli.border.as_ref().and_then(|path| match fs::read(path) {
		Ok(data) => Some(data),
		Err(err) => {
			log::warn!("border {}: {err}", path.display());
			None
		}
	});

	let primary = load_tileset(&cli.primary, &cli.primary_dir)?;
	let secondary = match (&cli.secondary, &cli.secondary_dir) {
		(Some(name), Some(dir)) => Some(load_tileset(name, dir)?),
		_ => None,
	};

	let mut diagnostics = Diagnostics::new();
	let mut animations = AnimationLibrary::new();
	let table = AnimationTable::builtin();
	animations.load_tileset(table, &cli.primary, TilesetRole::Primary, &cli.primary_dir.join("anim"), &mut diagnostics);
	if let (Some(name), Some(dir)) = (&cli.secondary, &cli.secondary_dir) {
		animations.load_tileset(table, name, TilesetRole::Secondary, &dir.join("anim"), &mut diagnostics);
	}
	info!("Loaded {} animations", animations.len());

	let name = cli.grid.file_stem().and_then(|stem| stem.to_str()).unwrap_or("map").to_string();
	let input = MapInput {
		name: &name,
		width: cli.width,
		height: cli.height,
		grid: &grid,
		border: border.as_deref(),
		primary: &primary,
		secondary: secondary.as_ref(),
		animations: &animations,
	};

	fs::create_dir_all(&cli.out).with_context(|| format!("Failed to create {}", cli.out.display()))?;
	let converter = MapConverter::new(options);
	if cli.tile_grid {
		let map = converter.convert_tile_grid(&input)?;
		let document = json!({
			"name": map.name,
			"width": map.width,
			"height": map.height,
			"tilewidth": TILE_SIZE,
			"layers": map.layers,
			"animations": map.timelines,
			"anomalies": anomaly_strings(&diagnostics, &map.diagnostics),
		});
		write_outputs(&cli.out, &name, &map.atlas, converter.options().atlas_columns, &document)?;
	} else {
		let map = converter.convert(&input)?;
		let document = json!({
			"name": map.name,
			"width": map.width,
			"height": map.height,
			"tilewidth": METATILE_SIZE,
			"layers": map.layers,
			"border": map.border,
			"animations": map.timelines,
			"anomalies": anomaly_strings(&diagnostics, &map.diagnostics),
		});
		write_outputs(&cli.out, &name, &map.atlas, converter.options().atlas_columns, &document)?;
	}

	Ok(())
}

/// Layers the optional TOML file under `METATILED_*` environment variables
fn load_options(path: Option<&Path>) -> Result<ConvertOptions> {
	let mut builder = config::Config::builder();
	if let Some(path) = path {
		builder = builder.add_source(config::File::from(path));
	}
	let settings = builder
		.add_source(config::Environment::with_prefix("METATILED").try_parsing(true))
		.build()
		.context("Failed to read configuration")?;
	settings.try_deserialize().context("Invalid configuration")
}

/// Reads a tileset directory; only `metatiles.bin` is required
fn load_tileset(name: &str, dir: &Path) -> Result<TilesetResources> {
	let metatiles_path = dir.join("metatiles.bin");
	let metatiles =
		fs::read(&metatiles_path).with_context(|| format!("Failed to read {}", metatiles_path.display()))?;
	let mut resources = TilesetResources::new(name, metatiles);
	resources.attributes = fs::read(dir.join("metatile_attributes.bin")).ok();

	let sheet_path = dir.join("tiles.png");
	match IndexedImage::open(&sheet_path, Resource::TileSheet) {
		Ok(sheet) => {
			let palettes = load_palettes(&dir.join("palettes"));
			info!("{name}: {}x{} tile sheet, {} palettes", sheet.width(), sheet.height(), palettes.len());
			resources.graphics = Some(TilesetGraphics::new(TileBank::new(sheet), palettes));
		}
		Err(err) => log::warn!("{}: {err}", sheet_path.display()),
	}
	Ok(resources)
}

/// Loads `00.pal` to `15.pal`, stopping at the first one missing
fn load_palettes(dir: &Path) -> Vec<Palette> {
	let mut palettes = Vec::new();
	for slot in 0..16 {
		let path = dir.join(format!("{slot:02}.pal"));
		match Palette::from_file(&path) {
			Ok(palette) => palettes.push(palette),
			Err(err) => {
				if path.exists() {
					log::warn!("{}: {err}", path.display());
				}
				break;
			}
		}
	}
	palettes
}

fn anomaly_strings(loading: &Diagnostics, conversion: &Diagnostics) -> Vec<String> {
	loading.anomalies().iter().chain(conversion.anomalies()).map(ToString::to_string).collect()
}

fn write_outputs(out: &Path, name: &str, atlas: &Atlas, columns: u32, document: &serde_json::Value) -> Result<()> {
	let sheet_path = out.join(format!("{name}.png"));
	atlas.to_sheet(columns).save(&sheet_path).with_context(|| format!("Failed to write {}", sheet_path.display()))?;

	let json_path = out.join(format!("{name}.json"));
	fs::write(&json_path, serde_json::to_string_pretty(document)?)
		.with_context(|| format!("Failed to write {}", json_path.display()))?;

	info!("Wrote {} images to {} and {}", atlas.len(), sheet_path.display(), json_path.display());
	Ok(())
}
