//! GR Archive CLI Utility
//!
//! A command-line tool for extracting the bitmaps of `.GR` archives and
//! rebuilding archives from edited bitmaps.
//!
//! # Features
//!
//! - **extract**: Export every bitmap to an 8-bit BMP and write a mapping list
//! - **replace**: Import the BMP files named in a mapping list and save a new archive
//! - **info**: List the records of an archive
//!
//! # Usage
//!
//! ```bash
//! # Extract all bitmaps of HEADS.GR into heads/
//! gr_utils extract data/HEADS.GR heads/
//!
//! # Rebuild HEADS.GR from the edited bitmaps
//! gr_utils replace data/HEADS.GR heads/ HEADS.GR
//!
//! # Show the records of an archive as JSON
//! gr_utils info data/PANELS.GR --json
//! ```
//!
//! `PALS.DAT` and `ALLPALS.DAT` are read from `--data-dir`, the
//! `UW2GR_DATA_DIR` environment variable or the directory of the archive.

mod overwrite;

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::{error, info, warn};
use serde::Serialize;
use uw2gr_rs::file::gr::BitmapInfo;
use uw2gr_rs::prelude::*;

use overwrite::OverwriteGuard;

#[derive(Parser)]
#[command(name = "gr_utils")]
#[command(author = "uw2gr-rs project")]
#[command(version)]
#[command(about = "GR archive utility - extract and rebuild bitmap archives", long_about = None)]
struct Cli {
	/// Show debug output
	#[arg(short, long, global = true)]
	verbose: bool,

	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Extract all bitmaps of an archive to BMP files
	Extract {
		/// Input GR archive
		#[arg(value_name = "IN_FILE")]
		in_file: PathBuf,

		/// Directory receiving the bitmaps and the mapping list
		#[arg(value_name = "OUT_DIR")]
		out_dir: PathBuf,

		#[command(flatten)]
		data: DataArgs,

		/// Overwrite existing files without asking
		#[arg(short, long)]
		yes: bool,
	},

	/// Replace bitmaps of an archive with the files of a mapping list
	Replace {
		/// Input GR archive
		#[arg(value_name = "IN_FILE")]
		in_file: PathBuf,

		/// Directory holding the mapping list and the bitmaps
		#[arg(value_name = "IN_DIR")]
		in_dir: PathBuf,

		/// Rebuilt GR archive
		#[arg(value_name = "OUT_FILE")]
		out_file: PathBuf,

		#[command(flatten)]
		data: DataArgs,

		/// Overwrite existing files without asking
		#[arg(short, long)]
		yes: bool,
	},

	/// List the records of an archive
	Info {
		/// Input GR archive
		#[arg(value_name = "IN_FILE")]
		in_file: PathBuf,

		/// Print JSON instead of text
		#[arg(long)]
		json: bool,
	},
}

#[derive(Args)]
struct DataArgs {
	/// Directory containing PALS.DAT and ALLPALS.DAT [default: directory of IN_FILE]
	#[arg(long, env = "UW2GR_DATA_DIR", value_name = "DIR")]
	data_dir: Option<PathBuf>,
}

impl DataArgs {
	fn resolve(&self, in_file: &Path) -> PathBuf {
		if let Some(dir) = &self.data_dir {
			return dir.clone();
		}
		match in_file.parent() {
			Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
			_ => PathBuf::from("."),
		}
	}
}

/// Archive summary printed by `info --json`
#[derive(Serialize)]
struct ArchiveReport<'a> {
	resource: &'a Resource,
	bitmap_count: usize,
	bitmaps: Vec<BitmapInfo>,
}

fn resource_for(in_file: &Path) -> Result<Resource> {
	let name = in_file
		.file_name()
		.and_then(|name| name.to_str())
		.with_context(|| format!("invalid archive path \"{}\"", in_file.display()))?;
	Ok(Resource::lookup(name)?)
}

fn load_palettes(data_dir: &Path) -> Result<(PaletteSet, AuxPaletteSet)> {
	let path = data_dir.join(PaletteSet::FILE_NAME);
	info!("Loading palettes from \"{}\"", path.display());
	let palettes = PaletteSet::open(&path)
		.with_context(|| format!("failed to load palettes from \"{}\"", path.display()))?;

	let path = data_dir.join(AuxPaletteSet::FILE_NAME);
	info!("Loading auxiliary palettes from \"{}\"", path.display());
	let aux_palettes = AuxPaletteSet::open(&path)
		.with_context(|| format!("failed to load auxiliary palettes from \"{}\"", path.display()))?;

	Ok((palettes, aux_palettes))
}

fn read_archive(in_file: &Path) -> Result<Vec<u8>> {
	info!("Loading \"{}\"", in_file.display());
	fs::read(in_file).with_context(|| format!("failed to read \"{}\"", in_file.display()))
}

/// Handle extract command
fn handle_extract(in_file: &Path, out_dir: &Path, data_dir: &Path, yes: bool) -> Result<()> {
	let resource = resource_for(in_file)?;
	let (palettes, aux_palettes) = load_palettes(data_dir)?;
	let data = read_archive(in_file)?;
	let session = ArchiveSession::new(resource, &data, &palettes, &aux_palettes)
		.with_context(|| format!("failed to load \"{}\"", in_file.display()))?;

	fs::create_dir_all(out_dir)
		.with_context(|| format!("failed to create \"{}\"", out_dir.display()))?;

	let mut guard = OverwriteGuard::new(yes);
	let mappings = session.mappings_for_export();

	for (index, name) in mappings.iter() {
		let path = out_dir.join(name);
		if !guard.check(&path)? {
			info!("Skipping \"{}\"", path.display());
			continue;
		}

		let Some(bmp) = session.export_bitmap(index)? else {
			continue;
		};
		info!("Exporting bitmap #{index} to \"{}\"", path.display());
		fs::write(&path, bmp).with_context(|| format!("failed to write \"{}\"", path.display()))?;
	}

	let path = out_dir.join(session.resource().mappings_file_name());
	if guard.check(&path)? {
		info!("Saving mappings to \"{}\"", path.display());
		mappings.save(&path).with_context(|| format!("failed to write \"{}\"", path.display()))?;
	}

	info!("Extracted {} bitmaps", mappings.len());
	Ok(())
}

/// Handle replace command
fn handle_replace(
	in_file: &Path,
	in_dir: &Path,
	out_file: &Path,
	data_dir: &Path,
	yes: bool,
) -> Result<()> {
	let resource = resource_for(in_file)?;
	let (palettes, aux_palettes) = load_palettes(data_dir)?;
	let data = read_archive(in_file)?;
	let mut session = ArchiveSession::new(resource, &data, &palettes, &aux_palettes)
		.with_context(|| format!("failed to load \"{}\"", in_file.display()))?;

	let list_path = in_dir.join(session.resource().mappings_file_name());
	info!("Loading mappings from \"{}\"", list_path.display());
	let mappings = Mappings::open(&list_path)
		.with_context(|| format!("failed to load mappings from \"{}\"", list_path.display()))?;

	let replaced = session.apply_mappings(&mappings, |name| {
		let path = in_dir.join(name);
		fs::read(&path).map_err(|err| {
			GrFileError::from(std::io::Error::new(err.kind(), format!("{}: {err}", path.display())))
		})
	})?;

	let mut guard = OverwriteGuard::new(yes);
	if !guard.check(out_file)? {
		warn!("Not saving \"{}\"", out_file.display());
		return Ok(());
	}

	info!("Saving to \"{}\"", out_file.display());
	fs::write(out_file, session.to_bytes())
		.with_context(|| format!("failed to write \"{}\"", out_file.display()))?;

	info!("Replaced {replaced} bitmaps");
	Ok(())
}

/// Handle info command
fn handle_info(in_file: &Path, json: bool) -> Result<()> {
	let resource = resource_for(in_file)?;
	let data = read_archive(in_file)?;
	let archive = GrFile::from_bytes(&data, &resource)
		.with_context(|| format!("failed to load \"{}\"", in_file.display()))?;

	if json {
		let report = ArchiveReport {
			resource: &resource,
			bitmap_count: archive.bitmap_count(),
			bitmaps: archive.infos(),
		};
		println!("{}", serde_json::to_string_pretty(&report)?);
		return Ok(());
	}

	println!("{}: {}", resource.name(), archive);
	for (index, bitmap) in archive.iter().enumerate() {
		println!("  #{index:04} {bitmap}");
	}
	Ok(())
}

fn run(cli: Cli) -> Result<()> {
	match cli.command {
		Commands::Extract {
			in_file,
			out_dir,
			data,
			yes,
		} => handle_extract(&in_file, &out_dir, &data.resolve(&in_file), yes),
		Commands::Replace {
			in_file,
			in_dir,
			out_file,
			data,
			yes,
		} => handle_replace(&in_file, &in_dir, &out_file, &data.resolve(&in_file), yes),
		Commands::Info {
			in_file,
			json,
		} => handle_info(&in_file, json),
	}
}

fn main() -> ExitCode {
	let cli = Cli::parse();

	let default_filter = if cli.verbose { "debug" } else { "info" };
	env_logger::init_from_env(env_logger::Env::default().default_filter_or(default_filter));

	match run(cli) {
		Ok(()) => ExitCode::SUCCESS,
		Err(err) => {
			error!("{err:#}");
			ExitCode::from(2)
		}
	}
}
