//! Extraction and rebuild of one archive.

use log::{debug, info};

use super::{File, Resource};
use crate::file::bmp;
use crate::file::mapping::Mappings;
use crate::file::palette::{AuxPaletteSet, Palette, PaletteSet};
use crate::file::{FileType, GrFileError};

/// An archive being extracted or rebuilt, together with the palettes it is
/// drawn with.
///
/// The palettes are loaded once by the caller and shared by every session.
#[derive(Debug, Clone)]
pub struct ArchiveSession<'a> {
	resource: Resource,
	archive: File,
	palette: &'a Palette,
	aux_palettes: &'a AuxPaletteSet,
}

impl<'a> ArchiveSession<'a> {
	/// Parses `data` as the archive described by `resource`.
	///
	/// # Errors
	///
	/// Returns an error if the archive is malformed or `palettes` has no
	/// palette at the index of the resource.
	pub fn new(
		resource: Resource,
		data: &[u8],
		palettes: &'a PaletteSet,
		aux_palettes: &'a AuxPaletteSet,
	) -> Result<Self, GrFileError> {
		let archive = File::from_bytes(data, &resource)?;
		Self::from_archive(resource, archive, palettes, aux_palettes)
	}

	/// Wraps an already parsed archive.
	pub fn from_archive(
		resource: Resource,
		archive: File,
		palettes: &'a PaletteSet,
		aux_palettes: &'a AuxPaletteSet,
	) -> Result<Self, GrFileError> {
		let index = usize::from(resource.palette_index());
		let Some(palette) = palettes.get(index) else {
			return Err(GrFileError::EntryNotFound {
				file_type: FileType::Palette,
				message: format!("palette {index} (set holds {})", palettes.len()),
			});
		};

		debug!("{}: {}", resource.name(), archive);

		Ok(Self {
			resource,
			archive,
			palette,
			aux_palettes,
		})
	}

	/// Returns the resource description.
	pub fn resource(&self) -> &Resource {
		&self.resource
	}

	/// Returns the parsed archive.
	pub fn archive(&self) -> &File {
		&self.archive
	}

	/// Returns the palette the archive is drawn with.
	pub fn palette(&self) -> &'a Palette {
		self.palette
	}

	/// Encodes record `index` as an 8-bit BMP file, `None` for a hole.
	///
	/// # Errors
	///
	/// Returns [`GrFileError::EntryNotFound`] if there is no record `index`.
	pub fn export_bitmap(&self, index: usize) -> Result<Option<Vec<u8>>, GrFileError> {
		let bitmap = self.bitmap(index)?;
		if bitmap.is_empty() {
			return Ok(None);
		}

		let image = bitmap.to_indexed_image(self.aux_palettes)?;
		Ok(Some(bmp::encode(&image, self.palette)))
	}

	/// Replaces record `index` with the image of a BMP file.
	///
	/// # Errors
	///
	/// Returns an error if the BMP is not a supported 8-bit image or its
	/// dimensions differ from the record.
	pub fn import_bitmap(&mut self, index: usize, data: &[u8]) -> Result<(), GrFileError> {
		self.bitmap(index)?;
		let image = bmp::decode(data)?;
		self.archive.replace_bitmap(index, &image)
	}

	/// Mapping list naming the export of every non-empty record.
	pub fn mappings_for_export(&self) -> Mappings {
		let mut mappings = Mappings::new();
		for (index, bitmap) in self.archive.iter().enumerate() {
			if !bitmap.is_empty() {
				mappings.insert(index, self.resource.bitmap_file_name(index));
			}
		}
		mappings
	}

	/// Imports every file named in `mappings`, reading each through `load`.
	///
	/// All indices are checked before anything is loaded. Returns the
	/// number of replaced records.
	pub fn apply_mappings<F>(&mut self, mappings: &Mappings, mut load: F) -> Result<usize, GrFileError>
	where
		F: FnMut(&str) -> Result<Vec<u8>, GrFileError>,
	{
		let count = self.archive.bitmap_count();
		if let Some((index, name)) = mappings.iter().find(|(index, _)| *index >= count) {
			return Err(GrFileError::EntryNotFound {
				file_type: FileType::Mappings,
				message: format!("bitmap index {index} ({name}) out of range, archive holds {count}"),
			});
		}

		for (index, name) in mappings.iter() {
			info!("Importing bitmap #{index} from \"{name}\"");
			let data = load(name)?;
			self.import_bitmap(index, &data)?;
		}

		Ok(mappings.len())
	}

	/// Serializes the archive with its current records.
	pub fn to_bytes(&self) -> Vec<u8> {
		self.archive.to_bytes()
	}

	fn bitmap(&self, index: usize) -> Result<&super::Bitmap, GrFileError> {
		self.archive.get(index).ok_or_else(|| GrFileError::EntryNotFound {
			file_type: FileType::Gr,
			message: format!("bitmap {index} (archive holds {})", self.archive.bitmap_count()),
		})
	}
}
