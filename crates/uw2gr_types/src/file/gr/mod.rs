//! `.GR` file format support for `uw2gr-rs` project.
//!
//! A `.GR` archive packs the bitmaps of one game resource (buttons, heads,
//! panels, ...) behind an offset table.
//!
//! # File Structure
//!
//! | Offset | Size              | Field                                   |
//! |--------|-------------------|-----------------------------------------|
//! | 0x00   | 1                 | format tag, always 1                    |
//! | 0x01   | 2                 | bitmap count `n` (LE)                   |
//! | 0x03   | 4 * (`n` + 1)     | absolute record offsets (LE)            |
//! | ...    | ...               | records, see [`bitmap`]                 |
//!
//! `offsets[i + 1] - offsets[i]` is the length of record `i`; a length of 0
//! marks a hole. The last offset is the size of the file.
//!
//! Compressed records resolve their pixels through an auxiliary palette and
//! may only appear in archives drawn with palette 0.
//!
//! # Usage Examples
//!
//! ```no_run
//! use uw2gr_types::file::gr::{File, Resource};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let resource = Resource::lookup("HEADS.GR")?;
//! let archive = File::open("HEADS.GR", &resource)?;
//!
//! for (index, bitmap) in archive.iter().enumerate() {
//!     println!("#{index}: {bitmap}");
//! }
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::path::Path;

use log::{debug, warn};

use crate::file::bmp::IndexedImage;
use crate::file::bytes::ByteReader;
use crate::file::{FileType, GrFileError};

pub mod bitmap;
pub mod decode;
pub mod resources;
pub mod session;


pub use bitmap::{Bitmap, BitmapInfo, BitmapKind, RecordLayout};
pub use resources::{RESOURCES, Resource};
pub use session::ArchiveSession;

/// GR file constants.
pub mod constants {
	/// Format tag at the start of every archive
	pub const TAG: u8 = 1;

	/// Size of tag and bitmap count
	pub const HEADER_SIZE: usize = 3;

	/// Size of one offset table entry
	pub const OFFSET_SIZE: usize = 4;

	/// Largest archive accepted (1 MiB)
	pub const MAX_FILE_SIZE: usize = 1024 * 1024;
}

/// A parsed `.GR` archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
	/// Panel archive without record headers
	panels: bool,

	/// Palette the archive is drawn with
	palette_index: u8,

	/// Records in index order, holes included
	bitmaps: Vec<Bitmap>,
}

impl File {
	/// Creates an archive from already decoded records.
	///
	/// Record layouts are normalised to the positions they occupy.
	pub fn new(mut bitmaps: Vec<Bitmap>, panels: bool, palette_index: u8) -> Result<Self, GrFileError> {
		if bitmaps.is_empty() {
			return Err(GrFileError::EmptyArchive);
		}
		if bitmaps.len() > usize::from(u16::MAX) {
			return Err(GrFileError::unsupported(
				FileType::Gr,
				format!("{} bitmaps, at most {} fit the count field", bitmaps.len(), u16::MAX),
			));
		}

		let count = bitmaps.len();
		for (index, bitmap) in bitmaps.iter_mut().enumerate() {
			check_palette(index, bitmap, palette_index)?;
			let layout = RecordLayout::for_position(panels, index, count);
			if layout != bitmap.layout() && !bitmap.is_empty() {
				if bitmap.kind().is_compressed() {
					return Err(GrFileError::unsupported(
						FileType::Gr,
						format!("bitmap {index}: {} records cannot be stored as {:?}", bitmap.kind(), layout),
					));
				}
				if let Some(dimensions) = layout.fixed_dimensions()
					&& (bitmap.width(), bitmap.height()) != dimensions
				{
					return Err(GrFileError::DimensionMismatch {
						index,
						expected: (u16::from(dimensions.0), u16::from(dimensions.1)),
						actual: (u16::from(bitmap.width()), u16::from(bitmap.height())),
					});
				}
				*bitmap = Bitmap::raw(
					bitmap.width(),
					bitmap.height(),
					layout,
					bitmap.payload().to_vec(),
				)?;
			}
		}

		Ok(Self {
			panels,
			palette_index,
			bitmaps,
		})
	}

	/// Opens an archive from the specified path.
	///
	/// # Errors
	///
	/// Returns an error if the file cannot be read or is not a valid archive
	/// for `resource`.
	pub fn open(path: impl AsRef<Path>, resource: &Resource) -> Result<Self, GrFileError> {
		let data = std::fs::read(path)?;
		Self::from_bytes(&data, resource)
	}

	/// Parses an archive.
	///
	/// # Errors
	///
	/// Returns an error if:
	/// - The buffer is empty, larger than 1 MiB or declares no bitmap
	/// - The format tag is not 1
	/// - An offset runs backwards or past the end of the buffer
	/// - A record is malformed
	/// - A compressed record appears in an archive not drawn with palette 0
	pub fn from_bytes(data: &[u8], resource: &Resource) -> Result<Self, GrFileError> {
		if data.is_empty() {
			return Err(GrFileError::EmptyArchive);
		}
		if data.len() > constants::MAX_FILE_SIZE {
			return Err(GrFileError::FileTooLarge {
				size: data.len(),
				max: constants::MAX_FILE_SIZE,
			});
		}

		let mut reader = ByteReader::new(data, FileType::Gr);
		let tag = reader.u8()?;
		if tag != constants::TAG {
			return Err(GrFileError::invalid_magic(FileType::Gr, &[constants::TAG], &[tag]));
		}

		let count = usize::from(reader.u16()?);
		if count == 0 {
			return Err(GrFileError::EmptyArchive);
		}

		let offsets = (0..=count).map(|_| reader.u32()).collect::<Result<Vec<_>, _>>()?;

		let panels = resource.is_panels();
		let palette_index = resource.palette_index();
		let mut bitmaps = Vec::with_capacity(count);

		for (index, window) in offsets.windows(2).enumerate() {
			let (start, end) = (window[0], window[1]);
			if end < start || end as usize > data.len() {
				return Err(GrFileError::InvalidOffsetTable {
					index,
					start,
					end,
				});
			}

			if start == end {
				debug!("Bitmap #{index}: empty");
				bitmaps.push(Bitmap::empty());
				continue;
			}

			let layout = RecordLayout::for_position(panels, index, count);
			let bitmap = Bitmap::from_bytes(&data[start as usize..end as usize], layout)?;
			check_palette(index, &bitmap, palette_index)?;

			debug!("Bitmap #{index}: {bitmap}");
			bitmaps.push(bitmap);
		}

		if let Some(&last) = offsets.last()
			&& last as usize != data.len()
		{
			warn!("{}: last offset {} does not match file size {}", resource.name(), last, data.len());
		}

		Ok(Self {
			panels,
			palette_index,
			bitmaps,
		})
	}

	/// Returns `true` for the panel archive.
	pub fn is_panels(&self) -> bool {
		self.panels
	}

	/// Returns the palette index the archive is drawn with.
	pub fn palette_index(&self) -> u8 {
		self.palette_index
	}

	/// Returns the number of records, holes included.
	pub fn bitmap_count(&self) -> usize {
		self.bitmaps.len()
	}

	/// Returns the record at `index`.
	pub fn get(&self, index: usize) -> Option<&Bitmap> {
		self.bitmaps.get(index)
	}

	/// Returns all records.
	pub fn bitmaps(&self) -> &[Bitmap] {
		&self.bitmaps
	}

	/// Returns an iterator over all records, holes included.
	pub fn iter(&self) -> std::slice::Iter<'_, Bitmap> {
		self.bitmaps.iter()
	}

	/// Metadata of every non-empty record.
	pub fn infos(&self) -> Vec<BitmapInfo> {
		self.bitmaps.iter().enumerate().filter_map(|(index, bitmap)| bitmap.info(index)).collect()
	}

	/// Replaces record `index` with an uncompressed copy of `image`.
	///
	/// # Errors
	///
	/// Returns [`GrFileError::EntryNotFound`] for an index past the last
	/// record and [`GrFileError::DimensionMismatch`] if the image does not
	/// have the dimensions of the record. The archive is unchanged on error.
	pub fn replace_bitmap(&mut self, index: usize, image: &IndexedImage) -> Result<(), GrFileError> {
		let count = self.bitmaps.len();
		let layout = RecordLayout::for_position(self.panels, index, count);
		let Some(bitmap) = self.bitmaps.get_mut(index) else {
			return Err(GrFileError::EntryNotFound {
				file_type: FileType::Gr,
				message: format!("bitmap {index} (archive holds {count})"),
			});
		};
		bitmap.replace_with(index, image, layout)
	}

	/// Offset table of the archive as it would be written.
	pub fn offsets(&self) -> Vec<u32> {
		let mut offset = constants::HEADER_SIZE + constants::OFFSET_SIZE * (self.bitmaps.len() + 1);
		let mut offsets = Vec::with_capacity(self.bitmaps.len() + 1);
		offsets.push(offset as u32);
		for bitmap in &self.bitmaps {
			offset += bitmap.serialized_len();
			offsets.push(offset as u32);
		}
		offsets
	}

	/// Serializes the archive.
	pub fn to_bytes(&self) -> Vec<u8> {
		let offsets = self.offsets();
		let total = offsets.last().map_or(0, |&last| last as usize);

		let mut data = Vec::with_capacity(total);
		data.push(constants::TAG);
		data.extend_from_slice(&(self.bitmaps.len() as u16).to_le_bytes());
		for offset in &offsets {
			data.extend_from_slice(&offset.to_le_bytes());
		}
		for bitmap in &self.bitmaps {
			bitmap.write_to(&mut data);
		}
		data
	}

	/// Saves the archive to disk.
	///
	/// # Errors
	///
	/// Returns an error if the file cannot be written.
	pub fn save(&self, path: impl AsRef<Path>) -> Result<(), GrFileError> {
		std::fs::write(path, self.to_bytes())?;
		Ok(())
	}
}

impl<'a> IntoIterator for &'a File {
	type Item = &'a Bitmap;
	type IntoIter = std::slice::Iter<'a, Bitmap>;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}

impl fmt::Display for File {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let holes = self.bitmaps.iter().filter(|bitmap| bitmap.is_empty()).count();
		write!(
			f,
			"GR archive: {} bitmaps ({} empty), palette {}{}",
			self.bitmaps.len(),
			holes,
			self.palette_index,
			if self.panels { ", panels" } else { "" }
		)
	}
}

fn check_palette(index: usize, bitmap: &Bitmap, palette_index: u8) -> Result<(), GrFileError> {
	if bitmap.kind().is_compressed() && palette_index != 0 {
		return Err(GrFileError::CompressedPaletteIndex {
			record: index,
			palette_index,
		});
	}
	Ok(())
}
