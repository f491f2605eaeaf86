//! Bitmap records stored in a `.GR` archive.
//!
//! # Record Format
//!
//! When headers are present:
//!
//! | Field       | Size | Notes                                  |
//! |-------------|------|----------------------------------------|
//! | kind        | 1    | 4, 8 or 10                             |
//! | width       | 1    |                                        |
//! | height      | 1    |                                        |
//! | aux palette | 1    | only when kind is not 4, 0-31          |
//! | data size   | 2    | pixels (kind 4) or nibbles (8, 10), LE |
//! | payload     | n    | `data size` or `(data size + 1) / 2`   |
//!
//! Records of the panel archive carry no header at all: they are raw bitmaps
//! whose dimensions follow from their position.

use std::fmt;

use log::debug;
use serde::Serialize;

use super::decode::{decompress_nibbles, decompress_rle};
use crate::file::bmp::IndexedImage;
use crate::file::bytes::ByteReader;
use crate::file::palette::AuxPaletteSet;
use crate::file::{FileType, GrFileError};

/// Bitmap record constants.
pub mod constants {
	/// Width of a panel bitmap
	pub const PANEL_WIDTH: u8 = 79;

	/// Height of a panel bitmap
	pub const PANEL_HEIGHT: u8 = 112;

	/// Width of the border strip closing the panel archive
	pub const PANEL_BORDER_WIDTH: u8 = 3;

	/// Height of the border strip closing the panel archive
	pub const PANEL_BORDER_HEIGHT: u8 = 112;

	/// Size of kind, width, height and data size fields
	pub const HEADER_SIZE: usize = 5;
}

/// Storage kind of a bitmap record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[repr(u8)]
pub enum BitmapKind {
	/// One byte per pixel
	Raw = 4,
	/// Nibble run-length encoding through an auxiliary palette
	NibbleRle = 8,
	/// One nibble per pixel
	Nibble = 10,
}

impl BitmapKind {
	/// Returns `true` for the nibble kinds, which reference an auxiliary palette.
	pub const fn is_compressed(self) -> bool {
		!matches!(self, Self::Raw)
	}

	/// Number of payload bytes implied by `data_size`.
	pub const fn payload_len(self, data_size: u16) -> usize {
		let data_size = data_size as usize;
		if self.is_compressed() { data_size.div_ceil(2) } else { data_size }
	}
}

impl TryFrom<u8> for BitmapKind {
	type Error = GrFileError;

	fn try_from(value: u8) -> Result<Self, Self::Error> {
		match value {
			4 => Ok(Self::Raw),
			8 => Ok(Self::NibbleRle),
			10 => Ok(Self::Nibble),
			other => Err(GrFileError::UnsupportedBitmapKind(other)),
		}
	}
}

impl From<BitmapKind> for u8 {
	fn from(kind: BitmapKind) -> Self {
		kind as u8
	}
}

impl fmt::Display for BitmapKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Raw => write!(f, "raw"),
			Self::NibbleRle => write!(f, "nibble-rle"),
			Self::Nibble => write!(f, "nibble"),
		}
	}
}

/// How a record is laid out in the archive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum RecordLayout {
	/// Record starts with its own header
	#[default]
	Headered,
	/// Header-less 79x112 panel
	Panel,
	/// Header-less 3x112 border strip, last record of the panel archive
	PanelBorder,
}

impl RecordLayout {
	/// Layout of record `index` out of `count` records.
	pub fn for_position(panels: bool, index: usize, count: usize) -> Self {
		match panels {
			false => Self::Headered,
			true if index + 1 == count => Self::PanelBorder,
			true => Self::Panel,
		}
	}

	/// Dimensions implied by the layout, `None` when the record stores them.
	pub const fn fixed_dimensions(self) -> Option<(u8, u8)> {
		match self {
			Self::Headered => None,
			Self::Panel => Some((constants::PANEL_WIDTH, constants::PANEL_HEIGHT)),
			Self::PanelBorder => {
				Some((constants::PANEL_BORDER_WIDTH, constants::PANEL_BORDER_HEIGHT))
			}
		}
	}

	/// Returns `true` if the record carries its own header.
	pub const fn has_header(self) -> bool {
		matches!(self, Self::Headered)
	}
}

/// Per-record metadata, as reported by `gr_utils info`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BitmapInfo {
	/// Record index
	pub index: usize,
	/// Storage kind
	pub kind: BitmapKind,
	/// Width in pixels
	pub width: u8,
	/// Height in pixels
	pub height: u8,
	/// Pixel or nibble count
	pub data_size: u16,
	/// Auxiliary palette index of nibble kinds
	pub aux_palette: Option<u8>,
	/// Stored payload size in bytes
	pub payload_len: usize,
}

/// One bitmap record.
///
/// A record with no payload is a hole in the archive: it has no pixels and
/// contributes nothing when the archive is written back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
	kind: BitmapKind,
	width: u8,
	height: u8,
	data_size: u16,
	layout: RecordLayout,
	aux_palette: Option<u8>,
	pixels: Vec<u8>,
}

impl Bitmap {
	/// Creates an empty record.
	pub fn empty() -> Self {
		Self {
			kind: BitmapKind::Raw,
			width: 0,
			height: 0,
			data_size: 0,
			layout: RecordLayout::Headered,
			aux_palette: None,
			pixels: Vec::new(),
		}
	}

	/// Creates a raw record from one byte per pixel.
	///
	/// # Errors
	///
	/// Returns [`GrFileError::CorruptData`] if `pixels` does not hold exactly
	/// `width * height` entries.
	pub fn raw(
		width: u8,
		height: u8,
		layout: RecordLayout,
		pixels: Vec<u8>,
	) -> Result<Self, GrFileError> {
		let area = usize::from(width) * usize::from(height);
		if pixels.len() != area {
			return Err(GrFileError::corrupt(
				FileType::Gr,
				format!("{width}x{height} bitmap needs {area} pixels, got {}", pixels.len()),
			));
		}

		Ok(Self {
			kind: BitmapKind::Raw,
			width,
			height,
			data_size: area as u16,
			layout,
			aux_palette: None,
			pixels,
		})
	}

	/// Creates a nibble record from its stored payload.
	///
	/// # Errors
	///
	/// Returns [`GrFileError::AuxPaletteOutOfRange`] for an auxiliary palette
	/// index above 31 and [`GrFileError::InsufficientData`] if `payload` is
	/// shorter than `data_size` nibbles.
	pub fn compressed(
		kind: BitmapKind,
		width: u8,
		height: u8,
		aux_palette: u8,
		data_size: u16,
		payload: Vec<u8>,
	) -> Result<Self, GrFileError> {
		check_aux_palette(aux_palette)?;
		let expected = kind.payload_len(data_size);
		if payload.len() < expected {
			return Err(GrFileError::insufficient_data(FileType::Gr, expected, payload.len()));
		}

		let (kind, aux_palette) = match kind {
			BitmapKind::Raw => (BitmapKind::Raw, None),
			kind => (kind, Some(aux_palette)),
		};
		Ok(Self {
			kind,
			width,
			height,
			data_size,
			layout: RecordLayout::Headered,
			aux_palette,
			pixels: payload[..expected].to_vec(),
		})
	}

	/// Decodes one record from its slice of the archive.
	///
	/// Only the bytes of `data` are read; a payload that runs past the end
	/// of the slice is reported as [`GrFileError::InsufficientData`].
	pub fn from_bytes(data: &[u8], layout: RecordLayout) -> Result<Self, GrFileError> {
		let mut reader = ByteReader::new(data, FileType::Gr);

		let (kind, width, height) = match layout.fixed_dimensions() {
			Some((width, height)) => (BitmapKind::Raw, width, height),
			None => {
				let kind = BitmapKind::try_from(reader.u8()?)?;
				let width = reader.u8()?;
				let height = reader.u8()?;
				(kind, width, height)
			}
		};

		let aux_palette = if kind.is_compressed() {
			let index = reader.u8()?;
			check_aux_palette(index)?;
			Some(index)
		} else {
			None
		};

		let data_size = if layout.has_header() {
			reader.u16()?
		} else {
			u16::from(width) * u16::from(height)
		};

		let pixels = reader.take(kind.payload_len(data_size))?.to_vec();
		if reader.offset() < data.len() {
			debug!("Ignoring {} trailing bytes after {} record", data.len() - reader.offset(), kind);
		}

		debug!(
			"Decoded {} bitmap {}x{}, data size {}, aux palette {:?}",
			kind, width, height, data_size, aux_palette
		);

		Ok(Self {
			kind,
			width,
			height,
			data_size,
			layout,
			aux_palette,
			pixels,
		})
	}

	/// Returns the storage kind.
	pub fn kind(&self) -> BitmapKind {
		self.kind
	}

	/// Returns the width in pixels.
	pub fn width(&self) -> u8 {
		self.width
	}

	/// Returns the height in pixels.
	pub fn height(&self) -> u8 {
		self.height
	}

	/// Returns the pixel count (kind 4) or nibble count (kinds 8 and 10).
	pub fn data_size(&self) -> u16 {
		self.data_size
	}

	/// Returns the layout of the record.
	pub fn layout(&self) -> RecordLayout {
		self.layout
	}

	/// Returns the auxiliary palette index of a nibble record.
	pub fn aux_palette(&self) -> Option<u8> {
		self.aux_palette
	}

	/// Returns the stored payload.
	pub fn payload(&self) -> &[u8] {
		&self.pixels
	}

	/// Returns `true` for a hole.
	pub fn is_empty(&self) -> bool {
		self.pixels.is_empty()
	}

	/// Number of pixels of the decoded image.
	#[inline]
	pub fn area(&self) -> usize {
		usize::from(self.width) * usize::from(self.height)
	}

	/// Decodes the payload into palette indices.
	///
	/// Raw records return their payload, nibble RLE records exactly
	/// `width * height` indices and plain nibble records `data_size` values.
	/// A hole decodes to nothing.
	pub fn decompress(&self, aux_palettes: &AuxPaletteSet) -> Result<Vec<u8>, GrFileError> {
		if self.is_empty() {
			return Ok(Vec::new());
		}

		match (self.kind, self.aux_palette) {
			(BitmapKind::NibbleRle, Some(index)) => {
				let aux_palette = aux_palettes.get(index)?;
				Ok(decompress_rle(
					&self.pixels,
					usize::from(self.data_size),
					self.area(),
					aux_palette,
				))
			}
			(BitmapKind::Nibble, _) => {
				Ok(decompress_nibbles(&self.pixels, usize::from(self.data_size)))
			}
			_ => Ok(self.pixels.clone()),
		}
	}

	/// Decodes the record into a `width * height` image.
	///
	/// Payloads that decode to a different pixel count are padded with
	/// index 0 or truncated.
	pub fn to_indexed_image(&self, aux_palettes: &AuxPaletteSet) -> Result<IndexedImage, GrFileError> {
		let mut pixels = self.decompress(aux_palettes)?;
		if pixels.len() != self.area() {
			debug!("Resizing {} decoded pixels to {}x{}", pixels.len(), self.width, self.height);
			pixels.resize(self.area(), 0);
		}
		IndexedImage::new(u16::from(self.width), u16::from(self.height), pixels)
	}

	/// Size of the record when written back, 0 for a hole.
	pub fn serialized_len(&self) -> usize {
		if self.is_empty() {
			return 0;
		}

		let mut len = self.pixels.len();
		if self.layout.has_header() {
			len += constants::HEADER_SIZE;
			if self.aux_palette.is_some() {
				len += 1;
			}
		}
		len
	}

	/// Appends the record to `out`. Holes write nothing.
	pub fn write_to(&self, out: &mut Vec<u8>) {
		if self.is_empty() {
			return;
		}

		if self.layout.has_header() {
			out.push(self.kind.into());
			out.push(self.width);
			out.push(self.height);
			if let Some(index) = self.aux_palette {
				out.push(index);
			}
			out.extend_from_slice(&self.data_size.to_le_bytes());
		}
		out.extend_from_slice(&self.pixels);
	}

	/// Replaces the record with an uncompressed copy of `image`.
	///
	/// The image must have the exact dimensions of the record. On mismatch the
	/// record is left untouched.
	pub fn replace_with(
		&mut self,
		index: usize,
		image: &IndexedImage,
		layout: RecordLayout,
	) -> Result<(), GrFileError> {
		let expected = (u16::from(self.width), u16::from(self.height));
		let actual = (image.width(), image.height());
		if expected != actual {
			return Err(GrFileError::DimensionMismatch {
				index,
				expected,
				actual,
			});
		}

		*self = Self::raw(self.width, self.height, layout, image.pixels().to_vec())?;
		Ok(())
	}

	/// Returns the metadata of a non-empty record.
	pub fn info(&self, index: usize) -> Option<BitmapInfo> {
		if self.is_empty() {
			return None;
		}

		Some(BitmapInfo {
			index,
			kind: self.kind,
			width: self.width,
			height: self.height,
			data_size: self.data_size,
			aux_palette: self.aux_palette,
			payload_len: self.pixels.len(),
		})
	}
}

impl Default for Bitmap {
	fn default() -> Self {
		Self::empty()
	}
}

impl fmt::Display for Bitmap {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.is_empty() {
			return write!(f, "(empty)");
		}

		write!(f, "{} {}x{}, data size {}", self.kind, self.width, self.height, self.data_size)?;
		if let Some(index) = self.aux_palette {
			write!(f, ", aux palette {index}")?;
		}
		Ok(())
	}
}

fn check_aux_palette(index: u8) -> Result<(), GrFileError> {
	if usize::from(index) >= AuxPaletteSet::COUNT {
		return Err(GrFileError::AuxPaletteOutOfRange {
			index,
		});
	}
	Ok(())
}
