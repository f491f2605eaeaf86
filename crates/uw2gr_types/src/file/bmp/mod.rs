//! 8-bit indexed Windows bitmap support.
//!
//! Only the subset the archives need is handled: a 40-byte info header,
//! one color plane, 8 bits per pixel, a 256-entry color table and either
//! uncompressed or RLE8 pixel data.
//!
//! # File Structure
//!
//! | Offset | Size | Content                                  |
//! |--------|------|------------------------------------------|
//! | 0x00   | 14   | [`FileHeader`]                           |
//! | 0x0E   | 40   | [`InfoHeader`]                           |
//! | 0x36   | 1024 | color table, `[b, g, r, 0]` per entry    |
//! | 0x436  | ...  | pixel data                               |
//!
//! Rows are stored bottom-up unless the height is negative. Uncompressed
//! rows are padded to a multiple of 4 bytes.
//!
//! # Usage Examples
//!
//! ```
//! use uw2gr_types::file::bmp::{self, IndexedImage};
//! use uw2gr_types::file::palette::Palette;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let image = IndexedImage::new(3, 2, vec![0, 1, 2, 3, 4, 5])?;
//! let data = bmp::encode(&image, &Palette::grayscale());
//!
//! assert_eq!(bmp::decode(&data)?, image);
//! # Ok(())
//! # }
//! ```

use crate::file::bytes::ByteReader;
use crate::file::{FileType, GrFileError};

mod decode;
mod encode;

pub use decode::decode;
pub use encode::encode;

/// BMP file constants.
pub mod constants {
	/// `BM` file signature
	pub const MAGIC: [u8; 2] = *b"BM";

	/// Size of the file header
	pub const FILE_HEADER_SIZE: usize = 14;

	/// Size of the `BITMAPINFOHEADER` structure
	pub const INFO_HEADER_SIZE: usize = 40;

	/// Size of a 256-entry color table
	pub const COLOR_TABLE_SIZE: usize = 256 * 4;

	/// Offset of the pixel data in files written by this crate
	pub const PIXEL_DATA_OFFSET: usize = FILE_HEADER_SIZE + INFO_HEADER_SIZE + COLOR_TABLE_SIZE;

	/// Largest width or height a record can hold
	pub const MAX_DIMENSION: u32 = 255;
}

/// Pixel data compression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum Compression {
	/// Uncompressed rows
	Rgb = 0,
	/// 8-bit run-length encoding
	Rle8 = 1,
}

impl TryFrom<u32> for Compression {
	type Error = GrFileError;

	fn try_from(value: u32) -> Result<Self, Self::Error> {
		match value {
			0 => Ok(Self::Rgb),
			1 => Ok(Self::Rle8),
			other => Err(GrFileError::unsupported(
				FileType::Bmp,
				format!("compression mode {other}"),
			)),
		}
	}
}

/// `BITMAPFILEHEADER`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileHeader {
	/// Total file size
	pub file_size: u32,
	/// Offset of the pixel data
	pub pixel_offset: u32,
}

impl FileHeader {
	/// Parses the header, checking the `BM` signature.
	pub fn from_bytes(data: &[u8]) -> Result<Self, GrFileError> {
		let mut reader = ByteReader::new(data, FileType::Bmp);
		let magic = reader.take(2)?;
		if magic != constants::MAGIC {
			return Err(GrFileError::invalid_magic(FileType::Bmp, &constants::MAGIC, magic));
		}

		let file_size = reader.u32()?;
		// reserved
		reader.take(4)?;
		let pixel_offset = reader.u32()?;

		Ok(Self {
			file_size,
			pixel_offset,
		})
	}

	/// Serializes the header.
	pub fn to_bytes(&self) -> [u8; constants::FILE_HEADER_SIZE] {
		let mut data = [0u8; constants::FILE_HEADER_SIZE];
		data[0..2].copy_from_slice(&constants::MAGIC);
		data[2..6].copy_from_slice(&self.file_size.to_le_bytes());
		data[10..14].copy_from_slice(&self.pixel_offset.to_le_bytes());
		data
	}
}

/// `BITMAPINFOHEADER`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InfoHeader {
	/// Declared header size, at least 40
	pub size: u32,
	/// Width in pixels
	pub width: i32,
	/// Height in pixels, negative for top-down rows
	pub height: i32,
	/// Number of color planes
	pub planes: u16,
	/// Bits per pixel
	pub bit_count: u16,
	/// Raw compression field
	pub compression: u32,
	/// Size of the pixel data, may be 0 for uncompressed images
	pub size_image: u32,
	/// Horizontal resolution
	pub x_pels_per_meter: i32,
	/// Vertical resolution
	pub y_pels_per_meter: i32,
	/// Number of color table entries, 0 meaning all
	pub colors_used: u32,
	/// Number of important colors
	pub colors_important: u32,
}

impl InfoHeader {
	/// Parses the first 40 bytes of an info header.
	pub fn from_bytes(data: &[u8]) -> Result<Self, GrFileError> {
		let mut reader = ByteReader::new(data, FileType::Bmp);
		Ok(Self {
			size: reader.u32()?,
			width: reader.i32()?,
			height: reader.i32()?,
			planes: reader.u16()?,
			bit_count: reader.u16()?,
			compression: reader.u32()?,
			size_image: reader.u32()?,
			x_pels_per_meter: reader.i32()?,
			y_pels_per_meter: reader.i32()?,
			colors_used: reader.u32()?,
			colors_important: reader.u32()?,
		})
	}

	/// Serializes the header.
	pub fn to_bytes(&self) -> [u8; constants::INFO_HEADER_SIZE] {
		let mut data = [0u8; constants::INFO_HEADER_SIZE];
		data[0..4].copy_from_slice(&self.size.to_le_bytes());
		data[4..8].copy_from_slice(&self.width.to_le_bytes());
		data[8..12].copy_from_slice(&self.height.to_le_bytes());
		data[12..14].copy_from_slice(&self.planes.to_le_bytes());
		data[14..16].copy_from_slice(&self.bit_count.to_le_bytes());
		data[16..20].copy_from_slice(&self.compression.to_le_bytes());
		data[20..24].copy_from_slice(&self.size_image.to_le_bytes());
		data[24..28].copy_from_slice(&self.x_pels_per_meter.to_le_bytes());
		data[28..32].copy_from_slice(&self.y_pels_per_meter.to_le_bytes());
		data[32..36].copy_from_slice(&self.colors_used.to_le_bytes());
		data[36..40].copy_from_slice(&self.colors_important.to_le_bytes());
		data
	}

	/// Returns `true` if rows are stored top to bottom.
	pub fn is_top_down(&self) -> bool {
		self.height < 0
	}
}

/// Size of an uncompressed row, padded to 4 bytes.
#[inline]
pub const fn row_stride(width: usize) -> usize {
	width.div_ceil(4) * 4
}

/// Palette indices of an image, rows top to bottom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedImage {
	width: u16,
	height: u16,
	pixels: Vec<u8>,
}

impl IndexedImage {
	/// Creates an image from `width * height` palette indices.
	///
	/// # Errors
	///
	/// Returns [`GrFileError::CorruptData`] if the pixel count does not
	/// match the dimensions.
	pub fn new(width: u16, height: u16, pixels: Vec<u8>) -> Result<Self, GrFileError> {
		let area = usize::from(width) * usize::from(height);
		if pixels.len() != area {
			return Err(GrFileError::corrupt(
				FileType::Bmp,
				format!("{width}x{height} image needs {area} pixels, got {}", pixels.len()),
			));
		}

		Ok(Self {
			width,
			height,
			pixels,
		})
	}

	/// Returns the width in pixels.
	pub fn width(&self) -> u16 {
		self.width
	}

	/// Returns the height in pixels.
	pub fn height(&self) -> u16 {
		self.height
	}

	/// Returns the palette indices, rows top to bottom.
	pub fn pixels(&self) -> &[u8] {
		&self.pixels
	}

	/// Consumes the image, returning its palette indices.
	pub fn into_pixels(self) -> Vec<u8> {
		self.pixels
	}

	/// Returns one row of palette indices.
	pub fn row(&self, y: usize) -> Option<&[u8]> {
		let width = usize::from(self.width);
		self.pixels.get(y * width..(y + 1) * width)
	}
}
