//! Reading 8-bit BMP files.
//!
//! ## RLE8
//!
//! Pixel data is a sequence of 2-byte opcodes:
//!
//! - `n c` (`n > 0`): `n` pixels of index `c`
//! - `0 0`: end of line, rows already wrap on their own
//! - `0 1`: end of bitmap
//! - `0 2 dx dy`: move the cursor `dx` columns and `dy` rows
//! - `0 n` (`n >= 3`): `n` literal indices, padded to an even count

use log::{debug, warn};

use super::{Compression, FileHeader, IndexedImage, InfoHeader, constants, row_stride};
use crate::file::{FileType, GrFileError};

/// Decodes an 8-bit BMP file into top-down palette indices.
///
/// # Errors
///
/// Returns an error if:
/// - The signature is not `BM` or a header is truncated
/// - The image is not 1 plane, 8 bits per pixel, uncompressed or RLE8
/// - Either dimension is 0, negative width or larger than 255
/// - The color table does not have 0 or 256 entries
/// - The pixel data is truncated or RLE8 writes outside the image
pub fn decode(data: &[u8]) -> Result<IndexedImage, GrFileError> {
	let file_header = FileHeader::from_bytes(data)?;
	let info_data = data.get(constants::FILE_HEADER_SIZE..).unwrap_or_default();
	let info = InfoHeader::from_bytes(info_data)?;
	let compression = validate(&info)?;

	let width = info.width.unsigned_abs() as usize;
	let height = info.height.unsigned_abs() as usize;
	debug!("Decoding {width}x{height} BMP, {compression:?}, top-down: {}", info.is_top_down());

	let offset = file_header.pixel_offset as usize;
	let source = data.get(offset..).unwrap_or_default();

	let pixels = match compression {
		Compression::Rgb => decode_rows(source, width, height, info.is_top_down())?,
		Compression::Rle8 => {
			let size = info.size_image as usize;
			let Some(source) = source.get(..size) else {
				return Err(GrFileError::insufficient_data(
					FileType::Bmp,
					offset + size,
					data.len(),
				));
			};
			decode_rle8(source, width, height, info.is_top_down())?
		}
	};

	IndexedImage::new(width as u16, height as u16, pixels)
}

fn unsupported(message: impl Into<String>) -> GrFileError {
	GrFileError::unsupported(FileType::Bmp, message)
}

fn validate(info: &InfoHeader) -> Result<Compression, GrFileError> {
	if (info.size as usize) < constants::INFO_HEADER_SIZE {
		return Err(unsupported(format!("info header of {} bytes", info.size)));
	}
	if info.width == 0 || info.height == 0 {
		return Err(unsupported("empty image"));
	}
	if info.width < 0 {
		return Err(unsupported(format!("negative width {}", info.width)));
	}
	if info.width.unsigned_abs() > constants::MAX_DIMENSION {
		return Err(unsupported(format!("width {} is too big", info.width)));
	}
	if info.height.unsigned_abs() > constants::MAX_DIMENSION {
		return Err(unsupported(format!("height {} is too big", info.height.unsigned_abs())));
	}
	if info.planes != 1 {
		return Err(unsupported(format!("{} color planes", info.planes)));
	}
	if info.bit_count != 8 {
		return Err(unsupported(format!("bit depth {}", info.bit_count)));
	}

	let compression = Compression::try_from(info.compression)?;
	if compression == Compression::Rle8 && info.size_image == 0 {
		return Err(unsupported("unknown size of compressed data"));
	}
	if info.colors_used != 0 && info.colors_used != 256 {
		return Err(unsupported(format!("palette of {} colors", info.colors_used)));
	}

	Ok(compression)
}

/// Copies uncompressed rows, skipping the stride padding.
fn decode_rows(
	source: &[u8],
	width: usize,
	height: usize,
	top_down: bool,
) -> Result<Vec<u8>, GrFileError> {
	let stride = row_stride(width);
	let mut pixels = vec![0u8; width * height];

	for row in 0..height {
		let stored = row * stride;
		let Some(line) = source.get(stored..stored + width) else {
			return Err(GrFileError::insufficient_data(FileType::Bmp, stored + width, source.len()));
		};
		let y = if top_down { row } else { height - 1 - row };
		pixels[y * width..(y + 1) * width].copy_from_slice(line);
	}

	Ok(pixels)
}

/// Where the RLE8 decoder is in the opcode stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RleState {
	/// Expecting a count byte
	Repeat,
	/// Writing `count` copies of `pixel`
	RepeatWrite {
		count: u8,
		pixel: u8,
	},
	/// A zero count byte was read; expecting the escape code
	Escape,
	/// Copying `count` literal bytes
	AbsoluteWrite {
		count: u8,
		align: bool,
	},
	/// Skipping the pad byte after an odd literal run
	Align,
	/// End of bitmap
	Finished,
}

/// Write cursor of the RLE8 decoder.
struct Cursor {
	x: usize,
	y: i64,
	step: i64,
	width: usize,
	height: usize,
}

impl Cursor {
	fn index(&self) -> Result<usize, GrFileError> {
		if self.x >= self.width || self.y < 0 || self.y >= self.height as i64 {
			return Err(GrFileError::corrupt(
				FileType::Bmp,
				format!("RLE8 write at ({}, {}) outside {}x{}", self.x, self.y, self.width, self.height),
			));
		}
		Ok(self.y as usize * self.width + self.x)
	}

	fn wrap(&mut self) {
		if self.x == self.width {
			self.x = 0;
			self.y += self.step;
		}
	}
}

/// Decodes RLE8 pixel data.
fn decode_rle8(
	source: &[u8],
	width: usize,
	height: usize,
	top_down: bool,
) -> Result<Vec<u8>, GrFileError> {
	let mut pixels = vec![0u8; width * height];
	let mut cursor = Cursor {
		x: 0,
		y: if top_down { 0 } else { height as i64 - 1 },
		step: if top_down { 1 } else { -1 },
		width,
		height,
	};

	let mut bytes = source.iter().copied();
	let mut next = |what: &str| {
		bytes.next().ok_or_else(|| {
			GrFileError::corrupt(FileType::Bmp, format!("RLE8 data ends inside {what}"))
		})
	};

	let mut state = RleState::Repeat;
	while state != RleState::Finished {
		state = match state {
			RleState::Repeat => match next("a count") {
				Err(_) => {
					warn!("RLE8 data ends without an end of bitmap marker");
					RleState::Finished
				}
				Ok(0) => RleState::Escape,
				Ok(count) => RleState::RepeatWrite {
					count,
					pixel: next("a repeat run")?,
				},
			},
			RleState::RepeatWrite {
				count,
				pixel,
			} => {
				pixels[cursor.index()?] = pixel;
				cursor.x += 1;
				match count - 1 {
					0 => RleState::Repeat,
					count => RleState::RepeatWrite {
						count,
						pixel,
					},
				}
			}
			RleState::AbsoluteWrite {
				count,
				align,
			} => {
				pixels[cursor.index()?] = next("an absolute run")?;
				cursor.x += 1;
				match (count - 1, align) {
					(0, true) => RleState::Align,
					(0, false) => RleState::Repeat,
					(count, align) => RleState::AbsoluteWrite {
						count,
						align,
					},
				}
			}
			RleState::Escape => match next("an escape")? {
				0 => RleState::Repeat,
				1 => RleState::Finished,
				2 => {
					let dx = next("a delta")?;
					let dy = next("a delta")?;
					cursor.x += usize::from(dx);
					cursor.y += cursor.step * i64::from(dy);
					RleState::Repeat
				}
				count => RleState::AbsoluteWrite {
					count,
					align: count % 2 != 0,
				},
			},
			RleState::Align => {
				// a missing pad byte at the very end is harmless
				let _ = next("padding");
				RleState::Repeat
			}
			RleState::Finished => RleState::Finished,
		};

		cursor.wrap();
	}

	Ok(pixels)
}
