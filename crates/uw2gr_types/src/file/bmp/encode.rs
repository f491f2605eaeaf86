//! Writing 8-bit BMP files.

use super::{Compression, FileHeader, IndexedImage, InfoHeader, constants, row_stride};
use crate::file::palette::Palette;

/// Encodes `image` as an uncompressed, top-down 8-bit BMP file.
///
/// Palette channels are scaled from 6 to 8 bits.
pub fn encode(image: &IndexedImage, palette: &Palette) -> Vec<u8> {
	let width = usize::from(image.width());
	let height = usize::from(image.height());
	let stride = row_stride(width);
	let pixel_data_size = stride * height;
	let file_size = constants::PIXEL_DATA_OFFSET + pixel_data_size;

	let file_header = FileHeader {
		file_size: file_size as u32,
		pixel_offset: constants::PIXEL_DATA_OFFSET as u32,
	};
	let info_header = InfoHeader {
		size: constants::INFO_HEADER_SIZE as u32,
		width: i32::from(image.width()),
		height: -i32::from(image.height()),
		planes: 1,
		bit_count: 8,
		compression: Compression::Rgb as u32,
		size_image: pixel_data_size as u32,
		..Default::default()
	};

	let mut data = Vec::with_capacity(file_size);
	data.extend_from_slice(&file_header.to_bytes());
	data.extend_from_slice(&info_header.to_bytes());
	data.extend_from_slice(&palette.to_bmp_color_table());

	let padding = [0u8; 3];
	for row in image.pixels().chunks_exact(width.max(1)).take(height) {
		data.extend_from_slice(row);
		data.extend_from_slice(&padding[..stride - width]);
	}

	data
}
