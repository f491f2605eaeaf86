//! Benchmark helper utilities for uw2gr-rs
//!
//! Generators for synthetic GR records, GR archives and RLE8 BMP files.
//! All generated data is valid input for the decoders in `uw2gr_types`.

/// Packs nibbles into bytes, high nibble first.
pub fn pack_nibbles(nibbles: &[u8]) -> Vec<u8> {
	nibbles.chunks(2).map(|pair| (pair[0] << 4) | pair.get(1).copied().unwrap_or(0)).collect()
}

/// Generates a nibble RLE stream covering `pixel_count` pixels.
///
/// Repeat and run records alternate with counts between 3 and 15, so every
/// count fits in a single nibble. Returns the packed payload and its length
/// in nibbles.
pub fn generate_rle_stream(pixel_count: usize) -> (Vec<u8>, usize) {
	let mut nibbles = Vec::new();
	let mut written = 0;
	let mut step = 0usize;

	while written < pixel_count {
		// repeat record
		let count = 3 + step % 13;
		nibbles.push(count as u8);
		nibbles.push((step % 16) as u8);
		written += count;

		// run record
		let count = 3 + (step * 7) % 13;
		nibbles.push(count as u8);
		nibbles.extend((0..count).map(|i| ((i + step) % 16) as u8));
		written += count;

		step += 1;
	}

	let nibble_count = nibbles.len();
	(pack_nibbles(&nibbles), nibble_count)
}

/// Serialized type 8 record of `width x height` pixels on auxiliary palette 0.
pub fn generate_rle_record(width: u8, height: u8) -> Vec<u8> {
	let (payload, nibble_count) = generate_rle_stream(usize::from(width) * usize::from(height));
	let mut record = vec![8, width, height, 0];
	record.extend_from_slice(&(nibble_count as u16).to_le_bytes());
	record.extend_from_slice(&payload);
	record
}

/// Serialized type 4 record of `width x height` pixels.
pub fn generate_raw_record(width: u8, height: u8) -> Vec<u8> {
	let area = u16::from(width) * u16::from(height);
	let mut record = vec![4, width, height];
	record.extend_from_slice(&area.to_le_bytes());
	record.extend((0..area).map(|i| (i % 251) as u8));
	record
}

/// Builds a GR archive holding `count` records, alternating raw and RLE.
pub fn generate_archive(count: usize, width: u8, height: u8) -> Vec<u8> {
	let records: Vec<Vec<u8>> = (0..count)
		.map(|i| {
			if i % 2 == 0 {
				generate_raw_record(width, height)
			} else {
				generate_rle_record(width, height)
			}
		})
		.collect();

	let mut data = vec![1];
	data.extend_from_slice(&(count as u16).to_le_bytes());

	let mut offset = (3 + 4 * (count + 1)) as u32;
	data.extend_from_slice(&offset.to_le_bytes());
	for record in &records {
		offset += record.len() as u32;
		data.extend_from_slice(&offset.to_le_bytes());
	}
	for record in &records {
		data.extend_from_slice(record);
	}
	data
}

/// Generates a bottom-up RLE8 BMP file with runs of 16 pixels.
pub fn generate_rle8_bmp(width: u8, height: u8) -> Vec<u8> {
	let mut pixels = Vec::new();
	for y in 0..height {
		let mut x = 0u8;
		while x < width {
			let run = (width - x).min(16);
			pixels.extend_from_slice(&[run, y.wrapping_add(x)]);
			x += run;
		}
		// end of line
		pixels.extend_from_slice(&[0, 0]);
	}
	// end of bitmap
	pixels.extend_from_slice(&[0, 1]);

	let pixel_offset = 14 + 40 + 1024u32;
	let file_size = pixel_offset + pixels.len() as u32;

	let mut data = Vec::with_capacity(file_size as usize);
	data.extend_from_slice(b"BM");
	data.extend_from_slice(&file_size.to_le_bytes());
	data.extend_from_slice(&[0; 4]);
	data.extend_from_slice(&pixel_offset.to_le_bytes());

	data.extend_from_slice(&40u32.to_le_bytes());
	data.extend_from_slice(&i32::from(width).to_le_bytes());
	data.extend_from_slice(&i32::from(height).to_le_bytes());
	data.extend_from_slice(&1u16.to_le_bytes());
	data.extend_from_slice(&8u16.to_le_bytes());
	data.extend_from_slice(&1u32.to_le_bytes());
	data.extend_from_slice(&(pixels.len() as u32).to_le_bytes());
	data.extend_from_slice(&[0; 16]);

	for i in 0..=255u8 {
		data.extend_from_slice(&[i, i, i, 0]);
	}
	data.extend_from_slice(&pixels);
	data
}

/// Common benchmark sizes
pub mod sizes {
	/// Small sprite: 16x16
	pub const SMALL: (u8, u8) = (16, 16);
	/// Character portrait: 34x34
	pub const PORTRAIT: (u8, u8) = (34, 34);
	/// Inventory panel: 79x112
	pub const PANEL: (u8, u8) = (79, 112);
	/// Largest bitmap a record can describe: 255x255
	pub const MAX: (u8, u8) = (255, 255);
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_pack_nibbles() {
		assert_eq!(pack_nibbles(&[1, 2, 3]), [0x12, 0x30]);
	}

	#[test]
	fn test_rle_stream_covers_pixels() {
		let (payload, nibble_count) = generate_rle_stream(100);
		assert_eq!(payload.len(), nibble_count.div_ceil(2));
		// first record: repeat 3 x key 0
		assert_eq!(payload[0], 0x30);
	}

	#[test]
	fn test_archive_header() {
		let data = generate_archive(4, 8, 8);
		assert_eq!(data[0], 1);
		assert_eq!(u16::from_le_bytes([data[1], data[2]]), 4);
		let end = u32::from_le_bytes(data[19..23].try_into().unwrap());
		assert_eq!(end as usize, data.len());
	}

	#[test]
	fn test_rle8_bmp_header() {
		let data = generate_rle8_bmp(20, 3);
		assert_eq!(&data[0..2], b"BM");
		assert_eq!(u32::from_le_bytes(data[2..6].try_into().unwrap()) as usize, data.len());
		// runs 16 + 4 then EOL on each row, then EOB
		assert_eq!(data.len(), 1078 + 3 * 6 + 2);
	}
}
