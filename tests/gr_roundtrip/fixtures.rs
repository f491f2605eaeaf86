use uw2gr_rs::prelude::*;

/// A palette set where index `i` is `(i / 4, 63 - i / 4, i % 64)` in every palette.
pub(crate) fn palettes() -> PaletteSet {
	let mut palette = Palette::new();
	for i in 0..=255u8 {
		palette.set(i, Color::new(i / 4, 63 - i / 4, i % 64));
	}
	PaletteSet::new(vec![palette; PaletteSet::COUNT])
}

/// Auxiliary palette `n` maps nibble `k` to `16 * n + k`.
pub(crate) fn aux_palettes() -> AuxPaletteSet {
	let palettes = std::array::from_fn(|n| {
		AuxPalette(std::array::from_fn(|k| ((n * 16 + k) & 0xFF) as u8))
	});
	AuxPaletteSet::new(palettes)
}

/// Builds an archive from pre-serialized records.
pub(crate) fn archive(records: &[&[u8]]) -> Vec<u8> {
	let mut data = vec![1];
	data.extend_from_slice(&(records.len() as u16).to_le_bytes());

	let mut offset = (3 + 4 * (records.len() + 1)) as u32;
	data.extend_from_slice(&offset.to_le_bytes());
	for record in records {
		offset += record.len() as u32;
		data.extend_from_slice(&offset.to_le_bytes());
	}
	for record in records {
		data.extend_from_slice(record);
	}
	data
}

/// Raw record with a gradient of `width * height` pixels.
pub(crate) fn raw_record(width: u8, height: u8) -> Vec<u8> {
	let area = u16::from(width) * u16::from(height);
	let mut record = vec![4, width, height];
	record.extend_from_slice(&area.to_le_bytes());
	record.extend((0..area).map(|i| (i.wrapping_mul(7) & 0xFF) as u8));
	record
}

/// 5x2 nibble RLE record on auxiliary palette 2: 6 x key 3, then a run of keys 1 2 4 5.
pub(crate) fn rle_record() -> Vec<u8> {
	vec![8, 5, 2, 2, 7, 0, 0x63, 0x41, 0x24, 0x50]
}

/// Expected pixels of [`rle_record`].
pub(crate) fn rle_pixels() -> Vec<u8> {
	vec![35, 35, 35, 35, 35, 35, 33, 34, 36, 37]
}

/// Scratch directory unique to one test.
pub(crate) fn scratch_dir(name: &str) -> std::path::PathBuf {
	let dir = std::env::temp_dir().join(format!("uw2gr_{}_{}", name, std::process::id()));
	let _ = std::fs::remove_dir_all(&dir);
	std::fs::create_dir_all(&dir).unwrap();
	dir
}
