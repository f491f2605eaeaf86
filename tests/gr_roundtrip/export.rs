use image::ImageFormat;
use uw2gr_rs::prelude::*;

use crate::fixtures;

#[test_log::test]
fn test_exported_bmp_decodes_with_image_crate() {
	let palettes = fixtures::palettes();
	let aux = fixtures::aux_palettes();
	let data = fixtures::archive(&[&fixtures::raw_record(5, 3), &fixtures::rle_record()]);
	let session = ArchiveSession::new(Resource::new("TEST.GR", 0, false), &data, &palettes, &aux).unwrap();
	let palette = session.palette();

	let bmp = session.export_bitmap(0).unwrap().unwrap();
	let decoded = image::load_from_memory_with_format(&bmp, ImageFormat::Bmp).unwrap().to_rgb8();
	assert_eq!(decoded.dimensions(), (5, 3));

	let pixels = fixtures::raw_record(5, 3)[5..].to_vec();
	for y in 0..3u32 {
		for x in 0..5u32 {
			let index = pixels[(y * 5 + x) as usize];
			assert_eq!(decoded.get_pixel(x, y).0, palette[index].to_rgb8(), "pixel ({x}, {y})");
		}
	}
}

#[test_log::test]
fn test_compressed_export() {
	let palettes = fixtures::palettes();
	let aux = fixtures::aux_palettes();
	let data = fixtures::archive(&[&fixtures::rle_record()]);
	let session = ArchiveSession::new(Resource::new("TEST.GR", 0, false), &data, &palettes, &aux).unwrap();

	let bmp = session.export_bitmap(0).unwrap().unwrap();
	let image = uw2gr_rs::file::bmp::decode(&bmp).unwrap();
	assert_eq!((image.width(), image.height()), (5, 2));
	assert_eq!(image.pixels(), fixtures::rle_pixels().as_slice());

	let decoded = image::load_from_memory_with_format(&bmp, ImageFormat::Bmp).unwrap().to_rgb8();
	assert_eq!(decoded.get_pixel(4, 1).0, session.palette()[37].to_rgb8());
}

#[test_log::test]
fn test_panel_export() {
	let palettes = fixtures::palettes();
	let aux = fixtures::aux_palettes();
	let panel = vec![3u8; 79 * 112];
	let border = vec![4u8; 3 * 112];
	let data = fixtures::archive(&[&panel, &[], &border]);
	let session = ArchiveSession::new(Resource::lookup("PANELS.GR").unwrap(), &data, &palettes, &aux).unwrap();

	let mappings = session.mappings_for_export();
	assert_eq!(mappings.iter().map(|(index, _)| index).collect::<Vec<_>>(), [0, 2]);
	assert_eq!(mappings.get(2), Some("panels_0002.bmp"));

	let bmp = session.export_bitmap(2).unwrap().unwrap();
	let decoded = image::load_from_memory_with_format(&bmp, ImageFormat::Bmp).unwrap();
	assert_eq!((decoded.width(), decoded.height()), (3, 112));
}
