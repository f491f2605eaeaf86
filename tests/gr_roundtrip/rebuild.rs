use image::ExtendedColorType;
use image::codecs::bmp::BmpEncoder;
use uw2gr_rs::prelude::*;

use crate::fixtures;

#[test_log::test]
fn test_raw_roundtrip_is_identical() {
	let palettes = fixtures::palettes();
	let aux = fixtures::aux_palettes();
	let data = fixtures::archive(&[&fixtures::raw_record(79, 3), &[], &fixtures::raw_record(1, 1)]);
	let mut session = ArchiveSession::new(Resource::new("TEST.GR", 0, false), &data, &palettes, &aux).unwrap();

	for index in [0, 2] {
		let bmp = session.export_bitmap(index).unwrap().unwrap();
		session.import_bitmap(index, &bmp).unwrap();
	}

	assert_eq!(session.to_bytes(), data);
}

#[test_log::test]
fn test_compressed_roundtrip_becomes_raw() {
	let palettes = fixtures::palettes();
	let aux = fixtures::aux_palettes();
	let data = fixtures::archive(&[&fixtures::rle_record()]);
	let mut session = ArchiveSession::new(Resource::new("TEST.GR", 0, false), &data, &palettes, &aux).unwrap();

	let bmp = session.export_bitmap(0).unwrap().unwrap();
	session.import_bitmap(0, &bmp).unwrap();

	let rebuilt = session.to_bytes();
	let archive = GrFile::from_bytes(&rebuilt, session.resource()).unwrap();
	let bitmap = archive.get(0).unwrap();
	assert_eq!(bitmap.kind(), BitmapKind::Raw);
	assert_eq!(bitmap.aux_palette(), None);
	assert_eq!(bitmap.payload(), fixtures::rle_pixels().as_slice());

	let offsets = archive.offsets();
	assert_eq!(offsets[1] as usize, rebuilt.len());
	assert_eq!(offsets[1] - offsets[0], 5 + 10);
}

#[test_log::test]
fn test_import_bottom_up_bmp_from_image_crate() {
	let palettes = fixtures::palettes();
	let aux = fixtures::aux_palettes();
	let data = fixtures::archive(&[&fixtures::raw_record(6, 4)]);
	let mut session = ArchiveSession::new(Resource::new("TEST.GR", 0, false), &data, &palettes, &aux).unwrap();

	let pixels: Vec<u8> = (0..24).map(|i| i * 10).collect();
	let mut bmp = Vec::new();
	BmpEncoder::new(&mut bmp).encode(&pixels, 6, 4, ExtendedColorType::L8).unwrap();

	session.import_bitmap(0, &bmp).unwrap();
	assert_eq!(session.archive().get(0).unwrap().payload(), pixels.as_slice());
}

#[test_log::test]
fn test_dimension_mismatch() {
	let palettes = fixtures::palettes();
	let aux = fixtures::aux_palettes();
	let panel = vec![3u8; 79 * 112];
	let border = vec![4u8; 3 * 112];
	let data = fixtures::archive(&[&panel, &border]);
	let mut session = ArchiveSession::new(Resource::lookup("PANELS.GR").unwrap(), &data, &palettes, &aux).unwrap();

	let image = IndexedImage::new(64, 64, vec![1; 64 * 64]).unwrap();
	let bmp = encode_bmp(&image, session.palette());
	let err = session.import_bitmap(0, &bmp).unwrap_err();
	assert_eq!(err.kind(), ErrorKind::DimensionMismatch);
	assert_eq!(session.to_bytes(), data);
}

#[test_log::test]
fn test_rebuild_through_mapping_list() {
	let dir = fixtures::scratch_dir("rebuild");
	let palettes = fixtures::palettes();
	let aux = fixtures::aux_palettes();
	let resource = Resource::lookup("heads.gr").unwrap();
	let data = fixtures::archive(&[&fixtures::raw_record(4, 4), &[], &fixtures::rle_record()]);

	// extract
	let session = ArchiveSession::new(resource.clone(), &data, &palettes, &aux).unwrap();
	let mappings = session.mappings_for_export();
	for (index, name) in mappings.iter() {
		std::fs::write(dir.join(name), session.export_bitmap(index).unwrap().unwrap()).unwrap();
	}
	mappings.save(dir.join(resource.mappings_file_name())).unwrap();

	// edit one bitmap
	let edited = IndexedImage::new(4, 4, vec![200; 16]).unwrap();
	std::fs::write(dir.join("heads_0000.bmp"), encode_bmp(&edited, session.palette())).unwrap();

	// rebuild
	let mappings = Mappings::open(dir.join("heads_mappings.txt")).unwrap();
	assert_eq!(mappings.len(), 2);
	let mut session = ArchiveSession::new(resource.clone(), &data, &palettes, &aux).unwrap();
	let replaced = session
		.apply_mappings(&mappings, |name| Ok(std::fs::read(dir.join(name))?))
		.unwrap();
	assert_eq!(replaced, 2);

	let archive = GrFile::from_bytes(&session.to_bytes(), &resource).unwrap();
	assert_eq!(archive.get(0).unwrap().payload(), &[200; 16]);
	assert!(archive.get(1).unwrap().is_empty());
	assert_eq!(archive.get(2).unwrap().payload(), fixtures::rle_pixels().as_slice());

	std::fs::remove_dir_all(&dir).unwrap();
}
