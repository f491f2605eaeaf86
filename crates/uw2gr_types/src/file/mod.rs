//! File type support for `uw2gr-rs` project.

mod bytes;
mod error;

pub mod bmp;
pub mod gr;
pub mod mapping;
pub mod nibble;
pub mod palette;

// Re-export unified error type
pub use error::{ErrorKind, FileType, GrFileError};

// Re-export main file types
pub use bmp::{Compression as BmpCompression, IndexedImage};
pub use gr::{
	ArchiveSession, Bitmap as GrBitmap, BitmapInfo as GrBitmapInfo, BitmapKind, File as GrFile,
	RecordLayout, Resource,
};
pub use mapping::Mappings;
pub use nibble::NibbleReader;
pub use palette::{AuxPalette, AuxPaletteSet, Color, Palette, PaletteSet};
