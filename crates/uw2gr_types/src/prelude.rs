//! Prelude module for `uw2gr_types`.
//!
//! This module provides a convenient way to import commonly used types.
//!
//! # Examples
//!
//! ```
//! use uw2gr_types::prelude::*;
//!
//! let mappings: Mappings = "0 heads_0000.bmp".parse().unwrap();
//! assert_eq!(mappings.get(0), Some("heads_0000.bmp"));
//! ```

// File module types
#[doc(inline)]
pub use crate::file::{
	// Session
	ArchiveSession,

	// Palette types
	AuxPalette,
	AuxPaletteSet,

	// GR types
	BitmapKind,
	Color,
	ErrorKind,
	FileType,
	GrBitmap,
	GrFile,
	GrFileError,

	// BMP types
	IndexedImage,

	// Mapping list
	Mappings,

	Palette,
	PaletteSet,
	RecordLayout,
	Resource,
};

// Codec entry points
#[doc(inline)]
pub use crate::file::bmp::{decode as decode_bmp, encode as encode_bmp};

// Re-export the file module for advanced usage
#[doc(inline)]
pub use crate::file;
