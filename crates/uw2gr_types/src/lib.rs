//! This crate provides the codecs behind the `uw2gr-rs` project.
//!
//! # File Formats
//!
//! - **GR**: bitmap archives with an offset table, holding raw, nibble RLE and
//!   plain nibble records
//! - **BMP**: 8-bit indexed Windows bitmaps, uncompressed or RLE8
//! - **PALS / ALLPALS**: the 256-color palettes and the 16-entry auxiliary
//!   palettes used by compressed records
//! - **Mappings**: text lists pairing record indices with bitmap file names
//!
//! # Examples
//!
//! Using the prelude (recommended):
//!
//! ```no_run
//! use uw2gr_types::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let palettes = PaletteSet::open("PALS.DAT")?;
//! let aux_palettes = AuxPaletteSet::open("ALLPALS.DAT")?;
//!
//! let resource = Resource::lookup("HEADS.GR")?;
//! let data = std::fs::read("HEADS.GR")?;
//! let session = ArchiveSession::new(resource, &data, &palettes, &aux_palettes)?;
//!
//! if let Some(bmp) = session.export_bitmap(0)? {
//!     std::fs::write("heads_0000.bmp", bmp)?;
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Or use explicit paths:
//!
//! ```no_run
//! use uw2gr_types::file::gr::{File, Resource};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let archive = File::open("PANELS.GR", &Resource::lookup("PANELS.GR")?)?;
//! println!("{archive}");
//! # Ok(())
//! # }
//! ```

pub mod file;

/// `use uw2gr_types::prelude::*;` to import commonly used items.
pub mod prelude;
