//! Palette support.
//!
//! The game keeps two palette files next to its archives:
//!
//! - `PALS.DAT`: 8 consecutive palettes of 256 RGB triples (768 bytes each).
//!   Channels use 6-bit VGA precision (0-63).
//! - `ALLPALS.DAT`: 32 auxiliary palettes of 16 bytes each. An auxiliary
//!   palette maps a 4-bit value to an index into the main palette and is
//!   only used by compressed bitmaps.

use std::fmt;
use std::path::Path;

use crate::file::{FileType, GrFileError};

/// RGB color with 6-bit channels, as stored in `PALS.DAT`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Color {
	/// Red component (0-63)
	pub r: u8,
	/// Green component (0-63)
	pub g: u8,
	/// Blue component (0-63)
	pub b: u8,
}

impl Color {
	/// Creates a new 6-bit color.
	pub const fn new(r: u8, g: u8, b: u8) -> Self {
		Self {
			r,
			g,
			b,
		}
	}

	/// Scales a 6-bit channel to 8 bits, rounding to nearest.
	#[inline]
	pub const fn scale_channel(value: u8) -> u8 {
		let scaled = (value as u16 * 255 + 31) / 63;
		if scaled > 255 { 255 } else { scaled as u8 }
	}

	/// Returns the color as an 8-bit `[r, g, b]` triple.
	pub const fn to_rgb8(&self) -> [u8; 3] {
		[Self::scale_channel(self.r), Self::scale_channel(self.g), Self::scale_channel(self.b)]
	}

	/// Returns the color as a Windows bitmap palette entry (`[b, g, r, 0]`).
	pub const fn to_bgr0(&self) -> [u8; 4] {
		let [r, g, b] = self.to_rgb8();
		[b, g, r, 0]
	}
}

impl fmt::Display for Color {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "RGB6({}, {}, {})", self.r, self.g, self.b)
	}
}

/// 256-color palette with 6-bit channels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
	colors: [Color; 256],
}

impl Palette {
	/// Number of colors in a palette
	pub const COLOR_COUNT: usize = 256;

	/// Size of a serialized palette in bytes
	pub const SIZE: usize = Self::COLOR_COUNT * 3;

	/// Creates a palette with every color set to black.
	pub fn new() -> Self {
		Self {
			colors: [Color::default(); 256],
		}
	}

	/// Creates a grayscale palette, index `i` mapping to `i / 4`.
	pub fn grayscale() -> Self {
		let mut palette = Self::new();
		for (i, color) in palette.colors.iter_mut().enumerate() {
			let v = (i / 4) as u8;
			*color = Color::new(v, v, v);
		}
		palette
	}

	/// Loads a palette from 768 bytes of RGB triples.
	pub fn from_bytes(data: &[u8]) -> Result<Self, GrFileError> {
		if data.len() < Self::SIZE {
			return Err(GrFileError::insufficient_data(FileType::Palette, Self::SIZE, data.len()));
		}

		let mut palette = Self::new();
		for (color, rgb) in palette.colors.iter_mut().zip(data.chunks_exact(3)) {
			*color = Color::new(rgb[0], rgb[1], rgb[2]);
		}
		Ok(palette)
	}

	/// Converts the palette back to 768 bytes of RGB triples.
	pub fn to_bytes(&self) -> Vec<u8> {
		let mut data = Vec::with_capacity(Self::SIZE);
		for color in &self.colors {
			data.extend_from_slice(&[color.r, color.g, color.b]);
		}
		data
	}

	/// Builds the 1024-byte color table of a Windows bitmap.
	pub fn to_bmp_color_table(&self) -> Vec<u8> {
		self.colors.iter().flat_map(Color::to_bgr0).collect()
	}

	/// Gets a color by index.
	#[inline]
	pub fn get(&self, index: u8) -> Color {
		self.colors[index as usize]
	}

	/// Sets a color at the specified index.
	#[inline]
	pub fn set(&mut self, index: u8, color: Color) {
		self.colors[index as usize] = color;
	}

	/// Returns a reference to the color array.
	#[inline]
	pub fn colors(&self) -> &[Color; 256] {
		&self.colors
	}
}

impl Default for Palette {
	fn default() -> Self {
		Self::new()
	}
}

impl std::ops::Index<u8> for Palette {
	type Output = Color;

	fn index(&self, index: u8) -> &Self::Output {
		&self.colors[index as usize]
	}
}

/// The palettes of `PALS.DAT`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteSet {
	palettes: Vec<Palette>,
}

impl PaletteSet {
	/// Number of palettes in `PALS.DAT`
	pub const COUNT: usize = 8;

	/// Size of `PALS.DAT` in bytes
	pub const FILE_SIZE: usize = Self::COUNT * Palette::SIZE;

	/// Standard file name
	pub const FILE_NAME: &'static str = "PALS.DAT";

	/// Creates a set from already loaded palettes.
	pub fn new(palettes: Vec<Palette>) -> Self {
		Self {
			palettes,
		}
	}

	/// Loads all palettes from the contents of `PALS.DAT`.
	pub fn from_bytes(data: &[u8]) -> Result<Self, GrFileError> {
		if data.len() < Self::FILE_SIZE {
			return Err(GrFileError::insufficient_data(
				FileType::Palette,
				Self::FILE_SIZE,
				data.len(),
			));
		}

		let palettes = data
			.chunks_exact(Palette::SIZE)
			.take(Self::COUNT)
			.map(Palette::from_bytes)
			.collect::<Result<Vec<_>, _>>()?;
		Ok(Self {
			palettes,
		})
	}

	/// Loads `PALS.DAT` from disk.
	pub fn open(path: impl AsRef<Path>) -> Result<Self, GrFileError> {
		let data = std::fs::read(path)?;
		Self::from_bytes(&data)
	}

	/// Returns the palette at `index`.
	pub fn get(&self, index: usize) -> Option<&Palette> {
		self.palettes.get(index)
	}

	/// Returns the number of palettes.
	pub fn len(&self) -> usize {
		self.palettes.len()
	}

	/// Returns `true` if the set holds no palette.
	pub fn is_empty(&self) -> bool {
		self.palettes.is_empty()
	}
}

/// Maps a 4-bit value to an index of the main palette.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct AuxPalette(pub [u8; 16]);

impl AuxPalette {
	/// Resolves a nibble to a main palette index.
	#[inline]
	pub fn resolve(&self, nibble: u8) -> u8 {
		self.0[(nibble & 0x0F) as usize]
	}
}

/// The 32 auxiliary palettes of `ALLPALS.DAT`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuxPaletteSet {
	palettes: [AuxPalette; 32],
}

impl AuxPaletteSet {
	/// Number of auxiliary palettes
	pub const COUNT: usize = 32;

	/// Number of entries per auxiliary palette
	pub const ENTRY_COUNT: usize = 16;

	/// Size of `ALLPALS.DAT` in bytes
	pub const FILE_SIZE: usize = Self::COUNT * Self::ENTRY_COUNT;

	/// Standard file name
	pub const FILE_NAME: &'static str = "ALLPALS.DAT";

	/// Creates a set from 32 auxiliary palettes.
	pub fn new(palettes: [AuxPalette; 32]) -> Self {
		Self {
			palettes,
		}
	}

	/// Loads the set from the contents of `ALLPALS.DAT`.
	pub fn from_bytes(data: &[u8]) -> Result<Self, GrFileError> {
		if data.len() < Self::FILE_SIZE {
			return Err(GrFileError::insufficient_data(
				FileType::AuxPalette,
				Self::FILE_SIZE,
				data.len(),
			));
		}

		let mut palettes = [AuxPalette::default(); 32];
		for (palette, chunk) in palettes.iter_mut().zip(data.chunks_exact(Self::ENTRY_COUNT)) {
			palette.0.copy_from_slice(chunk);
		}
		Ok(Self {
			palettes,
		})
	}

	/// Loads `ALLPALS.DAT` from disk.
	pub fn open(path: impl AsRef<Path>) -> Result<Self, GrFileError> {
		let data = std::fs::read(path)?;
		Self::from_bytes(&data)
	}

	/// Returns the auxiliary palette at `index`, rejecting indices above 31.
	pub fn get(&self, index: u8) -> Result<&AuxPalette, GrFileError> {
		self.palettes.get(index as usize).ok_or(GrFileError::AuxPaletteOutOfRange {
			index,
		})
	}
}

impl Default for AuxPaletteSet {
	/// Identity mapping: every auxiliary palette resolves `n` to `n`.
	fn default() -> Self {
		let identity = AuxPalette(std::array::from_fn(|i| i as u8));
		Self::new([identity; 32])
	}
}
