//! Error types for file format parsing and manipulation.

use std::fmt;

use thiserror::Error;

/// File formats handled by this crate, used to tag errors with their origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileType {
	/// `.GR` bitmap archive
	Gr,
	/// 8-bit indexed Windows bitmap
	Bmp,
	/// `PALS.DAT` palette file
	Palette,
	/// `ALLPALS.DAT` auxiliary palette file
	AuxPalette,
	/// Text mapping list produced on extraction
	Mappings,
}

impl fmt::Display for FileType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			FileType::Gr => write!(f, "GR"),
			FileType::Bmp => write!(f, "BMP"),
			FileType::Palette => write!(f, "PALS"),
			FileType::AuxPalette => write!(f, "ALLPALS"),
			FileType::Mappings => write!(f, "mappings"),
		}
	}
}

/// Broad classification of a [`GrFileError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
	/// Input bytes do not describe a valid structure
	MalformedInput,
	/// An imported image does not match the record it replaces
	DimensionMismatch,
	/// Input is well formed but uses a feature that is not supported
	PreconditionViolation,
	/// Underlying I/O failure
	Io,
}

/// Unified error type for every format in this crate.
#[derive(Debug, Error)]
pub enum GrFileError {
	/// Not enough data to parse
	#[error("{file_type}: insufficient data: expected {expected} bytes, got {actual} bytes")]
	InsufficientData {
		/// Format being parsed
		file_type: FileType,
		/// Expected number of bytes
		expected: usize,
		/// Actual number of bytes
		actual: usize,
	},

	/// Invalid magic number or format tag
	#[error("{file_type}: invalid magic: expected {expected:02X?}, got {actual:02X?}")]
	InvalidMagic {
		/// Format being parsed
		file_type: FileType,
		/// Expected bytes
		expected: Vec<u8>,
		/// Bytes found in the input
		actual: Vec<u8>,
	},

	/// Bitmap record with a storage kind other than 4, 8 or 10
	#[error("GR: unsupported bitmap type: {0}")]
	UnsupportedBitmapKind(u8),

	/// Auxiliary palette index larger than 31
	#[error("GR: auxiliary palette index out of range: {index}")]
	AuxPaletteOutOfRange {
		/// Index read from the record header
		index: u8,
	},

	/// Compressed record in an archive that does not use palette 0
	#[error(
		"GR: record {record} is compressed but the archive uses palette {palette_index} (only palette 0 allowed)"
	)]
	CompressedPaletteIndex {
		/// Record index
		record: usize,
		/// Palette index of the archive
		palette_index: u8,
	},

	/// Offset table entry out of order or pointing past the end of the file
	#[error("GR: invalid offset table at record {index}: {start}..{end}")]
	InvalidOffsetTable {
		/// Record index
		index: usize,
		/// Start offset
		start: u32,
		/// End offset
		end: u32,
	},

	/// Structurally valid input whose content cannot be decoded
	#[error("{file_type}: corrupt data: {message}")]
	CorruptData {
		/// Format being parsed
		file_type: FileType,
		/// What went wrong
		message: String,
	},

	/// Archive without a single bitmap
	#[error("GR: archive is empty")]
	EmptyArchive,

	/// Archive larger than the engine allows
	#[error("GR: file too large: {size} bytes (max {max})")]
	FileTooLarge {
		/// Size of the input
		size: usize,
		/// Upper bound
		max: usize,
	},

	/// Imported image does not have the dimensions of the record it replaces
	#[error(
		"bitmap {index}: dimensions mismatch: record is {}x{}, image is {}x{}",
		.expected.0,
		.expected.1,
		.actual.0,
		.actual.1
	)]
	DimensionMismatch {
		/// Record index
		index: usize,
		/// Width and height of the record
		expected: (u16, u16),
		/// Width and height of the imported image
		actual: (u16, u16),
	},

	/// Input uses an unsupported feature
	#[error("{file_type}: unsupported: {message}")]
	Unsupported {
		/// Format being parsed
		file_type: FileType,
		/// What is unsupported
		message: String,
	},

	/// Requested entry does not exist
	#[error("{file_type}: entry not found: {message}")]
	EntryNotFound {
		/// Format being accessed
		file_type: FileType,
		/// Description of the missing entry
		message: String,
	},

	/// Malformed mapping list
	#[error("mappings: line {line}: {message}")]
	InvalidMapping {
		/// 1-based line number, 0 for whole-file errors
		line: usize,
		/// What went wrong
		message: String,
	},

	/// IO error
	#[error(transparent)]
	IoError(#[from] std::io::Error),
}

impl GrFileError {
	/// Shorthand for [`GrFileError::InsufficientData`].
	pub fn insufficient_data(file_type: FileType, expected: usize, actual: usize) -> Self {
		Self::InsufficientData {
			file_type,
			expected,
			actual,
		}
	}

	/// Shorthand for [`GrFileError::InvalidMagic`].
	pub fn invalid_magic(file_type: FileType, expected: &[u8], actual: &[u8]) -> Self {
		Self::InvalidMagic {
			file_type,
			expected: expected.to_vec(),
			actual: actual.to_vec(),
		}
	}

	/// Shorthand for [`GrFileError::CorruptData`].
	pub fn corrupt(file_type: FileType, message: impl Into<String>) -> Self {
		Self::CorruptData {
			file_type,
			message: message.into(),
		}
	}

	/// Shorthand for [`GrFileError::Unsupported`].
	pub fn unsupported(file_type: FileType, message: impl Into<String>) -> Self {
		Self::Unsupported {
			file_type,
			message: message.into(),
		}
	}

	/// Returns the broad class of this error.
	pub fn kind(&self) -> ErrorKind {
		match self {
			Self::DimensionMismatch {
				..
			} => ErrorKind::DimensionMismatch,
			Self::Unsupported {
				..
			} => ErrorKind::PreconditionViolation,
			Self::IoError(_) => ErrorKind::Io,
			_ => ErrorKind::MalformedInput,
		}
	}
}
