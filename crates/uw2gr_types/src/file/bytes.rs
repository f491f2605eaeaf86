//! Bounds-checked little-endian reads.

use super::{FileType, GrFileError};

/// Little-endian reads over a byte slice with bounds checks.
///
/// Every accessor reports a short buffer as [`GrFileError::InsufficientData`]
/// tagged with the owning format.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ByteReader<'a> {
	data: &'a [u8],
	offset: usize,
	file_type: FileType,
}

impl<'a> ByteReader<'a> {
	pub(crate) fn new(data: &'a [u8], file_type: FileType) -> Self {
		Self {
			data,
			offset: 0,
			file_type,
		}
	}

	pub(crate) fn offset(&self) -> usize {
		self.offset
	}

	pub(crate) fn take(&mut self, len: usize) -> Result<&'a [u8], GrFileError> {
		let end = self.offset.saturating_add(len);
		let Some(bytes) = self.data.get(self.offset..end) else {
			return Err(GrFileError::insufficient_data(self.file_type, end, self.data.len()));
		};
		self.offset = end;
		Ok(bytes)
	}

	pub(crate) fn u8(&mut self) -> Result<u8, GrFileError> {
		Ok(self.take(1)?[0])
	}

	pub(crate) fn u16(&mut self) -> Result<u16, GrFileError> {
		let b = self.take(2)?;
		Ok(u16::from_le_bytes([b[0], b[1]]))
	}

	pub(crate) fn u32(&mut self) -> Result<u32, GrFileError> {
		let b = self.take(4)?;
		Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
	}

	pub(crate) fn i32(&mut self) -> Result<i32, GrFileError> {
		let b = self.take(4)?;
		Ok(i32::from_le_bytes([b[0], b[1], b[2], b[3]]))
	}
}
