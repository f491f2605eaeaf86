//! 4-bit stream reader used by the compressed bitmap kinds.

/// Reads a byte slice as a sequence of nibbles, high nibble first.
///
/// Reading past the end yields `0` forever. The decompressors bound their
/// reads with a separately tracked nibble count and rely on these trailing
/// zeros being harmless input.
#[derive(Debug, Clone)]
pub struct NibbleReader<'a> {
	data: &'a [u8],
	offset: usize,
	low_pending: Option<u8>,
}

impl<'a> NibbleReader<'a> {
	/// Creates a reader over `data`.
	pub fn new(data: &'a [u8]) -> Self {
		Self {
			data,
			offset: 0,
			low_pending: None,
		}
	}

	/// Returns the next nibble, or `0` once the data is exhausted.
	#[inline]
	pub fn read(&mut self) -> u8 {
		if let Some(low) = self.low_pending.take() {
			return low;
		}

		let Some(&octet) = self.data.get(self.offset) else {
			return 0;
		};
		self.offset += 1;
		self.low_pending = Some(octet & 0x0F);
		octet >> 4
	}

	/// Returns `true` once every nibble of the underlying data has been read.
	pub fn is_exhausted(&self) -> bool {
		self.low_pending.is_none() && self.offset >= self.data.len()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_high_nibble_first() {
		let mut reader = NibbleReader::new(&[0x12, 0x34]);
		let nibbles: Vec<u8> = (0..4).map(|_| reader.read()).collect();
		assert_eq!(nibbles, [1, 2, 3, 4]);
		assert!(reader.is_exhausted());
	}

	#[test]
	fn test_zero_past_end() {
		let mut reader = NibbleReader::new(&[0xAB]);
		assert_eq!(reader.read(), 0xA);
		assert!(!reader.is_exhausted());
		assert_eq!(reader.read(), 0xB);
		for _ in 0..16 {
			assert_eq!(reader.read(), 0);
		}
	}

	#[test]
	fn test_empty() {
		let mut reader = NibbleReader::new(&[]);
		assert!(reader.is_exhausted());
		assert_eq!(reader.read(), 0);
	}
}
