//! Nibble-based bitmap decompression.
//!
//! ## Nibble RLE (type 8)
//!
//! The stream is a sequence of nibbles (high nibble of a byte first). Every
//! record starts with a variable-length count:
//!
//! | Leading nibbles      | Count                          |
//! |----------------------|--------------------------------|
//! | `n` (non-zero)       | `n`                            |
//! | `0 a b` (`ab != 0`)  | `0xab`                         |
//! | `0 0 0 c d e`        | `0xcde`                        |
//!
//! Two record kinds alternate:
//!
//! - **Repeat**: `count == 1` skips straight to a run record, `count == 2`
//!   reads a second count `N` announcing `N` consecutive repeat records.
//!   Any other count is followed by one nibble: the auxiliary palette key of
//!   the color written `count` times.
//! - **Run**: `count` nibbles follow, each resolved through the auxiliary
//!   palette and written once.
//!
//! Decoding stops as soon as either the nibble budget (`data_size`) or the
//! pixel budget (`width * height`) is used up. The two are not required to
//! agree.
//!
//! ## Plain nibbles (type 10)
//!
//! `data_size` nibbles copied as raw 4-bit pixel values.

use log::trace;

use crate::file::nibble::NibbleReader;
use crate::file::palette::AuxPalette;

/// Progress through a variable-length count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CountStage {
	/// Expecting the first nibble of a count
	First,
	/// A zero was read; expecting the high nibble of a 2-nibble count
	WideHigh,
	/// Expecting the low nibble of a 2-nibble count
	WideLow,
	/// The 2-nibble count was zero; this many nibbles remain
	Long(u8),
}

/// Assembles counts one nibble at a time.
#[derive(Debug, Clone, Copy)]
struct CountReader {
	stage: CountStage,
	value: i64,
}

impl CountReader {
	fn new() -> Self {
		Self {
			stage: CountStage::First,
			value: 0,
		}
	}

	/// Feeds one nibble, returning the count once it is complete.
	fn feed(&mut self, nibble: u8) -> Option<i64> {
		let nibble = i64::from(nibble);
		match self.stage {
			CountStage::First => {
				if nibble != 0 {
					return Some(nibble);
				}
				self.stage = CountStage::WideHigh;
				None
			}
			CountStage::WideHigh => {
				self.value = nibble;
				self.stage = CountStage::WideLow;
				None
			}
			CountStage::WideLow => {
				self.value = (self.value << 4) | nibble;
				if self.value != 0 {
					return self.finish();
				}
				self.stage = CountStage::Long(3);
				None
			}
			CountStage::Long(remaining) => {
				self.value = (self.value << 4) | nibble;
				if remaining == 1 {
					return self.finish();
				}
				self.stage = CountStage::Long(remaining - 1);
				None
			}
		}
	}

	fn finish(&mut self) -> Option<i64> {
		let value = self.value;
		*self = Self::new();
		Some(value)
	}
}

/// Which record the decoder is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Record {
	/// Waiting for the count of a repeat record
	Repeat,
	/// Waiting for the color key of a repeat record
	RepeatColor,
	/// Waiting for the number of consecutive repeat records
	RepeatCount,
	/// Waiting for the length of a run record
	Run,
	/// Copying the nibbles of a run record
	RunPixels,
}

/// Decompresses a type 8 payload into `pixel_count` palette indices.
///
/// At most `nibble_count` nibbles are consumed. The output always has
/// exactly `pixel_count` entries; pixels the stream never reaches stay 0.
pub fn decompress_rle(
	payload: &[u8],
	nibble_count: usize,
	pixel_count: usize,
	aux_palette: &AuxPalette,
) -> Vec<u8> {
	let mut output = vec![0u8; pixel_count];
	let mut reader = NibbleReader::new(payload);
	let mut counter = CountReader::new();

	let mut written = 0usize;
	let mut budget = nibble_count;
	let mut record = Record::Repeat;
	let mut count = 0i64;
	// Repeat records still queued by a `count == 2` marker. Goes negative when
	// the marker announces zero records, which leaves the queue unbounded.
	let mut pending_repeats = 0i64;

	while budget > 0 && written < pixel_count {
		let nibble = reader.read();
		budget -= 1;

		match record {
			Record::RepeatColor => {
				let color = aux_palette.resolve(nibble);
				let end = written.saturating_add(count.max(0) as usize).min(pixel_count);
				output[written..end].fill(color);
				written = end;

				if pending_repeats == 0 {
					record = Record::Run;
				} else {
					pending_repeats -= 1;
					record = Record::Repeat;
				}
			}
			Record::RunPixels => {
				output[written] = aux_palette.resolve(nibble);
				written += 1;

				count -= 1;
				if count == 0 {
					record = Record::Repeat;
				}
			}
			Record::Repeat | Record::RepeatCount | Record::Run => {
				let Some(value) = counter.feed(nibble) else {
					continue;
				};
				count = value;

				record = match record {
					Record::Repeat => match count {
						1 => Record::Run,
						2 => Record::RepeatCount,
						_ => Record::RepeatColor,
					},
					Record::RepeatCount => {
						pending_repeats = count - 1;
						Record::Repeat
					}
					_ => Record::RunPixels,
				};
			}
		}
	}

	if budget > 0 || written < pixel_count {
		trace!(
			"nibble RLE stopped with {} nibbles and {} pixels left",
			budget,
			pixel_count - written
		);
	}

	output
}

/// Unpacks a type 10 payload: `nibble_count` raw 4-bit pixels.
pub fn decompress_nibbles(payload: &[u8], nibble_count: usize) -> Vec<u8> {
	let mut reader = NibbleReader::new(payload);
	(0..nibble_count).map(|_| reader.read()).collect()
}
