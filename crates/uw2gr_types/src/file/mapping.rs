//! Mapping lists: which bitmap file replaces which archive record.
//!
//! A list is plain text made of `<index> <file name>` pairs separated by
//! whitespace, normally one pair per line:
//!
//! ```text
//! 0 heads_0000.bmp
//! 1 heads_0001.bmp
//! ```
//!
//! File names are relative to the directory holding the list and cannot
//! contain whitespace.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::file::GrFileError;

/// Record index to file name associations, ordered by index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Mappings(BTreeMap<usize, String>);

impl Mappings {
	/// Creates an empty list.
	pub fn new() -> Self {
		Self::default()
	}

	/// Parses a mapping list.
	///
	/// # Errors
	///
	/// Returns [`GrFileError::InvalidMapping`] if an index is not a
	/// non-negative number, a name is missing, an index appears twice or the
	/// list holds no pair at all.
	pub fn parse(text: &str) -> Result<Self, GrFileError> {
		let mut tokens = text
			.lines()
			.enumerate()
			.flat_map(|(line, content)| content.split_whitespace().map(move |token| (line + 1, token)));

		let mut mappings = BTreeMap::new();
		while let Some((line, token)) = tokens.next() {
			let index = parse_index(line, token)?;

			let Some((_, name)) = tokens.next() else {
				return Err(invalid(line, format!("missing file name for bitmap {index}")));
			};

			if mappings.insert(index, name.to_string()).is_some() {
				return Err(invalid(line, format!("duplicate bitmap index {index}")));
			}
		}

		if mappings.is_empty() {
			return Err(invalid(0, "no records"));
		}

		Ok(Self(mappings))
	}

	/// Loads a mapping list from disk.
	pub fn open(path: impl AsRef<Path>) -> Result<Self, GrFileError> {
		let text = std::fs::read_to_string(path)?;
		Self::parse(&text)
	}

	/// Saves the list, one pair per line.
	pub fn save(&self, path: impl AsRef<Path>) -> Result<(), GrFileError> {
		std::fs::write(path, self.to_string())?;
		Ok(())
	}

	/// Associates `name` with record `index`, returning the previous name.
	pub fn insert(&mut self, index: usize, name: impl Into<String>) -> Option<String> {
		self.0.insert(index, name.into())
	}

	/// Returns the file name of record `index`.
	pub fn get(&self, index: usize) -> Option<&str> {
		self.0.get(&index).map(String::as_str)
	}

	/// Iterates over the pairs in ascending index order.
	pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
		self.0.iter().map(|(index, name)| (*index, name.as_str()))
	}

	/// Returns the number of pairs.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns `true` if the list holds no pair.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

fn invalid(line: usize, message: impl Into<String>) -> GrFileError {
	GrFileError::InvalidMapping {
		line,
		message: message.into(),
	}
}

fn parse_index(line: usize, token: &str) -> Result<usize, GrFileError> {
	match token.parse::<i64>() {
		Ok(index) if index < 0 => Err(invalid(line, format!("negative bitmap index {index}"))),
		Ok(index) => usize::try_from(index)
			.map_err(|_| invalid(line, format!("bitmap index {index} out of range"))),
		Err(_) => Err(invalid(line, format!("invalid bitmap index \"{token}\""))),
	}
}

impl FromStr for Mappings {
	type Err = GrFileError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::parse(s)
	}
}

impl fmt::Display for Mappings {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for (index, name) in self.iter() {
			writeln!(f, "{index} {name}")?;
		}
		Ok(())
	}
}
