//! Known `.GR` archives and the palette each one uses.

use serde::Serialize;

use crate::file::{FileType, GrFileError};

/// File name of the panel archive.
pub const PANELS: &str = "PANELS.GR";

/// Suffix of the mapping list written next to extracted bitmaps.
pub const MAPPINGS_SUFFIX: &str = "_mappings.txt";

/// Every archive shipped with the game and its palette index in `PALS.DAT`.
pub const RESOURCES: [(&str, u8); 35] = [
	("3DWIN.GR", 0),
	("ANIMO.GR", 0),
	("ARMOR_F.GR", 0),
	("ARMOR_M.GR", 0),
	("BODIES.GR", 0),
	("BUTTONS.GR", 0),
	("CHAINS.GR", 0),
	("CHARHEAD.GR", 0),
	("CHRBTNS.GR", 3),
	("COMPASS.GR", 0),
	("CONVERSE.GR", 0),
	("CURSORS.GR", 0),
	("DOORS.GR", 0),
	("DRAGONS.GR", 0),
	("EYES.GR", 0),
	("FLASKS.GR", 0),
	("GEMPT.GR", 0),
	("GENHEAD.GR", 0),
	("GHED.GR", 0),
	("HEADS.GR", 0),
	("INV.GR", 0),
	("LFTI.GR", 0),
	("OBJECTS.GR", 0),
	("OPBTN.GR", 2),
	("OPTB.GR", 0),
	("OPTBTNS.GR", 0),
	(PANELS, 0),
	("POWER.GR", 0),
	("QUESTION.GR", 0),
	("SCRLEDGE.GR", 0),
	("SPELLS.GR", 0),
	("TMFLAT.GR", 0),
	("TMOBJ.GR", 0),
	("VIEWS.GR", 0),
	("WEAP.GR", 0),
];

/// Description of one archive: its name, palette and layout.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Resource {
	name: String,
	palette_index: u8,
	panels: bool,
}

impl Resource {
	/// Describes an archive that is not in [`RESOURCES`].
	pub fn new(name: impl Into<String>, palette_index: u8, panels: bool) -> Self {
		Self {
			name: name.into(),
			palette_index,
			panels,
		}
	}

	/// Looks up a known archive by file name, ignoring case.
	///
	/// # Errors
	///
	/// Returns [`GrFileError::EntryNotFound`] for a name the game does not use.
	pub fn lookup(file_name: &str) -> Result<Self, GrFileError> {
		let name = file_name.to_ascii_uppercase();
		let Some(&(_, palette_index)) = RESOURCES.iter().find(|(known, _)| *known == name) else {
			return Err(GrFileError::EntryNotFound {
				file_type: FileType::Gr,
				message: format!("no such resource: {name}"),
			});
		};

		let panels = name == PANELS;
		Ok(Self {
			name,
			palette_index,
			panels,
		})
	}

	/// Returns the upper-case file name.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Returns the index of the palette in `PALS.DAT`.
	pub fn palette_index(&self) -> u8 {
		self.palette_index
	}

	/// Returns `true` for the panel archive.
	pub fn is_panels(&self) -> bool {
		self.panels
	}

	/// Lower-case file name without its extension.
	pub fn base_name(&self) -> String {
		let stem = match self.name.rsplit_once('.') {
			Some((stem, _)) => stem,
			None => &self.name,
		};
		stem.to_ascii_lowercase()
	}

	/// Name of the exported bitmap for record `index`.
	pub fn bitmap_file_name(&self, index: usize) -> String {
		format!("{}_{:04}.bmp", self.base_name(), index)
	}

	/// Name of the mapping list.
	pub fn mappings_file_name(&self) -> String {
		format!("{}{}", self.base_name(), MAPPINGS_SUFFIX)
	}
}
