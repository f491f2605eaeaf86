//! Confirmation before replacing existing files.

use std::fmt;
use std::path::Path;

use anyhow::{Result, bail};
use inquire::Select;

/// Answer to the overwrite prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Answer {
	All,
	Yes,
	No,
	Cancel,
}

impl Answer {
	const OPTIONS: [Answer; 4] = [Answer::All, Answer::Yes, Answer::No, Answer::Cancel];
}

impl fmt::Display for Answer {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let text = match self {
			Answer::All => "all",
			Answer::Yes => "yes",
			Answer::No => "no",
			Answer::Cancel => "cancel",
		};
		f.write_str(text)
	}
}

/// Asks before each overwrite until the user answers "all" or "cancel".
#[derive(Debug, Default)]
pub struct OverwriteGuard {
	sticky: Option<Answer>,
}

impl OverwriteGuard {
	/// Creates a guard; `assume_yes` answers "all" up front.
	pub fn new(assume_yes: bool) -> Self {
		Self {
			sticky: assume_yes.then_some(Answer::All),
		}
	}

	/// Returns `true` if `path` may be written and `false` to skip it.
	///
	/// Fails once the user cancels.
	pub fn check(&mut self, path: &Path) -> Result<bool> {
		match self.sticky {
			Some(Answer::All) => return Ok(true),
			Some(Answer::Cancel) => bail!("canceled by user"),
			_ => {}
		}

		if !path.exists() {
			return Ok(true);
		}

		let message = format!("File \"{}\" already exists. Overwrite?", path.display());
		let answer = Select::new(&message, Answer::OPTIONS.to_vec())
			.with_help_message("\"all\" and \"cancel\" apply to every remaining file")
			.prompt()?;

		match answer {
			Answer::All => {
				self.sticky = Some(Answer::All);
				Ok(true)
			}
			Answer::Yes => Ok(true),
			Answer::No => Ok(false),
			Answer::Cancel => {
				self.sticky = Some(Answer::Cancel);
				bail!("canceled by user")
			}
		}
	}
}
