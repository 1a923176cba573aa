use std::io::{BufRead, IsTerminal, Write};

use v_utils::prelude::*;

const IDENTIFIER_PROMPT: &str = " User ID, username, email or phone number: ";

/// Ask for a single user identifier on stdin.
pub fn ask_identifier() -> Result<String> {
	let stdin = std::io::stdin();
	let interactive = stdin.is_terminal();
	read_identifier(stdin.lock(), std::io::stderr(), interactive)
}

fn read_identifier(mut input: impl BufRead, mut prompt_to: impl Write, show_prompt: bool) -> Result<String> {
	if show_prompt {
		write!(prompt_to, "{IDENTIFIER_PROMPT}")?;
		prompt_to.flush()?;
	}

	let mut line = String::new();
	input.read_line(&mut line)?;
	let identifier = line.trim();
	if identifier.is_empty() {
		bail!("a user identifier is required");
	}
	Ok(identifier.to_string())
}
