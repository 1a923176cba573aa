use userblocks::UserBlock;
use v_utils::prelude::*;

const HEADERS: [&str; 3] = ["IDENTIFIER", "IP", "CONNECTION"];
const MISSING: &str = "-";

pub fn user_blocks_list(blocks: &[UserBlock], json: bool) -> Result<()> {
	if json {
		println!("{}", blocks_json(blocks)?);
		return Ok(());
	}

	if blocks.is_empty() {
		eprintln!("No user blocks found.");
		return Ok(());
	}
	println!("{}", blocks_table(blocks));
	Ok(())
}

pub fn blocks_json(blocks: &[UserBlock]) -> Result<String> {
	Ok(serde_json::to_string_pretty(blocks)?)
}

/// Columns padded to their widest cell, two spaces apart, no trailing whitespace.
pub fn blocks_table(blocks: &[UserBlock]) -> String {
	let rows: Vec<[&str; 3]> = blocks
		.iter()
		.map(|b| {
			[
				b.identifier.as_deref().unwrap_or(MISSING),
				b.ip.as_deref().unwrap_or(MISSING),
				b.connection.as_deref().unwrap_or(MISSING),
			]
		})
		.collect();

	let mut widths = HEADERS.map(|h| h.chars().count());
	for row in &rows {
		for (w, cell) in widths.iter_mut().zip(row) {
			*w = (*w).max(cell.chars().count());
		}
	}

	std::iter::once(HEADERS)
		.chain(rows)
		.map(|row| {
			let line = row.iter().zip(widths).map(|(cell, w)| format!("{cell:<w$}")).collect::<Vec<_>>().join("  ");
			line.trim_end().to_string()
		})
		.collect::<Vec<_>>()
		.join("\n")
}
