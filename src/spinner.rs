use std::{future::Future, io::IsTerminal, time::Duration};

use indicatif::{ProgressBar, ProgressStyle};

/// Run `fut` to completion behind a spinner on stderr. The output is handed back untouched.
///
/// Nothing is drawn when `enabled` is false or stderr isn't a terminal.
pub async fn waiting<F: Future>(message: &'static str, enabled: bool, fut: F) -> F::Output {
	let pb = if enabled && std::io::stderr().is_terminal() { create_spinner(message) } else { ProgressBar::hidden() };
	let output = fut.await;
	pb.finish_and_clear();
	output
}

fn create_spinner(message: &'static str) -> ProgressBar {
	let pb = ProgressBar::new_spinner();
	if let Ok(style) = ProgressStyle::default_spinner().tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", " "]).template("{spinner:.cyan} {msg}") {
		pb.set_style(style);
	}
	pb.set_message(message);
	pb.enable_steady_tick(Duration::from_millis(80));
	pb
}
