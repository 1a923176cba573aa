//! Shared test infrastructure for integration tests.
//!
//! Provides `TestContext`, which owns a temporary directory holding:
//! - the mock Management API state, handed to the binary through `USERBLOCKS_MOCK_STATE`
//! - an empty XDG layout, so a developer's own config never leaks into a run
//!
//! # Example
//!
//! ```ignore
//! let ctx = TestContext::new(&serde_json::json!({
//!     "users": [{ "user_id": "auth0|abc123", "email": "jane@example.com" }]
//! }));
//!
//! let (status, stdout, stderr) = ctx.run(&["users", "blocks", "list", "auth0|abc123"]);
//! assert!(status.success());
//! ```

use std::{
	io::Write,
	path::PathBuf,
	process::{Child, Command, ExitStatus, Stdio},
	time::{Duration, Instant},
};

use tempfile::TempDir;

pub struct TestContext {
	pub dir: TempDir,
	pub mock_state_path: PathBuf,
}

impl TestContext {
	pub fn new(state: &serde_json::Value) -> Self {
		let dir = tempfile::tempdir().unwrap();
		let mock_state_path = dir.path().join("mock_state.json");
		std::fs::write(&mock_state_path, serde_json::to_string_pretty(state).unwrap()).unwrap();
		Self { dir, mock_state_path }
	}

	/// A tenant with one blocked user reachable by ID, username, email and phone.
	pub fn with_jane() -> Self {
		Self::new(&serde_json::json!({
			"users": [{
				"user_id": "auth0|61b5b6e90783fa19f7c57dad",
				"username": "jane",
				"email": "jane@example.com",
				"phone_number": "+15550001111",
				"blocks": [
					{ "identifier": "jane@example.com", "ip": "10.0.0.1", "connection": "Username-Password-Authentication" },
					{ "identifier": "jane@example.com", "ip": "10.0.0.2" }
				]
			}]
		}))
	}

	/// Command with an isolated environment, not yet pointed at the mock.
	pub fn command(&self) -> Command {
		let mut cmd = Command::new(env!("CARGO_BIN_EXE_userblocks"));
		cmd.env("XDG_CONFIG_HOME", self.dir.path().join("config"))
			.env("HOME", self.dir.path())
			.env("RUST_LOG", "off")
			.env_remove("USERBLOCKS_DOMAIN")
			.env_remove("USERBLOCKS_ACCESS_TOKEN")
			.env_remove("USERBLOCKS_BASE_URL")
			.env_remove("USERBLOCKS_TIMEOUT_SECS");
		cmd
	}

	/// Run against the mock. Returns (exit_status, stdout, stderr) for easy assertions.
	pub fn run(&self, args: &[&str]) -> (ExitStatus, String, String) {
		self.run_with_stdin(args, "")
	}

	/// Like [`run`](Self::run), feeding `stdin` to the process (for the identifier prompt).
	pub fn run_with_stdin(&self, args: &[&str], stdin: &str) -> (ExitStatus, String, String) {
		self.run_mock(self.mock_command(args), stdin)
	}

	/// Like [`run`](Self::run), but with the binary's default log filter instead of `RUST_LOG=off`.
	pub fn run_with_default_logs(&self, args: &[&str]) -> (ExitStatus, String, String) {
		let mut cmd = self.mock_command(args);
		cmd.env_remove("RUST_LOG");
		self.run_mock(cmd, "")
	}

	/// Start against the mock with stdin held open and never written to.
	pub fn spawn_waiting_on_stdin(&self, args: &[&str]) -> Child {
		let mut cmd = self.mock_command(args);
		cmd.stdin(Stdio::piped()).stdout(Stdio::piped()).stderr(Stdio::piped());
		cmd.spawn().unwrap()
	}

	fn mock_command(&self, args: &[&str]) -> Command {
		let mut cmd = self.command();
		cmd.arg("--mock").args(args).env("USERBLOCKS_MOCK_STATE", &self.mock_state_path);
		cmd
	}

	fn run_mock(&self, mut cmd: Command, stdin: &str) -> (ExitStatus, String, String) {
		cmd.stdin(Stdio::piped()).stdout(Stdio::piped()).stderr(Stdio::piped());

		let mut child = cmd.spawn().unwrap();
		{
			let mut pipe = child.stdin.take().unwrap();
			pipe.write_all(stdin.as_bytes()).unwrap();
		}
		let output = child.wait_with_output().unwrap();
		(
			output.status,
			String::from_utf8_lossy(&output.stdout).into_owned(),
			String::from_utf8_lossy(&output.stderr).into_owned(),
		)
	}
}

/// Poll `child` until it exits. Kills it and panics if that takes longer than `limit`.
pub fn wait_with_limit(child: &mut Child, limit: Duration) -> ExitStatus {
	let started = Instant::now();
	loop {
		if let Some(status) = child.try_wait().unwrap() {
			return status;
		}
		if started.elapsed() > limit {
			child.kill().unwrap();
			panic!("process still running after {limit:?}");
		}
		std::thread::sleep(Duration::from_millis(20));
	}
}

/// Deliver SIGINT, as a terminal does on Ctrl-C.
#[cfg(unix)]
pub fn interrupt(child: &Child) {
	let status = Command::new("kill").args(["-INT", &child.id().to_string()]).status().unwrap();
	assert!(status.success());
}
