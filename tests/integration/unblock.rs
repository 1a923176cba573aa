//! Integration tests for `users blocks unblock`.

use std::time::Duration;

use crate::common::{self, TestContext};

fn tenant() -> TestContext {
	TestContext::new(&serde_json::json!({
		"users": [
			{ "user_id": "auth0|abc123", "email": "someone@example.com", "blocks": [{ "identifier": "someone@example.com", "ip": "10.0.0.1" }] },
			{ "user_id": "auth0|def456", "email": "user@example.com", "blocks": [{ "identifier": "user@example.com", "ip": "10.0.0.2" }] },
			{ "user_id": "auth0|unblocked", "username": "already-free" }
		],
		"failures": [{ "identifier": "b", "kind": "rate_limited" }]
	}))
}

#[test]
fn test_unblock_id_and_email() {
	let ctx = tenant();
	let (status, _, stderr) = ctx.run(&["users", "blocks", "unblock", "auth0|abc123", "user@example.com"]);

	assert!(status.success(), "stderr: {stderr}");
	assert!(stderr.contains("Unblocked 2 user(s)."), "stderr: {stderr}");
}

#[test]
fn test_unblock_already_unblocked_user() {
	let ctx = tenant();
	let (status, _, stderr) = ctx.run(&["users", "blocks", "unblock", "already-free", "auth0|unblocked"]);
	assert!(status.success(), "stderr: {stderr}");
}

#[test]
fn test_unblock_reports_every_failure() {
	let ctx = tenant();
	let (status, _, stderr) = ctx.run(&["users", "blocks", "unblock", "bad-id", "auth0|abc123", "", "b", "user@example.com"]);

	assert!(!status.success());
	let bad_id = stderr.find("failed to unblock user with identifier bad-id").expect(&stderr);
	let b = stderr.find("failed to unblock user with identifier b:").expect(&stderr);
	assert!(bad_id < b, "failures out of input order: {stderr}");
	assert!(stderr.contains("429 rate limited"), "stderr: {stderr}");
	assert!(!stderr.contains("identifier auth0|abc123"), "stderr: {stderr}");
	assert!(!stderr.contains("identifier user@example.com"), "stderr: {stderr}");
	assert!(!stderr.contains("Unblocked"), "stderr: {stderr}");
}

#[test]
fn test_unblock_prompts_when_no_identifiers() {
	let ctx = tenant();
	let (status, _, stderr) = ctx.run_with_stdin(&["users", "blocks", "unblock"], "user@example.com\n");

	assert!(status.success(), "stderr: {stderr}");
	assert!(stderr.contains("Unblocked 1 user(s)."), "stderr: {stderr}");
}

#[test]
fn test_unblock_requires_an_identifier() {
	let ctx = tenant();
	let (status, _, stderr) = ctx.run(&["users", "blocks", "unblock"]);

	assert!(!status.success());
	assert!(stderr.contains("a user identifier is required"), "stderr: {stderr}");
}

#[test]
fn test_failure_reported_once_with_default_logs() {
	let ctx = tenant();
	let (status, _, stderr) = ctx.run_with_default_logs(&["users", "blocks", "unblock", "bad-id", "auth0|abc123"]);

	assert!(!status.success());
	assert_eq!(stderr.matches("failed to unblock user with identifier bad-id").count(), 1, "stderr: {stderr}");
}

#[cfg(unix)]
#[test]
fn test_ctrl_c_at_prompt_exits() {
	let ctx = tenant();
	let mut child = ctx.spawn_waiting_on_stdin(&["users", "blocks", "unblock"]);
	std::thread::sleep(Duration::from_millis(300));

	common::interrupt(&child);

	let status = common::wait_with_limit(&mut child, Duration::from_secs(10));
	assert!(!status.success());
}
