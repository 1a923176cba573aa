//! Mock Management API client for testing purposes.
//!
//! Stores users and their blocks in memory and answers the way the real user-blocks
//! endpoints do, so the resolver and batch logic can be exercised without a tenant.
//! The binary picks it up with the hidden `--mock` flag, loading state from the JSON file
//! named by `USERBLOCKS_MOCK_STATE`.

use std::{collections::HashMap, path::Path, sync::Mutex};

use async_trait::async_trait;
use serde::Deserialize;
use tracing::instrument;

use crate::{
	error::{ApiError, ErrorKind},
	management::{ManagementClient, UserBlock},
};

/// Env var naming the JSON state file loaded by [`MockManagementClient::from_env`]
pub const MOCK_STATE_ENV: &str = "USERBLOCKS_MOCK_STATE";

const ID_SHAPE_MESSAGE: &str = "Path validation error: 'String does not match pattern ^.+\\|.+$' on property id (ID of the user).";
const USER_NOT_FOUND_MESSAGE: &str = "The user does not exist.";

/// A user known to the mock tenant
#[derive(Clone, Debug, Default, Deserialize)]
pub struct MockUser {
	pub user_id: String,
	#[serde(default)]
	pub username: Option<String>,
	#[serde(default)]
	pub email: Option<String>,
	#[serde(default)]
	pub phone_number: Option<String>,
	#[serde(default)]
	pub blocks: Vec<UserBlock>,
}

impl MockUser {
	fn matches_identifier(&self, identifier: &str) -> bool {
		[&self.username, &self.email, &self.phone_number].into_iter().flatten().any(|v| v == identifier)
	}
}

/// A forced failure for every call that receives `identifier`
#[derive(Clone, Debug, Deserialize)]
pub struct MockFailure {
	pub identifier: String,
	pub kind: ErrorKind,
}

/// On-disk shape of the mock state file
#[derive(Debug, Default, Deserialize)]
pub struct MockState {
	#[serde(default)]
	pub users: Vec<MockUser>,
	#[serde(default)]
	pub failures: Vec<MockFailure>,
}

/// Mock Management API client that stores all state in memory.
/// Thread-safe for use in async contexts.
#[derive(Default)]
pub struct MockManagementClient {
	users: Mutex<Vec<MockUser>>,

	/// Forced failures, keyed by the exact string passed to any operation
	failures: Mutex<HashMap<String, ErrorKind>>,

	/// Call log, one entry per operation invoked
	call_log: Mutex<Vec<String>>,
}

impl MockManagementClient {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn from_state(state: MockState) -> Self {
		let client = Self::new();
		for user in state.users {
			client.add_user(user);
		}
		for failure in state.failures {
			client.fail_with(&failure.identifier, failure.kind);
		}
		client
	}

	pub fn from_file(path: &Path) -> color_eyre::Result<Self> {
		let content = std::fs::read_to_string(path)?;
		let state: MockState = serde_json::from_str(&content)?;
		tracing::debug!(path = %path.display(), users = state.users.len(), "loaded mock state");
		Ok(Self::from_state(state))
	}

	/// Load state from [`MOCK_STATE_ENV`] if it is set, otherwise start empty.
	pub fn from_env() -> color_eyre::Result<Self> {
		match std::env::var_os(MOCK_STATE_ENV) {
			Some(path) => Self::from_file(Path::new(&path)),
			None => Ok(Self::new()),
		}
	}

	pub fn add_user(&self, user: MockUser) {
		self.users.lock().unwrap().push(user);
	}

	/// Make every call that receives `identifier` fail with `kind`.
	pub fn fail_with(&self, identifier: &str, kind: ErrorKind) {
		self.failures.lock().unwrap().insert(identifier.to_string(), kind);
	}

	/// Blocks currently held by the user with `user_id`
	pub fn blocks_of(&self, user_id: &str) -> Option<Vec<UserBlock>> {
		self.users.lock().unwrap().iter().find(|u| u.user_id == user_id).map(|u| u.blocks.clone())
	}

	pub fn get_call_log(&self) -> Vec<String> {
		self.call_log.lock().unwrap().clone()
	}

	pub fn call_count(&self) -> usize {
		self.call_log.lock().unwrap().len()
	}

	pub fn clear_call_log(&self) {
		self.call_log.lock().unwrap().clear();
	}

	fn log_call(&self, call: String) {
		self.call_log.lock().unwrap().push(call);
	}

	fn injected_failure(&self, input: &str) -> Result<(), ApiError> {
		match self.failures.lock().unwrap().get(input) {
			Some(&kind) => Err(match kind.status() {
				Some(status) => ApiError::from_status(status, format!("injected {kind} for {input}")),
				None => ApiError::new(kind, format!("injected {kind} for {input}")),
			}),
			None => Ok(()),
		}
	}

	/// Runs `f` on the user with this ID, after the same shape check the real endpoint does.
	fn with_user_by_id<T>(&self, user_id: &str, f: impl FnOnce(&mut MockUser) -> T) -> Result<T, ApiError> {
		self.injected_failure(user_id)?;
		if !looks_like_user_id(user_id) {
			return Err(ApiError::from_status(reqwest::StatusCode::BAD_REQUEST, ID_SHAPE_MESSAGE));
		}

		let mut users = self.users.lock().unwrap();
		let user = users
			.iter_mut()
			.find(|u| u.user_id == user_id)
			.ok_or_else(|| ApiError::from_status(reqwest::StatusCode::NOT_FOUND, USER_NOT_FOUND_MESSAGE))?;
		Ok(f(user))
	}

	fn with_user_by_identifier<T>(&self, identifier: &str, f: impl FnOnce(&mut MockUser) -> T) -> Result<T, ApiError> {
		self.injected_failure(identifier)?;

		let mut users = self.users.lock().unwrap();
		let user = users
			.iter_mut()
			.find(|u| u.matches_identifier(identifier))
			.ok_or_else(|| ApiError::from_status(reqwest::StatusCode::NOT_FOUND, USER_NOT_FOUND_MESSAGE))?;
		Ok(f(user))
	}
}

/// User IDs are `{provider}|{id}`, both parts non-empty.
fn looks_like_user_id(s: &str) -> bool {
	matches!(s.split_once('|'), Some((provider, id)) if !provider.is_empty() && !id.is_empty())
}

#[async_trait]
impl ManagementClient for MockManagementClient {
	#[instrument(skip(self), name = "MockManagementClient::blocks_by_id")]
	async fn blocks_by_id(&self, user_id: &str) -> Result<Vec<UserBlock>, ApiError> {
		tracing::info!(target: "mock_management", user_id, "blocks_by_id");
		self.log_call(format!("blocks_by_id({user_id})"));
		self.with_user_by_id(user_id, |u| u.blocks.clone())
	}

	#[instrument(skip(self), name = "MockManagementClient::blocks_by_identifier")]
	async fn blocks_by_identifier(&self, identifier: &str) -> Result<Vec<UserBlock>, ApiError> {
		tracing::info!(target: "mock_management", identifier, "blocks_by_identifier");
		self.log_call(format!("blocks_by_identifier({identifier})"));
		self.with_user_by_identifier(identifier, |u| u.blocks.clone())
	}

	#[instrument(skip(self), name = "MockManagementClient::unblock_by_id")]
	async fn unblock_by_id(&self, user_id: &str) -> Result<(), ApiError> {
		tracing::info!(target: "mock_management", user_id, "unblock_by_id");
		self.log_call(format!("unblock_by_id({user_id})"));
		self.with_user_by_id(user_id, |u| u.blocks.clear())
	}

	#[instrument(skip(self), name = "MockManagementClient::unblock_by_identifier")]
	async fn unblock_by_identifier(&self, identifier: &str) -> Result<(), ApiError> {
		tracing::info!(target: "mock_management", identifier, "unblock_by_identifier");
		self.log_call(format!("unblock_by_identifier({identifier})"));
		self.with_user_by_identifier(identifier, |u| u.blocks.clear())
	}
}
