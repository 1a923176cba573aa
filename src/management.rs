use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use url::Url;

use crate::error::{ApiError, ErrorKind};

/// A single brute-force protection block, as reported by the Management API.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct UserBlock {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub identifier: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub ip: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub connection: Option<String>,
}

/// Body of both `GET /user-blocks` endpoints
#[derive(Debug, Deserialize)]
struct BlockedFor {
	#[serde(default)]
	blocked_for: Vec<UserBlock>,
}

/// Error body returned by the Management API, e.g.
/// `{"statusCode":404,"error":"Not Found","message":"The user does not exist.","errorCode":"inexistent_user"}`
#[derive(Debug, Deserialize)]
struct ErrorBody {
	message: Option<String>,
	error: Option<String>,
}

//==============================================================================
// Management Client Trait
//==============================================================================

/// The user-blocks slice of the Auth0 Management API.
///
/// The `*_by_id` operations expect an internal user ID (`provider|id`) and answer with
/// [`ErrorKind::ShapeRejection`] when handed anything else. The `*_by_identifier` operations
/// take a username, email or phone number.
#[async_trait]
pub trait ManagementClient: Send + Sync {
	/// List blocks for a user ID
	async fn blocks_by_id(&self, user_id: &str) -> Result<Vec<UserBlock>, ApiError>;

	/// List blocks for a username, email or phone number
	async fn blocks_by_identifier(&self, identifier: &str) -> Result<Vec<UserBlock>, ApiError>;

	/// Clear all blocks of a user ID
	async fn unblock_by_id(&self, user_id: &str) -> Result<(), ApiError>;

	/// Clear all blocks of a username, email or phone number
	async fn unblock_by_identifier(&self, identifier: &str) -> Result<(), ApiError>;
}

pub type BoxedManagementClient = Arc<dyn ManagementClient>;

//==============================================================================
// HTTP Implementation
//==============================================================================

/// Management API client that makes real HTTP requests
pub struct HttpManagementClient {
	http_client: Client,
	base_url: Url,
	access_token: String,
}

impl HttpManagementClient {
	/// `base_url` must point at the API root, e.g. `https://tenant.eu.auth0.com/api/v2/`.
	pub fn new(base_url: Url, access_token: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
		let http_client = Client::builder()
			.user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
			.timeout(timeout)
			.build()?;
		Ok(Self::with_client(http_client, base_url, access_token))
	}

	/// Same as [`new`](Self::new), on an already configured [`Client`].
	pub fn with_client(http_client: Client, base_url: Url, access_token: impl Into<String>) -> Self {
		Self {
			http_client,
			base_url: with_trailing_slash(base_url),
			access_token: access_token.into(),
		}
	}

	/// Base URL for a tenant domain: `https://{domain}/api/v2/`
	pub fn tenant_url(domain: &str) -> Result<Url, ApiError> {
		let domain = domain.trim().trim_start_matches("https://").trim_end_matches('/');
		Url::parse(&format!("https://{domain}/api/v2/")).map_err(|e| ApiError::new(ErrorKind::Other, format!("invalid tenant domain {domain:?}: {e}")))
	}

	fn by_id_url(&self, user_id: &str) -> Result<Url, ApiError> {
		let path = format!("user-blocks/{}", urlencoding::encode(user_id));
		self.base_url.join(&path).map_err(|e| ApiError::new(ErrorKind::Other, e.to_string()))
	}

	fn by_identifier_url(&self, identifier: &str) -> Result<Url, ApiError> {
		let mut url = self.base_url.join("user-blocks").map_err(|e| ApiError::new(ErrorKind::Other, e.to_string()))?;
		url.query_pairs_mut().append_pair("identifier", identifier);
		Ok(url)
	}

	async fn get_blocks(&self, url: Url) -> Result<Vec<UserBlock>, ApiError> {
		let res = self.http_client.get(url).bearer_auth(&self.access_token).send().await?;
		let res = check_status(res).await?;
		let body = res.json::<BlockedFor>().await?;
		Ok(body.blocked_for)
	}

	async fn delete_blocks(&self, url: Url) -> Result<(), ApiError> {
		let res = self.http_client.delete(url).bearer_auth(&self.access_token).send().await?;
		check_status(res).await?;
		Ok(())
	}
}

#[async_trait]
impl ManagementClient for HttpManagementClient {
	#[instrument(skip(self), name = "HttpManagementClient::blocks_by_id")]
	async fn blocks_by_id(&self, user_id: &str) -> Result<Vec<UserBlock>, ApiError> {
		self.get_blocks(self.by_id_url(user_id)?).await
	}

	#[instrument(skip(self), name = "HttpManagementClient::blocks_by_identifier")]
	async fn blocks_by_identifier(&self, identifier: &str) -> Result<Vec<UserBlock>, ApiError> {
		self.get_blocks(self.by_identifier_url(identifier)?).await
	}

	#[instrument(skip(self), name = "HttpManagementClient::unblock_by_id")]
	async fn unblock_by_id(&self, user_id: &str) -> Result<(), ApiError> {
		self.delete_blocks(self.by_id_url(user_id)?).await
	}

	#[instrument(skip(self), name = "HttpManagementClient::unblock_by_identifier")]
	async fn unblock_by_identifier(&self, identifier: &str) -> Result<(), ApiError> {
		self.delete_blocks(self.by_identifier_url(identifier)?).await
	}
}

async fn check_status(res: Response) -> Result<Response, ApiError> {
	let status = res.status();
	if status.is_success() {
		return Ok(res);
	}

	let body = res.text().await.unwrap_or_default();
	tracing::debug!(%status, body = %body, "management API returned an error");
	Err(ApiError::from_status(status, error_message(&body, status)))
}

/// Human-readable message out of an error body, falling back to the raw text.
fn error_message(body: &str, status: reqwest::StatusCode) -> String {
	if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body)
		&& let Some(message) = parsed.message.or(parsed.error)
	{
		return message;
	}

	match body.trim() {
		"" => status.canonical_reason().unwrap_or("unknown error").to_string(),
		s => s.to_string(),
	}
}

fn with_trailing_slash(mut url: Url) -> Url {
	if !url.path().ends_with('/') {
		let path = format!("{}/", url.path());
		url.set_path(&path);
	}
	url
}
