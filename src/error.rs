//! Error types shared by the Management API client, the resolver and the batch executor.

use derive_more::Display;
use miette::Diagnostic;
use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// How the Management API (or the transport in front of it) classified a failed call.
///
/// Only [`ErrorKind::ShapeRejection`] ever triggers the identifier fallback.
#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, Hash, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
	/// The input does not have the shape the endpoint expects (HTTP 400).
	#[display("bad request")]
	ShapeRejection,
	#[display("not found")]
	NotFound,
	#[display("unauthorized")]
	Unauthorized,
	#[display("rate limited")]
	RateLimited,
	/// The surrounding execution context was cancelled before the call completed.
	#[display("cancelled")]
	Cancelled,
	#[display("request failed")]
	Other,
}

impl ErrorKind {
	pub fn from_status(status: StatusCode) -> Self {
		match status {
			StatusCode::BAD_REQUEST => Self::ShapeRejection,
			StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Self::Unauthorized,
			StatusCode::NOT_FOUND => Self::NotFound,
			StatusCode::TOO_MANY_REQUESTS => Self::RateLimited,
			_ => Self::Other,
		}
	}

	/// Representative HTTP status for this kind. `None` for failures that never reach the server.
	pub fn status(self) -> Option<StatusCode> {
		match self {
			Self::ShapeRejection => Some(StatusCode::BAD_REQUEST),
			Self::NotFound => Some(StatusCode::NOT_FOUND),
			Self::Unauthorized => Some(StatusCode::UNAUTHORIZED),
			Self::RateLimited => Some(StatusCode::TOO_MANY_REQUESTS),
			Self::Other => Some(StatusCode::INTERNAL_SERVER_ERROR),
			Self::Cancelled => None,
		}
	}
}

/// A failed Management API call.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
#[error("{}", self.describe())]
pub struct ApiError {
	pub kind: ErrorKind,
	/// HTTP status, if the request got far enough to receive one
	pub status: Option<u16>,
	pub message: String,
}

impl ApiError {
	pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
		Self {
			kind,
			status: None,
			message: message.into(),
		}
	}

	pub fn from_status(status: StatusCode, message: impl Into<String>) -> Self {
		Self {
			kind: ErrorKind::from_status(status),
			status: Some(status.as_u16()),
			message: message.into(),
		}
	}

	pub fn cancelled() -> Self {
		Self::new(ErrorKind::Cancelled, "operation cancelled")
	}

	pub fn is_shape_rejection(&self) -> bool {
		self.kind == ErrorKind::ShapeRejection
	}

	fn describe(&self) -> String {
		match self.status {
			Some(status) => format!("{status} {}: {}", self.kind, self.message),
			None => format!("{}: {}", self.kind, self.message),
		}
	}
}

impl From<reqwest::Error> for ApiError {
	fn from(e: reqwest::Error) -> Self {
		match e.status() {
			Some(status) => Self::from_status(status, e.to_string()),
			None => Self::new(ErrorKind::Other, e.to_string()),
		}
	}
}

/// What was being attempted for an identifier. Reads as part of "failed to {action} user ...".
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum Action {
	#[display("list user blocks for")]
	List,
	#[display("unblock")]
	Unblock,
}

/// A backend failure, tagged with the identifier and action it belongs to.
#[derive(Clone, Debug, Diagnostic, Error, PartialEq)]
#[error("failed to {action} user with identifier {identifier}")]
#[diagnostic(code(userblocks::operation))]
pub struct OperationError {
	pub identifier: String,
	pub action: Action,
	#[source]
	pub source: ApiError,
}

impl OperationError {
	pub fn new(identifier: impl Into<String>, action: Action, source: ApiError) -> Self {
		Self {
			identifier: identifier.into(),
			action,
			source,
		}
	}

	pub fn kind(&self) -> ErrorKind {
		self.source.kind
	}
}
