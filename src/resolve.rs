//! Two-stage lookup of a user identifier against the Management API.
//!
//! Callers never know up front whether they hold a user ID or a username/email/phone. The ID
//! endpoint is tried first; its shape rejection (HTTP 400) is the signal to retry on the
//! identifier endpoint. Any other failure is final.

use std::future::Future;

use tokio_util::sync::CancellationToken;

use crate::error::{Action, ApiError, OperationError};

/// Run `primary` for `identifier`, falling back to `fallback` only on a shape rejection.
///
/// Makes one backend call, or two when the fallback is taken. Whichever stage ends the
/// resolution has its error wrapped with `identifier` and `action`.
///
/// Both calls race `cancel`; once it fires, the call in flight (or about to start) fails with
/// [`ErrorKind::Cancelled`](crate::ErrorKind::Cancelled), which never triggers the fallback.
pub async fn resolve<'a, T, P, PFut, F, FFut>(identifier: &'a str, action: Action, cancel: &CancellationToken, primary: P, fallback: F) -> Result<T, OperationError>
where
	P: FnOnce(&'a str) -> PFut,
	PFut: Future<Output = Result<T, ApiError>>,
	F: FnOnce(&'a str) -> FFut,
	FFut: Future<Output = Result<T, ApiError>>, {
	let wrap = |e: ApiError| OperationError::new(identifier, action, e);

	match cancellable(cancel, primary(identifier)).await {
		Ok(v) => Ok(v),
		Err(e) if e.is_shape_rejection() => {
			tracing::debug!(identifier, %action, "not a user ID, retrying by identifier");
			cancellable(cancel, fallback(identifier)).await.map_err(wrap)
		}
		Err(e) => Err(wrap(e)),
	}
}

async fn cancellable<T>(cancel: &CancellationToken, fut: impl Future<Output = Result<T, ApiError>>) -> Result<T, ApiError> {
	tokio::select! {
		biased;
		_ = cancel.cancelled() => Err(ApiError::cancelled()),
		r = fut => r,
	}
}
