//! Sequential execution of a per-identifier operation with deferred failure reporting.

use std::future::Future;

use miette::Diagnostic;
use thiserror::Error;

use crate::error::OperationError;

/// Every failure of a batch run, in input order.
#[derive(Debug, Diagnostic, Error)]
#[error("{}", self.describe())]
#[diagnostic(code(userblocks::batch), help("identifiers not listed here were processed successfully"))]
pub struct BatchError {
	#[related]
	failures: Vec<OperationError>,
}

impl BatchError {
	/// `None` when there is nothing to report.
	pub fn from_failures(failures: Vec<OperationError>) -> Option<Self> {
		(!failures.is_empty()).then_some(Self { failures })
	}

	pub fn failures(&self) -> &[OperationError] {
		&self.failures
	}

	pub fn into_failures(self) -> Vec<OperationError> {
		self.failures
	}

	/// Identifiers that failed, in input order
	pub fn identifiers(&self) -> impl Iterator<Item = &str> {
		self.failures.iter().map(|f| f.identifier.as_str())
	}

	/// One line per failure, each carrying its cause.
	fn describe(&self) -> String {
		self.failures.iter().map(|f| format!("{f}: {}", f.source)).collect::<Vec<_>>().join("\n")
	}
}

/// Apply `operation` to each identifier in order, one at a time.
///
/// Empty identifiers are skipped without a call. A failure never stops the run; all of them are
/// handed back together once every identifier has been attempted.
pub async fn run_batch<'a, I, F, Fut>(identifiers: I, mut operation: F) -> Result<(), BatchError>
where
	I: IntoIterator<Item = &'a str>,
	F: FnMut(&'a str) -> Fut,
	Fut: Future<Output = Result<(), OperationError>>, {
	let mut failures = Vec::new();
	let mut attempted = 0_usize;

	for identifier in identifiers {
		if identifier.is_empty() {
			tracing::debug!("skipping empty identifier");
			continue;
		}
		attempted += 1;

		if let Err(e) = operation(identifier).await {
			tracing::debug!(identifier, error = %e.source, "{e}");
			failures.push(e);
		}
	}

	tracing::info!(attempted, failed = failures.len(), "batch finished");
	match BatchError::from_failures(failures) {
		Some(e) => Err(e),
		None => Ok(()),
	}
}
