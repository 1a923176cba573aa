//! Brute-force protection block administration for Auth0 tenants.
//!
//! The pieces that decide how a user identifier reaches the Management API live here:
//! - [`resolve`] tries the user-ID endpoint first and falls back to the identifier endpoint on a shape rejection
//! - [`run_batch`] applies such an operation over many identifiers, collecting every failure instead of stopping at the first
//!
//! The binary wires these to the CLI, the spinner and the renderer.

pub mod batch;
pub mod error;
pub mod management;
pub mod mock_management;
pub mod resolve;

pub use batch::{BatchError, run_batch};
pub use error::{Action, ApiError, ErrorKind, OperationError};
pub use management::{BoxedManagementClient, HttpManagementClient, ManagementClient, UserBlock};
pub use mock_management::MockManagementClient;
pub use resolve::resolve;
