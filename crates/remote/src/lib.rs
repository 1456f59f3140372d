//! Clients for the remote services involved in shipping the generated
//! application: repository hosting, the deployment platform, and the
//! headless-browser snapshot service.

pub mod github;
pub mod snapshot;
pub mod vercel;

pub use github::GithubPublisher;
pub use snapshot::{InstanceGuard, ScreenshotAnalyst, SnapshotClient};
pub use vercel::VercelPublisher;
