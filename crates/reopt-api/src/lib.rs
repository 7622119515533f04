// reopt-api: Async Rust client for the Prisma SD-WAN (CloudGenix) controller tenant API
//
// Hand-written client for the subset of the tenant API this workspace needs:
// token-header sessions, the site directory, and per-site extension CRUD.

pub mod auth;
pub mod client;
pub mod error;
pub mod extensions;
pub mod models;
pub mod sites;
pub mod transport;

pub use client::ApiClient;
pub use error::Error;
pub use transport::{TlsMode, TransportConfig};
