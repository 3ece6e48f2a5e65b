//! Server module for building and running the HTTP server

pub mod builder;
pub mod router;
pub mod versioning;

pub use builder::ServerBuilder;
pub use router::build_routes;
pub use versioning::{ApiVersion, SUPPORTED_VERSIONS_HEADER};
