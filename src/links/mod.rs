//! Link generation for created resources
//!
//! Handlers never hard-code resource addresses; they ask an injected
//! [`LinkResolver`] for the canonical path of a named route.

pub mod registry;

pub use registry::{CAMP_ROUTE, LinkResolver, RouteRegistry, TALK_ROUTE};
