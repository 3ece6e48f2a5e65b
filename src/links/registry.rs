//! Route registry for building resource addresses
//!
//! Maps logical route names ("camp", "talk") to path templates and fills in
//! their parameters. Resolution is a pure function: the same name and
//! parameters always give the same address, and no routing table of the HTTP
//! framework is consulted.

use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Route name of a single camp
pub const CAMP_ROUTE: &str = "camp";
/// Route name of a single talk under a camp
pub const TALK_ROUTE: &str = "talk";

/// Builds the canonical address of a resource
pub trait LinkResolver: Send + Sync {
    /// Resolve a route name with its parameters into a path
    ///
    /// Returns `None` when the route is unknown, a parameter is missing, or a
    /// value cannot be used as a path segment.
    fn resolve(&self, route: &str, params: &[(&str, &str)]) -> Option<String>;
}

/// Registry of named path templates such as `/api/camps/{moniker}`
#[derive(Debug, Clone, Default)]
pub struct RouteRegistry {
    templates: HashMap<String, String>,
}

impl RouteRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) a named template
    pub fn with_route(mut self, name: impl Into<String>, template: impl Into<String>) -> Self {
        self.templates.insert(name.into(), template.into());
        self
    }

    /// Routes served by this API
    pub fn api_routes() -> Self {
        Self::new()
            .with_route(CAMP_ROUTE, "/api/camps/{moniker}")
            .with_route(TALK_ROUTE, "/api/camps/{moniker}/talks/{id}")
    }

    /// Get the template registered under `name`
    pub fn template(&self, name: &str) -> Option<&str> {
        self.templates.get(name).map(String::as_str)
    }
}

/// Values allowed in a path segment: RFC 3986 unreserved characters
fn segment_regex() -> &'static Regex {
    static SEGMENT_REGEX: OnceLock<Regex> = OnceLock::new();
    SEGMENT_REGEX.get_or_init(|| Regex::new(r"^[A-Za-z0-9._~-]+$").unwrap())
}

fn placeholder_regex() -> &'static Regex {
    static PLACEHOLDER_REGEX: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER_REGEX.get_or_init(|| Regex::new(r"\{(\w+)\}").unwrap())
}

impl LinkResolver for RouteRegistry {
    fn resolve(&self, route: &str, params: &[(&str, &str)]) -> Option<String> {
        let template = self.template(route)?;
        let mut path = String::with_capacity(template.len());
        let mut last = 0;

        for captures in placeholder_regex().captures_iter(template) {
            let whole = captures.get(0)?;
            let name = captures.get(1)?.as_str();

            let value = params
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| *value)?;

            if !segment_regex().is_match(value) {
                return None;
            }

            path.push_str(&template[last..whole.start()]);
            path.push_str(value);
            last = whole.end();
        }

        path.push_str(&template[last..]);
        Some(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_camp() {
        let registry = RouteRegistry::api_routes();
        assert_eq!(
            registry.resolve(CAMP_ROUTE, &[("moniker", "ATL2024")]),
            Some("/api/camps/ATL2024".to_string())
        );
    }

    #[test]
    fn test_resolve_talk_with_two_params() {
        let registry = RouteRegistry::api_routes();
        assert_eq!(
            registry.resolve(TALK_ROUTE, &[("id", "5"), ("moniker", "ATL2024")]),
            Some("/api/camps/ATL2024/talks/5".to_string())
        );
    }

    #[test]
    fn test_unusable_values_do_not_resolve() {
        let registry = RouteRegistry::api_routes();
        assert_eq!(registry.resolve(CAMP_ROUTE, &[("moniker", "")]), None);
        assert_eq!(registry.resolve(CAMP_ROUTE, &[("moniker", "   ")]), None);
        assert_eq!(registry.resolve(CAMP_ROUTE, &[("moniker", "a/b")]), None);
        assert_eq!(registry.resolve(CAMP_ROUTE, &[("moniker", "a b")]), None);
    }

    #[test]
    fn test_missing_param_or_route_does_not_resolve() {
        let registry = RouteRegistry::api_routes();
        assert_eq!(registry.resolve(TALK_ROUTE, &[("moniker", "ATL2024")]), None);
        assert_eq!(registry.resolve("unknown", &[]), None);
    }

    #[test]
    fn test_custom_route() {
        let registry = RouteRegistry::new().with_route("home", "/");
        assert_eq!(registry.resolve("home", &[]), Some("/".to_string()));
    }
}
