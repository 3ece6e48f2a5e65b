//! Query-string API versioning
//!
//! Requests name the API version they target with a query parameter
//! (`?ver=2.0` by default). When the parameter is absent the configured
//! default version is assumed. Unsupported or malformed versions are rejected
//! with `400`, and every response reports the supported versions in an
//! `api-supported-versions` header.

use crate::config::ConfigHandle;
use crate::core::error::ApiError;
use axum::{
    extract::{Query, Request, State},
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Header listing the versions the API accepts
pub const SUPPORTED_VERSIONS_HEADER: HeaderName = HeaderName::from_static("api-supported-versions");

/// Version assumed when the configuration cannot provide one
const FALLBACK_VERSION: ApiVersion = ApiVersion { major: 1, minor: 1 };

/// A `major.minor` API version
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ApiVersion {
    pub major: u32,
    pub minor: u32,
}

impl ApiVersion {
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

#[derive(Debug, thiserror::Error)]
#[error("invalid API version '{0}'")]
pub struct ApiVersionError(String);

impl FromStr for ApiVersion {
    type Err = ApiVersionError;

    /// Accepts `2`, `2.0` and `1.1`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ApiVersionError(s.to_string());
        let trimmed = s.trim();

        let (major, minor) = match trimmed.split_once('.') {
            Some((major, minor)) => (major, minor),
            None => (trimmed, "0"),
        };

        let major = major.parse().map_err(|_| invalid())?;
        let minor = minor.parse().map_err(|_| invalid())?;
        Ok(Self { major, minor })
    }
}

/// Middleware resolving the requested API version
///
/// The resolved [`ApiVersion`] is stored in the request extensions.
pub async fn negotiate_version(
    State(config): State<ConfigHandle>,
    mut request: Request,
    next: Next,
) -> Response {
    let config = config.current();
    let supported = config.supported_versions().unwrap_or_default();

    let requested = Query::<HashMap<String, String>>::try_from_uri(request.uri())
        .ok()
        .and_then(|Query(params)| params.get(&config.api.version_parameter).cloned());

    let version = match requested {
        None => config.default_version().unwrap_or(FALLBACK_VERSION),
        Some(raw) => match raw.parse::<ApiVersion>() {
            Ok(version) if supported.contains(&version) => version,
            _ => {
                tracing::debug!(requested = %raw, "unsupported API version");
                let error = ApiError::BadRequest(format!(
                    "The HTTP resource does not support API version '{}'",
                    raw
                ));
                return with_supported_versions(
                    error.into_response(),
                    &supported,
                    config.api.report_versions,
                );
            }
        },
    };

    request.extensions_mut().insert(version);
    let response = next.run(request).await;

    with_supported_versions(response, &supported, config.api.report_versions)
}

fn with_supported_versions(mut response: Response, supported: &[ApiVersion], report: bool) -> Response {
    if !report {
        return response;
    }

    let list = supported
        .iter()
        .map(ApiVersion::to_string)
        .collect::<Vec<_>>()
        .join(", ");

    if let Ok(value) = HeaderValue::from_str(&list) {
        response
            .headers_mut()
            .insert(SUPPORTED_VERSIONS_HEADER, value);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_versions() {
        assert_eq!("1.1".parse::<ApiVersion>().unwrap(), ApiVersion::new(1, 1));
        assert_eq!("2".parse::<ApiVersion>().unwrap(), ApiVersion::new(2, 0));
        assert_eq!(" 2.0 ".parse::<ApiVersion>().unwrap(), ApiVersion::new(2, 0));
        assert!("two".parse::<ApiVersion>().is_err());
        assert!("1.x".parse::<ApiVersion>().is_err());
        assert!("".parse::<ApiVersion>().is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(ApiVersion::new(2, 0).to_string(), "2.0");
    }

    #[test]
    fn test_ordering() {
        assert!(ApiVersion::new(1, 1) < ApiVersion::new(2, 0));
        assert!(ApiVersion::new(1, 0) < ApiVersion::new(1, 1));
    }
}
