//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check referential integrity (routes reference declared backends)
//! - Check backend ids are unique and origins are usable http URLs
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: RouterConfig → Result<(), Vec<ValidationError>>
//! - Runs before a config is accepted into the system
//! - Route prefix syntax and duplication are the table builder's
//!   jurisdiction and are not re-checked here

use std::collections::HashSet;

use thiserror::Error;
use url::Url;

use crate::config::schema::RouterConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A route names a backend id that no backend declares.
    #[error("route {prefix:?} references unknown backend {backend:?}")]
    UnknownBackend { prefix: String, backend: String },

    /// Two backends share the same id.
    #[error("backend id {0:?} is declared more than once")]
    DuplicateBackendId(String),

    /// A backend origin is not a valid URL.
    #[error("backend {id:?} origin {origin:?} is not a valid URL")]
    InvalidOrigin { id: String, origin: String },

    /// A backend origin uses a scheme the forwarder does not speak.
    #[error("backend {id:?} origin {origin:?} must use the http scheme")]
    UnsupportedOriginScheme { id: String, origin: String },
}

/// Validate a configuration, collecting every error found.
pub fn validate_config(config: &RouterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let mut backend_ids = HashSet::new();
    for backend in &config.backends {
        if !backend_ids.insert(backend.id.as_str()) {
            errors.push(ValidationError::DuplicateBackendId(backend.id.clone()));
        }

        match Url::parse(&backend.origin) {
            Ok(url) if url.scheme() != "http" => {
                errors.push(ValidationError::UnsupportedOriginScheme {
                    id: backend.id.clone(),
                    origin: backend.origin.clone(),
                });
            }
            Ok(_) => {}
            Err(_) => {
                errors.push(ValidationError::InvalidOrigin {
                    id: backend.id.clone(),
                    origin: backend.origin.clone(),
                });
            }
        }
    }

    for route in &config.routes {
        if !backend_ids.contains(route.backend.as_str()) {
            errors.push(ValidationError::UnknownBackend {
                prefix: route.prefix.clone(),
                backend: route.backend.clone(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{BackendConfig, RouteConfig};

    fn config_with(routes: Vec<(&str, &str)>, backends: Vec<(&str, &str)>) -> RouterConfig {
        RouterConfig {
            routes: routes
                .into_iter()
                .map(|(prefix, backend)| RouteConfig {
                    prefix: prefix.to_string(),
                    backend: backend.to_string(),
                    priority: None,
                })
                .collect(),
            backends: backends
                .into_iter()
                .map(|(id, origin)| BackendConfig {
                    id: id.to_string(),
                    origin: origin.to_string(),
                })
                .collect(),
            ..RouterConfig::default()
        }
    }

    #[test]
    fn test_valid_config_passes() {
        let config = config_with(
            vec![("/api", "api"), ("/", "site")],
            vec![("api", "http://127.0.0.1:3001"), ("site", "http://127.0.0.1:3002")],
        );
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_unknown_backend_rejected() {
        let config = config_with(vec![("/api", "missing")], vec![]);
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::UnknownBackend {
                prefix: "/api".to_string(),
                backend: "missing".to_string(),
            }]
        );
    }

    #[test]
    fn test_duplicate_backend_id_rejected() {
        let config = config_with(
            vec![],
            vec![("api", "http://127.0.0.1:3001"), ("api", "http://127.0.0.1:3002")],
        );
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.contains(&ValidationError::DuplicateBackendId("api".to_string())));
    }

    #[test]
    fn test_https_origin_rejected() {
        let config = config_with(vec![], vec![("api", "https://origin.example")]);
        let errors = validate_config(&config).unwrap_err();
        assert!(matches!(
            errors[0],
            ValidationError::UnsupportedOriginScheme { .. }
        ));
    }

    #[test]
    fn test_all_errors_collected() {
        let config = config_with(
            vec![("/api", "nope"), ("/docs", "also-nope")],
            vec![("bad", "not a url")],
        );
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
