//! Backend registry.
//!
//! # Responsibilities
//! - Resolve opaque backend ids to concrete origin URLs
//! - Stay total: lookups never fail, they return `Option`
//!
//! # Design Decisions
//! - The routing core never sees this module; backend ids stay opaque
//!   tokens until a match has already been made
//! - One id maps to exactly one origin; spreading load across replicas of
//!   an origin is the origin's own concern

use std::collections::HashMap;

use url::Url;

use crate::config::BackendConfig;

/// Maps backend ids to their origins.
#[derive(Debug, Default)]
pub struct BackendRegistry {
    origins: HashMap<String, Url>,
}

impl BackendRegistry {
    /// Build a registry from configuration.
    ///
    /// Validated configs only carry parseable origins; anything else is
    /// skipped with a warning rather than taking the process down.
    pub fn from_config(configs: &[BackendConfig]) -> Self {
        let mut origins = HashMap::new();

        for config in configs {
            match Url::parse(&config.origin) {
                Ok(url) => {
                    origins.insert(config.id.clone(), url);
                }
                Err(e) => {
                    tracing::warn!(
                        id = %config.id,
                        origin = %config.origin,
                        error = %e,
                        "Skipping backend with invalid origin"
                    );
                }
            }
        }

        Self { origins }
    }

    /// Look up the origin for a backend id.
    pub fn get(&self, id: &str) -> Option<&Url> {
        self.origins.get(id)
    }

    pub fn len(&self) -> usize {
        self.origins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.origins.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend(id: &str, origin: &str) -> BackendConfig {
        BackendConfig {
            id: id.to_string(),
            origin: origin.to_string(),
        }
    }

    #[test]
    fn test_resolves_declared_backend() {
        let registry = BackendRegistry::from_config(&[backend("api", "http://127.0.0.1:3001")]);
        let origin = registry.get("api").unwrap();
        assert_eq!(origin.host_str(), Some("127.0.0.1"));
        assert_eq!(origin.port(), Some(3001));
    }

    #[test]
    fn test_unknown_id_resolves_to_none() {
        let registry = BackendRegistry::from_config(&[backend("api", "http://127.0.0.1:3001")]);
        assert!(registry.get("missing").is_none());
    }

    #[test]
    fn test_invalid_origin_skipped() {
        let registry = BackendRegistry::from_config(&[
            backend("good", "http://127.0.0.1:3001"),
            backend("bad", "not a url"),
        ]);
        assert_eq!(registry.len(), 1);
        assert!(registry.get("bad").is_none());
    }
}
