//! Route table construction.
//!
//! # Responsibilities
//! - Validate declared route prefixes (non-empty, leading `/`)
//! - Normalize trailing slashes (`/api/` and `/api` are the same route)
//! - Reject duplicate prefixes (ambiguous routing must not deploy)
//! - Sort entries by specificity so the matcher can take the first hit
//!
//! # Design Decisions
//! - Table is built once and immutable afterwards; config changes rebuild
//!   it wholesale rather than patching it in place
//! - Ordering is a single stable multi-key comparator
//!   (length desc, priority asc, declaration index asc) so the rule can be
//!   tested in isolation from the matching loop
//! - Same input sequence always produces the same table, so replicated
//!   edge nodes that build from the same config route identically

use std::collections::HashSet;

use serde::Serialize;
use thiserror::Error;

use crate::config::RouteConfig;

/// Errors raised while compiling a route table.
///
/// Both variants are fatal at startup: a process must not begin serving
/// with a table it could not fully validate.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TableBuildError {
    /// A prefix was empty or did not start with `/`.
    #[error("invalid route prefix {0:?}: prefixes must be non-empty and start with '/'")]
    InvalidPrefix(String),

    /// Two declarations normalized to the same prefix.
    #[error("duplicate route prefix {0:?}: each prefix may be declared once")]
    DuplicatePrefix(String),
}

/// A single compiled route: a normalized prefix and the backend it selects.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RouteEntry {
    /// Normalized path prefix. Always starts with `/`; never has a
    /// trailing slash except the literal root `/`.
    pub prefix: String,

    /// Opaque backend identifier. The router never inspects it; the
    /// dispatch layer resolves it to a concrete origin.
    pub backend_id: String,

    /// Explicit tie-break priority. Lower wins among equal-length
    /// prefixes; `None` ranks after any explicit value.
    pub priority: Option<u32>,
}

impl RouteEntry {
    /// True for the root catch-all entry.
    pub fn is_root(&self) -> bool {
        self.prefix == "/"
    }
}

/// An immutable, pre-sorted route table.
///
/// Entries are ordered most-specific first, so the matcher's first hit is
/// the longest matching prefix. The root entry, being the only possible
/// length-1 prefix, always sorts last and can never shadow another route.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
}

impl RouteTable {
    /// Compile a table from declared routes.
    ///
    /// Declaration order is significant: it is the final tie-break key, so
    /// the same declaration sequence always compiles to the same table.
    pub fn from_config(routes: &[RouteConfig]) -> Result<Self, TableBuildError> {
        let mut seen = HashSet::new();
        let mut indexed = Vec::with_capacity(routes.len());

        for (index, route) in routes.iter().enumerate() {
            let prefix = normalize_prefix(&route.prefix)?;
            if !seen.insert(prefix.clone()) {
                return Err(TableBuildError::DuplicatePrefix(prefix));
            }
            indexed.push((
                index,
                RouteEntry {
                    prefix,
                    backend_id: route.backend.clone(),
                    priority: route.priority,
                },
            ));
        }

        indexed.sort_by(|(left_index, left), (right_index, right)| {
            right
                .prefix
                .len()
                .cmp(&left.prefix.len())
                .then_with(|| priority_rank(left).cmp(&priority_rank(right)))
                .then_with(|| left_index.cmp(right_index))
        });

        Ok(Self {
            entries: indexed.into_iter().map(|(_, entry)| entry).collect(),
        })
    }

    /// Entries in match order (most specific first).
    pub fn entries(&self) -> &[RouteEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Rank used for the priority tie-break: explicit priorities compare
/// ascending, absent priority ranks after all of them.
fn priority_rank(entry: &RouteEntry) -> u32 {
    entry.priority.unwrap_or(u32::MAX)
}

/// Validate a declared prefix and strip trailing slashes.
///
/// `/api/` becomes `/api`; the root `/` (and `//`) stays `/`.
fn normalize_prefix(prefix: &str) -> Result<String, TableBuildError> {
    if prefix.is_empty() || !prefix.starts_with('/') {
        return Err(TableBuildError::InvalidPrefix(prefix.to_string()));
    }

    let trimmed = prefix.trim_end_matches('/');
    if trimmed.is_empty() {
        Ok("/".to_string())
    } else {
        Ok(trimmed.to_string())
    }
}
