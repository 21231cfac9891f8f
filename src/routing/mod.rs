//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Compilation (at startup and on config reload):
//!     RouteConfig[]
//!     → table.rs (validate, normalize, dedupe)
//!     → Sort by specificity (length desc, priority asc, declaration asc)
//!     → Freeze as immutable RouteTable
//!
//! Incoming Request (path):
//!     → matcher.rs (scan pre-sorted table, first boundary match wins)
//!     → Return: matched RouteEntry or None
//! ```
//!
//! # Design Decisions
//! - Table compiled up front, immutable at runtime; readers never lock
//! - Prefix matching only, at path-segment boundaries; no regex in the
//!   hot path
//! - Deterministic: same declarations always compile to the same table,
//!   and the same path always selects the same route
//! - Backend ids are opaque tokens; resolving them to origins is the
//!   dispatch layer's job

pub mod matcher;
pub mod table;

pub use matcher::matches_at_boundary;
pub use table::{RouteEntry, RouteTable, TableBuildError};
