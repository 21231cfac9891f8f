//! Dispatch subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (path)
//!     → server.rs (snapshot load, routing::matcher lookup)
//!     → matched RouteEntry, or 404 when nothing matched
//!     → backend.rs (resolve opaque backend id → origin URL)
//!     → server.rs (rewrite authority, forward, stream response)
//!
//! Config update:
//!     new RouterConfig
//!     → revalidate, recompile RouteTable
//!     → atomic snapshot swap (failed updates keep the current table)
//! ```
//!
//! # Design Decisions
//! - This layer owns everything the routing core is forbidden to do:
//!   I/O, async, backend-id interpretation, response synthesis
//! - Forwarding is single-attempt; resilience around an origin belongs
//!   to the origin

pub mod backend;
pub mod server;

pub use backend::BackendRegistry;
pub use server::RouterServer;
