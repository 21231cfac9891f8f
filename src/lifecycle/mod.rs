//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Validate → Compile route table → Bind listener → Serve
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Stop accepting → Drain in-flight requests → Exit
//! ```
//!
//! # Design Decisions
//! - Fail fast: any startup error (config, table, bind) is fatal
//! - Shutdown is cooperative via a broadcast channel; Ctrl+C works too

pub mod shutdown;

pub use shutdown::Shutdown;
