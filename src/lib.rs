//! Edge Path Router Library

pub mod config;
pub mod dispatch;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::RouterConfig;
pub use dispatch::RouterServer;
pub use lifecycle::Shutdown;
pub use routing::{RouteEntry, RouteTable, TableBuildError};
