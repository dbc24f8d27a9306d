//! HTTP boundary for the abacus dispatch service.
//!
//! The dispatch core is transport-agnostic; everything here is glue:
//! routing, query parsing, error-to-status mapping, middleware, and the
//! server lifecycle.

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod module;
pub mod shutdown;

pub use config::NetworkConfig;
pub use module::NetworkModule;
pub use shutdown::{HealthState, InFlightGuard, ShutdownController};
