//! HTTP handler definitions for the abacus server.
//!
//! Defines `AppState` (the shared state carried through axum extractors),
//! re-exports the handler functions, and assembles the OpenAPI document
//! served under `/docs`.

pub mod call;
pub mod functions;
pub mod health;

pub use call::{call_handler, ApiError, CallResponse, ErrorResponse};
pub use functions::{functions_handler, FunctionsQuery};
pub use health::{health_handler, liveness_handler, readiness_handler};

use std::sync::Arc;
use std::time::Instant;

use abacus_core::ModuleGroup;
use utoipa::OpenApi;

use super::{NetworkConfig, ShutdownController};

/// Shared application state passed to all handlers via `State` extraction.
///
/// Holds `Arc` references so cloning is cheap. The module group is
/// immutable after construction, so one instance serves all requests
/// concurrently.
#[derive(Clone)]
pub struct AppState {
    /// The globally indexed operation registry.
    pub group: Arc<ModuleGroup>,
    /// Graceful shutdown controller with health state and in-flight tracking.
    pub shutdown: Arc<ShutdownController>,
    /// Network configuration.
    pub config: Arc<NetworkConfig>,
    /// Server process start time, used for uptime calculation.
    pub start_time: Instant,
}

/// OpenAPI description of the dispatch API.
#[derive(OpenApi)]
#[openapi(
    paths(
        functions::functions_handler,
        call::call_handler,
        health::health_handler,
    ),
    components(schemas(CallResponse, ErrorResponse)),
    tags((name = "api", description = "Exact-arithmetic operation dispatch"))
)]
pub struct ApiDoc;
