//! Function invocation endpoint and the core-error → HTTP mapping.
//!
//! The dispatch core surfaces exactly four classified failure kinds; all
//! four are caller errors and map to 400 with a human-readable detail.
//! Anything unclassified (a panic in module code) is fatal and is not
//! converted to a response here.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::debug;
use utoipa::ToSchema;

use abacus_core::{DispatchError, Identifier};

use super::AppState;

/// Successful invocation body: the canonical string form of the result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct CallResponse {
    /// The computed value, formatted the same way arguments are parsed.
    pub result: String,
}

/// Error body shape shared by all failure responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable failure description.
    pub detail: String,
}

/// Transport-side classification of a failed call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The raw identifier was not a valid name or index token.
    #[error("unknown function: {0:?}; see `GET /functions` for the available operations")]
    UnknownFunction(String),
    /// A well-formed identifier matched no registered operation.
    #[error("function '{0}' is not implemented")]
    NotImplemented(Identifier),
    /// Argument count did not match the operation's arity.
    #[error("invalid argument count: expected {expected}, got {actual}")]
    InvalidArguments {
        /// Declared arity of the resolved operation.
        expected: usize,
        /// Number of `args` parameters supplied.
        actual: usize,
    },
    /// The module rejected an argument or failed to compute.
    #[error("{0}")]
    Domain(String),
}

impl From<DispatchError> for ApiError {
    fn from(err: DispatchError) -> Self {
        match err {
            DispatchError::MalformedIdentifier { text } => Self::UnknownFunction(text),
            DispatchError::UnknownIdentifier { attempted } => Self::NotImplemented(attempted),
            DispatchError::InvalidArguments { expected, actual } => {
                Self::InvalidArguments { expected, actual }
            }
            DispatchError::Domain(domain) => Self::Domain(domain.message().to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // All classified dispatch failures are caller errors.
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                detail: self.to_string(),
            }),
        )
            .into_response()
    }
}

/// Invoke a function by name or global index.
///
/// Positional arguments are passed as repeated `args` query parameters,
/// in order: `/call/natural_add?args=2&args=3`. The argument count is
/// validated against the operation's arity before any argument is decoded.
#[utoipa::path(
    get,
    path = "/call/{function}",
    tag = "api",
    params(
        ("function" = String, Path, description = "Operation name or global index"),
        ("args" = Option<Vec<String>>, Query, description = "Positional arguments, one `args` parameter per argument"),
    ),
    responses(
        (status = 200, description = "The computed value", body = CallResponse),
        (status = 400, description = "Unknown function, wrong argument count, or domain failure", body = ErrorResponse),
    )
)]
pub async fn call_handler(
    State(state): State<AppState>,
    Path(function): Path<String>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<CallResponse>, ApiError> {
    let _guard = state.shutdown.in_flight_guard();

    let args: Vec<String> = params
        .into_iter()
        .filter_map(|(key, value)| (key == "args").then_some(value))
        .collect();

    match state.group.call_str(&function, &args) {
        Ok(value) => Ok(Json(CallResponse {
            result: value.to_string(),
        })),
        Err(err) => {
            debug!(function = %function, error = %err, "call rejected");
            Err(ApiError::from(err))
        }
    }
}
