//! Operation listing endpoint.

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use utoipa::IntoParams;

use super::AppState;

/// Query parameters for [`functions_handler`].
#[derive(Debug, Clone, Copy, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FunctionsQuery {
    /// Return global indices instead of names.
    #[serde(default)]
    pub as_indices: bool,
}

/// List the available functions.
///
/// Returns operation names in global index order; with `as_indices=true`,
/// the decimal index strings instead. The ordering is stable for the
/// lifetime of the process, so position `i` of the default listing names
/// the operation at index `i`.
#[utoipa::path(
    get,
    path = "/functions",
    tag = "api",
    params(FunctionsQuery),
    responses(
        (status = 200, description = "Operation names (or indices) in registry order", body = Vec<String>),
    )
)]
pub async fn functions_handler(
    State(state): State<AppState>,
    Query(query): Query<FunctionsQuery>,
) -> Json<Vec<String>> {
    let methods = state.group.methods();
    let listing = if query.as_indices {
        methods.iter().map(|m| m.index().to_string()).collect()
    } else {
        methods.iter().map(|m| m.name().to_string()).collect()
    };
    Json(listing)
}
