use axum::{extract::State, response::Json};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::models::{flatten, Swatch};

/// Response from the /api/palettes endpoint
#[derive(Debug, Serialize, ToSchema)]
pub struct PaletteListResponse {
    /// Swatches in file order
    pub palettes: Vec<Swatch>,
    /// The same colors as flat RGBA quadruples, ready for a `process` message
    pub flat: Vec<u8>,
}

/// List the configured palette swatches
///
/// Empty when no palette file is configured.
#[utoipa::path(
    get,
    path = "/api/palettes",
    responses(
        (status = 200, description = "Configured swatches", body = PaletteListResponse),
    ),
    tag = "Palettes"
)]
pub async fn handle_palettes(State(swatches): State<Arc<Vec<Swatch>>>) -> Json<PaletteListResponse> {
    Json(PaletteListResponse {
        palettes: swatches.as_ref().clone(),
        flat: flatten(&swatches),
    })
}
