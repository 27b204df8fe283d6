//! # Reference Data Routes
//!
//! Read-only views of the evaluator's lookup tables so clients can
//! populate pickers and explain results.

use axum::extract::Path;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use eshield_rules::tables::{self, ClassificationRecord};

use crate::error::AppError;
use crate::state::AppState;

/// A controlled classification as exposed to clients.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ClassificationEntry {
    pub code: String,
    pub description: String,
    /// Control reason codes, e.g. `["NS", "AT"]`.
    pub control_reasons: Vec<String>,
    /// Exception codes the record lists. Only LVS is acted on.
    pub eligible_exception_codes: Vec<String>,
}

impl From<&ClassificationRecord> for ClassificationEntry {
    fn from(record: &ClassificationRecord) -> Self {
        Self {
            code: record.code.to_string(),
            description: record.description.to_string(),
            control_reasons: record
                .control_reasons
                .iter()
                .map(|r| r.as_str().to_string())
                .collect(),
            eligible_exception_codes: record
                .eligible_exception_codes
                .iter()
                .map(|c| c.to_string())
                .collect(),
        }
    }
}

/// Destinations that short-circuit evaluation.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EmbargoedDestinations {
    pub destinations: Vec<String>,
}

/// Build the reference data router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/classifications", get(list_classifications))
        .route("/v1/classifications/{code}", get(get_classification))
        .route("/v1/destinations/embargoed", get(list_embargoed))
}

/// GET /v1/classifications: List the controlled classifications.
#[utoipa::path(
    get,
    path = "/v1/classifications",
    responses(
        (status = 200, description = "Controlled classifications", body = Vec<ClassificationEntry>),
    ),
    tag = "reference"
)]
pub async fn list_classifications() -> Json<Vec<ClassificationEntry>> {
    Json(
        tables::classifications()
            .iter()
            .map(ClassificationEntry::from)
            .collect(),
    )
}

/// GET /v1/classifications/{code}: Look up one classification.
#[utoipa::path(
    get,
    path = "/v1/classifications/{code}",
    params(("code" = String, Path, description = "Classification code, case-insensitive")),
    responses(
        (status = 200, description = "Classification found", body = ClassificationEntry),
        (status = 404, description = "Not in the controlled table", body = crate::error::ErrorBody),
    ),
    tag = "reference"
)]
pub async fn get_classification(
    Path(code): Path<String>,
) -> Result<Json<ClassificationEntry>, AppError> {
    tables::lookup_classification(&code)
        .map(|record| Json(ClassificationEntry::from(record)))
        .ok_or_else(|| AppError::NotFound(format!("classification {code}")))
}

/// GET /v1/destinations/embargoed: List embargoed destinations.
#[utoipa::path(
    get,
    path = "/v1/destinations/embargoed",
    responses(
        (status = 200, description = "Embargoed destinations", body = EmbargoedDestinations),
    ),
    tag = "reference"
)]
pub async fn list_embargoed() -> Json<EmbargoedDestinations> {
    Json(EmbargoedDestinations {
        destinations: tables::embargoed_destinations()
            .iter()
            .map(|d| d.to_string())
            .collect(),
    })
}
