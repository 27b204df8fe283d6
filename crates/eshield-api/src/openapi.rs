//! # OpenAPI Specification Assembly
//!
//! Collects the utoipa-documented routes into one OpenAPI 3.1 document
//! served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "ExportShield API",
        version = "0.1.0",
        description = "Mock EAR license-exception evaluation. Results are informational and not legal advice.",
        license(name = "AGPL-3.0-or-later")
    ),
    paths(
        crate::routes::evaluate::evaluate,
        crate::routes::reference::list_classifications,
        crate::routes::reference::get_classification,
        crate::routes::reference::list_embargoed,
    ),
    components(schemas(
        eshield_core::EvaluationInput,
        eshield_core::DeclaredValue,
        eshield_core::EndUserType,
        eshield_core::Determination,
        eshield_core::DeterminationKind,
        eshield_core::ExceptionCode,
        crate::routes::evaluate::EvaluateResponse,
        crate::routes::reference::ClassificationEntry,
        crate::routes::reference::EmbargoedDestinations,
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
    )),
    tags(
        (name = "evaluation", description = "License-exception evaluation"),
        (name = "reference", description = "Classification and destination tables"),
    )
)]
pub struct ApiDoc;

/// Build the OpenAPI router.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_lists_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();
        for expected in [
            "/v1/evaluate",
            "/v1/classifications",
            "/v1/classifications/{code}",
            "/v1/destinations/embargoed",
        ] {
            assert!(
                paths.iter().any(|p| p.as_str() == expected),
                "missing {expected}"
            );
        }
    }

    #[test]
    fn spec_serializes() {
        let json = serde_json::to_value(ApiDoc::openapi()).unwrap();
        assert_eq!(json["info"]["title"], "ExportShield API");
        assert!(json["components"]["schemas"]["EvaluateResponse"].is_object());
    }
}
