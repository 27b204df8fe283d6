//! # Evaluation Route
//!
//! `POST /v1/evaluate` runs the rule evaluator on a posted scenario and
//! returns the determinations, the decision trace and an overall verdict.
//!
//! The body is the form payload as the front end sends it. Missing or
//! malformed fields are not errors; only a body that is not JSON at all
//! is rejected.

use axum::extract::rejection::JsonRejection;
use axum::routing::post;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use eshield_core::{Determination, DeterminationKind, EvaluationInput};
use eshield_rules::TraceStep;

use crate::error::AppError;
use crate::extractors::extract_json;
use crate::state::AppState;

/// Evaluation result returned to the client.
#[derive(Debug, Serialize, ToSchema)]
pub struct EvaluateResponse {
    /// Identifier for correlating this evaluation in logs.
    pub evaluation_id: Uuid,
    /// When the evaluation ran.
    pub evaluated_at: DateTime<Utc>,
    /// Most restrictive outcome among `results`.
    pub verdict: DeterminationKind,
    /// Determinations in the order the rules fired.
    pub results: Vec<Determination>,
    /// Every rule consulted, in order.
    #[schema(value_type = Vec<Object>)]
    pub trace: Vec<TraceStep>,
}

/// Build the evaluation router.
pub fn router() -> Router<AppState> {
    Router::new().route("/v1/evaluate", post(evaluate))
}

/// POST /v1/evaluate: Evaluate a shipment scenario.
#[utoipa::path(
    post,
    path = "/v1/evaluate",
    request_body = EvaluationInput,
    responses(
        (status = 200, description = "License determinations for the scenario", body = EvaluateResponse),
        (status = 400, description = "Body is not valid JSON", body = crate::error::ErrorBody),
    ),
    tag = "evaluation"
)]
pub async fn evaluate(
    body: Result<Json<EvaluationInput>, JsonRejection>,
) -> Result<Json<EvaluateResponse>, AppError> {
    let input = extract_json(body)?;
    let evaluation = eshield_rules::evaluate_with_trace(&input);
    let evaluation_id = Uuid::new_v4();

    tracing::info!(
        %evaluation_id,
        classification = input.classification().unwrap_or("-"),
        destination = %input.destination,
        verdict = %evaluation.verdict,
        results = evaluation.determinations.len(),
        "scenario evaluated"
    );

    Ok(Json(EvaluateResponse {
        evaluation_id,
        evaluated_at: Utc::now(),
        verdict: evaluation.verdict,
        results: evaluation.determinations,
        trace: evaluation.trace,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn test_app() -> Router<()> {
        router().with_state(AppState::default())
    }

    fn post_json(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/v1/evaluate")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(resp: axum::response::Response) -> serde_json::Value {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn evaluate_returns_lvs_for_low_value_shipment() {
        let resp = test_app()
            .oneshot(post_json(
                r#"{"classificationCode":"1A995","destination":"Germany","declaredValue":"5000"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let body = body_json(resp).await;
        assert_eq!(body["verdict"], "EXCEPTION_ELIGIBLE");
        assert_eq!(body["results"].as_array().unwrap().len(), 1);
        assert_eq!(body["results"][0]["exceptionCode"], "LVS");
        assert!(body["trace"].as_array().unwrap().len() > 1);
        assert!(body["evaluation_id"].is_string());
        assert!(body["evaluated_at"].is_string());
    }

    #[tokio::test]
    async fn evaluate_embargo_short_circuits() {
        let resp = test_app()
            .oneshot(post_json(
                r#"{"eccn":"3A001","destination":"Syria","value":100,"endUserType":"Government"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let body = body_json(resp).await;
        assert_eq!(body["verdict"], "LICENSE_REQUIRED");
        assert_eq!(body["results"][0]["exceptionCode"], "EMBARGO");
        assert_eq!(body["results"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn evaluate_accepts_empty_object() {
        let resp = test_app().oneshot(post_json("{}")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let body = body_json(resp).await;
        assert_eq!(body["results"][0]["exceptionCode"], "EAR99");
        assert_eq!(body["verdict"], "NO_LICENSE_REQUIRED");
    }

    #[tokio::test]
    async fn evaluate_tolerates_malformed_fields() {
        let resp = test_app()
            .oneshot(post_json(
                r#"{"classificationCode":"1A995","destination":"Germany","declaredValue":[1],"endUserType":42}"#,
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let body = body_json(resp).await;
        assert_eq!(body["results"][0]["exceptionCode"], "IVL");
    }

    #[tokio::test]
    async fn evaluate_rejects_non_json_body() {
        let resp = test_app().oneshot(post_json("not json")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body = body_json(resp).await;
        assert_eq!(body["error"]["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn evaluate_rejects_missing_content_type() {
        let req = Request::builder()
            .method("POST")
            .uri("/v1/evaluate")
            .body(Body::from("{}"))
            .unwrap();
        let resp = test_app().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
