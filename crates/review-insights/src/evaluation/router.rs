use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;

use crate::error::AppError;

use super::domain::{
    Business, BusinessId, EvaluationRun, QuestionId, ReviewId, RunId, SourceId,
};
use super::navigation::{fetch_run, DrilldownError, GatewayError, ReviewGateway};
use super::report::views::{
    AssessmentListView, InterviewDetailView, MetricBreakdownView, RunSummaryView,
};
use super::report::{assessment_list, write_interview_rows_csv, RunReport};

/// Read-only JSON endpoints over the review hierarchy and run reports.
pub fn review_router<G>(gateway: Arc<G>) -> Router
where
    G: ReviewGateway + 'static,
{
    Router::new()
        .route("/api/v1/businesses", get(businesses_handler::<G>))
        .route(
            "/api/v1/businesses/:business_id/reviews",
            get(reviews_handler::<G>),
        )
        .route("/api/v1/reviews/:review_id/runs", get(runs_handler::<G>))
        .route("/api/v1/runs/:run_id/summary", get(summary_handler::<G>))
        .route("/api/v1/runs/:run_id/breakdown", get(breakdown_handler::<G>))
        .route(
            "/api/v1/runs/:run_id/breakdown.csv",
            get(breakdown_csv_handler::<G>),
        )
        .route(
            "/api/v1/runs/:run_id/interviews/:source_id",
            get(interview_handler::<G>),
        )
        .route(
            "/api/v1/questions/:question_id/rubric",
            get(rubric_handler::<G>),
        )
        .with_state(gateway)
}

fn loading(what: &'static str) -> impl FnOnce(GatewayError) -> AppError {
    move |source| AppError::Drilldown(DrilldownError::LoadFailure { what, source })
}

pub(crate) async fn businesses_handler<G>(
    State(gateway): State<Arc<G>>,
) -> Result<Json<Vec<Business>>, AppError>
where
    G: ReviewGateway + 'static,
{
    let businesses = gateway
        .businesses_with_reviews()
        .await
        .map_err(loading("businesses"))?;
    Ok(Json(businesses))
}

pub(crate) async fn reviews_handler<G>(
    State(gateway): State<Arc<G>>,
    Path(business_id): Path<String>,
) -> Result<Json<AssessmentListView>, AppError>
where
    G: ReviewGateway + 'static,
{
    let reviews = gateway
        .business_reviews(&BusinessId::new(business_id))
        .await
        .map_err(loading("assessments"))?;
    Ok(Json(assessment_list(&reviews)))
}

pub(crate) async fn runs_handler<G>(
    State(gateway): State<Arc<G>>,
    Path(review_id): Path<String>,
) -> Result<Json<Vec<EvaluationRun>>, AppError>
where
    G: ReviewGateway + 'static,
{
    let runs = gateway
        .assessment_runs(&ReviewId::new(review_id))
        .await
        .map_err(loading("evaluation runs"))?;
    Ok(Json(runs))
}

pub(crate) async fn summary_handler<G>(
    State(gateway): State<Arc<G>>,
    Path(run_id): Path<String>,
) -> Result<Json<RunSummaryView>, AppError>
where
    G: ReviewGateway + 'static,
{
    let (detail, scores) = fetch_run(gateway.as_ref(), &RunId::new(run_id)).await?;
    Ok(Json(RunReport::new(&detail, &scores).summary()))
}

pub(crate) async fn breakdown_handler<G>(
    State(gateway): State<Arc<G>>,
    Path(run_id): Path<String>,
) -> Result<Json<MetricBreakdownView>, AppError>
where
    G: ReviewGateway + 'static,
{
    let (detail, scores) = fetch_run(gateway.as_ref(), &RunId::new(run_id)).await?;
    Ok(Json(RunReport::new(&detail, &scores).breakdown()))
}

pub(crate) async fn breakdown_csv_handler<G>(
    State(gateway): State<Arc<G>>,
    Path(run_id): Path<String>,
) -> Result<Response, AppError>
where
    G: ReviewGateway + 'static,
{
    let (detail, scores) = fetch_run(gateway.as_ref(), &RunId::new(run_id)).await?;
    let breakdown = RunReport::new(&detail, &scores).breakdown();

    let mut body = Vec::new();
    write_interview_rows_csv(&breakdown.interviews, &mut body)?;
    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/csv; charset=utf-8")],
        body,
    )
        .into_response())
}

pub(crate) async fn interview_handler<G>(
    State(gateway): State<Arc<G>>,
    Path((run_id, source_id)): Path<(String, String)>,
) -> Result<Json<InterviewDetailView>, AppError>
where
    G: ReviewGateway + 'static,
{
    let (detail, scores) = fetch_run(gateway.as_ref(), &RunId::new(run_id)).await?;
    Ok(Json(
        RunReport::new(&detail, &scores).interview(&SourceId::new(source_id)),
    ))
}

pub(crate) async fn rubric_handler<G>(
    State(gateway): State<Arc<G>>,
    Path(question_id): Path<String>,
) -> Result<Response, AppError>
where
    G: ReviewGateway + 'static,
{
    let question_id = QuestionId::new(question_id);
    let rubric = gateway
        .question_rubric(&question_id)
        .await
        .map_err(loading("question rubric"))?;

    Ok(match rubric {
        Some(rubric) => (StatusCode::OK, Json(rubric)).into_response(),
        None => {
            let payload = json!({
                "question_id": question_id,
                "error": "question no longer exists",
            });
            (StatusCode::NOT_FOUND, Json(payload)).into_response()
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::navigation::tests::common::FakeGateway;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::Value;
    use tower::ServiceExt;

    fn router() -> (Router, Arc<FakeGateway>) {
        let gateway = Arc::new(FakeGateway::seeded());
        (review_router(gateway.clone()), gateway)
    }

    async fn get_json(router: Router, uri: &str) -> (StatusCode, Value) {
        let response = router
            .oneshot(Request::get(uri).body(Body::empty()).expect("request builds"))
            .await
            .expect("router responds");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body readable");
        let body = serde_json::from_slice(&bytes).expect("json body");
        (status, body)
    }

    #[tokio::test]
    async fn summary_route_aggregates_per_source_scores() {
        let (router, gateway) = router();

        let (status, body) = get_json(router, "/api/v1/runs/run-1/summary").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["overall_score"], json!(75.0));
        assert_eq!(body["status_label"], "Strong");
        assert_eq!(body["metrics"][0]["code"], "ADAPTABILITY");
        assert_eq!(gateway.calls("run_detail"), 1);
        assert_eq!(gateway.calls("run_scores"), 1);
    }

    #[tokio::test]
    async fn assessment_route_dates_each_entry() {
        let (router, gateway) = router();

        let (status, body) = get_json(router, "/api/v1/businesses/biz-1/reviews").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["pending"][0]["id"], "rev-1");
        assert_eq!(body["pending"][0]["status_label"], "Pending");
        assert_eq!(body["pending"][0]["date"], "Unknown date");
        assert!(body["pending"][0].get("date_field").is_none());
        assert_eq!(body["completed"], json!([]));
        assert_eq!(gateway.calls("reviews"), 1);
    }

    #[tokio::test]
    async fn interview_route_renders_unknown_sources() {
        let (router, _) = router();

        let (status, body) = get_json(router, "/api/v1/runs/run-1/interviews/ghost").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["source_name"], "Unknown Interview");
        assert_eq!(body["metrics"], json!([]));
        assert_eq!(body["average_score"], json!(0.0));
    }

    #[tokio::test]
    async fn missing_run_is_not_found() {
        let (router, _) = router();

        let (status, body) = get_json(router, "/api/v1/runs/run-404/breakdown").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"]
            .as_str()
            .expect("error message")
            .contains("run detail"));
    }

    #[tokio::test]
    async fn unavailable_scores_are_bad_gateway() {
        let (router, gateway) = router();
        gateway.fail("run_scores");

        let (status, _) = get_json(router, "/api/v1/runs/run-1/summary").await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn deleted_rubric_is_not_found() {
        let (router, _) = router();

        let (status, body) = get_json(router, "/api/v1/questions/q-gone/rubric").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["question_id"], "q-gone");
    }

    #[tokio::test]
    async fn breakdown_csv_lists_interviews() {
        let (router, _) = router();

        let response = router
            .oneshot(
                Request::get("/api/v1/runs/run-1/breakdown.csv")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("router responds");

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body readable");
        let text = String::from_utf8(bytes.to_vec()).expect("utf8");
        assert!(text.starts_with("source_id,name,source_type"));
        assert!(text.contains("src-a,Avery,candidate,75.0,2,1"));
    }
}
