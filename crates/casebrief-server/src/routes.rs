//! HTTP routes and handlers

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use casebrief_classifiers::TextAnalysis;
use casebrief_core::{
    CategoryDraft, CategoryOverride, DocumentCategory, DocumentId, Error, RiskFlag,
    RiskFlagDraft, RiskSummary,
};
use serde::Deserialize;
use serde_json::json;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{debug, error, info};

use crate::analysis::{self, DocumentAnalysis};
use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(render_metrics))
        .route("/api/classify", post(classify))
        .route("/api/documents/:id", put(register_document))
        .route("/api/documents/:id/analyze", post(analyze_document))
        .route(
            "/api/risks",
            get(list_risks).post(create_risks).patch(resolve_risk),
        )
        .route("/api/risks/summary", get(risk_summary))
        .route(
            "/api/categories",
            get(get_category)
                .post(upsert_category)
                .patch(override_category),
        )
        .fallback(fallback)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health_check() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn render_metrics(State(state): State<AppState>) -> Response {
    match &state.metrics {
        Some(handle) => handle.render().into_response(),
        None => AppError::NotFound("metrics exporter not installed".to_string()).into_response(),
    }
}

#[derive(Debug, Deserialize)]
struct ContentRequest {
    content: String,
}

#[derive(Debug, Deserialize)]
struct AnalyzeRequest {
    content: String,

    #[serde(default)]
    reanalyze: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DocumentQuery {
    document_id: DocumentId,
}

#[derive(Debug, Deserialize)]
struct FlagQuery {
    id: String,
}

/// A risk flag draft addressed to a document
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewRiskFlag {
    document_id: DocumentId,

    #[serde(flatten)]
    draft: RiskFlagDraft,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResolveRequest {
    is_resolved: bool,
}

/// A category draft addressed to a document
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewCategory {
    document_id: DocumentId,

    #[serde(flatten)]
    draft: CategoryDraft,
}

/// Classify text without persisting anything
async fn classify(
    State(state): State<AppState>,
    payload: Result<Json<ContentRequest>, JsonRejection>,
) -> Result<Json<TextAnalysis>, AppError> {
    let Json(req) = payload?;
    debug!(bytes = req.content.len(), "Classify request");
    Ok(Json(analysis::preview(&state.engines, &req.content)))
}

async fn register_document(
    State(state): State<AppState>,
    path: Result<Path<DocumentId>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let Path(document_id) = path?;
    state.sink.register_document(document_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn analyze_document(
    State(state): State<AppState>,
    path: Result<Path<DocumentId>, PathRejection>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<DocumentAnalysis>, AppError> {
    let Path(document_id) = path?;
    let Json(req) = payload?;

    let result = analysis::analyze_document(
        state.sink.as_ref(),
        &state.engines,
        document_id,
        &req.content,
        req.reanalyze,
    )
    .await?;
    Ok(Json(result))
}

async fn list_risks(
    State(state): State<AppState>,
    query: Result<Query<DocumentQuery>, QueryRejection>,
) -> Result<Json<Vec<RiskFlag>>, AppError> {
    let Query(query) = query?;
    Ok(Json(state.sink.list_risk_flags(query.document_id).await?))
}

async fn create_risks(
    State(state): State<AppState>,
    payload: Result<Json<Vec<NewRiskFlag>>, JsonRejection>,
) -> Result<(StatusCode, Json<Vec<RiskFlag>>), AppError> {
    let Json(batch) = payload?;
    let Some(document_id) = batch.first().map(|f| f.document_id) else {
        return Ok((StatusCode::OK, Json(Vec::new())));
    };

    if batch.iter().any(|f| f.document_id != document_id) {
        return Err(AppError::BadRequest(
            "all risk flags in a batch must belong to one document".to_string(),
        ));
    }

    let drafts = batch.into_iter().map(|f| f.draft).collect();
    let created = state.sink.create_risk_flags(document_id, drafts).await?;
    info!(document_id, count = created.len(), "Risk flags created");
    Ok((StatusCode::CREATED, Json(created)))
}

async fn resolve_risk(
    State(state): State<AppState>,
    query: Result<Query<FlagQuery>, QueryRejection>,
    payload: Result<Json<ResolveRequest>, JsonRejection>,
) -> Result<Json<RiskFlag>, AppError> {
    let Query(query) = query?;
    let Json(req) = payload?;

    if !req.is_resolved {
        return Err(AppError::BadRequest(
            "resolved risk flags cannot be reopened".to_string(),
        ));
    }

    Ok(Json(state.sink.resolve_risk_flag(&query.id).await?))
}

async fn risk_summary(
    State(state): State<AppState>,
    query: Result<Query<DocumentQuery>, QueryRejection>,
) -> Result<Json<RiskSummary>, AppError> {
    let Query(query) = query?;
    let flags = state.sink.list_risk_flags(query.document_id).await?;
    Ok(Json(RiskSummary::from_flags(&flags)))
}

async fn get_category(
    State(state): State<AppState>,
    query: Result<Query<DocumentQuery>, QueryRejection>,
) -> Result<Json<DocumentCategory>, AppError> {
    let Query(query) = query?;
    state
        .sink
        .get_category(query.document_id)
        .await?
        .map(Json)
        .ok_or_else(|| Error::not_found("category", query.document_id).into())
}

async fn upsert_category(
    State(state): State<AppState>,
    payload: Result<Json<NewCategory>, JsonRejection>,
) -> Result<Json<DocumentCategory>, AppError> {
    let Json(req) = payload?;
    let stored = state
        .sink
        .upsert_category(req.document_id, req.draft)
        .await?;
    Ok(Json(stored))
}

async fn override_category(
    State(state): State<AppState>,
    query: Result<Query<DocumentQuery>, QueryRejection>,
    payload: Result<Json<CategoryOverride>, JsonRejection>,
) -> Result<Json<DocumentCategory>, AppError> {
    let Query(query) = query?;
    let Json(ov) = payload?;

    let stored = state.sink.override_category(query.document_id, ov).await?;
    info!(
        document_id = query.document_id,
        category = %stored.category,
        "Category overridden"
    );
    Ok(Json(stored))
}

async fn fallback() -> AppError {
    AppError::NotFound("no such route".to_string())
}

/// Error type for HTTP handlers
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Core(#[from] Error),
}

impl From<JsonRejection> for AppError {
    fn from(err: JsonRejection) -> Self {
        AppError::BadRequest(err.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(err: QueryRejection) -> Self {
        AppError::BadRequest(err.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(err: PathRejection) -> Self {
        AppError::BadRequest(err.body_text())
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Core(Error::NotFound { .. }) => StatusCode::NOT_FOUND,
            AppError::Core(Error::Validation(_)) => StatusCode::BAD_REQUEST,
            AppError::Core(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {}", self);
            metrics::counter!("casebrief_errors_total", "type" => "internal").increment(1);
        } else {
            debug!(status = status.as_u16(), "Request rejected: {}", self);
            metrics::counter!("casebrief_errors_total", "type" => "client").increment(1);
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError::from(Error::not_found("risk flag", "risk_1")).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::from(Error::validation("bad score")).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::from(Error::store("disk full")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::BadRequest("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
    }
}
