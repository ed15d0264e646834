use super::error::{Result, ServiceError};
use super::state::AppState;
use crate::lookup::{LookupOutcome, lookup};
use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use certforge_types::CertificateRecord;
use serde::Serialize;
use tokio::sync::OwnedSemaphorePermit;

/// The verification view of one certificate.
#[derive(Debug, Serialize)]
pub struct CertificateView {
    pub certificate_id: String,
    pub holder_name: String,
    pub program_name: String,
    pub issue_date: String,
    /// e.g. "March 15, 2024"
    pub issue_date_display: String,
    pub status: String,
    /// "Valid" or the stored status verbatim.
    pub status_label: String,
    pub is_valid: bool,
    pub preview_url: String,
    pub download_url: String,
}

impl CertificateView {
    fn from_record(record: &CertificateRecord) -> Self {
        let base = format!("/api/v1/certificates/{}", record.display_id);
        Self {
            certificate_id: record.display_id.clone(),
            holder_name: record.holder_name.clone(),
            program_name: record.program_name.clone(),
            issue_date: record.issue_date.clone(),
            issue_date_display: record.formatted_issue_date(),
            status: record.status.to_string(),
            status_label: record.status.label().to_string(),
            is_valid: record.status.is_valid(),
            preview_url: format!("{}/preview.png", base),
            download_url: format!("{}/download", base),
        }
    }
}

pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "store": state.store.name(),
        "typeface": state.renderer.typeface_name(),
        "available_render_slots": state.render_permits.available_permits(),
    }))
}

/// `GET /api/v1/certificates/:id`
pub async fn verify_certificate(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CertificateView>> {
    let record = find(&state, &id).await?;
    Ok(Json(CertificateView::from_record(&record)))
}

/// `GET /api/v1/certificates/:id/preview.png`
pub async fn preview_certificate(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let record = find(&state, &id).await?;
    let _permit = acquire(&state)?;

    let assets = state.renderer.load_assets().await;
    let renderer = state.renderer.clone();
    let png = tokio::task::spawn_blocking(move || {
        renderer.render_with_assets(&record, &assets).to_png()
    })
    .await
    .map_err(|e| ServiceError::Internal(format!("render task failed: {}", e)))?
    .map_err(|e| ServiceError::Internal(e.to_string()))?;

    Ok((StatusCode::OK, [(header::CONTENT_TYPE, "image/png")], png))
}

/// `GET /api/v1/certificates/:id/download`
pub async fn download_certificate(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let record = find(&state, &id).await?;
    let _permit = acquire(&state)?;

    let assets = state.renderer.load_assets().await;
    let renderer = state.renderer.clone();
    let exporter = state.exporter;
    let document = tokio::task::spawn_blocking(move || {
        let rendered = renderer.render_with_assets(&record, &assets);
        exporter.export(&rendered)
    })
    .await
    .map_err(|e| ServiceError::Internal(format!("export task failed: {}", e)))??;

    log::info!(
        "Exported {} ({} bytes)",
        document.filename,
        document.bytes.len()
    );

    let disposition = format!("attachment; filename=\"{}\"", document.filename);
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        document.bytes,
    ))
}

async fn find(state: &AppState, id: &str) -> Result<CertificateRecord> {
    match lookup(state.store.as_ref(), id).await? {
        LookupOutcome::Found(record) => Ok(record),
        LookupOutcome::NotFound { display_id } => Err(ServiceError::NotFound(display_id)),
    }
}

fn acquire(state: &AppState) -> Result<OwnedSemaphorePermit> {
    state
        .render_permits
        .clone()
        .try_acquire_owned()
        .map_err(|_| ServiceError::Overloaded)
}
