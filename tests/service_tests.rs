mod common;

use axum::{
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
    response::Response,
};
use certforge::{AppState, Config, DocumentExporter, RestRecordStore, build_router};
use common::*;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

fn app_state(config: Config) -> AppState {
    AppState::new(
        Arc::new(seeded_store()),
        renderer_with(full_assets()),
        DocumentExporter::default(),
        config,
    )
}

async fn get(state: AppState, uri: &str) -> Result<Response, Box<dyn std::error::Error>> {
    let request = Request::builder().uri(uri).body(Body::empty())?;
    Ok(build_router(state).oneshot(request).await?)
}

async fn json_body(response: Response) -> Result<Value, Box<dyn std::error::Error>> {
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[tokio::test]
async fn health_reports_store_and_typeface() -> TestResult {
    init_logging();
    let response = get(app_state(Config::builtin()?), "/health").await?;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await?;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["store"], "InMemoryRecordStore");
    assert_eq!(body["typeface"], "BitmapTypeface");
    Ok(())
}

#[tokio::test]
async fn verification_view_for_known_id() -> TestResult {
    init_logging();
    let response = get(
        app_state(Config::builtin()?),
        "/api/v1/certificates/ezzcode-2024-wd-001",
    )
    .await?;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await?;
    assert_eq!(body["certificate_id"], "EZZCODE-2024-WD-001");
    assert_eq!(body["holder_name"], "Aisha Rahman");
    assert_eq!(body["program_name"], "Full-Stack Web Development");
    assert_eq!(body["issue_date_display"], "March 15, 2024");
    assert_eq!(body["status_label"], "Valid");
    assert_eq!(body["is_valid"], true);
    assert_eq!(
        body["download_url"],
        "/api/v1/certificates/EZZCODE-2024-WD-001/download"
    );
    Ok(())
}

#[tokio::test]
async fn revoked_certificate_shows_raw_status() -> TestResult {
    init_logging();
    let response = get(
        app_state(Config::builtin()?),
        "/api/v1/certificates/EZZCODE-2024-FS-004",
    )
    .await?;
    let body = json_body(response).await?;
    assert_eq!(body["status_label"], "revoked");
    assert_eq!(body["is_valid"], false);
    Ok(())
}

#[tokio::test]
async fn unknown_id_is_404_with_message() -> TestResult {
    init_logging();
    let response = get(
        app_state(Config::builtin()?),
        "/api/v1/certificates/EZZCODE-2024-QQ-123",
    )
    .await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = json_body(response).await?;
    assert_eq!(body["error"], "NotFound");
    assert_eq!(
        body["message"],
        "Certificate not found. Please check the ID and try again."
    );
    Ok(())
}

#[tokio::test]
async fn blank_id_is_400() -> TestResult {
    init_logging();
    let response = get(app_state(Config::builtin()?), "/api/v1/certificates/%20%20").await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json_body(response).await?;
    assert_eq!(body["message"], "Please enter a certificate ID");
    Ok(())
}

#[tokio::test]
async fn unreachable_store_is_502() -> TestResult {
    init_logging();
    let store = RestRecordStore::new(
        "http://127.0.0.1:1",
        "certificates",
        "",
        Duration::from_millis(200),
    )?;
    let state = AppState::new(
        Arc::new(store),
        renderer_with(full_assets()),
        DocumentExporter::default(),
        Config::builtin()?,
    );

    let response = get(state, "/api/v1/certificates/EZZCODE-2024-WD-001").await?;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = json_body(response).await?;
    assert_eq!(body["error"], "LookupFailed");
    assert_eq!(
        body["message"],
        "An error occurred while verifying the certificate."
    );
    Ok(())
}

#[tokio::test]
async fn preview_is_a_png_of_the_certificate() -> TestResult {
    init_logging();
    let response = get(
        app_state(Config::builtin()?),
        "/api/v1/certificates/EZZCODE-2024-WD-001/preview.png",
    )
    .await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");

    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    let image = image::load_from_memory(&bytes)?;
    assert_eq!((image.width(), image.height()), (1600, 1130));
    Ok(())
}

#[tokio::test]
async fn download_is_an_attached_pdf() -> TestResult {
    init_logging();
    let response = get(
        app_state(Config::builtin()?),
        "/api/v1/certificates/ezzcode-2024-ai-003/download",
    )
    .await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"EZZCODE-2024-AI-003.pdf\""
    );

    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    let pdf = ExportedPdf::from_bytes(bytes.to_vec())?;
    assert_eq!(pdf.page_count(), 1);
    assert_eq!(pdf.links()?.len(), 2);
    Ok(())
}

#[tokio::test]
async fn renders_beyond_the_limit_are_refused() -> TestResult {
    init_logging();
    let config = Config::from_toml_str("[concurrency]\nmax_concurrent_renders = 0\n")?;
    let state = app_state(config);

    let response = get(
        state.clone(),
        "/api/v1/certificates/EZZCODE-2024-WD-001/download",
    )
    .await?;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = json_body(response).await?;
    assert_eq!(body["error"], "ServiceOverloaded");

    // Lookups do not need a render slot.
    let response = get(state, "/api/v1/certificates/EZZCODE-2024-WD-001").await?;
    assert_eq!(response.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn state_builds_from_project_config() -> TestResult {
    init_logging();
    let config = Config::builtin()?.with_base_path(env!("CARGO_MANIFEST_DIR"));
    let state = AppState::from_config(config)?;

    let response = get(state, "/api/v1/certificates/EZZCODE-2024-PY-002").await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await?;
    assert_eq!(body["holder_name"], "Daniel Okafor");
    Ok(())
}
