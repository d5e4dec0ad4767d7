use std::sync::Arc;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use jpid_core::models::config::JpidConfig;
use jpid_core::{FragmentCategory, ParserFactory, RecordedOcrBackend, RecordedOutput, TextFragment};
use jpid_server::{app, AppState, OcrService};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tower::ServiceExt;

const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 13];

fn png_payload() -> String {
    STANDARD.encode(PNG_MAGIC)
}

fn router_with(output: RecordedOutput, config: JpidConfig) -> (Router, Arc<RecordedOcrBackend>) {
    let backend = Arc::new(RecordedOcrBackend::new(output));
    let state = AppState::new(config, backend.clone()).unwrap();
    (app(state), backend)
}

fn router(output: RecordedOutput) -> (Router, Arc<RecordedOcrBackend>) {
    router_with(output, JpidConfig::default())
}

fn license_regions() -> RecordedOutput {
    RecordedOutput::regions(vec![
        TextFragment::new("田中太郎", FragmentCategory::Name),
        TextFragment::new("東京都港区", FragmentCategory::Address),
        TextFragment::new("平成5年12月25日", FragmentCategory::Date),
    ])
}

async fn send(router: Router, method: Method, uri: &str, body: Body) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(body)
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn post_ocr(router: Router, body: Value) -> (StatusCode, Value) {
    send(router, Method::POST, "/ocr", Body::from(body.to_string())).await
}

fn error_message(body: &Value) -> &str {
    body["error"]["message"].as_str().unwrap()
}

#[tokio::test]
async fn test_health() {
    let (router, _) = router(RecordedOutput::default());
    let (status, body) = send(router, Method::GET, "/health", Body::empty()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "jpid");
}

#[tokio::test]
async fn test_document_types() {
    let (router, _) = router(RecordedOutput::default());
    let (status, body) = send(router, Method::GET, "/document-types", Body::empty()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "supported_document_types": ["drivers_license_jp", "individual_number_card_jp"],
            "total_count": 2
        })
    );
}

#[tokio::test]
async fn test_ocr_success_from_regions() {
    let (router, backend) = router(license_regions());
    let (status, body) = post_ocr(
        router,
        json!({"image": png_payload(), "documentType": "drivers_license_jp"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["documentType"], "drivers_license_jp");
    assert_eq!(body["data"]["name"], "田中太郎");
    assert_eq!(body["data"]["address"], "東京都港区");
    assert_eq!(body["data"]["birth_date"], "平成5年12月25日");
    assert_eq!(backend.text_requests(), 0);
    assert_eq!(backend.releases(), 1);
}

#[tokio::test]
async fn test_ocr_success_from_flat_text_with_data_url() {
    let (router, _) = router(RecordedOutput::text(
        "氏名 山田 花子\n住所 大阪府大阪市\n個人番号 123456789012",
    ));
    let image = format!("data:image/png;base64,{}", png_payload());
    let (status, body) = post_ocr(
        router,
        json!({"image": image, "documentType": "individual_number_card_jp"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["individual_number"], "1234-5678-9012");
    assert_eq!(body["data"]["name"], "山田 花子");
}

#[tokio::test]
async fn test_malformed_json() {
    let (router, _) = router(RecordedOutput::default());
    let (status, body) = send(router, Method::POST, "/ocr", Body::from("{not json")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], 400);
    assert!(error_message(&body).starts_with("Invalid JSON format"));
}

#[tokio::test]
async fn test_missing_fields() {
    let (app, _) = router(RecordedOutput::default());
    let (status, body) = post_ocr(app, json!({"documentType": "drivers_license_jp"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&body), "image field is required");

    let (router, _) = router(RecordedOutput::default());
    let (status, body) = post_ocr(router, json!({"image": png_payload(), "documentType": " "})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&body), "documentType field is required");
}

#[tokio::test]
async fn test_unsupported_document_type_checked_before_image() {
    let (router, backend) = router(license_regions());
    let (status, body) = post_ocr(
        router,
        json!({"image": "!!not-base64!!", "documentType": "passport_us"}),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error_message(&body), "unsupported document type: passport_us");
    assert_eq!(backend.acquisitions(), 0);
}

#[tokio::test]
async fn test_invalid_base64() {
    let (router, _) = router(RecordedOutput::default());
    let (status, body) = post_ocr(
        router,
        json!({"image": "!!not-base64!!", "documentType": "drivers_license_jp"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&body), "invalid base64 encoding");
}

#[tokio::test]
async fn test_image_too_large() {
    let mut config = JpidConfig::default();
    config.input.max_image_bytes = 8;
    let (router, _) = router_with(RecordedOutput::default(), config);

    let (status, body) = post_ocr(
        router,
        json!({"image": png_payload(), "documentType": "drivers_license_jp"}),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error_message(&body), "image size exceeds maximum limit of 8 bytes");
}

#[tokio::test]
async fn test_body_over_limit_uses_error_envelope() {
    let mut config = JpidConfig::default();
    config.input.max_image_bytes = 8;
    let (router, backend) = router_with(license_regions(), config);

    let mut image = PNG_MAGIC.to_vec();
    image.resize(200 * 1024, 0);
    let (status, body) = post_ocr(
        router,
        json!({"image": STANDARD.encode(&image), "documentType": "drivers_license_jp"}),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], 422);
    assert_eq!(error_message(&body), "image size exceeds maximum limit of 8 bytes");
    assert_eq!(backend.acquisitions(), 0);
}

#[tokio::test]
async fn test_unsupported_image_format() {
    let (router, _) = router(RecordedOutput::default());
    let (status, body) = post_ocr(
        router,
        json!({"image": STANDARD.encode(b"GIF89a-data"), "documentType": "drivers_license_jp"}),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        error_message(&body),
        "unsupported image format, only PNG and JPEG are supported"
    );
}

#[tokio::test]
async fn test_parse_failure_is_unprocessable() {
    let (router, backend) = router(RecordedOutput::text("住所:東京都港区六本木1-2-3"));
    let (status, body) = post_ocr(
        router,
        json!({"image": png_payload(), "documentType": "drivers_license_jp"}),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(error_message(&body).contains("'name'"));
    assert_eq!(backend.releases(), 1);
}

#[tokio::test]
async fn test_timeout() {
    let config = JpidConfig::default();
    let backend = Arc::new(license_regions_backend().with_delay(Duration::from_millis(500)));
    let factory = Arc::new(ParserFactory::with_builtin(backend).unwrap());
    let service = OcrService::new(factory, &config).with_timeout(Duration::from_millis(50));
    let router = app(AppState::with_service(config, service));

    let (status, body) = post_ocr(
        router,
        json!({"image": png_payload(), "documentType": "drivers_license_jp"}),
    )
    .await;

    assert_eq!(status, StatusCode::REQUEST_TIMEOUT);
    assert_eq!(body["error"]["code"], 408);
    assert!(error_message(&body).starts_with("Request timeout"));
}

fn license_regions_backend() -> RecordedOcrBackend {
    RecordedOcrBackend::new(license_regions())
}

#[tokio::test]
async fn test_method_not_allowed() {
    let (router, _) = router(RecordedOutput::default());
    let (status, body) = send(router, Method::GET, "/ocr", Body::empty()).await;

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["error"]["code"], 405);
}

#[tokio::test]
async fn test_unknown_path() {
    let (router, _) = router(RecordedOutput::default());
    let (status, body) = send(router, Method::GET, "/nope", Body::empty()).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], 404);
}
