use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use axum::{Json, Router, extract::State, http::StatusCode, routing::post};
use axum_test::{
    TestServer,
    multipart::{MultipartForm, Part},
};
use clap::Parser;
use labelcheck_api::{
    application::http::server::http_server::{router, state},
    args::Args,
};
use serde_json::{Value, json};
use tokio::net::TcpListener;

/// PNG signature, enough for the image to be sniffed and forwarded.
const PNG_BYTES: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
const PNG_BASE64: &str = "iVBORw0KGgo=";

struct StubLLM {
    status: StatusCode,
    content: String,
    calls: AtomicUsize,
}

async fn chat_completions(State(stub): State<Arc<StubLLM>>) -> (StatusCode, Json<Value>) {
    stub.calls.fetch_add(1, Ordering::SeqCst);

    let body = json!({
        "choices": [
            { "message": { "role": "assistant", "content": stub.content } }
        ]
    });
    (stub.status, Json(body))
}

/// Starts a chat-completions stand-in on an ephemeral port and returns its base URL.
async fn spawn_stub(status: StatusCode, content: &str) -> (String, Arc<StubLLM>) {
    let stub = Arc::new(StubLLM {
        status,
        content: content.to_string(),
        calls: AtomicUsize::new(0),
    });

    let app = Router::new()
        .route("/chat/completions", post(chat_completions))
        .with_state(stub.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), stub)
}

fn test_server(base_url: &str) -> TestServer {
    let args = Args::parse_from([
        "labelcheck-api",
        "--llm-api-key",
        "sk-test",
        "--llm-base-url",
        base_url,
        "--llm-timeout-secs",
        "5",
        "--disable-metrics",
    ]);

    let app_state = state(Arc::new(args)).unwrap();
    TestServer::new(router(app_state).unwrap()).unwrap()
}

fn milk_allergens() -> Value {
    json!([
        { "id": "milk", "name": "Milk", "category": "common", "selected": true },
        { "id": "vegan", "name": "Vegan", "category": "dietary", "selected": false }
    ])
}

fn protein_bar_reply() -> String {
    json!({
        "productName": "Protein Bar",
        "isSafe": false,
        "detectedAllergens": [
            { "name": "Milk", "found": "milk chocolate", "severity": "unsafe" }
        ],
        "ingredients": "oats, milk chocolate, calcium caseinate, soy lecithin, salt",
        "recommendation": "Avoid this product, it contains milk.",
        "alternativeSuggestion": "Look for a plant-based protein bar."
    })
    .to_string()
}

#[tokio::test]
async fn test_analyze_returns_enriched_verdict() {
    let (base_url, stub) = spawn_stub(StatusCode::OK, &protein_bar_reply()).await;
    let server = test_server(&base_url);

    let response = server
        .post("/api/analyze")
        .json(&json!({ "base64Image": PNG_BASE64, "allergens": milk_allergens() }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();

    assert_eq!(body["productName"], "Protein Bar");
    assert_eq!(body["isSafe"], false);

    let findings = body["detectedAllergens"].as_array().unwrap();
    assert_eq!(findings.len(), 2);
    assert_eq!(findings[1]["name"], "Milk");
    assert_eq!(findings[1]["found"], "casein (may be related to Milk)");
    assert_eq!(findings[1]["severity"], "caution");

    let recommendation = body["recommendation"].as_str().unwrap();
    assert!(recommendation.starts_with("This product may contain ingredients related to your allergens (Milk)."));
    assert!(recommendation.ends_with("Avoid this product, it contains milk."));

    assert_eq!(stub.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_analyze_accepts_data_url() {
    let (base_url, stub) = spawn_stub(StatusCode::OK, &protein_bar_reply()).await;
    let server = test_server(&base_url);

    let response = server
        .post("/api/analyze")
        .json(&json!({
            "base64Image": format!("data:image/png;base64,{}", PNG_BASE64),
            "allergens": []
        }))
        .await;

    response.assert_status_ok();
    assert_eq!(stub.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_unclear_reply_is_not_an_error() {
    let reply = json!({
        "productName": "Crackers",
        "isSafe": true,
        "detectedAllergens": [],
        "ingredients": "unclear",
        "recommendation": "Looks fine.",
        "alternativeSuggestion": ""
    })
    .to_string();
    let (base_url, _stub) = spawn_stub(StatusCode::OK, &reply).await;
    let server = test_server(&base_url);

    let response = server
        .post("/api/analyze")
        .json(&json!({ "base64Image": PNG_BASE64, "allergens": milk_allergens() }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();

    assert_eq!(body["isSafe"], Value::Null);
    assert_eq!(body["productName"], "Crackers");
    assert!(body["detectedAllergens"].as_array().unwrap().is_empty());
    assert!(body["recommendation"].as_str().unwrap().contains("retake"));
}

#[tokio::test]
async fn test_upstream_failure_is_bad_gateway() {
    let (base_url, stub) = spawn_stub(StatusCode::INTERNAL_SERVER_ERROR, "").await;
    let server = test_server(&base_url);

    let response = server
        .post("/api/analyze")
        .json(&json!({ "base64Image": PNG_BASE64, "allergens": milk_allergens() }))
        .expect_failure()
        .await;

    response.assert_status(StatusCode::BAD_GATEWAY);
    let body: Value = response.json();
    assert_eq!(body["code"], "E_SERVICE_UNAVAILABLE");
    assert_eq!(body["status"], 502);
    assert_eq!(stub.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_non_json_reply_is_bad_gateway() {
    let (base_url, _stub) =
        spawn_stub(StatusCode::OK, "Sorry, I can't read that label.").await;
    let server = test_server(&base_url);

    let response = server
        .post("/api/analyze")
        .json(&json!({ "base64Image": PNG_BASE64, "allergens": [] }))
        .expect_failure()
        .await;

    response.assert_status(StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_empty_reply_is_bad_gateway() {
    let (base_url, stub) = spawn_stub(StatusCode::OK, "").await;
    let server = test_server(&base_url);

    let response = server
        .post("/api/analyze")
        .json(&json!({ "base64Image": PNG_BASE64, "allergens": milk_allergens() }))
        .expect_failure()
        .await;

    response.assert_status(StatusCode::BAD_GATEWAY);
    let body: Value = response.json();
    assert_eq!(body["code"], "E_SERVICE_UNAVAILABLE");
    assert!(
        body["message"]
            .as_str()
            .unwrap()
            .contains("Empty response from LLM")
    );
    assert_eq!(stub.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_invalid_images_are_rejected_before_upstream() {
    let (base_url, stub) = spawn_stub(StatusCode::OK, &protein_bar_reply()).await;
    let server = test_server(&base_url);

    let bodies = [
        json!({ "allergens": [] }),
        json!({ "base64Image": "", "allergens": [] }),
        json!({ "base64Image": "   ", "allergens": [] }),
        json!({ "base64Image": "not base64 at all!", "allergens": [] }),
    ];

    for body in bodies {
        let response = server
            .post("/api/analyze")
            .json(&body)
            .expect_failure()
            .await;

        response.assert_status_bad_request();
        let error: Value = response.json();
        assert_eq!(error["code"], "E_BAD_REQUEST");
    }

    assert_eq!(stub.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_upload_runs_the_same_analysis() {
    let (base_url, stub) = spawn_stub(StatusCode::OK, &protein_bar_reply()).await;
    let server = test_server(&base_url);

    let form = MultipartForm::new()
        .add_text("allergens", milk_allergens().to_string())
        .add_part(
            "image",
            Part::bytes(PNG_BYTES.to_vec())
                .file_name("label.png")
                .mime_type("image/png"),
        );

    let response = server.post("/api/analyze/upload").multipart(form).await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["detectedAllergens"].as_array().unwrap().len(), 2);
    assert_eq!(stub.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_upload_without_image_is_rejected() {
    let (base_url, stub) = spawn_stub(StatusCode::OK, &protein_bar_reply()).await;
    let server = test_server(&base_url);

    let form = MultipartForm::new().add_text("allergens", "[]");

    let response = server
        .post("/api/analyze/upload")
        .multipart(form)
        .expect_failure()
        .await;

    response.assert_status_bad_request();
    assert_eq!(stub.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_health() {
    let server = test_server("http://127.0.0.1:9");

    let response = server.get("/api/health").await;

    response.assert_status_ok();
    response.assert_json(&json!({ "status": "ok" }));
}
