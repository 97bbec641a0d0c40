//! End-to-end integration tests for the CareBridge bridge.
//!
//! These tests exercise the full pipeline from an HTTP request to the
//! response body: config and catalog loading, selector normalization,
//! message assembly, the provider round-trip, and summary extraction.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use carebridge_bridge::ConversationBridge;
use carebridge_config::{AppConfig, SummaryStrategy};
use carebridge_core::error::GatewayError;
use carebridge_core::message::{Message, Role};
use carebridge_core::provider::{Provider, ProviderRequest, ProviderResponse};
use carebridge_gateway::{GatewayState, build_router};
use carebridge_persona::PersonaCatalog;
use carebridge_providers::OllamaProvider;

// ── Mock Provider ────────────────────────────────────────────────────────

/// A mock provider that returns scripted responses in sequence and keeps
/// every request it was sent.
struct ScriptedProvider {
    responses: Mutex<Vec<Result<String, GatewayError>>>,
    seen: Mutex<Vec<ProviderRequest>>,
    schema: bool,
}

impl ScriptedProvider {
    fn new(responses: Vec<Result<String, GatewayError>>) -> Self {
        Self {
            responses: Mutex::new(responses),
            seen: Mutex::new(Vec::new()),
            schema: false,
        }
    }

    fn text(response: &str) -> Self {
        Self::new(vec![Ok(response.to_string())])
    }

    fn with_schema(mut self) -> Self {
        self.schema = true;
        self
    }

    fn seen(&self) -> Vec<ProviderRequest> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "e2e_mock"
    }

    fn supports_output_schema(&self) -> bool {
        self.schema
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, GatewayError> {
        let mut seen = self.seen.lock().unwrap();
        let responses = self.responses.lock().unwrap();
        if seen.len() >= responses.len() {
            panic!(
                "ScriptedProvider exhausted: call #{}, have {}",
                seen.len(),
                responses.len()
            );
        }
        let outcome = responses[seen.len()].clone();
        let model = request.model.clone();
        seen.push(request);
        outcome.map(|text| ProviderResponse {
            message: Message::assistant(text),
            model,
        })
    }
}

// ── Helpers ──────────────────────────────────────────────────────────────

fn app_with(config: &AppConfig, provider: Arc<dyn Provider>) -> Router {
    let catalog = Arc::new(PersonaCatalog::from_config(&config.persona).unwrap());
    let bridge = ConversationBridge::from_config(config, provider, catalog);
    build_router(Arc::new(GatewayState::new(bridge)), &config.gateway)
}

fn post(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn dizzy_conversation(condition: &str, role: &str, language: &str) -> serde_json::Value {
    serde_json::json!({
        "messages": [
            {"role": "user", "content": "I feel dizzy and tired"},
            {"role": "assistant", "content": "I'm sorry to hear that."}
        ],
        "condition": condition,
        "role": role,
        "language": language
    })
}

const CUSTOM_CATALOG: &str = r#"
[languages.en]
safety_rules = "Never give medical advice."

[languages.en.summary]
tagged = "Summarize with [SYMPTOMS] and [RECOMMENDATIONS] sections."
json = "Summarize as JSON with symptoms and recommendations."

[languages.en.personas.epilepsy]
patient = "You support a patient living with epilepsy."
carer = "You support a carer of someone living with epilepsy."

[languages.de]
safety_rules = "Gib niemals medizinischen Rat."

[languages.de.summary]
tagged = "Fasse mit [SYMPTOMS] und [RECOMMENDATIONS] zusammen."
json = "Fasse als JSON zusammen."

[languages.de.personas.epilepsy]
patient = "Du unterstützt einen Patienten mit Epilepsie."
carer = "Du unterstützt eine Pflegeperson."
"#;

// ── Chat ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn chat_round_trip_with_builtin_catalog() {
    let config = AppConfig::default();
    let provider = Arc::new(ScriptedProvider::text("Try to sit down and drink some water."));
    let app = app_with(&config, provider.clone());

    let response = app
        .oneshot(post("/chat", dizzy_conversation("ms", "patient", "en")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        serde_json::json!({"role": "assistant", "content": "Try to sit down and drink some water."})
    );

    let seen = provider.seen();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].model, "phi3:mini");
    assert_eq!(seen[0].temperature, Some(config.default_temperature));

    let messages = &seen[0].messages;
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[0].role, Role::System);
    assert!(messages[0].content.contains("Multiple Sclerosis"));
    assert!(messages[0].content.contains("NEVER Give Medical Advice"));
    assert_eq!(messages[1..], [
        Message::user("I feel dizzy and tired"),
        Message::assistant("I'm sorry to hear that."),
    ]);
}

#[tokio::test]
async fn every_builtin_persona_is_reachable() {
    let config = AppConfig::default();
    for language in ["en", "ro"] {
        for condition in ["ms", "parkinsons", "alzheimers"] {
            for role in ["patient", "carer"] {
                let provider = Arc::new(ScriptedProvider::text("ok"));
                let response = app_with(&config, provider.clone())
                    .oneshot(post("/chat", dizzy_conversation(condition, role, language)))
                    .await
                    .unwrap();
                assert_eq!(response.status(), StatusCode::OK, "{language}/{condition}/{role}");
                assert!(!provider.seen()[0].messages[0].content.trim().is_empty());
            }
        }
    }
}

#[tokio::test]
async fn chat_error_then_recovery_is_independent() {
    let config = AppConfig::default();
    let provider = Arc::new(ScriptedProvider::new(vec![
        Err(GatewayError::Network("connection refused".into())),
        Ok("Back online.".into()),
    ]));
    let app = app_with(&config, provider.clone());

    let first = app
        .clone()
        .oneshot(post("/chat", dizzy_conversation("parkinsons", "carer", "en")))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(first).await;
    assert!(!body["error"].as_str().unwrap().contains("refused"));

    let second = app
        .oneshot(post("/chat", dizzy_conversation("parkinsons", "carer", "en")))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::OK);
    assert_eq!(provider.seen().len(), 2);
}

// ── Summary ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn tagged_summary_scenario() {
    let mut config = AppConfig::default();
    config.summary.strategy = SummaryStrategy::Tagged;
    let provider = Arc::new(
        ScriptedProvider::text(
            "[SYMPTOMS]\n- Dizziness\n- Fatigue\n[RECOMMENDATIONS]\n- Rest and hydration\n",
        )
        .with_schema(),
    );
    let app = app_with(&config, provider.clone());

    let response = app
        .oneshot(post("/summary", dizzy_conversation("", "", "en")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        serde_json::json!({
            "symptoms": ["Dizziness", "Fatigue"],
            "recommendations": ["Rest and hydration"]
        })
    );

    let seen = provider.seen();
    assert!(seen[0].output_schema.is_none());
    assert!(
        seen[0].messages[0]
            .content
            .contains("User: I feel dizzy and tired\nAI: I'm sorry to hear that.")
    );
}

#[tokio::test]
async fn schema_and_tagged_summaries_agree() {
    let config = AppConfig::default();

    let tagged = app_with(
        &config,
        Arc::new(ScriptedProvider::text("[SYMPTOMS]\n- Tremor\n[RECOMMENDATIONS]\n1. Stretch")),
    )
    .oneshot(post("/summary", dizzy_conversation("", "", "ro")))
    .await
    .unwrap();

    let schema = app_with(
        &config,
        Arc::new(
            ScriptedProvider::text(r#"{"symptoms": ["Tremor"], "recommendations": ["Stretch"]}"#)
                .with_schema(),
        ),
    )
    .oneshot(post("/summary", dizzy_conversation("", "", "ro")))
    .await
    .unwrap();

    assert_eq!(json_body(tagged).await, json_body(schema).await);
}

#[tokio::test]
async fn summary_never_fails_for_backend_causes() {
    let config = AppConfig::default();
    let cases: Vec<ScriptedProvider> = vec![
        ScriptedProvider::new(vec![Err(GatewayError::ModelNotFound("phi3:mini".into()))]),
        ScriptedProvider::text("Sorry, I can't help with that."),
        ScriptedProvider::text("```json\n{\"symptoms\": [\"a\"]}\n```").with_schema(),
    ];
    for provider in cases {
        let response = app_with(&config, Arc::new(provider))
            .oneshot(post("/summary", dizzy_conversation("", "", "en")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            serde_json::json!({"symptoms": [], "recommendations": []})
        );
    }
}

// ── Config & catalog files ───────────────────────────────────────────────

#[tokio::test]
async fn custom_catalog_from_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let catalog_path = dir.path().join("catalog.toml");
    std::fs::write(&catalog_path, CUSTOM_CATALOG).unwrap();

    let config_path = dir.path().join("config.toml");
    std::fs::write(
        &config_path,
        format!(
            "default_model = \"llama3\"\n\n[persona]\ndefault_language = \"de\"\ncatalog_path = {:?}\n",
            catalog_path.display().to_string()
        ),
    )
    .unwrap();
    let config = AppConfig::load_from(&config_path).unwrap();

    let provider = Arc::new(ScriptedProvider::new(vec![Ok("a".into()), Ok("b".into())]));
    let app = app_with(&config, provider.clone());

    // Built-in conditions are gone.
    let rejected = app
        .clone()
        .oneshot(post("/chat", dizzy_conversation("ms", "patient", "en")))
        .await
        .unwrap();
    assert_eq!(rejected.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(rejected).await["accepted"], serde_json::json!(["epilepsy"]));

    // Unknown language falls back to the configured default.
    let ok = app
        .clone()
        .oneshot(post("/chat", dizzy_conversation("Epilepsy", "patient", "fr")))
        .await
        .unwrap();
    assert_eq!(ok.status(), StatusCode::OK);

    let english = app
        .oneshot(post("/chat", dizzy_conversation("epilepsy", "carer", "EN")))
        .await
        .unwrap();
    assert_eq!(english.status(), StatusCode::OK);

    let seen = provider.seen();
    assert_eq!(seen[0].model, "llama3");
    assert_eq!(
        seen[0].messages[0].content,
        "Du unterstützt einen Patienten mit Epilepsie.\n\nGib niemals medizinischen Rat."
    );
    assert_eq!(
        seen[1].messages[0].content,
        "You support a carer of someone living with epilepsy.\n\nNever give medical advice."
    );
}

#[test]
fn incomplete_catalog_is_rejected_at_startup() {
    let dir = tempfile::tempdir().unwrap();
    let catalog_path = dir.path().join("catalog.toml");
    let broken = CUSTOM_CATALOG.replace("carer = \"Du unterstützt eine Pflegeperson.\"\n", "");
    std::fs::write(&catalog_path, broken).unwrap();

    let mut config = AppConfig::default();
    config.persona.catalog_path = Some(catalog_path.display().to_string());
    config.persona.default_language = "en".into();

    let err = PersonaCatalog::from_config(&config.persona).unwrap_err();
    let text = err.to_string();
    assert!(text.contains("de"), "{text}");
    assert!(text.contains("carer"), "{text}");
}

// ── Real HTTP provider against a fake Ollama ─────────────────────────────

/// Serves `/api/chat` like Ollama, echoing back what it was asked.
async fn spawn_fake_ollama(reply: &'static str) -> (String, Arc<Mutex<Vec<serde_json::Value>>>) {
    let bodies = Arc::new(Mutex::new(Vec::new()));
    let recorded = bodies.clone();
    let app = Router::new().route(
        "/api/chat",
        axum::routing::post(move |axum::Json(body): axum::Json<serde_json::Value>| {
            let recorded = recorded.clone();
            async move {
                let model = body["model"].clone();
                recorded.lock().unwrap().push(body);
                axum::Json(serde_json::json!({
                    "model": model,
                    "message": {"role": "assistant", "content": reply},
                    "done": true
                }))
            }
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}"), bodies)
}

#[tokio::test]
async fn ollama_schema_summary_over_http() {
    let (base_url, bodies) =
        spawn_fake_ollama(r#"{"symptoms": ["Dizziness"], "recommendations": ["Rest"]}"#).await;

    let config = AppConfig::default();
    let provider: Arc<dyn Provider> = Arc::new(OllamaProvider::new(base_url));
    let app = app_with(&config, provider);

    let response = app
        .oneshot(post("/summary", dizzy_conversation("", "", "en")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        serde_json::json!({"symptoms": ["Dizziness"], "recommendations": ["Rest"]})
    );

    let sent = bodies.lock().unwrap().clone();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0]["stream"], false);
    assert_eq!(sent[0]["format"]["required"], serde_json::json!(["symptoms", "recommendations"]));
    assert_eq!(sent[0]["messages"][0]["role"], "user");
}

#[tokio::test]
async fn ollama_chat_over_http() {
    let (base_url, bodies) = spawn_fake_ollama("Hello from the model").await;

    let config = AppConfig::default();
    let provider: Arc<dyn Provider> = Arc::new(OllamaProvider::new(base_url));
    let catalog = Arc::new(PersonaCatalog::from_config(&config.persona).unwrap());
    let bridge = ConversationBridge::from_config(&config, provider, catalog)
        .with_timeout(Duration::from_secs(10));
    let app = build_router(Arc::new(GatewayState::new(bridge)), &config.gateway);

    let response = app
        .oneshot(post("/chat", dizzy_conversation("alzheimers", "carer", "ro")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["content"], "Hello from the model");

    let sent = bodies.lock().unwrap().clone();
    assert_eq!(sent[0]["model"], "phi3:mini");
    assert_eq!(sent[0]["messages"].as_array().unwrap().len(), 3);
    assert_eq!(sent[0]["messages"][0]["role"], "system");
    assert!(sent[0].get("format").is_none());
}
