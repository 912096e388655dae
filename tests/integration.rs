use medcopy::{
    ai::{GeminiGenerationClient, GenerationService, MockGenerationClient},
    app::{App, AppServices},
    compose::ResponseShape,
    models::{ContentFormat, GenerationInputs, Platform},
    normalize::JsonPolicy,
    session::{SaveOutcome, Session},
    sheets::{AuthSession, MockSheetSink, PersistenceSink, SheetsClient},
    Error,
};
use std::sync::Arc;
use wiremock::matchers::{body_string_contains, method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GENERATE_PATH: &str = r"^/v1beta/models/.+:generateContent$";

fn gemini_text(text: &str) -> serde_json::Value {
    serde_json::json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }]
    })
}

fn app_with(generator: impl GenerationService + 'static, sink: Option<Box<dyn PersistenceSink>>) -> App {
    App::with_services(
        AppServices {
            generator: Box::new(generator),
            sink,
        },
        JsonPolicy::Strict,
    )
}

#[tokio::test]
async fn test_standard_run_against_gemini_endpoint() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path_regex(GENERATE_PATH))
        .and(body_string_contains("SINGLE-FORMAT CONTENT"))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_text("Sleep is a skill you can train.")))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path_regex(GENERATE_PATH))
        .and(body_string_contains("Persona Drift Detector"))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_text(
            r#"{"score": 93, "reasoning": "Warm and plain", "finalContent": "Sleep is a skill you can train."}"#,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let generator = GeminiGenerationClient::new("test-key".to_string(), "gemini-3-flash-preview".to_string())
        .with_base_url(server.uri());
    let app = app_with(generator, None);

    let result = app
        .generate(&GenerationInputs::new("You are a GP", "sleep hygiene"))
        .await
        .unwrap();

    assert_eq!(result.content, "Sleep is a skill you can train.");
    assert_eq!(result.drift_score, Some(93));
    assert!(result.multi_format_output().is_none());
    assert!(result.batch_output().is_none());
    assert!(result.carousel_output().is_none());
}

#[tokio::test]
async fn test_batch_scenario_returns_at_most_requested_posts() {
    let generator = MockGenerationClient::new().with_response(r#"["a","b","c","d","e"]"#);
    let handle = generator.clone();
    let app = app_with(generator, None);

    let mut inputs = GenerationInputs::new("You are a GP", "sleep hygiene");
    inputs.set_batch_mode(true);
    inputs.set_batch_count(4);

    let result = app.generate(&inputs).await.unwrap();

    assert_eq!(result.batch_output().unwrap().len(), 4);
    assert_eq!(result.drift_score, Some(100));
    assert_eq!(handle.get_call_count(), 1);
    assert_eq!(
        handle.requests()[0].response_shape,
        ResponseShape::StringArray { max_items: 4 }
    );
}

#[tokio::test]
async fn test_result_json_uses_camel_case_keys() {
    let app = app_with(MockGenerationClient::new(), None);
    let inputs = GenerationInputs::new("You are a GP", "sleep hygiene")
        .with_format(ContentFormat::MultiFormatExploder);

    let result = app.generate(&inputs).await.unwrap();
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["multiFormatOutput"]["linkedin"], "Mock linkedin");
    assert_eq!(json["driftScore"], 100);
    assert!(json.get("batchOutput").is_none());
}

#[tokio::test]
async fn test_session_saves_to_sheets_endpoint() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v4/spreadsheets/sheet-42/values/A1:append"))
        .and(body_string_contains("Instagram Carousel"))
        .and(body_string_contains("[Slide 1] Slide 1: Mock slide"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let auth = Arc::new(AuthSession::new());
    let sink = SheetsClient::new("sheet-42".to_string(), auth.clone()).with_base_url(server.uri());
    let app = app_with(MockGenerationClient::new(), Some(Box::new(sink)));

    let mut inputs = GenerationInputs::new("You are a GP", "sleep hygiene");
    inputs.set_carousel_mode(true);
    let mut session = Session::new(inputs);
    session.generate(&app).await.unwrap();

    assert_eq!(
        session.save(&app).await.unwrap(),
        SaveOutcome::AuthorizationRequired
    );

    auth.authorize("ya29.token");
    assert_eq!(session.save(&app).await.unwrap(), SaveOutcome::Saved);
    assert_eq!(session.save(&app).await.unwrap(), SaveOutcome::AlreadySaved);
}

#[tokio::test]
async fn test_provider_error_leaves_nothing_to_save() {
    let sink = MockSheetSink::new();
    let app = app_with(
        MockGenerationClient::new().with_failure("upstream 503"),
        Some(Box::new(sink.clone())),
    );

    let mut session = Session::new(GenerationInputs::new("You are a GP", "sleep hygiene"));
    let err = session.generate(&app).await.unwrap_err();

    assert!(matches!(err, Error::AiProvider(_)));
    assert_eq!(session.save(&app).await.unwrap(), SaveOutcome::NothingToSave);
    assert_eq!(sink.get_append_count(), 0);
}

#[tokio::test]
async fn test_summarizer_row_records_summary_score() {
    let sink = MockSheetSink::new();
    let app = app_with(
        MockGenerationClient::new().with_response("THE CORE THESIS\nSleep debt compounds."),
        Some(Box::new(sink.clone())),
    );

    let mut inputs = GenerationInputs::new("You are a GP", "");
    inputs.context = "Lecture transcript on sleep".to_string();
    inputs.set_summarizer_mode(true);

    let mut session = Session::new(inputs);
    session.generate(&app).await.unwrap();
    session.active_platform = Platform::Twitter;
    session.save(&app).await.unwrap();

    let row = &sink.get_rows()[0];
    assert_eq!(row[5], "95%");
    assert!(row[6].contains("Sleep debt compounds."));
}
