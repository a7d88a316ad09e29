use std::sync::Arc;

use super::*;
use crate::llm::types::{ImageResponse, LlmError};
use crate::state::test_helpers::{self, MockImageGen, solid_png};

fn body(prompt: &str) -> GenerateBody {
    GenerateBody { prompt: prompt.into(), similarity: 0.3, model: None, api_key: None }
}

#[tokio::test]
async fn success_is_200_with_status() {
    let mock = Arc::new(MockImageGen::new(vec![Ok(ImageResponse {
        text: Some("done".into()),
        image: Some(solid_png(8, 8, [0, 128, 0])),
    })]));
    let state = test_helpers::test_app_state_with(mock);
    let id = test_helpers::seed_session(&state).await;

    let Json(outcome) = generate(State(state), Path(id), Json(body("grass"))).await.unwrap();
    let json = serde_json::to_value(&outcome).unwrap();
    assert_eq!(json["status"], "succeeded");
    assert_eq!(json["cursor"], 1);
    assert_eq!(json["len"], 2);
    assert_eq!(json["message"], "done");
}

#[tokio::test]
async fn provider_failure_is_200_failed() {
    let mock = Arc::new(MockImageGen::new(vec![Err(LlmError::ApiResponse {
        status: 500,
        body: r#"{"error":{"message":"internal"}}"#.into(),
    })]));
    let state = test_helpers::test_app_state_with(mock);
    let id = test_helpers::seed_session(&state).await;

    let Json(outcome) = generate(State(state), Path(id), Json(body("x"))).await.unwrap();
    let json = serde_json::to_value(&outcome).unwrap();
    assert_eq!(json["status"], "failed");
    assert_eq!(json["error"], "internal");
    assert_eq!(json["len"], 1);
}

#[tokio::test]
async fn empty_prompt_is_400() {
    let state = test_helpers::test_app_state();
    let id = test_helpers::seed_session(&state).await;
    let err = generate(State(state), Path(id), Json(body(""))).await.unwrap_err();
    assert_eq!(err.status, StatusCode::BAD_REQUEST);
    assert_eq!(err.code, "E_EMPTY_PROMPT");
}

#[tokio::test]
async fn unknown_model_is_400() {
    let state = test_helpers::test_app_state();
    let id = test_helpers::seed_session(&state).await;
    let b = GenerateBody { model: Some("nope".into()), ..body("x") };
    let err = generate(State(state), Path(id), Json(b)).await.unwrap_err();
    assert_eq!(err.status, StatusCode::BAD_REQUEST);
    assert_eq!(err.code, "E_UNKNOWN_MODEL");
}

#[tokio::test]
async fn unknown_session_is_404() {
    let state = test_helpers::test_app_state();
    let err = generate(State(state), Path(Uuid::new_v4()), Json(body("x"))).await.unwrap_err();
    assert_eq!(err.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn busy_session_is_409() {
    let state = test_helpers::test_app_state();
    let id = test_helpers::seed_session(&state).await;
    {
        let handle = state.sessions.get(id).await.unwrap();
        let mut engine = handle.lock().await;
        engine
            .begin_generation(canvas::generation::Submission {
                prompt: "held".into(),
                similarity: 0.5,
                model: "model-a".into(),
                credential: None,
            })
            .unwrap();
    }
    let err = generate(State(state), Path(id), Json(body("x"))).await.unwrap_err();
    assert_eq!(err.status, StatusCode::CONFLICT);
    assert!(err.retryable);
}

#[test]
fn similarity_defaults_when_omitted() {
    let b: GenerateBody = serde_json::from_str(r#"{"prompt":"cat"}"#).unwrap();
    assert!((b.similarity - DEFAULT_SIMILARITY).abs() < f64::EPSILON);
    assert!(b.model.is_none());
    assert!(b.api_key.is_none());
}

#[tokio::test]
async fn models_lists_catalog() {
    let state = test_helpers::test_app_state();
    let Json(catalog) = list_models(State(state)).await;
    assert_eq!(catalog.default, "model-a");
    assert_eq!(catalog.available, vec!["model-a".to_string(), "model-b".to_string()]);
}
