use super::*;
use crate::state::test_helpers;

#[tokio::test]
async fn get_defaults_to_light() {
    let state = test_helpers::test_app_state();
    let Json(resp) = get_theme(State(state)).await;
    assert_eq!(resp.theme, Theme::Light);
    assert_eq!(resp.available.len(), 3);
}

#[tokio::test]
async fn put_changes_theme() {
    let state = test_helpers::test_app_state();
    let Json(resp) = put_theme(State(state.clone()), Json(ThemeBody { theme: "sepia".into() })).await.unwrap();
    assert_eq!(resp.theme, Theme::Sepia);
    let Json(resp) = get_theme(State(state)).await;
    assert_eq!(resp.theme, Theme::Sepia);
}

#[tokio::test]
async fn put_unknown_is_400() {
    let state = test_helpers::test_app_state();
    let err = put_theme(State(state), Json(ThemeBody { theme: "neon".into() })).await.unwrap_err();
    assert_eq!(err.status, StatusCode::BAD_REQUEST);
    assert_eq!(err.code, "E_UNKNOWN_THEME");
}

#[test]
fn theme_serializes_lowercase() {
    let json = serde_json::to_value(ThemeResponse { theme: Theme::Dark, available: Theme::ALL }).unwrap();
    assert_eq!(json["theme"], "dark");
    assert_eq!(json["available"], serde_json::json!(["light", "dark", "sepia"]));
}
