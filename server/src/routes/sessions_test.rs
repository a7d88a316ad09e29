use canvas::input::{PointerKind, PointerSource};
use canvas::surface::Color;

use super::*;
use crate::state::test_helpers;

async fn new_session(state: &AppState) -> Uuid {
    let (status, Json(view)) = create_session(State(state.clone())).await.unwrap();
    assert_eq!(status, StatusCode::CREATED);
    view.id
}

async fn send(state: &AppState, id: Uuid, event: PointerEvent) -> ActionResponse {
    let Json(resp) = pointer(State(state.clone()), Path(id), Json(event)).await.unwrap();
    resp
}

async fn stroke(state: &AppState, id: Uuid, from: (f64, f64), to: (f64, f64)) {
    send(state, id, PointerEvent::new(PointerKind::Down, from.0, from.1)).await;
    send(state, id, PointerEvent::new(PointerKind::Move, to.0, to.1)).await;
    send(state, id, PointerEvent::new(PointerKind::Up, to.0, to.1)).await;
}

// =============================================================================
// lifecycle
// =============================================================================

#[tokio::test]
async fn create_returns_blank_session() {
    let state = test_helpers::test_app_state();
    let (_, Json(view)) = create_session(State(state.clone())).await.unwrap();
    assert_eq!((view.width, view.height), (64, 48));
    assert_eq!((view.cursor, view.len), (0, 1));
    assert!(!view.busy);
    assert_eq!(view.pen.color, Color::BLACK);
}

#[tokio::test]
async fn get_unknown_is_404() {
    let state = test_helpers::test_app_state();
    let err = get_session(State(state), Path(Uuid::new_v4())).await.unwrap_err();
    assert_eq!(err.status, StatusCode::NOT_FOUND);
    assert_eq!(err.code, "E_SESSION_NOT_FOUND");
}

#[tokio::test]
async fn delete_then_get_is_404() {
    let state = test_helpers::test_app_state();
    let id = new_session(&state).await;
    let status = delete_session(State(state.clone()), Path(id)).await.unwrap();
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(get_session(State(state), Path(id)).await.is_err());
}

#[tokio::test]
async fn canvas_png_is_a_png() {
    let state = test_helpers::test_app_state();
    let id = new_session(&state).await;
    let resp = canvas_png(State(state), Path(id)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()[CONTENT_TYPE], "image/png");
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&body[..8], b"\x89PNG\r\n\x1a\n");
}

// =============================================================================
// pointer
// =============================================================================

#[tokio::test]
async fn stroke_commits_on_up() {
    let state = test_helpers::test_app_state();
    let id = new_session(&state).await;

    let down = send(&state, id, PointerEvent::new(PointerKind::Down, 10.0, 10.0)).await;
    assert_eq!(down.action, Action::RenderNeeded);
    assert!(down.session.drawing);

    let up = send(&state, id, PointerEvent::new(PointerKind::Up, 10.0, 10.0)).await;
    assert_eq!(up.action, Action::Committed { cursor: 1, len: 2 });
    assert!(!up.session.drawing);

    let again = send(&state, id, PointerEvent::new(PointerKind::Leave, 10.0, 10.0)).await;
    assert_eq!(again.action, Action::None);
    assert_eq!(again.session.len, 2);
}

#[tokio::test]
async fn touch_gesture_suppresses_scroll_while_active() {
    let state = test_helpers::test_app_state();
    let id = new_session(&state).await;

    let down = send(&state, id, PointerEvent::touch(PointerKind::Down, 5.0, 5.0)).await;
    assert!(down.suppress_scroll);
    let mv = send(&state, id, PointerEvent::touch(PointerKind::Move, 9.0, 9.0)).await;
    assert!(mv.suppress_scroll);
    let up = send(&state, id, PointerEvent::touch(PointerKind::Up, 9.0, 9.0)).await;
    assert!(!up.suppress_scroll);

    let mouse = send(&state, id, PointerEvent::new(PointerKind::Down, 5.0, 5.0)).await;
    assert!(!mouse.suppress_scroll);
    assert_eq!(PointerEvent::new(PointerKind::Down, 0.0, 0.0).source, PointerSource::Mouse);
}

#[tokio::test]
async fn pointer_json_shape() {
    let event: PointerEvent = serde_json::from_str(r#"{"kind":"down","x":3,"y":4,"source":"touch"}"#).unwrap();
    assert_eq!(event.kind, PointerKind::Down);
    assert_eq!(event.source, PointerSource::Touch);
    let event: PointerEvent = serde_json::from_str(r#"{"kind":"move","x":3,"y":4}"#).unwrap();
    assert_eq!(event.source, PointerSource::Mouse);
}

// =============================================================================
// pen
// =============================================================================

#[tokio::test]
async fn pen_updates_color_and_clamps_width() {
    let state = test_helpers::test_app_state();
    let id = new_session(&state).await;
    let body = PenBody { color: Some("#f00".into()), width: Some(500.0), ..PenBody::default() };
    let Json(view) = pen(State(state), Path(id), Json(body)).await.unwrap();
    assert_eq!(view.pen.color, Color::new(255, 0, 0));
    assert!((view.pen.width - 50.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn invalid_color_is_400_and_applies_nothing() {
    let state = test_helpers::test_app_state();
    let id = new_session(&state).await;
    let body = PenBody { color: Some("red".into()), width: Some(20.0), ..PenBody::default() };
    let err = pen(State(state.clone()), Path(id), Json(body)).await.unwrap_err();
    assert_eq!(err.status, StatusCode::BAD_REQUEST);
    assert_eq!(err.code, "E_INVALID_COLOR");

    let Json(view) = get_session(State(state), Path(id)).await.unwrap();
    assert_eq!(view.pen.color, Color::BLACK);
    assert!((view.pen.width - 5.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn display_size_maps_pointer_coordinates() {
    let state = test_helpers::test_app_state();
    let id = new_session(&state).await;
    let body = PenBody { display_width: Some(32.0), display_height: Some(24.0), ..PenBody::default() };
    pen(State(state.clone()), Path(id), Json(body)).await.unwrap();

    // (30, 20) on a half-size display lands at (60, 40) on the surface.
    stroke(&state, id, (30.0, 20.0), (30.0, 20.0)).await;
    let handle = state.sessions.get(id).await.unwrap();
    let engine = handle.lock().await;
    assert_eq!(engine.surface().pixel(60, 40), Some(Color::BLACK));
    assert_eq!(engine.surface().pixel(30, 20), Some(Color::WHITE));
}

// =============================================================================
// history
// =============================================================================

#[tokio::test]
async fn undo_redo_clear_round() {
    let state = test_helpers::test_app_state();
    let id = new_session(&state).await;
    stroke(&state, id, (5.0, 5.0), (20.0, 20.0)).await;

    let Json(resp) = undo(State(state.clone()), Path(id)).await.unwrap();
    assert_eq!(resp.action, Action::Committed { cursor: 0, len: 2 });
    assert!(resp.session.can_redo);

    let Json(resp) = undo(State(state.clone()), Path(id)).await.unwrap();
    assert_eq!(resp.action, Action::None);

    let Json(resp) = redo(State(state.clone()), Path(id)).await.unwrap();
    assert_eq!(resp.action, Action::Committed { cursor: 1, len: 2 });

    let Json(resp) = clear(State(state.clone()), Path(id)).await.unwrap();
    assert_eq!(resp.action, Action::Committed { cursor: 2, len: 3 });
    assert!(state.sessions.get(id).await.unwrap().lock().await.surface().is_blank());
}

#[tokio::test]
async fn stroke_after_undo_truncates_redo() {
    let state = test_helpers::test_app_state();
    let id = new_session(&state).await;
    stroke(&state, id, (5.0, 5.0), (10.0, 5.0)).await;
    stroke(&state, id, (5.0, 20.0), (10.0, 20.0)).await;
    undo(State(state.clone()), Path(id)).await.unwrap();

    stroke(&state, id, (5.0, 40.0), (10.0, 40.0)).await;
    let Json(view) = get_session(State(state), Path(id)).await.unwrap();
    assert_eq!((view.cursor, view.len), (2, 3));
    assert!(!view.can_redo);
}

#[tokio::test]
async fn history_on_unknown_session_is_404() {
    let state = test_helpers::test_app_state();
    let err = undo(State(state), Path(Uuid::new_v4())).await.unwrap_err();
    assert_eq!(err.status, StatusCode::NOT_FOUND);
}
