use tauri::ipc::{InvokeBody, Request};
use tauri::State;

use crate::{
    app::QrApp,
    feedback::CameraState,
    history::{CopyReport, DetectionRecord, LedgerKind, LedgerSnapshot},
    router::Route,
    scanner::{parse_dimension, CameraCapability, Frame, FRAME_HEIGHT_HEADER, FRAME_WIDTH_HEADER},
    AppState,
};

fn header<'a>(request: &'a Request<'_>, name: &str) -> Option<&'a str> {
    request.headers().get(name).and_then(|v| v.to_str().ok())
}

fn app_from_state(state: &State<'_, AppState>) -> QrApp {
    state.app.clone()
}

#[tauri::command]
pub async fn navigate(state: State<'_, AppState>, fragment: String) -> Result<Route, String> {
    let app = app_from_state(&state);
    Ok(app.navigate(&fragment).await)
}

#[tauri::command]
pub async fn toggle_camera(state: State<'_, AppState>) -> Result<CameraState, String> {
    let app = app_from_state(&state);
    app.toggle_camera().await.map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn reset_camera_history(state: State<'_, AppState>) -> Result<(), String> {
    let app = app_from_state(&state);
    app.reset_camera_history().await;
    Ok(())
}

#[tauri::command]
pub async fn get_history(
    state: State<'_, AppState>,
    kind: LedgerKind,
) -> Result<LedgerSnapshot, String> {
    let app = app_from_state(&state);
    Ok(app.snapshot(kind).await)
}

#[tauri::command]
pub async fn remove_history_entry(
    state: State<'_, AppState>,
    kind: LedgerKind,
    id: String,
) -> Result<bool, String> {
    let app = app_from_state(&state);
    Ok(app.remove_entry(kind, &id).await)
}

#[tauri::command]
pub async fn copy_history_entry(
    state: State<'_, AppState>,
    kind: LedgerKind,
    id: String,
) -> Result<CopyReport, String> {
    let app = app_from_state(&state);
    app.copy_entry(kind, &id)
        .await
        .ok_or_else(|| format!("no history entry {id}"))
}

#[tauri::command]
pub async fn platform_scan(state: State<'_, AppState>) -> Result<DetectionRecord, String> {
    let app = app_from_state(&state);
    app.platform_scan().await.map_err(|e| e.to_string())
}

#[tauri::command]
pub fn report_camera_status(state: State<'_, AppState>, capability: CameraCapability) {
    state.camera.report(capability);
}

/// Raw RGBA body; dimensions travel in the request headers.
#[tauri::command]
pub fn push_camera_frame(state: State<'_, AppState>, request: Request<'_>) -> Result<bool, String> {
    let InvokeBody::Raw(rgba) = request.body() else {
        return Err("expected a raw frame body".into());
    };
    let width = parse_dimension(FRAME_WIDTH_HEADER, header(&request, FRAME_WIDTH_HEADER))
        .map_err(|e| e.to_string())?;
    let height = parse_dimension(FRAME_HEIGHT_HEADER, header(&request, FRAME_HEIGHT_HEADER))
        .map_err(|e| e.to_string())?;

    let frame = Frame::from_rgba(width, height, rgba.clone()).map_err(|e| e.to_string())?;
    Ok(state.camera.slot().push(frame))
}
