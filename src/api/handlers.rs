//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use tracing::{error, info, warn};

use crate::{
    state::{AppState, ApplySettingsError},
    timer::{TimerMode, TimerSettings, TimerSnapshot},
};
use super::responses::{
    ApiResponse, ErrorResponse, HealthResponse, SettingsResponse, SoundResponse, StatusResponse,
};

type ApiError = (StatusCode, Json<ErrorResponse>);

fn control_response(
    endpoint: &str,
    result: Result<TimerSnapshot, String>,
    message: &str,
) -> Result<Json<ApiResponse>, StatusCode> {
    match result {
        Ok(timer) => {
            info!("{} endpoint called - {}", endpoint, message);
            Ok(Json(ApiResponse::from_timer(message.to_string(), timer)))
        }
        Err(e) => {
            error!("{} endpoint failed: {}", endpoint, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /start - Start or resume the timer
pub async fn start_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    control_response("Start", state.start(), "Timer running")
}

/// Handle POST /pause - Pause the timer
pub async fn pause_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    control_response("Pause", state.pause(), "Timer paused")
}

/// Handle POST /reset - Reset the current mode
pub async fn reset_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    control_response("Reset", state.reset(), "Timer reset")
}

/// Handle POST /mode/:mode - Switch timer mode
pub async fn mode_handler(
    State(state): State<Arc<AppState>>,
    Path(mode): Path<String>,
) -> Result<Json<ApiResponse>, ApiError> {
    let mode: TimerMode = mode.parse().map_err(|e: String| {
        warn!("Rejected mode switch: {}", e);
        (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(e)))
    })?;

    control_response("Mode", state.switch_mode(mode), &format!("Switched to {}", mode)).map_err(|status| {
        (status, Json(ErrorResponse::new("Failed to switch mode".to_string())))
    })
}

/// Handle GET /status - Return current timer and server status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, StatusCode> {
    let timer = match state.snapshot() {
        Ok(t) => t,
        Err(e) => {
            error!("Failed to get timer state: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        timer,
        sound_playing: state.sound.is_playing(),
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /settings - Return the settings in use
pub async fn get_settings_handler(State(state): State<Arc<AppState>>) -> Result<Json<TimerSettings>, StatusCode> {
    state.settings().map(Json).map_err(|e| {
        error!("Failed to get settings: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

/// Handle PUT /settings - Validate and apply new settings
pub async fn put_settings_handler(
    State(state): State<Arc<AppState>>,
    Json(settings): Json<TimerSettings>,
) -> Result<Json<SettingsResponse>, ApiError> {
    match state.apply_settings(settings.clone()) {
        Ok(timer) => {
            info!("Settings endpoint called - settings applied");
            let applied = state.settings().unwrap_or(settings);
            Ok(Json(SettingsResponse::updated(applied, timer)))
        }
        Err(ApplySettingsError::Invalid(e)) => {
            warn!("Rejected settings: {}", e);
            Err((StatusCode::UNPROCESSABLE_ENTITY, Json(ErrorResponse::new(e.to_string()))))
        }
        Err(e) => {
            error!("Failed to apply settings: {}", e);
            Err((StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorResponse::new(e.to_string()))))
        }
    }
}

/// Handle POST /sound/preview - Play the selected sound once
pub async fn preview_sound_handler(State(state): State<Arc<AppState>>) -> Result<Json<SoundResponse>, StatusCode> {
    match state.preview_sound() {
        Ok(true) => Ok(Json(SoundResponse::new("playing", "Playing sound preview"))),
        Ok(false) => Ok(Json(SoundResponse::new("silent", "Sound is muted or set to none"))),
        Err(e) => {
            error!("Failed to preview sound: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /sound/stop - Stop any playing sound
pub async fn stop_sound_handler(State(state): State<Arc<AppState>>) -> Json<SoundResponse> {
    state.stop_sound();
    Json(SoundResponse::new("stopped", "Sound stopped"))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
