use crate::error::ApiError;
use crate::session::{self, CurrentSession};
use crate::state::AppState;
use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::header::SET_COOKIE;
use axum::response::{Html, IntoResponse};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use sign_assist_core::{Age, Session, SignLabel};

const INDEX_HTML: &str = include_str!("../templates/index.html");

#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub name: Option<Value>,
    pub age: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TextRequest {
    pub text: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DetectRequest {
    pub image: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct SpeechResponse {
    pub status: &'static str,
    pub original_text: String,
    pub sign_instruction: String,
}

#[derive(Debug, Serialize)]
pub struct DetectResponse {
    pub status: &'static str,
    pub detected_text: SignLabel,
    pub confidence: f64,
}

#[derive(Debug, Serialize)]
pub struct SessionInfo {
    pub logged_in: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<Age>,
}

/// A missing or unparsable body is handled like an empty JSON object, so the
/// caller gets the endpoint's own "missing field" error instead of a framework
/// rejection.
fn body_or_default<T: Default>(payload: Result<Json<T>, JsonRejection>) -> T {
    match payload {
        Ok(Json(body)) => body,
        Err(rejection) => {
            tracing::debug!("Treating rejected request body as empty: {}", rejection);
            T::default()
        }
    }
}

fn non_empty_string(value: Option<Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) if !s.is_empty() => Some(s),
        _ => None,
    }
}

/// Serves the login/dashboard page.
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub async fn login(
    State(state): State<AppState>,
    current: CurrentSession,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let body = body_or_default(payload);
    let session = Session::from_credentials(body.name.as_ref(), body.age.as_ref())
        .ok_or(ApiError::MissingCredentials)?;

    let message = session.greeting();
    tracing::info!(user = %session.user, "User logged in");
    let token = state.sessions.login(current.token, session).await;

    Ok((
        [(SET_COOKIE, session::issue_cookie(&token))],
        Json(json!({ "status": "success", "message": message })),
    ))
}

pub async fn logout(State(state): State<AppState>, current: CurrentSession) -> impl IntoResponse {
    if let Some(token) = current.token {
        if state.sessions.logout(&token).await {
            tracing::info!("User logged out");
        }
    }
    (
        [(SET_COOKIE, session::expire_cookie())],
        Json(json!({ "status": "success" })),
    )
}

pub async fn session_info(current: CurrentSession) -> Json<SessionInfo> {
    let info = match current.session {
        Some(Session { user, age }) => SessionInfo {
            logged_in: true,
            user: Some(user),
            age: Some(age),
        },
        None => SessionInfo {
            logged_in: false,
            user: None,
            age: None,
        },
    };
    Json(info)
}

/// The browser has already transcribed the speech; echo it back with the
/// instruction the dashboard displays.
pub async fn process_speech(
    payload: Result<Json<TextRequest>, JsonRejection>,
) -> Result<Json<SpeechResponse>, ApiError> {
    let text = non_empty_string(body_or_default(payload).text)
        .ok_or(ApiError::MissingText)?;
    tracing::debug!(%text, "Processing speech");

    Ok(Json(SpeechResponse {
        status: "success",
        sign_instruction: format!("Displaying signs for: {text}"),
        original_text: text,
    }))
}

/// Typed input is spoken by the browser, not here.
pub async fn process_text(
    payload: Result<Json<TextRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let text = non_empty_string(body_or_default(payload).text)
        .ok_or(ApiError::MissingText)?;
    tracing::debug!(%text, "Processing text input");

    Ok(Json(json!({ "status": "success", "message": "Processed text input" })))
}

pub async fn detect_sign(
    State(state): State<AppState>,
    payload: Result<Json<DetectRequest>, JsonRejection>,
) -> Result<Json<DetectResponse>, ApiError> {
    let image = non_empty_string(body_or_default(payload).image)
        .ok_or(ApiError::MissingImage)?;

    let detection = state
        .recognizer
        .detect(&image)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    if state.speak_detections {
        state.notifier.speak(detection.label.as_str());
    }

    Ok(Json(DetectResponse {
        status: "success",
        detected_text: detection.label,
        confidence: detection.confidence,
    }))
}
