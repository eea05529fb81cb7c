use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    Extension, Form, Json,
};
use askama::Template;
use serde::Deserialize;
use shared_types::{
    pattern::{self, Pattern},
    PatternRequest, PatternResult,
};

use crate::auth::{extract_auth_user, types::AuthUser};
use crate::error::ApiResult;
use crate::services::clock;
use crate::templates::{auth_error_message, DashboardTemplate, LoginTemplate};
use crate::AppState;

pub async fn health_check() -> StatusCode {
    StatusCode::OK
}

#[derive(Debug, Deserialize)]
pub struct HomeParams {
    pub auth_error: Option<String>,
}

/// Login page, or straight to the dashboard for signed-in users.
pub async fn home(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<HomeParams>,
) -> ApiResult<Response> {
    if extract_auth_user(&headers, &state.auth_config).is_ok() {
        return Ok(Redirect::to("/dashboard").into_response());
    }

    let page = LoginTemplate {
        error: params
            .auth_error
            .as_deref()
            .map(|code| auth_error_message(code).to_string()),
    };
    Ok(Html(page.render()?).into_response())
}

#[derive(Debug, Deserialize)]
pub struct PatternForm {
    #[serde(default)]
    pub n: String,
}

pub async fn dashboard(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Html<String>> {
    render_dashboard(&state, user, String::new(), None)
}

pub async fn dashboard_submit(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Form(form): Form<PatternForm>,
) -> ApiResult<Html<String>> {
    let outcome = pattern::try_generate(&form.n);
    if outcome.is_err() {
        tracing::debug!("Rejected pattern input {:?} from {}", form.n, user.email);
    }
    render_dashboard(&state, user, form.n, Some(outcome))
}

fn render_dashboard(
    state: &AppState,
    user: AuthUser,
    n_input: String,
    outcome: Option<Result<Pattern, pattern::PatternError>>,
) -> ApiResult<Html<String>> {
    let (pattern, error) = match outcome {
        Some(Ok(pattern)) => (Some(pattern.to_string()), None),
        Some(Err(e)) => (None, Some(e.to_string())),
        None => (None, None),
    };

    let page = DashboardTemplate {
        name: user.name.unwrap_or_else(|| user.email.clone()),
        email: user.email,
        picture: user.picture,
        current_time: clock::current_time(state.config.display_offset),
        n_input,
        pattern,
        error,
    };
    Ok(Html(page.render()?))
}

/// Generate a pattern over JSON.
///
/// Invalid input answers `400` with the failure result as the body.
pub async fn create_pattern(Json(request): Json<PatternRequest>) -> impl IntoResponse {
    let result = pattern::generate_pattern(&request.n);
    let status = if result.is_ok() {
        StatusCode::OK
    } else {
        StatusCode::BAD_REQUEST
    };
    (status, Json::<PatternResult>(result))
}
