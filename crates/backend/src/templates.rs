use askama::Template;

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
}

#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub name: String,
    pub email: String,
    pub picture: Option<String>,
    pub current_time: String,
    /// Echo of what the user typed, so the form keeps its value.
    pub n_input: String,
    /// Generated diamond, lines joined by newlines.
    pub pattern: Option<String>,
    pub error: Option<String>,
}

/// User-facing text for the `auth_error` codes the callback redirects with.
pub fn auth_error_message(code: &str) -> &'static str {
    match code {
        "access_denied" => "Google sign-in was cancelled.",
        "unauthorized_email" => "This Google account is not allowed to sign in.",
        "token_exchange_failed" => "Google did not accept the sign-in. Please try again.",
        _ => "Sign-in failed. Please try again.",
    }
}
