use serde::{Deserialize, Serialize};

pub mod pattern;

use pattern::{Pattern, PatternError};

/// Body of `POST /api/pattern`.
///
/// `n` is the raw text the user typed; the server does the parsing so the
/// browser form and the API share one set of rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternRequest {
    pub n: String,
}

/// Outcome of a pattern request.
///
/// Serializes as `{"ok": true, "n", "pattern", "lineCount"}` or
/// `{"ok": false, "error"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PatternResult {
    Success(PatternSuccess),
    Failure(PatternFailure),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternSuccess {
    pub ok: bool,
    pub n: u32,
    pub pattern: Vec<String>,
    pub line_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternFailure {
    pub ok: bool,
    pub error: String,
}

impl PatternResult {
    pub fn failure(error: impl Into<String>) -> Self {
        PatternResult::Failure(PatternFailure {
            ok: false,
            error: error.into(),
        })
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, PatternResult::Success(_))
    }
}

impl From<Pattern> for PatternResult {
    fn from(pattern: Pattern) -> Self {
        let n = pattern.n();
        let line_count = pattern.line_count();
        PatternResult::Success(PatternSuccess {
            ok: true,
            n,
            pattern: pattern.into_lines(),
            line_count,
        })
    }
}

impl From<Result<Pattern, PatternError>> for PatternResult {
    fn from(result: Result<Pattern, PatternError>) -> Self {
        match result {
            Ok(pattern) => pattern.into(),
            Err(e) => PatternResult::failure(e.to_string()),
        }
    }
}

/// Response for `GET /api/me`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUserResponse {
    pub google_id: String,
    pub email: String,
    pub name: Option<String>,
    pub picture: Option<String>,
}

/// API error response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_shape() {
        let result = PatternResult::from(Pattern::new(2));
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(
            value,
            json!({
                "ok": true,
                "n": 2,
                "pattern": [" F ", "ORM", " R "],
                "lineCount": 3
            })
        );
    }

    #[test]
    fn test_failure_shape() {
        let result = pattern::generate_pattern("abc");
        assert!(!result.is_ok());
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(
            value,
            json!({
                "ok": false,
                "error": "Please enter a valid integer between 1 and 100."
            })
        );
    }

    #[test]
    fn test_untagged_deserialize_picks_variant() {
        let parsed: PatternResult =
            serde_json::from_str(r#"{"ok":false,"error":"nope"}"#).unwrap();
        assert_eq!(parsed, PatternResult::failure("nope"));

        let parsed: PatternResult =
            serde_json::from_str(r#"{"ok":true,"n":1,"pattern":["F"],"lineCount":1}"#).unwrap();
        assert!(parsed.is_ok());
    }

    #[test]
    fn test_error_response_skips_missing_details() {
        let body = ErrorResponse {
            error: "Missing authentication".to_string(),
            details: None,
        };
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"error":"Missing authentication"}"#
        );
    }
}
