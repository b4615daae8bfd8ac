//! Auth wire types
//!
//! Request and response bodies for the backend `/auth/*` endpoints. Response
//! fields are optional on purpose: the client decides what an incomplete
//! payload means instead of failing deserialization.

use serde::{Deserialize, Serialize};

use super::user::UserProfile;

/// Access/refresh token pair persisted for the current session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

impl TokenPair {
    #[must_use]
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self { access_token: access_token.into(), refresh_token: refresh_token.into() }
    }
}

/// Body of `POST /auth/refresh`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Body returned by `POST /auth/refresh`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

impl RefreshResponse {
    /// Both tokens, if present and non-empty.
    #[must_use]
    pub fn into_token_pair(self) -> Option<TokenPair> {
        match (non_empty(self.access_token), non_empty(self.refresh_token)) {
            (Some(access), Some(refresh)) => Some(TokenPair::new(access, refresh)),
            _ => None,
        }
    }
}

/// Body of `POST /auth/login`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    #[serde(rename = "senha")]
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub otp: Option<String>,
}

/// Body returned by `POST /auth/login` (success, MFA and error variants share
/// one loose shape)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub user: Option<UserProfile>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub secret: Option<String>,
    #[serde(default)]
    pub otpauth_url: Option<String>,
}

impl LoginResponse {
    /// Tokens and profile, if the response carries a complete session.
    #[must_use]
    pub fn into_session(self) -> Option<(TokenPair, UserProfile)> {
        let tokens = RefreshResponse {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
        }
        .into_token_pair()?;
        Some((tokens, self.user?))
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refresh_request_uses_camel_case() {
        let body = serde_json::to_value(RefreshRequest { refresh_token: "R1".into() }).unwrap();
        assert_eq!(body, serde_json::json!({ "refreshToken": "R1" }));
    }

    #[test]
    fn refresh_response_requires_both_tokens() {
        let full: RefreshResponse =
            serde_json::from_str(r#"{"accessToken":"T2","refreshToken":"R2"}"#).unwrap();
        assert_eq!(full.into_token_pair(), Some(TokenPair::new("T2", "R2")));

        let partial: RefreshResponse = serde_json::from_str(r#"{"accessToken":"T2"}"#).unwrap();
        assert_eq!(partial.into_token_pair(), None);

        let blank: RefreshResponse =
            serde_json::from_str(r#"{"accessToken":"","refreshToken":"R2"}"#).unwrap();
        assert_eq!(blank.into_token_pair(), None);
    }

    #[test]
    fn login_request_serializes_password_as_senha() {
        let body = serde_json::to_value(LoginRequest {
            email: "caixa@padaria.com".into(),
            password: "segredo".into(),
            otp: None,
        })
        .unwrap();
        assert_eq!(body["senha"], "segredo");
        assert!(body.get("otp").is_none());
    }

    #[test]
    fn login_response_needs_user_for_a_session() {
        let response: LoginResponse = serde_json::from_str(
            r#"{"accessToken":"T1","refreshToken":"R1","tokenType":"Bearer","expiresIn":86400}"#,
        )
        .unwrap();
        assert!(response.into_session().is_none());
    }
}
