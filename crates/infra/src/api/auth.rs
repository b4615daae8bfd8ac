//! Login, logout and session restore
//!
//! Wraps the backend `/auth/login` contract on top of [`ApiClient`] and the
//! client's [`SessionManager`](synvia_common::auth::SessionManager).

use reqwest::StatusCode;
use synvia_domain::constants::{AUTH_LOGIN_ENDPOINT, DEFAULT_LOGIN_ERROR};
use synvia_domain::{LoginRequest, LoginResponse, UserProfile};
use tracing::{info, instrument, warn};

use super::client::ApiClient;
use super::errors::ApiError;
use super::request::ApiRequest;

/// Result of a login attempt the backend answered
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// Session persisted; the user is signed in
    Authenticated(UserProfile),
    /// Credentials accepted, a one-time code is required
    MfaRequired,
    /// The account must enroll an authenticator first
    MfaSetupRequired {
        secret: Option<String>,
        otpauth_url: Option<String>,
        user: Option<UserProfile>,
    },
    /// Credentials refused; message is suitable for display
    Rejected(String),
}

/// Authentication front door used by the presentation layer
#[derive(Debug, Clone)]
pub struct AuthService {
    client: ApiClient,
}

impl AuthService {
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub const fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Sign in with email and password, plus a one-time code when MFA is on
    ///
    /// Any status below 500 is an answer from the backend and maps to a
    /// [`LoginOutcome`]; it never triggers a token refresh.
    ///
    /// # Errors
    ///
    /// Returns the transport or 5xx error after clearing any stored session
    #[instrument(skip_all, fields(email = %email))]
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        otp: Option<&str>,
    ) -> Result<LoginOutcome, ApiError> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
            otp: otp.map(str::to_string),
        };
        let request = ApiRequest::post(AUTH_LOGIN_ENDPOINT)
            .json(&body)?
            .accept_status(|status| !status.is_server_error());

        let response = match self.client.execute(request).await {
            Ok(response) => response,
            Err(err) => {
                warn!(error = %err, "login request failed; clearing session");
                if let Err(clear_err) = self.client.session().clear_session() {
                    warn!(error = %clear_err, "failed to clear session after login error");
                }
                return Err(err);
            }
        };

        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        let payload: LoginResponse = serde_json::from_str(&text).unwrap_or_default();

        self.interpret(status, payload)
    }

    fn interpret(&self, status: StatusCode, payload: LoginResponse) -> Result<LoginOutcome, ApiError> {
        match status {
            StatusCode::OK => {
                let error = payload.error.clone();
                if let Some((tokens, user)) = payload.into_session() {
                    self.client.session().start_session(&tokens, &user)?;
                    info!(email = %user.email, role = user.role_display_name(), "login succeeded");
                    return Ok(LoginOutcome::Authenticated(user));
                }
                warn!("login response is missing tokens or user");
                Ok(LoginOutcome::Rejected(error.unwrap_or_else(|| DEFAULT_LOGIN_ERROR.to_string())))
            }
            StatusCode::ACCEPTED => {
                info!("login requires a one-time code");
                Ok(LoginOutcome::MfaRequired)
            }
            StatusCode::PRECONDITION_REQUIRED => {
                info!("login requires authenticator enrollment");
                Ok(LoginOutcome::MfaSetupRequired {
                    secret: payload.secret,
                    otpauth_url: payload.otpauth_url,
                    user: payload.user,
                })
            }
            _ => {
                info!(%status, "login rejected");
                Ok(LoginOutcome::Rejected(
                    payload.error.unwrap_or_else(|| DEFAULT_LOGIN_ERROR.to_string()),
                ))
            }
        }
    }

    /// Sign out and forget the stored session
    ///
    /// # Errors
    ///
    /// Returns error if the session store cannot be cleared
    pub fn logout(&self) -> Result<(), ApiError> {
        self.client.session().logout()?;
        Ok(())
    }

    /// Restore the session persisted by a previous run
    ///
    /// # Errors
    ///
    /// Returns error if the session store cannot be read
    pub fn restore(&self) -> Result<Option<UserProfile>, ApiError> {
        let user = self.client.session().restore()?;
        if let Some(user) = &user {
            info!(email = %user.email, "session restored");
        }
        Ok(user)
    }

    /// # Errors
    ///
    /// Returns error if the stored profile cannot be read or parsed
    pub fn current_user(&self) -> Result<Option<UserProfile>, ApiError> {
        Ok(self.client.session().current_user()?)
    }

    /// Replace the stored profile (e.g. after the user edits it)
    ///
    /// # Errors
    ///
    /// Returns error if the profile cannot be written
    pub fn update_user(&self, user: &UserProfile) -> Result<(), ApiError> {
        self.client.session().update_user(user)?;
        Ok(())
    }

    pub fn is_authenticated(&self) -> bool {
        self.client.session().is_authenticated()
    }
}
