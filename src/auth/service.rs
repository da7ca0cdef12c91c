//! Authentication service.
//!
//! Builds the register and login requests after local validation, interprets
//! their responses, and wraps authorized calls with the bearer token. The
//! service never touches storage; the session store persists what it returns.

use crate::api::endpoints::{ApiClient, Endpoint};
use crate::api::request::HttpRequest;
use crate::api::response::{self, is_auth_failure, is_success};
use crate::domain::error::{GalleryError, Result};
use crate::domain::user::Session;

/// Minimum password length accepted at registration.
pub const MIN_REGISTER_PASSWORD: usize = 6;

/// Minimum password length accepted when changing or resetting a password.
pub const MIN_NEW_PASSWORD: usize = 8;

/// Register/login request construction and response interpretation.
#[derive(Debug, Clone)]
pub struct AuthService {
    api: ApiClient,
}

impl AuthService {
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self { api }
    }

    #[must_use]
    pub const fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Validates a registration form and builds its request.
    ///
    /// # Errors
    ///
    /// Returns [`GalleryError::Validation`] if the username is blank, the email
    /// has no `@`, the password is shorter than [`MIN_REGISTER_PASSWORD`], or
    /// the confirmation differs.
    pub fn register(
        &self,
        request_id: u64,
        username: &str,
        email: &str,
        password: &str,
        confirm: &str,
    ) -> Result<HttpRequest> {
        let username = username.trim();
        let email = email.trim();
        if username.is_empty() {
            return Err(GalleryError::Validation("Username is required".into()));
        }
        validate_email(email)?;
        validate_password(password, MIN_REGISTER_PASSWORD)?;
        if password != confirm {
            return Err(GalleryError::Validation("Passwords do not match".into()));
        }

        tracing::debug!(username, "building register request");
        Ok(self.api.build(
            request_id,
            &Endpoint::Register {
                username: username.to_string(),
                email: email.to_string(),
                password: password.to_string(),
            },
            None,
        ))
    }

    /// Validates a login form and builds its request.
    ///
    /// # Errors
    ///
    /// Returns [`GalleryError::Validation`] if either field is blank.
    pub fn login(&self, request_id: u64, email: &str, password: &str) -> Result<HttpRequest> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(GalleryError::Validation("Email and password are required".into()));
        }
        Ok(self.api.build(
            request_id,
            &Endpoint::Login {
                email: email.to_string(),
                password: password.to_string(),
            },
            None,
        ))
    }

    /// Builds a request, attaching the session's bearer token when there is one.
    #[must_use]
    pub fn authorized(&self, request_id: u64, endpoint: &Endpoint, session: Option<&Session>) -> HttpRequest {
        self.api.build(request_id, endpoint, session.map(|s| s.token.as_str()))
    }

    /// Interprets a register response.
    ///
    /// # Errors
    ///
    /// - [`GalleryError::Validation`] for backend rejections (4xx other than 401)
    /// - [`GalleryError::Authentication`] for 401
    /// - [`GalleryError::Network`] / [`GalleryError::Backend`] for transport and server failures
    /// - [`GalleryError::MalformedResponse`] for a success body without `token` and `user`
    pub fn complete_register(status: u16, body: &[u8]) -> Result<Session> {
        if is_success(status) {
            return response::decode_session(body);
        }
        let message = response::error_message(body);
        Err(match status {
            401 => GalleryError::Authentication(message.unwrap_or_else(|| "Registration refused".into())),
            400..=499 => GalleryError::Validation(message.unwrap_or_else(|| "Registration failed".into())),
            _ => response::status_error(status, body),
        })
    }

    /// Interprets a login response.
    ///
    /// # Errors
    ///
    /// - [`GalleryError::Authentication`] for any 4xx rejection
    /// - [`GalleryError::Network`] / [`GalleryError::Backend`] for transport and server failures
    /// - [`GalleryError::MalformedResponse`] for a success body without `token` and `user`
    pub fn complete_login(status: u16, body: &[u8]) -> Result<Session> {
        if is_success(status) {
            return response::decode_session(body);
        }
        Err(match status {
            400..=499 => GalleryError::Authentication(
                response::error_message(body).unwrap_or_else(|| "Invalid email or password".into()),
            ),
            _ => response::status_error(status, body),
        })
    }

    /// Checks the status of a response to an authorized call.
    ///
    /// # Errors
    ///
    /// Returns [`GalleryError::SessionExpired`] for 401 and 403. Every other
    /// status passes through for the caller to interpret.
    pub fn check_authorized(status: u16) -> Result<()> {
        if is_auth_failure(status) {
            tracing::warn!(status, "authorized call refused");
            return Err(GalleryError::SessionExpired);
        }
        Ok(())
    }
}

/// Checks that `email` looks like an address.
///
/// # Errors
///
/// Returns [`GalleryError::Validation`] if there is no `@` between non-empty parts.
pub fn validate_email(email: &str) -> Result<()> {
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(GalleryError::Validation("Enter a valid email address".into())),
    }
}

/// Checks a new password against a minimum length in characters.
///
/// # Errors
///
/// Returns [`GalleryError::Validation`] if the password is too short.
pub fn validate_password(password: &str, min_len: usize) -> Result<()> {
    if password.chars().count() < min_len {
        return Err(GalleryError::Validation(format!(
            "Password must be at least {min_len} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> AuthService {
        AuthService::new(ApiClient::new("http://localhost:3000").unwrap())
    }

    const OK_BODY: &[u8] = br#"{"token":"tok","user":{"id":3,"username":"ada","email":"ada@example.org"}}"#;

    #[test]
    fn register_validates_locally() {
        let svc = service();
        assert!(matches!(svc.register(1, " ", "a@b.c", "secret", "secret"), Err(GalleryError::Validation(_))));
        assert!(matches!(svc.register(1, "ada", "nope", "secret", "secret"), Err(GalleryError::Validation(_))));
        assert!(matches!(svc.register(1, "ada", "a@b.c", "short", "short"), Err(GalleryError::Validation(_))));
        assert!(matches!(svc.register(1, "ada", "a@b.c", "secret", "secreT"), Err(GalleryError::Validation(_))));

        let request = svc.register(1, "ada", "a@b.c", "secret", "secret").unwrap();
        assert!(request.url.ends_with("/api/auth/register"));
        assert!(!request.is_authorized());
    }

    #[test]
    fn register_rejection_carries_backend_message() {
        match AuthService::complete_register(409, br#"{"error":"Email already registered"}"#) {
            Err(GalleryError::Validation(message)) => assert_eq!(message, "Email already registered"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn login_rejection_is_authentication_error() {
        assert!(matches!(
            AuthService::complete_login(401, br#"{"error":"Invalid credentials"}"#),
            Err(GalleryError::Authentication(m)) if m == "Invalid credentials"
        ));
        assert!(matches!(AuthService::complete_login(0, b""), Err(GalleryError::Network(_))));
    }

    #[test]
    fn success_without_user_is_malformed() {
        assert!(matches!(
            AuthService::complete_login(200, br#"{"token":"tok"}"#),
            Err(GalleryError::MalformedResponse(_))
        ));
        let session = AuthService::complete_register(201, OK_BODY).unwrap();
        assert_eq!(session.user.id, "3");
    }

    #[test]
    fn authorized_attaches_bearer_only_with_session() {
        let svc = service();
        let session = AuthService::complete_login(200, OK_BODY).unwrap();
        let endpoint = Endpoint::Favorites { page: 1, limit: 20 };

        assert!(svc.authorized(1, &endpoint, Some(&session)).is_authorized());
        assert!(!svc.authorized(2, &endpoint, None).is_authorized());
    }

    #[test]
    fn auth_failures_mean_expiry() {
        assert!(matches!(AuthService::check_authorized(401), Err(GalleryError::SessionExpired)));
        assert!(matches!(AuthService::check_authorized(403), Err(GalleryError::SessionExpired)));
        assert!(AuthService::check_authorized(500).is_ok());
        assert!(AuthService::check_authorized(200).is_ok());
    }
}
