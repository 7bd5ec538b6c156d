use crate::error::{RemoteError, Result};
use callbook_core::validate_credentials;
use serde::Deserialize;

pub const DEFAULT_SIGN_IN_ENDPOINT: &str =
    "https://identitytoolkit.googleapis.com/v1/accounts:signInWithPassword";

/// Bearer identity for one process lifetime. Never written to disk and
/// never refreshed; an expired token surfaces as an unavailable store.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    pub id_token: String,
    pub email: String,
    pub local_id: String,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("email", &self.email)
            .field("local_id", &self.local_id)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInResponse {
    id_token: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    local_id: String,
}

#[derive(Debug, Deserialize)]
struct SignInErrorEnvelope {
    error: SignInErrorBody,
}

#[derive(Debug, Deserialize)]
struct SignInErrorBody {
    #[serde(default)]
    message: String,
}

#[cfg_attr(not(feature = "firestore"), allow(dead_code))]
fn parse_session(body: &str, fallback_email: &str) -> Result<Session> {
    let response: SignInResponse = serde_json::from_str(body)?;
    if response.id_token.trim().is_empty() {
        return Err(RemoteError::SignIn("empty id token".to_string()));
    }
    let email = if response.email.is_empty() {
        fallback_email.to_string()
    } else {
        response.email
    };
    Ok(Session {
        id_token: response.id_token,
        email,
        local_id: response.local_id,
    })
}

// Identity-provider codes such as INVALID_PASSWORD or EMAIL_NOT_FOUND, or the
// raw body when it is not the usual envelope.
#[cfg_attr(not(feature = "firestore"), allow(dead_code))]
fn sign_in_error_message(status: u16, body: &str) -> String {
    match serde_json::from_str::<SignInErrorEnvelope>(body) {
        Ok(envelope) if !envelope.error.message.is_empty() => envelope.error.message,
        _ if body.trim().is_empty() => format!("http status {}", status),
        _ => body.trim().to_string(),
    }
}

#[cfg(feature = "firestore")]
mod imp {
    use super::{parse_session, sign_in_error_message, Session, DEFAULT_SIGN_IN_ENDPOINT};
    use crate::error::{RemoteError, Result};
    use reqwest::blocking::Client;
    use std::time::Duration;
    use tracing::debug;
    use url::Url;

    /// Email/password sign-in against the identity toolkit REST API.
    #[derive(Debug, Clone)]
    pub struct PasswordSignIn {
        api_key: String,
        endpoint: String,
    }

    impl PasswordSignIn {
        pub fn new(api_key: impl Into<String>) -> Self {
            Self {
                api_key: api_key.into(),
                endpoint: DEFAULT_SIGN_IN_ENDPOINT.to_string(),
            }
        }

        pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
            self.endpoint = endpoint.into();
            self
        }

        pub(crate) fn sign_in_checked(&self, email: &str, password: &str) -> Result<Session> {
            let mut url = Url::parse(&self.endpoint)?;
            url.query_pairs_mut().append_pair("key", &self.api_key);

            let client = Client::builder()
                .user_agent("callbook")
                .timeout(Duration::from_secs(30))
                .connect_timeout(Duration::from_secs(10))
                .build()?;
            let response = client
                .post(url)
                .json(&serde_json::json!({
                    "email": email,
                    "password": password,
                    "returnSecureToken": true,
                }))
                .send()?;

            let status = response.status();
            let body = response.text()?;
            if !status.is_success() {
                let message = sign_in_error_message(status.as_u16(), &body);
                if status.is_server_error() {
                    return Err(RemoteError::Unavailable(message));
                }
                return Err(RemoteError::SignIn(message));
            }
            let session = parse_session(&body, email)?;
            debug!(email = %session.email, "signed in");
            Ok(session)
        }
    }
}

#[cfg(not(feature = "firestore"))]
mod imp {
    use super::{Session, DEFAULT_SIGN_IN_ENDPOINT};
    use crate::error::{RemoteError, Result};

    #[derive(Debug, Clone)]
    pub struct PasswordSignIn {
        #[allow(dead_code)]
        api_key: String,
        #[allow(dead_code)]
        endpoint: String,
    }

    impl PasswordSignIn {
        pub fn new(api_key: impl Into<String>) -> Self {
            Self {
                api_key: api_key.into(),
                endpoint: DEFAULT_SIGN_IN_ENDPOINT.to_string(),
            }
        }

        pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
            self.endpoint = endpoint.into();
            self
        }

        pub(crate) fn sign_in_checked(&self, _email: &str, _password: &str) -> Result<Session> {
            Err(RemoteError::Unavailable(
                "firestore support not enabled (build with feature firestore)".to_string(),
            ))
        }
    }
}

pub use imp::PasswordSignIn;

impl PasswordSignIn {
    /// Checks the credentials locally, then exchanges them for a session.
    /// Malformed credentials never reach the network.
    pub fn sign_in(&self, email: &str, password: &str) -> Result<Session> {
        let email = email.trim();
        validate_credentials(email, password)?;
        self.sign_in_checked(email, password)
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_session, sign_in_error_message, PasswordSignIn};
    use crate::error::RemoteError;
    use callbook_core::CredentialsError;

    #[test]
    fn malformed_credentials_fail_before_any_request() {
        // Unroutable endpoint: reaching the network would fail differently.
        let auth = PasswordSignIn::new("key").with_endpoint("http://127.0.0.1:9/none");

        let err = auth.sign_in("", "").unwrap_err();
        assert!(matches!(
            err,
            RemoteError::Credentials(CredentialsError::EmptyCredentials)
        ));

        let err = auth.sign_in("not-an-email", "secret1").unwrap_err();
        assert!(matches!(
            err,
            RemoteError::Credentials(CredentialsError::InvalidLoginEmail)
        ));

        let err = auth.sign_in("agent@gmail.com", "12345").unwrap_err();
        assert!(matches!(
            err,
            RemoteError::Credentials(CredentialsError::PasswordTooShort(6))
        ));
    }

    #[test]
    fn parses_sign_in_response() {
        let session = parse_session(
            r#"{
                "kind": "identitytoolkit#VerifyPasswordResponse",
                "localId": "uid-1",
                "email": "agent@gmail.com",
                "idToken": "token-abc",
                "registered": true,
                "refreshToken": "refresh",
                "expiresIn": "3600"
            }"#,
            "fallback@gmail.com",
        )
        .expect("session");
        assert_eq!(session.id_token, "token-abc");
        assert_eq!(session.email, "agent@gmail.com");
        assert_eq!(session.local_id, "uid-1");
        assert!(!format!("{:?}", session).contains("token-abc"));
    }

    #[test]
    fn empty_token_is_rejected() {
        let err = parse_session(r#"{"idToken": "  "}"#, "a@b.co").unwrap_err();
        assert!(matches!(err, RemoteError::SignIn(_)));
    }

    #[test]
    fn extracts_provider_error_message() {
        let body = r#"{"error": {"code": 400, "message": "INVALID_PASSWORD", "errors": []}}"#;
        assert_eq!(sign_in_error_message(400, body), "INVALID_PASSWORD");
        assert_eq!(sign_in_error_message(502, ""), "http status 502");
        assert_eq!(sign_in_error_message(400, "bad gateway\n"), "bad gateway");
    }
}
