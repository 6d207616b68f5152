use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::Deserialize;
use yew::UseStateHandle;

const TOKEN_KEY: &str = "token";

/// The authenticated identity plus its bearer token. A `Session` only exists
/// with a non-empty token; destroying it always goes through
/// [`clear_token`].
#[derive(Clone, PartialEq)]
pub struct Session {
    pub user_id: Option<i64>,
    pub username: String,
    pub email: Option<String>,
    pub role: Option<String>,
    pub token: String,
}

/// Client-side session state machine. `Checking` is the initial state while
/// a persisted token is being confirmed against the backend.
#[derive(Clone, PartialEq)]
pub enum SessionState {
    Checking,
    Authenticated(Session),
    Unauthenticated { notice: Option<String> },
}

impl SessionState {
    pub fn signed_out() -> Self {
        SessionState::Unauthenticated { notice: None }
    }
}

/// Handle shared through context so any screen can react to auth changes.
/// Only login, logout and 401 handling ever write through it.
#[derive(Clone, PartialEq)]
pub struct SessionHandle {
    inner: UseStateHandle<SessionState>,
}

impl SessionHandle {
    pub fn new(inner: UseStateHandle<SessionState>) -> Self {
        Self { inner }
    }

    pub fn state(&self) -> SessionState {
        (*self.inner).clone()
    }

    pub fn username(&self) -> Option<String> {
        match &*self.inner {
            SessionState::Authenticated(session) => Some(session.username.clone()),
            _ => None,
        }
    }

    pub fn set_session(&self, session: Session) {
        store_token(&session.token);
        self.inner.set(SessionState::Authenticated(session));
    }

    /// Synchronous sign-out. Never fails.
    pub fn logout(&self) {
        clear_token();
        self.inner.set(SessionState::signed_out());
    }

    /// Token was rejected by the backend; the gateway has already dropped it.
    pub fn expire(&self) {
        clear_token();
        self.inner.set(SessionState::Unauthenticated {
            notice: Some("Session expired. Please log in again.".to_string()),
        });
    }
}

pub fn stored_token() -> Option<String> {
    if let Some(window) = web_sys::window() {
        if let Ok(Some(storage)) = window.local_storage() {
            if let Ok(Some(token)) = storage.get_item(TOKEN_KEY) {
                if !token.is_empty() {
                    return Some(token);
                }
            }
        }
    }
    None
}

pub fn store_token(token: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(Some(storage)) = window.local_storage() {
            let _ = storage.set_item(TOKEN_KEY, token);
        }
    }
}

pub fn clear_token() {
    if let Some(window) = web_sys::window() {
        if let Ok(Some(storage)) = window.local_storage() {
            let _ = storage.remove_item(TOKEN_KEY);
        }
    }
}

#[derive(Deserialize)]
struct TokenClaims {
    #[serde(default)]
    sub: Option<String>,
}

/// Best-effort peek at the JWT payload for an immediate username while the
/// authoritative identity is fetched. The token is never validated here.
pub fn claims_username(token: &str) -> Option<String> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload.as_bytes()).ok()?;
    let claims: TokenClaims = serde_json::from_slice(&bytes).ok()?;
    claims.sub.filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine;

    fn token_with_payload(payload: &str) -> String {
        format!(
            "header.{}.signature",
            URL_SAFE_NO_PAD.encode(payload.as_bytes())
        )
    }

    #[test]
    fn decodes_subject_claim() {
        let token = token_with_payload(r#"{"sub":"alice","exp":1700000000}"#);
        assert_eq!(claims_username(&token), Some("alice".to_string()));
    }

    #[test]
    fn missing_or_empty_subject_yields_none() {
        assert_eq!(claims_username(&token_with_payload(r#"{"exp":1}"#)), None);
        assert_eq!(claims_username(&token_with_payload(r#"{"sub":""}"#)), None);
    }

    #[test]
    fn malformed_tokens_yield_none() {
        assert_eq!(claims_username("not-a-jwt"), None);
        assert_eq!(claims_username("a.!!!.c"), None);
        assert_eq!(claims_username(""), None);
    }
}
