use crate::auth::models::SessionClaims;
use axum::http::{header, request::Parts};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use vidvault_core::models::Principal;

/// Resolves the calling identity of an inbound request.
///
/// Returns `None` for anonymous callers and for any credential that fails to verify;
/// callers that need a session use `require_session`.
#[async_trait::async_trait]
pub trait PrincipalResolver: Send + Sync {
    async fn resolve(&self, parts: &Parts) -> Option<Principal>;
}

/// Verifies HS256 session tokens signed by the identity provider.
///
/// The token is read from `Authorization: Bearer <token>` first, then from the
/// session cookie.
pub struct SessionTokenResolver {
    decoding_key: DecodingKey,
    validation: Validation,
    cookie_name: String,
}

impl SessionTokenResolver {
    pub fn new(secret: &str, cookie_name: impl Into<String>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            cookie_name: cookie_name.into(),
        }
    }

    fn extract_token<'a>(&self, parts: &'a Parts) -> Option<&'a str> {
        if let Some(auth) = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
        {
            if let Some(token) = auth.strip_prefix("Bearer ") {
                let token = token.trim();
                if !token.is_empty() {
                    return Some(token);
                }
            }
        }

        parts
            .headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|h| h.to_str().ok())
            .flat_map(|h| h.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == self.cookie_name)
            .map(|(_, value)| value.trim())
            .filter(|value| !value.is_empty())
    }

    fn verify(&self, token: &str) -> Option<Principal> {
        match decode::<SessionClaims>(token, &self.decoding_key, &self.validation) {
            Ok(data) if !data.claims.sub.trim().is_empty() => Some(data.claims.into()),
            Ok(_) => {
                tracing::debug!("Session token has an empty subject");
                None
            }
            Err(e) => {
                tracing::debug!(error = %e, "Session token rejected");
                None
            }
        }
    }
}

#[async_trait::async_trait]
impl PrincipalResolver for SessionTokenResolver {
    async fn resolve(&self, parts: &Parts) -> Option<Principal> {
        let token = self.extract_token(parts)?;
        self.verify(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    fn token(sub: &str, exp_offset: i64, secret: &str) -> String {
        let claims = SessionClaims {
            sub: sub.to_string(),
            name: Some("Ada".to_string()),
            email: None,
            exp: chrono::Utc::now().timestamp() + exp_offset,
            iat: None,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn parts(header_name: header::HeaderName, value: &str) -> Parts {
        let (parts, _) = Request::builder()
            .header(header_name, value)
            .body(())
            .unwrap()
            .into_parts();
        parts
    }

    fn resolver() -> SessionTokenResolver {
        SessionTokenResolver::new(SECRET, "session-token")
    }

    #[tokio::test]
    async fn test_bearer_token_resolves() {
        let parts = parts(
            header::AUTHORIZATION,
            &format!("Bearer {}", token("u1", 3600, SECRET)),
        );
        let principal = resolver().resolve(&parts).await.unwrap();
        assert_eq!(principal.id, "u1");
        assert_eq!(principal.name.as_deref(), Some("Ada"));
    }

    #[tokio::test]
    async fn test_cookie_token_resolves() {
        let parts = parts(
            header::COOKIE,
            &format!("theme=dark; session-token={}", token("u2", 3600, SECRET)),
        );
        assert_eq!(resolver().resolve(&parts).await.unwrap().id, "u2");
    }

    #[tokio::test]
    async fn test_expired_token_is_absent() {
        let parts = parts(
            header::AUTHORIZATION,
            &format!("Bearer {}", token("u1", -3600, SECRET)),
        );
        assert!(resolver().resolve(&parts).await.is_none());
    }

    #[tokio::test]
    async fn test_wrong_secret_is_absent() {
        let parts = parts(
            header::AUTHORIZATION,
            &format!(
                "Bearer {}",
                token("u1", 3600, "another-secret-another-secret-xx")
            ),
        );
        assert!(resolver().resolve(&parts).await.is_none());
    }

    #[tokio::test]
    async fn test_garbage_and_missing_are_absent() {
        let garbage = parts(header::AUTHORIZATION, "Bearer not-a-jwt");
        assert!(resolver().resolve(&garbage).await.is_none());

        let basic = parts(header::AUTHORIZATION, "Basic dXNlcjpwYXNz");
        assert!(resolver().resolve(&basic).await.is_none());

        let empty_sub = parts(
            header::AUTHORIZATION,
            &format!("Bearer {}", token("  ", 3600, SECRET)),
        );
        assert!(resolver().resolve(&empty_sub).await.is_none());
    }
}
