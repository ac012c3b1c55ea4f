use jsonwebtoken::{encode, EncodingKey, Header};
use vidvault_api::auth::SessionClaims;

/// Session secret shared by the test app and the token minter.
pub const TEST_SESSION_SECRET: &str = "test-session-secret-at-least-32-characters-long";

/// Mint a session token the identity provider would have issued for `user_id`.
pub fn session_token(user_id: &str) -> String {
    let claims = SessionClaims {
        sub: user_id.to_string(),
        name: Some(format!("{} name", user_id)),
        email: None,
        exp: chrono::Utc::now().timestamp() + 3600,
        iat: Some(chrono::Utc::now().timestamp()),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_SESSION_SECRET.as_bytes()),
    )
    .expect("Failed to mint session token")
}

/// `Authorization` header value for `user_id`.
pub fn bearer(user_id: &str) -> String {
    format!("Bearer {}", session_token(user_id))
}
