pub mod assets;
pub mod upload_auth;
