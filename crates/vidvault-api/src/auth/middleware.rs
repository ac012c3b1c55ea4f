use crate::auth::resolver::PrincipalResolver;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// Resolve the caller once per request and stash the principal in extensions.
///
/// Never rejects: routes decide for themselves whether a session is required.
pub async fn principal_middleware(
    State(resolver): State<Arc<dyn PrincipalResolver>>,
    request: Request,
    next: Next,
) -> Response {
    let (mut parts, body) = request.into_parts();

    if let Some(principal) = resolver.resolve(&parts).await {
        tracing::debug!(principal_id = %principal.id, "Session resolved");
        parts.extensions.insert(principal);
    }

    next.run(Request::from_parts(parts, body)).await
}
