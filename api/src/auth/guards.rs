use axum::{
    Json,
    body::Body,
    extract::FromRequestParts,
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
};

use crate::auth::claims::AuthUser;
use crate::response::{ApiResponse, Empty};

/// Basic guard to ensure the request is authenticated.
///
/// On success the extracted [`AuthUser`] is inserted into the request
/// extensions for handlers to pick up with `Extension<AuthUser>`.
pub async fn allow_authenticated(
    req: Request<Body>,
    next: Next,
) -> Result<Response, (StatusCode, Json<ApiResponse<Empty>>)> {
    let (mut parts, body) = req.into_parts();
    let user = AuthUser::from_request_parts(&mut parts, &())
        .await
        .map_err(|(status, reason)| {
            (status, Json(ApiResponse::error_with_code(reason, "Unauthenticated")))
        })?;

    let mut req = Request::from_parts(parts, body);
    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}
