#[cfg(test)]
mod tests {
    use api::auth::Claims;
    use axum::http::StatusCode;
    use chrono::{Duration, Utc};
    use jsonwebtoken::{EncodingKey, Header, encode};
    use util::config;

    use crate::helpers::{Directory, make_test_app};

    async fn get_active(app: &axum::Router, auth: Option<String>) -> StatusCode {
        use axum::{body::Body, http::Request};
        use tower::ServiceExt;

        let mut builder = Request::builder()
            .method("GET")
            .uri("/api/attendance/sessions/active");
        if let Some(value) = auth {
            builder = builder.header("Authorization", value);
        }
        app.clone()
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn missing_token_is_unauthorized() {
        let (app, _) = make_test_app().await;
        assert_eq!(get_active(&app, None).await, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn malformed_token_is_unauthorized() {
        let (app, _) = make_test_app().await;
        let status = get_active(&app, Some("Bearer not-a-jwt".into())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn expired_token_is_unauthorized() {
        let (app, state) = make_test_app().await;
        let dir = Directory::seed(state.db()).await;

        let claims = Claims::new(dir.supervisor.id, Utc::now() - Duration::hours(2));
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config::jwt_secret().as_bytes()),
        )
        .unwrap();

        let status = get_active(&app, Some(format!("Bearer {token}"))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn valid_token_is_accepted() {
        let (app, state) = make_test_app().await;
        let dir = Directory::seed(state.db()).await;

        let status = get_active(&app, Some(crate::helpers::bearer(dir.supervisor.id))).await;
        assert_eq!(status, StatusCode::OK);
    }
}
