#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use chrono::{DateTime, Utc};
    use serde_json::json;
    use serial_test::serial;
    use util::config::AppConfig;

    use crate::helpers::{Directory, make_test_app, send};

    #[tokio::test]
    async fn start_session_as_assigned_supervisor() {
        let (app, state) = make_test_app().await;
        let dir = Directory::seed(state.db()).await;

        let (status, json) = send(
            &app,
            "POST",
            "/api/attendance/sessions",
            Some(dir.supervisor.id),
            Some(json!({ "activity_id": dir.activity.id })),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["success"], true);
        assert_eq!(json["message"], "Attendance session started");
        assert_eq!(json["data"]["activity_name"], "Programming");
        assert!(json["data"]["token"].as_str().is_some_and(|t| !t.is_empty()));
        assert!(json.get("code").is_none());
    }

    #[tokio::test]
    async fn start_session_forbidden_for_others() {
        let (app, state) = make_test_app().await;
        let dir = Directory::seed(state.db()).await;

        for uid in [dir.other_supervisor.id, dir.members[0].id, dir.admin.id] {
            let (status, json) = send(
                &app,
                "POST",
                "/api/attendance/sessions",
                Some(uid),
                Some(json!({ "activity_id": dir.activity.id })),
            )
            .await;
            assert_eq!(status, StatusCode::FORBIDDEN, "user {uid}");
            assert_eq!(json["success"], false);
        }
    }

    #[tokio::test]
    async fn start_session_unknown_activity_is_404() {
        let (app, state) = make_test_app().await;
        let dir = Directory::seed(state.db()).await;

        let (status, json) = send(
            &app,
            "POST",
            "/api/attendance/sessions",
            Some(dir.supervisor.id),
            Some(json!({ "activity_id": 404_404 })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["code"], "ActivityNotFound");
    }

    #[tokio::test]
    async fn active_session_lists_scans_and_close_reports_count() {
        let (app, state) = make_test_app().await;
        let dir = Directory::seed(state.db()).await;

        let (_, none) = send(&app, "GET", "/api/attendance/sessions/active", Some(dir.supervisor.id), None).await;
        assert_eq!(none["data"], json!({ "active": false }));

        let (_, started) = send(
            &app,
            "POST",
            "/api/attendance/sessions",
            Some(dir.supervisor.id),
            Some(json!({ "activity_id": dir.activity.id })),
        )
        .await;
        let token = started["data"]["token"].as_str().unwrap().to_string();

        let (status, _) = send(
            &app,
            "POST",
            "/api/attendance/scan",
            Some(dir.members[0].id),
            Some(json!({ "token": token })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, active) = send(&app, "GET", "/api/attendance/sessions/active", Some(dir.supervisor.id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(active["data"]["active"], true);
        assert_eq!(active["data"]["token"], token.as_str());
        assert_eq!(active["data"]["scanned_count"], 1);
        assert_eq!(active["data"]["scanned_members"][0]["display_name"], "Mo One");

        let uri = format!("/api/attendance/sessions/{token}/close");
        let (status, json) = send(&app, "POST", &uri, Some(dir.other_supervisor.id), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(json["success"], false);

        let (status, json) = send(&app, "POST", &uri, Some(dir.supervisor.id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["status"], "closed");
        assert_eq!(json["data"]["scanned_count"], 1);

        let (_, after) = send(&app, "GET", "/api/attendance/sessions/active", Some(dir.supervisor.id), None).await;
        assert_eq!(after["data"]["active"], false);
    }

    #[tokio::test]
    async fn close_unknown_token_is_invalid_token() {
        let (app, state) = make_test_app().await;
        let dir = Directory::seed(state.db()).await;

        let (status, json) = send(
            &app,
            "POST",
            "/api/attendance/sessions/does-not-exist/close",
            Some(dir.supervisor.id),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["code"], "InvalidToken");
    }

    #[tokio::test]
    #[serial]
    async fn session_ttl_follows_config() {
        AppConfig::set_session_ttl_minutes(3);

        let (app, state) = make_test_app().await;
        let dir = Directory::seed(state.db()).await;

        let before = Utc::now();
        let (status, json) = send(
            &app,
            "POST",
            "/api/attendance/sessions",
            Some(dir.supervisor.id),
            Some(json!({ "activity_id": dir.activity.id })),
        )
        .await;
        AppConfig::reset();

        assert_eq!(status, StatusCode::CREATED);
        let expires_at: DateTime<Utc> = json["data"]["expires_at"].as_str().unwrap().parse().unwrap();
        let ttl = expires_at - before;
        assert!(ttl.num_seconds() >= 179 && ttl.num_seconds() <= 185, "ttl was {ttl}");
    }
}
