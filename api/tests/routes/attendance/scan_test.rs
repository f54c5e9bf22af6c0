#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use chrono::{Duration, Utc};
    use db::models::{
        attendance_record::{self, AttendanceSource, AttendanceStatus},
        attendance_session::{self, SessionStatus},
    };
    use sea_orm::{ActiveModelTrait, ActiveValue::Set, IntoActiveModel};
    use serde_json::{Value, json};

    use crate::helpers::{Directory, make_test_app, send};

    async fn start(app: &axum::Router, dir: &Directory) -> String {
        let (status, json) = send(
            app,
            "POST",
            "/api/attendance/sessions",
            Some(dir.supervisor.id),
            Some(json!({ "activity_id": dir.activity.id })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        json["data"]["token"].as_str().unwrap().to_string()
    }

    async fn scan(app: &axum::Router, member_id: i64, token: &str) -> (StatusCode, Value) {
        send(
            app,
            "POST",
            "/api/attendance/scan",
            Some(member_id),
            Some(json!({ "token": token })),
        )
        .await
    }

    #[tokio::test]
    async fn scan_marks_present_once() {
        let (app, state) = make_test_app().await;
        let dir = Directory::seed(state.db()).await;
        let token = start(&app, &dir).await;

        let (status, json) = scan(&app, dir.members[0].id, &token).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["message"], "Attendance marked");
        assert_eq!(json["data"]["activity_id"], dir.activity.id);
        let day = Utc::now().date_naive();
        assert_eq!(json["data"]["day"], day.to_string());

        let (status, json) = scan(&app, dir.members[0].id, &token).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(json["code"], "DuplicateScan");
        assert_eq!(json["success"], false);

        let rows = attendance_record::Model::for_day(state.db(), dir.activity.id, day)
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].status, AttendanceStatus::Present);
        assert_eq!(rows[0].source, AttendanceSource::ScanIn);
    }

    #[tokio::test]
    async fn scan_error_codes() {
        let (app, state) = make_test_app().await;
        let dir = Directory::seed(state.db()).await;
        let token = start(&app, &dir).await;

        let (status, json) = scan(&app, dir.outsider.id, &token).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(json["code"], "NotEnrolled");

        let (status, json) = scan(&app, dir.members[1].id, "unknown-token").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["code"], "InvalidToken");

        let (status, json) = scan(&app, dir.supervisor.id, &token).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["code"], "MemberProfile");

        let (status, json) = scan(&app, dir.members[1].id, "   ").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"], "ValidationError");
    }

    #[tokio::test]
    async fn scan_after_close_is_session_closed() {
        let (app, state) = make_test_app().await;
        let dir = Directory::seed(state.db()).await;
        let token = start(&app, &dir).await;

        let uri = format!("/api/attendance/sessions/{token}/close");
        send(&app, "POST", &uri, Some(dir.supervisor.id), None).await;

        let (status, json) = scan(&app, dir.members[0].id, &token).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(json["code"], "SessionClosed");
    }

    #[tokio::test]
    async fn scan_after_expiry_is_session_expired() {
        let (app, state) = make_test_app().await;
        let dir = Directory::seed(state.db()).await;
        let token = start(&app, &dir).await;

        // Push the window into the past.
        let session = attendance_session::Model::find_by_token(state.db(), &token)
            .await
            .unwrap()
            .unwrap();
        let mut active = session.into_active_model();
        active.expires_at = Set(Utc::now() - Duration::minutes(1));
        active.update(state.db()).await.unwrap();

        let (status, json) = scan(&app, dir.members[0].id, &token).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(json["code"], "SessionExpired");

        let stored = attendance_session::Model::find_by_token(state.db(), &token)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.status, SessionStatus::Expired);

        let rows = attendance_record::Model::for_day(state.db(), dir.activity.id, Utc::now().date_naive())
            .await
            .unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn new_session_auto_closes_previous() {
        let (app, state) = make_test_app().await;
        let dir = Directory::seed(state.db()).await;

        let first = start(&app, &dir).await;
        let second = start(&app, &dir).await;
        assert_ne!(first, second);

        let (status, json) = scan(&app, dir.members[0].id, &first).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(json["code"], "SessionClosed");

        let (status, _) = scan(&app, dir.members[0].id, &second).await;
        assert_eq!(status, StatusCode::OK);
    }
}
