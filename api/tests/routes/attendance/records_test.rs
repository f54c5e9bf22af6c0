#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use chrono::{Duration, Utc};
    use serde_json::json;

    use crate::helpers::{Directory, make_test_app, send};

    #[tokio::test]
    async fn bulk_after_scan_skips_scanned_member() {
        let (app, state) = make_test_app().await;
        let dir = Directory::seed(state.db()).await;
        let (m1, m3) = (dir.members[0].id, dir.members[2].id);

        let (_, started) = send(
            &app,
            "POST",
            "/api/attendance/sessions",
            Some(dir.supervisor.id),
            Some(json!({ "activity_id": dir.activity.id })),
        )
        .await;
        let token = started["data"]["token"].as_str().unwrap().to_string();
        let (_, scanned) = send(&app, "POST", "/api/attendance/scan", Some(m1), Some(json!({ "token": token }))).await;
        let day = scanned["data"]["day"].as_str().unwrap().to_string();

        let uri = format!("/api/activities/{}/attendance", dir.activity.id);
        let (status, json) = send(
            &app,
            "POST",
            &uri,
            Some(dir.supervisor.id),
            Some(json!({
                "day": day,
                "entries": [
                    { "member_id": m1, "status": "Absent" },
                    { "member_id": m3, "status": "Absent" }
                ]
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"], json!({ "applied": 1, "skipped": 1 }));

        let (status, json) = send(
            &app,
            "GET",
            &format!("{uri}?day={day}"),
            Some(dir.supervisor.id),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let rows = json["data"].as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["member_id"], m1);
        assert_eq!(rows[0]["status"], "Present");
        assert_eq!(rows[0]["source"], "ScanIn");
        assert_eq!(rows[1]["member_id"], m3);
        assert_eq!(rows[1]["status"], "Absent");
        assert_eq!(rows[1]["source"], "BulkSubmission");
    }

    #[tokio::test]
    async fn bulk_rejects_bad_input() {
        let (app, state) = make_test_app().await;
        let dir = Directory::seed(state.db()).await;
        let uri = format!("/api/activities/{}/attendance", dir.activity.id);
        let m1 = dir.members[0].id;

        let (status, json) = send(
            &app,
            "POST",
            &uri,
            Some(dir.supervisor.id),
            Some(json!({ "day": "yesterday", "entries": [] })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"], "ValidationError");

        let (status, _) = send(
            &app,
            "POST",
            &uri,
            Some(dir.supervisor.id),
            Some(json!({
                "day": "2026-04-14",
                "entries": [
                    { "member_id": m1, "status": "Present" },
                    { "member_id": m1, "status": "Absent" }
                ]
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, json) = send(
            &app,
            "POST",
            &uri,
            Some(dir.supervisor.id),
            Some(json!({
                "day": "2026-04-14",
                "entries": [{ "member_id": 999_999, "status": "Present" }]
            })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["code"], "MemberNotFound");

        let (status, _) = send(
            &app,
            "POST",
            &uri,
            Some(dir.other_supervisor.id),
            Some(json!({ "day": "2026-04-14", "entries": [] })),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn admin_may_submit_and_read_history() {
        let (app, state) = make_test_app().await;
        let dir = Directory::seed(state.db()).await;
        let uri = format!("/api/activities/{}/attendance", dir.activity.id);
        let today = Utc::now().date_naive();
        let yesterday = today - Duration::days(1);

        for (day, status) in [(yesterday, "Absent"), (today, "Present")] {
            let (code, _) = send(
                &app,
                "POST",
                &uri,
                Some(dir.admin.id),
                Some(json!({
                    "day": day.to_string(),
                    "entries": [
                        { "member_id": dir.members[0].id, "status": status },
                        { "member_id": dir.members[1].id, "status": "Present" }
                    ]
                })),
            )
            .await;
            assert_eq!(code, StatusCode::OK);
        }

        let (status, json) = send(&app, "GET", &format!("{uri}/history"), Some(dir.supervisor.id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json["data"],
            json!([
                { "day": today.to_string(), "present": 2, "absent": 0, "total": 2 },
                { "day": yesterday.to_string(), "present": 1, "absent": 1, "total": 2 }
            ])
        );

        let (_, limited) = send(&app, "GET", &format!("{uri}/history?limit=1"), Some(dir.admin.id), None).await;
        assert_eq!(limited["data"].as_array().unwrap().len(), 1);

        let (status, json) = send(&app, "GET", &format!("{uri}/history?limit=0"), Some(dir.admin.id), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"], "ValidationError");

        let (status, json) = send(&app, "GET", &format!("{uri}/stats"), Some(dir.supervisor.id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["enrolled"], 3);
        assert_eq!(json["data"]["days_recorded"], 2);
        assert_eq!(json["data"]["total_entries"], 4);
        assert_eq!(json["data"]["present_entries"], 3);
        assert_eq!(json["data"]["average_attendance"], 75.0);
        assert_eq!(json["data"]["marked_today"], true);
    }

    #[tokio::test]
    async fn members_cannot_read_activity_ledger() {
        let (app, state) = make_test_app().await;
        let dir = Directory::seed(state.db()).await;
        let uri = format!("/api/activities/{}/attendance/history", dir.activity.id);

        let (status, json) = send(&app, "GET", &uri, Some(dir.members[0].id), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(json["code"], "Unauthorized");
    }
}
