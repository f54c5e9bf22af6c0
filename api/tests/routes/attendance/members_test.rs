#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::helpers::{Directory, make_test_app, send};

    #[tokio::test]
    async fn member_summary_visibility() {
        let (app, state) = make_test_app().await;
        let dir = Directory::seed(state.db()).await;
        let m1 = dir.members[0].id;

        let uri = format!("/api/activities/{}/attendance", dir.activity.id);
        for (day, status) in [("2026-04-13", "Present"), ("2026-04-14", "Absent")] {
            send(
                &app,
                "POST",
                &uri,
                Some(dir.supervisor.id),
                Some(json!({ "day": day, "entries": [{ "member_id": m1, "status": status }] })),
            )
            .await;
        }

        let summary_uri = format!("/api/members/{m1}/attendance");

        let (status, json) = send(&app, "GET", &summary_uri, Some(m1), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["member_id"], m1);
        assert_eq!(json["data"]["overall_percentage"], 50.0);
        assert_eq!(json["data"]["activities"][0]["activity_code"], "COS110");
        assert_eq!(json["data"]["activities"][0]["standing"], "critical");
        assert_eq!(json["data"]["records"][0]["day"], "2026-04-14");

        let (status, _) = send(&app, "GET", &summary_uri, Some(dir.admin.id), None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, json) = send(&app, "GET", &summary_uri, Some(dir.other_supervisor.id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["activities"], json!([]));

        let (status, _) = send(&app, "GET", &summary_uri, Some(dir.members[1].id), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, json) = send(&app, "GET", "/api/members/424242/attendance", Some(dir.admin.id), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["code"], "MemberNotFound");
    }
}
