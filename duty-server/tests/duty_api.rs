//! HTTP API integration tests
//!
//! Drives the full router (in-memory SQLite, fixed clock, recording notifier)
//! with `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use chrono::NaiveDate;
use duty_server::api::build_app;
use duty_server::core::{Config, ServerState};
use duty_server::db::DbService;
use duty_server::notify::RecordingNotifier;
use duty_server::utils::time::FixedClock;
use http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

struct TestApp {
    app: Router,
    clock: Arc<FixedClock>,
    sink: Arc<RecordingNotifier>,
}

/// Floors 2..=4 with 12 rooms each, today = 2026-04-10 (day 100 of the year)
async fn setup() -> TestApp {
    let db = DbService::in_memory().await.unwrap();
    db.seed_registry(2, 4, 12).await.unwrap();
    let clock = Arc::new(FixedClock::new(
        NaiveDate::from_ymd_opt(2026, 4, 10).unwrap(),
    ));
    let sink = Arc::new(RecordingNotifier::default());
    let state = ServerState::new(Config::for_tests(), db.pool, clock.clone(), sink.clone());
    TestApp {
        app: build_app(state),
        clock,
        sink,
    }
}

impl TestApp {
    async fn call(
        &self,
        method: &str,
        uri: &str,
        requester: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(id) = requester {
            builder = builder
                .header("x-requester-id", id)
                .header("x-requester-name", "Tester");
        }
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.call("GET", uri, None, None).await
    }

    async fn post(&self, uri: &str, requester: &str, body: Value) -> (StatusCode, Value) {
        self.call("POST", uri, Some(requester), Some(body)).await
    }

    async fn register_supervisor(&self, identity: &str, floors: &[i64]) {
        let (status, _) = self
            .post(
                "/api/supervisors",
                "admin",
                json!({ "identity": identity, "name": "Supervisor", "floors": floors }),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
    }

    async fn set_group(&self, floor: i64, group: &str) {
        let (status, _) = self
            .call(
                "PUT",
                &format!("/api/floors/{floor}/group"),
                Some("admin"),
                Some(json!({ "group_chat_id": group })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
    }
}

fn rooms_by_floor(duties: &Value) -> Vec<(i64, i64)> {
    duties
        .as_array()
        .unwrap()
        .iter()
        .map(|d| (d["floor"].as_i64().unwrap(), d["room_number"].as_i64().unwrap()))
        .collect()
}

#[tokio::test]
async fn test_health() {
    let t = setup().await;
    let (status, body) = t.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["today"], "2026-04-10");
    assert_eq!(body["notifier"], "recording");
}

#[tokio::test]
async fn test_today_generates_once() {
    let t = setup().await;

    let (status, first) = t.get("/api/duties/today").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(rooms_by_floor(&first), vec![(2, 205), (3, 308), (4, 411)]);
    assert_eq!(first[0]["status"], "PENDING");
    assert_eq!(first[0]["general_cleaning"], false);

    let (_, second) = t.get("/api/duties/today").await;
    assert_eq!(first, second);

    let (status, run) = t
        .call("POST", "/api/duties/generate", Some("admin"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(run["created"].as_array().unwrap().len(), 0);
    assert_eq!(run["existing"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_generate_for_date() {
    let t = setup().await;
    let (status, run) = t
        .call("POST", "/api/duties/generate?date=2026-04-11", Some("admin"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(run["date"], "2026-04-11");
    assert_eq!(run["created"].as_array().unwrap().len(), 3);

    let (status, view) = t.get("/api/duties/floor/2?date=2026-04-11").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["room_number"], 206);
    assert_eq!(view["general_cleaning"], true);

    let (status, body) = t
        .call("POST", "/api/duties/generate?date=11-04-2026", Some("admin"), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 2);
}

#[tokio::test]
async fn test_unknown_floor_and_missing_record() {
    let t = setup().await;
    let (status, body) = t.get("/api/duties/floor/99").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 3001);

    // Floor exists but nothing was generated yet
    let (status, body) = t.get("/api/duties/floor/2").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 4001);
}

#[tokio::test]
async fn test_requester_header_required() {
    let t = setup().await;
    let (status, body) = t
        .call(
            "POST",
            "/api/duties/confirm",
            None,
            Some(json!({ "room_number": 205 })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 1001);
}

#[tokio::test]
async fn test_confirm_is_idempotent() {
    let t = setup().await;
    t.get("/api/duties/today").await;

    let (status, record) = t
        .post("/api/duties/confirm", "7", json!({ "room_number": 205 }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(record["status"], "COMPLETED");
    assert_eq!(record["confirmed_by"], "7:Tester");
    let confirmed_at = record["confirmed_at"].clone();
    assert!(confirmed_at.is_i64());

    // Second confirmation is a silent no-op
    let (status, again) = t
        .post("/api/duties/confirm", "8", json!({ "room_number": 205 }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(again.is_null());

    let (_, view) = t.get("/api/duties/floor/2").await;
    assert_eq!(view["status"], "COMPLETED");
    assert_eq!(view["confirmed_by"], "7:Tester");
    assert_eq!(view["confirmed_at"], confirmed_at);

    // Not on duty today
    let (status, none) = t
        .post("/api/duties/confirm", "7", json!({ "room_number": 210 }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(none.is_null());
}

#[tokio::test]
async fn test_skip_requires_floor_supervisor() {
    let t = setup().await;
    t.register_supervisor("55", &[2]).await;

    let (status, body) = t
        .post(
            "/api/duties/skip",
            "55",
            json!({ "floor": 3, "room_number": 308, "reason": "sick" }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], 2002);

    // Rejected before today's schedule is generated
    let (status, body) = t.get("/api/duties/floor/3").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 4001);
    let (_, queue) = t.get("/api/duties/queue").await;
    assert!(queue.as_array().unwrap().is_empty());

    let (_, today) = t.get("/api/duties/today").await;
    assert_eq!(rooms_by_floor(&today), vec![(2, 205), (3, 308), (4, 411)]);
}

#[tokio::test]
async fn test_rejected_skip_keeps_queue_for_next_generation() {
    let t = setup().await;
    t.register_supervisor("55", &[3]).await;
    t.post(
        "/api/duties/skip",
        "55",
        json!({ "floor": 3, "room_number": 308, "reason": "exam" }),
    )
    .await;

    // Tomorrow nothing exists yet; a stranger's skip must not trigger generation
    t.clock.set_date(NaiveDate::from_ymd_opt(2026, 4, 11).unwrap());
    let (status, _) = t
        .post(
            "/api/duties/skip",
            "99",
            json!({ "floor": 3, "room_number": 310 }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, queue) = t.get("/api/duties/queue").await;
    assert_eq!(queue.as_array().unwrap().len(), 1);
    let (status, _) = t.get("/api/duties/floor/3").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_skip_defers_and_next_generation_serves_queue() {
    let t = setup().await;
    t.register_supervisor("55", &[3]).await;

    let (status, outcome) = t
        .post(
            "/api/duties/skip",
            "55",
            json!({ "floor": 3, "room_number": 308, "reason": "exam" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome["next_room"], 309);
    assert_eq!(outcome["record"]["room_number"], 309);
    assert_eq!(outcome["queued"]["room_number"], 308);
    assert_eq!(outcome["queued"]["recorded_by"], "55:Tester");

    let (_, queue) = t.get("/api/duties/queue").await;
    assert_eq!(queue.as_array().unwrap().len(), 1);

    t.clock.set_date(NaiveDate::from_ymd_opt(2026, 4, 11).unwrap());
    let (_, tomorrow) = t.get("/api/duties/today").await;
    assert_eq!(rooms_by_floor(&tomorrow), vec![(2, 206), (3, 308), (4, 412)]);

    let (_, queue) = t.get("/api/duties/queue").await;
    assert!(queue.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_duty_report() {
    let t = setup().await;
    t.get("/api/duties/today").await;
    t.post("/api/duties/confirm", "7", json!({ "room_number": 411 }))
        .await;

    let (status, report) = t.get("/api/duties/report").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["completed"].as_array().unwrap().len(), 1);
    assert_eq!(report["pending"].as_array().unwrap().len(), 2);
    assert_eq!(report["completion_percent"], 33);
}

#[tokio::test]
async fn test_attendance_upsert_and_report() {
    let t = setup().await;
    let (status, _) = t
        .post(
            "/api/attendance",
            "55",
            json!({ "floor": 3, "student_count": 10 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let (_, record) = t
        .post(
            "/api/attendance",
            "56",
            json!({ "floor": 3, "student_count": 8, "notes": "two on leave" }),
        )
        .await;
    assert_eq!(record["student_count"], 8);
    assert_eq!(record["submitted_by"], "56:Tester");

    let (_, records) = t.get("/api/attendance?date=2026-04-10").await;
    assert_eq!(records.as_array().unwrap().len(), 1);

    let (_, report) = t.get("/api/attendance/report").await;
    assert_eq!(report["total_students"], 8);
    assert_eq!(report["floors_submitted"], 1);
    assert_eq!(report["floors_registered"], 3);

    let (status, body) = t
        .post(
            "/api/attendance",
            "55",
            json!({ "floor": 3, "student_count": -1 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 8);
}

#[tokio::test]
async fn test_attendance_session_flow() {
    let t = setup().await;

    // Only registered supervisors may start
    let (status, body) = t
        .call("POST", "/api/attendance/session/start", Some("77"), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], 2002);

    t.register_supervisor("77", &[2, 4]).await;
    let (status, session) = t
        .call("POST", "/api/attendance/session/start", Some("77"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(session["step"], "SELECTING_FLOOR");
    assert_eq!(session["floors_remaining"], json!([2, 4]));

    let (_, session) = t
        .post("/api/attendance/session/floor", "77", json!({ "floor": 4 }))
        .await;
    assert_eq!(session["step"], "ENTERING_COUNT");

    let (status, body) = t
        .post("/api/attendance/session/count", "77", json!({ "text": "many" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 2);

    let (_, session) = t
        .post("/api/attendance/session/count", "77", json!({ "text": " 21 " }))
        .await;
    assert_eq!(session["step"], "ENTERING_NOTES");

    let (_, session) = t
        .post("/api/attendance/session/notes", "77", json!({}))
        .await;
    assert_eq!(session["step"], "SELECTING_FLOOR");
    assert_eq!(session["floors_remaining"], json!([2]));

    t.post("/api/attendance/session/floor", "77", json!({ "floor": 2 }))
        .await;
    t.post("/api/attendance/session/count", "77", json!({ "text": "19" }))
        .await;
    let (_, session) = t
        .post(
            "/api/attendance/session/notes",
            "77",
            json!({ "notes": "room 203 away" }),
        )
        .await;
    assert_eq!(session["step"], "DONE");

    let (_, report) = t.get("/api/attendance/report").await;
    assert_eq!(report["total_students"], 40);

    // Finished sessions are dropped
    let (status, body) = t
        .call("POST", "/api/attendance/session/cancel", Some("77"), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 5001);
}

#[tokio::test]
async fn test_penalty_leaves_weight_alone() {
    let t = setup().await;

    let (status, body) = t
        .post(
            "/api/penalties",
            "admin",
            json!({ "room_number": 305, "duration_days": 0 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 6001);

    let (status, penalty) = t
        .post(
            "/api/penalties",
            "admin",
            json!({ "room_number": 305, "duration_days": 3, "reason": "noise" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(penalty["start_date"], "2026-04-10");
    assert_eq!(penalty["end_date"], "2026-04-13");
    assert_eq!(penalty["issued_by"], "admin:Tester");

    let (_, list) = t.get("/api/penalties?room=305").await;
    assert_eq!(list.as_array().unwrap().len(), 1);
    let (_, none) = t.get("/api/penalties?room=306").await;
    assert!(none.as_array().unwrap().is_empty());

    let (_, rooms) = t.get("/api/floors/3/rooms").await;
    let room = rooms
        .as_array()
        .unwrap()
        .iter()
        .find(|r| r["number"] == 305)
        .unwrap();
    assert_eq!(room["duty_weight"], 1);
}

#[tokio::test]
async fn test_registry_administration() {
    let t = setup().await;

    let (_, floors) = t.get("/api/floors").await;
    assert_eq!(floors.as_array().unwrap().len(), 3);

    let (status, floor) = t
        .call(
            "PUT",
            "/api/floors/2/group",
            Some("admin"),
            Some(json!({ "group_chat_id": "-100" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(floor["group_chat_id"], "-100");

    let (status, room) = t
        .call(
            "PUT",
            "/api/rooms/201/weight",
            Some("admin"),
            Some(json!({ "duty_weight": 2 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(room["duty_weight"], 2);

    let (status, _) = t
        .call(
            "PUT",
            "/api/rooms/201/weight",
            Some("admin"),
            Some(json!({ "duty_weight": 0 })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Weights above the cap are refused and never stored
    let (status, body) = t
        .call(
            "PUT",
            "/api/rooms/201/weight",
            Some("admin"),
            Some(json!({ "duty_weight": i64::MAX })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 8);
    let (_, rooms) = t.get("/api/floors/2/rooms").await;
    assert_eq!(rooms[0]["duty_weight"], 2);
    let (status, _) = t.get("/api/duties/today").await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = t
        .post(
            "/api/supervisors",
            "admin",
            json!({ "identity": "9", "name": "Bek", "floors": [42] }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 3001);

    t.register_supervisor("9", &[2]).await;
    let (_, supervisors) = t.get("/api/supervisors").await;
    let id = supervisors[0]["id"].as_i64().unwrap();
    assert_eq!(supervisors[0]["floors"], json!([2]));

    let uri = format!("/api/supervisors/{id}");
    let (status, _) = t.call("DELETE", &uri, Some("admin"), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = t.call("DELETE", &uri, Some("admin"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 3003);
}

#[tokio::test]
async fn test_manual_job_trigger() {
    let t = setup().await;
    t.set_group(2, "-23").await;
    t.set_group(3, "-23").await;
    t.set_group(4, "-4").await;

    let (status, result) = t
        .call("POST", "/api/notify/duty_announcement", Some("admin"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(result, json!({ "job": "duty_announcement", "delivered": 2 }));
    let texts = t.sink.sent_to("-23");
    assert_eq!(texts.len(), 1);
    assert!(texts[0].contains("room 308"));

    // The announcement generated today's schedule
    let (status, _) = t.get("/api/duties/floor/4").await;
    assert_eq!(status, StatusCode::OK);

    let (_, result) = t
        .call("POST", "/api/notify/duty_report", Some("admin"), None)
        .await;
    assert_eq!(result["delivered"], 1);
    assert_eq!(t.sink.sent_to("admin").len(), 1);

    let (status, body) = t
        .call("POST", "/api/notify/weekly_report", Some("admin"), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 3);

    let (status, _) = t
        .call("POST", "/api/notify/duty_report", None, None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_custom_broadcast_by_floor_range() {
    let t = setup().await;
    t.set_group(2, "-23").await;
    t.set_group(3, "-23").await;
    t.set_group(4, "-4").await;

    let (status, result) = t
        .post("/api/notify/broadcast", "admin", json!({ "text": "water is off" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(result, json!({ "groups": 2, "delivered": 2 }));

    let (_, result) = t
        .post(
            "/api/notify/broadcast",
            "admin",
            json!({ "text": "floor 2-3 meeting", "target": "2-3" }),
        )
        .await;
    assert_eq!(result["groups"], 1);
    assert_eq!(t.sink.sent_to("-4"), vec!["water is off"]);
    assert_eq!(t.sink.sent_to("-23").len(), 2);

    let (_, result) = t
        .post(
            "/api/notify/broadcast",
            "admin",
            json!({ "text": "nobody", "target": "7-9" }),
        )
        .await;
    assert_eq!(result, json!({ "groups": 0, "delivered": 0 }));

    let (status, body) = t
        .post(
            "/api/notify/broadcast",
            "admin",
            json!({ "text": "x", "target": "4-2" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 2);

    let (status, _) = t
        .post("/api/notify/broadcast", "admin", json!({ "text": "" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_stats() {
    let t = setup().await;

    // Read-only: nothing generated yet
    let (status, stats) = t.get("/api/stats").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["total_duties"], 0);
    assert_eq!(stats["completion_percent"], 0);

    t.get("/api/duties/today").await;
    t.post("/api/duties/confirm", "7", json!({ "room_number": 308 }))
        .await;
    t.post(
        "/api/penalties",
        "admin",
        json!({ "room_number": 305, "duration_days": 2 }),
    )
    .await;

    let (_, stats) = t.get("/api/stats").await;
    assert_eq!(
        stats,
        json!({
            "date": "2026-04-10",
            "total_duties": 3,
            "completed": 1,
            "pending": 2,
            "completion_percent": 33,
            "total_penalties": 1
        })
    );
}
