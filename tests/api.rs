mod support;

use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use serde_json::{json, Value};

use shift_board::routes;
use shift_board::state::AppState;

use support::memory_stores;

macro_rules! app {
    () => {
        test::init_service(
            App::new()
                .app_data(web::Data::new(AppState::new(memory_stores())))
                .configure(routes::configure),
        )
        .await
    };
}

macro_rules! post {
    ($app:expr, $uri:expr, $body:expr) => {{
        let req = test::TestRequest::post()
            .uri($uri)
            .insert_header((routes::USER_ID_HEADER, "user-1"))
            .set_json($body)
            .to_request();
        let resp = test::call_service(&$app, req).await;
        let status = resp.status();
        let body: Value = test::read_body_json(resp).await;
        (status, body)
    }};
}

#[actix_web::test]
async fn task_lifecycle_over_http() {
    let app = app!();

    let (status, body) = post!(
        app,
        "/api-tasks/add",
        json!({
            "date": "2024-06-14",
            "task": { "staff_name": "Taro", "task_name": "会議", "start_hour": 9, "end_hour": 11 }
        })
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
    assert_eq!(body["value"]["status"], "not-started");
    assert_eq!(body["value"]["created_by"], "user-1");
    let id = body["value"]["id"].as_str().unwrap().to_string();

    let (status, body) = post!(
        app,
        "/api-tasks/add",
        json!({
            "date": "2024-06-14",
            "task": { "staff_name": "Taro", "task_name": "資料", "start_hour": 10, "end_hour": 12 }
        })
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], true);
    assert_eq!(body["kind"], "validation");
    assert!(body["message"].as_str().unwrap().contains("Taro"));

    let (status, body) = post!(
        app,
        "/api-tasks/cycle-status",
        json!({ "date": "2024-06-14", "id": id })
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["value"]["status"], "progress");

    let (_, body) = post!(
        app,
        "/api-tasks/update-status",
        json!({ "date": "2024-06-14", "id": id, "status": "completed" })
    );
    assert_eq!(body["value"]["status"], "completed");

    let (status, body) = post!(
        app,
        "/api-tasks/update",
        json!({ "date": "2024-06-14", "id": id, "changes": { "end_hour": 12, "wbs_code": "WBS-9" } })
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["value"]["end_hour"], 12);
    assert_eq!(body["value"]["wbs_code"], "WBS-9");

    let (_, body) = post!(app, "/api-tasks/stats", json!({ "date": "2024-06-14" }));
    assert_eq!(body["value"]["total"], 1);
    assert_eq!(body["value"]["completion_rate"], 100);

    let (_, body) = post!(app, "/api-history/working-hours", json!({ "date": "2024-06-14" }));
    assert_eq!(body["value"]["total_hours"], 3);
    assert_eq!(body["value"]["formatted"], "3時間");
    assert_eq!(body["value"]["by_staff"]["Taro"]["hours"], 3);

    let (status, body) = post!(
        app,
        "/api-tasks/delete",
        json!({ "date": "2024-06-14", "id": id })
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["value"]["id"], id.as_str());

    let (_, body) = post!(app, "/api-tasks/list", json!({ "date": "2024-06-14" }));
    assert_eq!(body["value"], json!([]));
}

#[actix_web::test]
async fn unknown_task_is_not_found() {
    let app = app!();
    let (status, body) = post!(
        app,
        "/api-tasks/update",
        json!({ "date": "2024-06-14", "id": "missing", "changes": { "task_name": "x" } })
    );
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["kind"], "not_found");

    // Deleting an unknown task still succeeds.
    let (status, _) = post!(
        app,
        "/api-tasks/delete",
        json!({ "date": "2024-06-14", "id": "missing" })
    );
    assert_eq!(status, StatusCode::OK);
}

#[actix_web::test]
async fn malformed_bodies_get_the_tagged_error() {
    let app = app!();
    let (status, body) = post!(
        app,
        "/api-tasks/add",
        json!({
            "date": "2024-06-14",
            "task": { "staff_name": "Taro", "start_hour": 9, "end_hour": 11 }
        })
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], true);
    assert_eq!(body["kind"], "validation");
    assert!(body["message"].as_str().unwrap().contains("task_name"));

    let (status, body) = post!(app, "/api-tasks/list", json!({ "date": "2024-02-30" }));
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "validation");

    let (_, body) = post!(app, "/api-tasks/list", json!({ "date": "2024-06-14" }));
    assert_eq!(body["value"], json!([]));
}

#[actix_web::test]
async fn invalid_hours_are_rejected() {
    let app = app!();
    for (start, end) in [(7, 9), (12, 11), (21, 23), (10, 10)] {
        let (status, body) = post!(
            app,
            "/api-tasks/add",
            json!({
                "date": "2024-06-14",
                "task": { "staff_name": "Taro", "task_name": "会議", "start_hour": start, "end_hour": end }
            })
        );
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}-{}", start, end);
        assert_eq!(body["kind"], "validation");
    }
}

#[actix_web::test]
async fn staff_and_attendance_drive_the_board() {
    let app = app!();

    let (status, body) = post!(app, "/api-staff/add", json!({ "name": "Taro" }));
    assert_eq!(status, StatusCode::OK);
    let taro_id = body["value"]["id"].as_str().unwrap().to_string();
    post!(app, "/api-staff/add", json!({ "name": "Hanako" }));

    let (status, body) = post!(app, "/api-staff/add", json!({ "name": "Taro" }));
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "validation");

    let (_, body) = post!(app, "/api-staff/list", json!({}));
    assert_eq!(body["value"].as_array().unwrap().len(), 2);

    post!(
        app,
        "/api-tasks/add",
        json!({
            "date": "2024-06-14",
            "task": { "staff_name": "Taro", "task_name": "会議", "start_hour": 9, "end_hour": 10 }
        })
    );

    let (_, body) = post!(
        app,
        "/api-attendance/toggle",
        json!({ "date": "2024-06-14", "staff_name": "Taro" })
    );
    assert_eq!(body["value"]["selected_names"], json!(["Taro"]));

    let (_, body) = post!(app, "/api-tasks/board", json!({ "date": "2024-06-14" }));
    let rows = body["value"]["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["staff_name"], "Taro");
    assert_eq!(rows[0]["working_hours"], 1);
    assert_eq!(rows[0]["starts"][1], true);
    assert_eq!(rows[0]["starts"][2], false);
    assert_eq!(body["value"]["slots"].as_array().unwrap().len(), 14);
    assert_eq!(body["value"]["slots"][0]["label"], "8:00-9:00");

    let (status, _) = post!(app, "/api-staff/delete", json!({ "id": taro_id }));
    assert_eq!(status, StatusCode::OK);

    let (_, body) = post!(app, "/api-tasks/list", json!({ "date": "2024-06-14" }));
    assert_eq!(body["value"], json!([]));
    let (_, body) = post!(app, "/api-attendance/list", json!({ "date": "2024-06-14" }));
    assert_eq!(body["value"]["selected_names"], json!([]));

    let (status, body) = post!(app, "/api-staff/delete", json!({ "id": taro_id }));
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["kind"], "not_found");
}

#[actix_web::test]
async fn provisioning_uses_the_signed_in_user() {
    let app = app!();
    let (status, body) = post!(
        app,
        "/api-staff/provision",
        json!({ "email": "hanako@example.com" })
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["value"]["staff"]["name"], "hanako");
    assert_eq!(body["value"]["staff"]["user_id"], "user-1");

    let (_, body) = post!(app, "/admin/cleanup-staff", json!({}));
    assert_eq!(body["value"]["removed_duplicates"], 0);
    assert_eq!(body["value"]["remaining_staff"], 1);
}

#[actix_web::test]
async fn monthly_history_validates_the_month() {
    let app = app!();
    post!(
        app,
        "/api-tasks/add",
        json!({
            "date": "2024-06-03",
            "task": { "staff_name": "Taro", "task_name": "会議", "start_hour": 9, "end_hour": 12 }
        })
    );

    let (status, body) = post!(
        app,
        "/api-history/monthly",
        json!({ "month": "2024-06", "created_by": "user-1" })
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["value"]["records"][0]["date"], "2024-06-03");
    assert_eq!(body["value"]["stats"]["total_hours"], 3);

    let (_, body) = post!(
        app,
        "/api-history/monthly",
        json!({ "month": "2024-06", "staff_name": "Hanako" })
    );
    assert_eq!(body["value"]["records"], json!([]));
    assert_eq!(body["value"]["stats"], Value::Null);

    let (status, body) = post!(app, "/api-history/monthly", json!({ "month": "2024-13" }));
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "validation");
}
