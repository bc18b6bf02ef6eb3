// ==========================================
// HTTP 接口集成测试（axum Router + tower oneshot）
// ==========================================
// 测试范围:
// 1. 设备 / 部件 / 计划主流程
// 2. 状态码与错误响应体
// 3. SVG 导出与 CSV 导入
// ==========================================

mod helpers;
mod test_helpers;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use test_helpers::TestEnv;
use tower::ServiceExt;
use wcm_ledger::app::http::router;

fn app(env: &TestEnv) -> Router {
    router(env.state.clone())
}

fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn empty_request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, bytes.to_vec())
}

async fn send_json(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let (status, bytes) = send(app, request).await;
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

/// 建设备 A1 + 一个 6M 部件，返回部件 id
async fn seed(app: &Router) -> String {
    let (status, _) = send_json(
        app,
        json_request(
            Method::POST,
            "/assets",
            json!({"id": "A1", "assetNumber": "CNC-001", "name": "CNC Mill"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, part) = send_json(
        app,
        json_request(
            Method::POST,
            "/assets/A1/parts",
            json!({
                "partNumber": "SEAL-001",
                "partName": "Seal",
                "componentClassification": "Critical",
                "frequencyPM": "6M"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(part["assetId"], "A1");
    part["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_http_health() {
    let env = TestEnv::new().unwrap();
    let (status, body) = send_json(&app(&env), empty_request(Method::GET, "/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "up");
}

#[tokio::test]
async fn test_http_生成与查询计划() {
    let env = TestEnv::new().unwrap();
    let app = app(&env);
    let part_id = seed(&app).await;

    let (status, result) = send_json(
        &app,
        json_request(
            Method::POST,
            "/maintenance-schedule/generate",
            json!({
                "assetId": "A1",
                "year": 2026,
                "parts": [{"assetPartId": part_id, "partNumber": "SEAL-001", "frequencyPM": "6M"}]
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["tasksCreated"], 2);

    let (status, rows) = send_json(
        &app,
        empty_request(Method::GET, "/maintenance-schedule/A1?year=2026"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["weekNumber"], 1);
    assert_eq!(rows[1]["weekNumber"], 27);
    assert_eq!(rows[1]["maintenanceType"], "PM");
}

#[tokio::test]
async fn test_http_切换与删除任务() {
    let env = TestEnv::new().unwrap();
    let app = app(&env);
    let part_id = seed(&app).await;

    let (status, task) = send_json(
        &app,
        json_request(
            Method::POST,
            "/maintenance-schedule/manual",
            json!({
                "assetId": "A1",
                "assetPartId": part_id,
                "weekNumber": 30,
                "year": 2026,
                "maintenanceType": "QM"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(task["status"], "planned");
    let id = task["id"].as_str().unwrap().to_string();

    let (status, toggled) = send_json(
        &app,
        json_request(
            Method::POST,
            &format!("/maintenance-schedule/{}/toggle", id),
            json!({"completedDate": "2026-07-24"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(toggled["status"], "completed");
    assert_eq!(toggled["completedDate"], "2026-07-24");

    // 无请求体 → 撤销
    let (status, toggled) = send_json(
        &app,
        empty_request(Method::POST, &format!("/maintenance-schedule/{}/toggle", id)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(toggled["status"], "planned");
    assert_eq!(toggled["completedDate"], Value::Null);

    let (status, _) = send(
        &app,
        empty_request(Method::DELETE, &format!("/maintenance-schedule/{}", id)),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send_json(
        &app,
        empty_request(Method::DELETE, &format!("/maintenance-schedule/{}", id)),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_http_逾期任务切换返回409() {
    let env = TestEnv::new().unwrap();
    let app = app(&env);
    let part_id = seed(&app).await;

    let (_, task) = send_json(
        &app,
        json_request(
            Method::POST,
            "/maintenance-schedule/manual",
            json!({
                "assetId": "A1",
                "assetPartId": part_id,
                "weekNumber": 2,
                "year": 2026,
                "maintenanceType": "PM",
                "status": "overdue"
            }),
        ),
    )
    .await;
    let id = task["id"].as_str().unwrap();

    let (status, body) = send_json(
        &app,
        empty_request(Method::POST, &format!("/maintenance-schedule/{}/toggle", id)),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "INVALID_STATE_TRANSITION");
    assert_eq!(body["details"]["from"], "overdue");
}

#[tokio::test]
async fn test_http_部件修改与删除() {
    let env = TestEnv::new().unwrap();
    let app = app(&env);
    let part_id = seed(&app).await;

    let (status, part) = send_json(
        &app,
        json_request(
            Method::PATCH,
            &format!("/assets/parts/{}", part_id),
            json!({"smpNumber": "42"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(part["smpNumber"], 42);

    let (status, body) = send_json(
        &app,
        empty_request(
            Method::DELETE,
            &format!("/assets/parts/{}?schedules=sometimes", part_id),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_INPUT");

    let (status, body) = send_json(
        &app,
        empty_request(
            Method::DELETE,
            &format!("/assets/parts/{}?schedules=cascade", part_id),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["policy"], "CASCADE");

    let (status, parts) = send_json(&app, empty_request(Method::GET, "/assets/A1/parts")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(parts.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_http_设备不存在() {
    let env = TestEnv::new().unwrap();
    let app = app(&env);

    let (status, body) = send_json(&app, empty_request(Method::GET, "/assets/NOPE")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");

    let (status, _) = send_json(
        &app,
        empty_request(Method::GET, "/maintenance-schedule/NOPE/ledger?year=2026"),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_http_台账与svg() {
    let env = TestEnv::new().unwrap();
    let app = app(&env);
    seed(&app).await;

    let (status, grid) = send_json(
        &app,
        empty_request(
            Method::GET,
            "/maintenance-schedule/A1/ledger?year=2026&week=1&locale=zh-CN",
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(grid["year"], 2026);
    assert_eq!(grid["selectedWeek"], 1);
    assert_eq!(grid["rows"][0]["badge"]["label"], "A");
    assert_eq!(grid["legend"]["title"], "图例");

    let response = app
        .clone()
        .oneshot(empty_request(
            Method::GET,
            "/maintenance-schedule/A1/ledger.svg?year=2026",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "image/svg+xml"
    );
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert!(String::from_utf8(bytes.to_vec()).unwrap().starts_with("<svg"));
}

#[tokio::test]
async fn test_http_csv导入() {
    let env = TestEnv::new().unwrap();
    let app = app(&env);
    seed(&app).await;

    let csv = "partNumber,partName,componentClassification,frequencyPM\n\
               SEAL-001,Seal v2,Critical,3M\n\
               BRG-002,Bearing,Standard,12M\n\
               ,No number,C,\n";
    let request = Request::builder()
        .method(Method::POST)
        .uri("/assets/A1/parts/import")
        .header(header::CONTENT_TYPE, "text/csv")
        .body(Body::from(csv))
        .unwrap();
    let (status, result) = send_json(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["success"], 2);
    assert_eq!(result["failed"], 1);

    let (_, parts) = send_json(&app, empty_request(Method::GET, "/assets/A1/parts")).await;
    let parts = parts.as_array().unwrap();
    assert_eq!(parts.len(), 2);
    let seal = parts.iter().find(|p| p["partNumber"] == "SEAL-001").unwrap();
    assert_eq!(seal["partName"], "Seal v2");
    assert_eq!(seal["frequencyPM"], "3M");
}

#[tokio::test]
async fn test_http_设备编号重复() {
    let env = TestEnv::new().unwrap();
    let app = app(&env);
    seed(&app).await;

    let (status, body) = send_json(
        &app,
        json_request(
            Method::POST,
            "/assets",
            json!({"assetNumber": "CNC-001", "name": "Again"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");
}
