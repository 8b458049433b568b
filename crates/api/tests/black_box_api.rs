use std::sync::Arc;

use reqwest::StatusCode;
use serde_json::{json, Value};

use stockroom_api::app::{build_app, AppServices};
use stockroom_infra::store::InMemoryInventoryStore;

struct TestServer {
    base_url: String,
    client: reqwest::Client,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod, backed by a fresh in-memory store on an ephemeral port.
        let app = build_app(AppServices::new(Arc::new(InMemoryInventoryStore::new())));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            client: reqwest::Client::new(),
            handle,
        }
    }

    async fn get(&self, path: &str) -> (StatusCode, Value) {
        let res = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await
            .unwrap();
        let status = res.status();
        (status, res.json().await.unwrap_or(Value::Null))
    }

    async fn post(&self, path: &str, body: Value) -> (StatusCode, Value) {
        let res = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .json(&body)
            .send()
            .await
            .unwrap();
        let status = res.status();
        (status, res.json().await.unwrap_or(Value::Null))
    }

    async fn put(&self, path: &str, body: Value) -> (StatusCode, Value) {
        let res = self
            .client
            .put(format!("{}{}", self.base_url, path))
            .json(&body)
            .send()
            .await
            .unwrap();
        let status = res.status();
        (status, res.json().await.unwrap_or(Value::Null))
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn cell<'a>(report: &'a Value, product: &str, location: &str) -> &'a Value {
    report["rows"]
        .as_array()
        .unwrap()
        .iter()
        .find(|r| r["product_id"] == product && r["location_id"] == location)
        .unwrap_or_else(|| panic!("no row for {product}/{location}"))
}

#[tokio::test]
async fn health_and_request_id() {
    let srv = TestServer::spawn().await;

    let res = srv
        .client
        .get(format!("{}/health", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key("x-request-id"));

    let res = srv
        .client
        .get(format!("{}/health", srv.base_url))
        .header("x-request-id", "trace-me")
        .send()
        .await
        .unwrap();
    assert_eq!(res.headers()["x-request-id"], "trace-me");
}

#[tokio::test]
async fn product_lifecycle_create_edit_get() {
    let srv = TestServer::spawn().await;

    let (status, body) = srv
        .post(
            "/products",
            json!({
                "product_id": "  P1 ",
                "name": " Widget ",
                "description": "",
                "image_url": "   "
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["product_id"], "P1");
    assert_eq!(body["name"], "Widget");
    assert_eq!(body["description"], Value::Null);
    assert_eq!(body["image_url"], Value::Null);

    let (status, body) = srv
        .post("/products", json!({ "product_id": "P1", "name": "Again" }))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "conflict");

    let (status, body) = srv
        .put(
            "/products/P1",
            json!({ "name": "Widget v2", "image_url": "https://img.example/p1.png" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Widget v2");

    let (status, body) = srv.get("/products/P1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["image_url"], "https://img.example/p1.png");

    let (status, body) = srv.get("/products/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");

    let (status, _) = srv.put("/products/nope", json!({ "name": "x" })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn blank_required_fields_are_rejected() {
    let srv = TestServer::spawn().await;

    let (status, body) = srv
        .post("/products", json!({ "product_id": "P1", "name": "   " }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");

    let (status, _) = srv
        .post("/locations", json!({ "location_id": " ", "name": "Main" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = srv.get("/products").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn movement_validation() {
    let srv = TestServer::spawn().await;
    srv.post("/products", json!({ "product_id": "P1", "name": "Widget" }))
        .await;

    let (status, body) = srv
        .post(
            "/movements",
            json!({ "movement_id": "M1", "product_id": "P-unknown", "to_location": "L1", "qty": 5 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("not a valid choice"));

    let (status, _) = srv
        .post(
            "/movements",
            json!({ "movement_id": "M1", "product_id": "P1", "to_location": "L1", "qty": 0 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = srv
        .post(
            "/movements",
            json!({
                "movement_id": "M1",
                "product_id": "P1",
                "from_location": "",
                "to_location": "L1",
                "qty": 5,
                "timestamp": "not-a-date"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["from_location"], Value::Null);
    assert_eq!(body["kind"], "inbound");
    assert!(body["timestamp"].is_string());

    let (status, _) = srv
        .post(
            "/movements",
            json!({ "movement_id": "M1", "product_id": "P1", "to_location": "L1", "qty": 1 }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = srv.get("/movements/M1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["qty"], 5);
}

#[tokio::test]
async fn movements_list_newest_first() {
    let srv = TestServer::spawn().await;
    srv.post("/products", json!({ "product_id": "P1", "name": "Widget" }))
        .await;

    for (id, ts) in [
        ("M-mid", "2024-02-01 10:00"),
        ("M-old", "2024-01-01"),
        ("M-new", "2024-03-01T08:15:00Z"),
    ] {
        let (status, _) = srv
            .post(
                "/movements",
                json!({ "movement_id": id, "product_id": "P1", "to_location": "L1", "qty": 1, "timestamp": ts }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, body) = srv.get("/movements").await;
    let ids: Vec<&str> = body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["movement_id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, ["M-new", "M-mid", "M-old"]);
}

#[tokio::test]
async fn report_reflects_movements() {
    let srv = TestServer::spawn().await;

    for (id, name) in [("P1", "Widget"), ("P2", "Gadget")] {
        srv.post("/products", json!({ "product_id": id, "name": name }))
            .await;
    }
    for (id, name) in [("L1", "Main"), ("L2", "Overflow")] {
        srv.post("/locations", json!({ "location_id": id, "name": name }))
            .await;
    }

    let movements = [
        json!({ "movement_id": "M1", "product_id": "P1", "to_location": "L1", "qty": 10 }),
        json!({ "movement_id": "M2", "product_id": "P1", "from_location": "L1", "to_location": "L2", "qty": 4 }),
        json!({ "movement_id": "M3", "product_id": "P1", "from_location": "L2", "qty": 1 }),
        // Unknown destination: only the source side counts.
        json!({ "movement_id": "M4", "product_id": "P1", "from_location": "L1", "to_location": "L9", "qty": 2 }),
        // Neither side: recorded, affects nothing.
        json!({ "movement_id": "M5", "product_id": "P2", "qty": 7 }),
    ];
    for m in movements {
        let (status, _) = srv.post("/movements", m).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, report) = srv.get("/report").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["count"], 4);

    assert_eq!(cell(&report, "P1", "L1")["qty"], 4);
    assert_eq!(cell(&report, "P1", "L2")["qty"], 3);
    assert_eq!(cell(&report, "P2", "L1")["qty"], 0);
    assert_eq!(cell(&report, "P2", "L2")["qty"], 0);
    assert_eq!(cell(&report, "P1", "L1")["product_name"], "Widget");
    assert_eq!(cell(&report, "P1", "L2")["location_name"], "Overflow");

    // Rows come back sorted by (product, location).
    let keys: Vec<(String, String)> = report["rows"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| {
            (
                r["product_id"].as_str().unwrap().to_string(),
                r["location_id"].as_str().unwrap().to_string(),
            )
        })
        .collect();
    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted);
}

#[tokio::test]
async fn location_edit() {
    let srv = TestServer::spawn().await;
    let (status, _) = srv
        .post(
            "/locations",
            json!({ "location_id": "L1", "name": "Main", "address": "1 Dock Rd" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = srv
        .put("/locations/L1", json!({ "name": "Main hall", "address": "" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Main hall");
    assert_eq!(body["address"], Value::Null);

    let (_, body) = srv.get("/locations").await;
    assert_eq!(body["items"][0]["location_id"], "L1");
}

#[tokio::test]
async fn report_survives_extreme_quantities() {
    let srv = TestServer::spawn().await;
    srv.post("/products", json!({ "product_id": "P1", "name": "Widget" }))
        .await;
    srv.post("/locations", json!({ "location_id": "L1", "name": "Main" }))
        .await;

    for id in ["M1", "M2"] {
        let (status, _) = srv
            .post(
                "/movements",
                json!({ "movement_id": id, "product_id": "P1", "to_location": "L1", "qty": i64::MAX }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, report) = srv.get("/report").await;
    assert_eq!(status, StatusCode::OK);
    // 2 * i64::MAX still fits in a u64 on the wire.
    assert_eq!(cell(&report, "P1", "L1")["qty"], 2 * (i64::MAX as u64));
}
