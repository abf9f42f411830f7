use std::sync::Arc;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use reqwest::StatusCode;
use serde_json::{json, Value};

use shareit_core::{DateTimeFormat, ManualClock};
use shareit_gateway::client::ServerClient;
use shareit_infra::InMemoryStore;

const SHARER: &str = "X-Sharer-User-Id";

/// Server tier plus the gateway in front of it, sharing one manual clock.
struct Stack {
    gateway_url: String,
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl Stack {
    async fn spawn() -> Self {
        let clock = Arc::new(ManualClock::new(t0()));

        let server = shareit_server::app::build_app_with(
            Arc::new(InMemoryStore::new()),
            clock.clone(),
            DateTimeFormat::default(),
        );
        let (server_url, server_handle) = serve(server).await;

        let client = ServerClient::new(server_url).unwrap();
        let gateway = shareit_gateway::app::build_app_with(client, clock, DateTimeFormat::default());
        let (gateway_url, gateway_handle) = serve(gateway).await;

        Self {
            gateway_url,
            handles: vec![server_handle, gateway_handle],
        }
    }

    /// Gateway whose upstream address has nothing listening.
    async fn spawn_without_server() -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let dead = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let client = ServerClient::new(dead).unwrap();
        let clock = Arc::new(ManualClock::new(t0()));
        let gateway = shareit_gateway::app::build_app_with(client, clock, DateTimeFormat::default());
        let (gateway_url, handle) = serve(gateway).await;

        Self {
            gateway_url,
            handles: vec![handle],
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.gateway_url, path)
    }
}

impl Drop for Stack {
    fn drop(&mut self) {
        for handle in &self.handles {
            handle.abort();
        }
    }
}

async fn serve(app: axum::Router) -> (String, tokio::task::JoinHandle<()>) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind ephemeral port");
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{}", addr), handle)
}

fn t0() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2030, 1, 1)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

fn at(minutes: i64) -> String {
    (t0() + Duration::minutes(minutes))
        .format("%Y-%m-%dT%H:%M:%S")
        .to_string()
}

async fn error_of(res: reqwest::Response) -> String {
    let body: Value = res.json().await.unwrap();
    body["error"].as_str().unwrap_or_default().to_string()
}

async fn create_user(client: &reqwest::Client, stack: &Stack, email: &str) -> i64 {
    let res = client
        .post(stack.url("/users"))
        .json(&json!({ "email": email, "name": "Someone" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    body["id"].as_i64().unwrap()
}

async fn create_item(client: &reqwest::Client, stack: &Stack, owner: i64) -> i64 {
    let res = client
        .post(stack.url("/items"))
        .header(SHARER, owner)
        .json(&json!({ "name": "Drill", "description": "Cordless drill", "available": true }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    body["id"].as_i64().unwrap()
}

#[tokio::test]
async fn health_is_answered_without_the_server() {
    let stack = Stack::spawn_without_server().await;
    let res = reqwest::get(stack.url("/health")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn unreachable_server_is_a_bad_gateway() {
    let stack = Stack::spawn_without_server().await;
    let client = reqwest::Client::new();

    let res = client
        .post(stack.url("/users"))
        .json(&json!({ "email": "ann@example.com", "name": "Ann" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
    assert!(error_of(res).await.starts_with("server unavailable"));

    // Rejected at the edge before any forwarding is attempted.
    let res = client
        .post(stack.url("/users"))
        .json(&json!({ "email": "nope", "name": "Ann" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn users_are_checked_then_relayed() {
    let stack = Stack::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(stack.url("/users"))
        .json(&json!({ "email": "not-an-email", "name": "Ann" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let ann = create_user(&client, &stack, "ann@example.com").await;

    // Conflict comes from the server and is passed through untouched.
    let res = client
        .post(stack.url("/users"))
        .json(&json!({ "email": "ann@example.com", "name": "Other" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
    assert_eq!(error_of(res).await, "user with email=ann@example.com already exists");

    let res = client
        .patch(stack.url(&format!("/users/{ann}")))
        .json(&json!({ "name": "   " }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = client
        .patch(stack.url(&format!("/users/{ann}")))
        .json(&json!({ "name": "Annie" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["name"], "Annie");
    assert_eq!(body["email"], "ann@example.com");

    let res = client.delete(stack.url(&format!("/users/{ann}"))).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let res = client.get(stack.url(&format!("/users/{ann}"))).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn item_routes_need_the_sharer_header() {
    let stack = Stack::spawn().await;
    let client = reqwest::Client::new();

    let res = client.get(stack.url("/items")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_of(res).await, "missing X-Sharer-User-Id header");

    let res = client
        .get(stack.url("/requests"))
        .header(SHARER, "abc")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn item_bodies_and_paging_are_validated() {
    let stack = Stack::spawn().await;
    let client = reqwest::Client::new();
    let owner = create_user(&client, &stack, "owner@example.com").await;

    for body in [
        json!({ "name": "Drill", "description": "Cordless" }),
        json!({ "name": " ", "description": "Cordless", "available": true }),
        json!({ "name": "Drill", "available": true }),
    ] {
        let res = client
            .post(stack.url("/items"))
            .header(SHARER, owner)
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "body {body} should be rejected");
    }

    let item = create_item(&client, &stack, owner).await;

    // Query string reaches the server intact.
    let res = client
        .get(stack.url("/items/search?text=DRILL&from=0&size=5"))
        .header(SHARER, owner)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body[0]["id"], item);

    let res = client
        .patch(stack.url(&format!("/items/{item}")))
        .header(SHARER, owner)
        .json(&json!({ "description": "" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = client
        .patch(stack.url(&format!("/items/{item}")))
        .header(SHARER, owner)
        .json(&json!({ "available": false }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["available"], false);
    assert_eq!(body["name"], "Drill");

    for query in ["from=-1", "size=0", "size=ten"] {
        let res = client
            .get(stack.url(&format!("/items?{query}")))
            .header(SHARER, owner)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "query {query} should be rejected");
    }

    let res = client
        .get(stack.url("/items/search"))
        .header(SHARER, owner)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);


    let res = client
        .get(stack.url("/items/search?text=cordless"))
        .header(SHARER, owner)
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body.as_array().unwrap().len(), 0, "unavailable items are not found");
}

#[tokio::test]
async fn booking_dates_and_queries_are_validated() {
    let stack = Stack::spawn().await;
    let client = reqwest::Client::new();
    let owner = create_user(&client, &stack, "owner@example.com").await;
    let booker = create_user(&client, &stack, "booker@example.com").await;
    let item = create_item(&client, &stack, owner).await;

    let rejected = [
        json!({ "start": at(60), "end": at(120) }),
        json!({ "start": at(-1), "end": at(120), "itemId": item }),
        json!({ "start": at(0), "end": at(0), "itemId": item }),
        json!({ "start": "tomorrow", "end": at(120), "itemId": item }),
        json!({ "end": at(120), "itemId": item }),
    ];
    for body in rejected {
        let res = client
            .post(stack.url("/bookings"))
            .header(SHARER, booker)
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "body {body} should be rejected");
    }

    let res = client
        .post(stack.url("/bookings"))
        .header(SHARER, booker)
        .json(&json!({ "start": at(0), "end": at(60), "itemId": item }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let booking: Value = res.json().await.unwrap();
    assert_eq!(booking["status"], "WAITING");
    assert_eq!(booking["item"]["id"], item);
    let id = booking["id"].as_i64().unwrap();

    let res = client
        .patch(stack.url(&format!("/bookings/{id}")))
        .header(SHARER, owner)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = client
        .patch(stack.url(&format!("/bookings/{id}?approved=true")))
        .header(SHARER, owner)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], "APPROVED");

    let res = client
        .get(stack.url("/bookings?state=NOPE"))
        .header(SHARER, booker)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_of(res).await, "Unknown state: NOPE");

    let res = client
        .get(stack.url("/bookings/owner?state=FUTURE"))
        .header(SHARER, owner)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert!(body.as_array().unwrap().is_empty(), "a booking starting now is not future");

    let res = client
        .get(stack.url(&format!("/bookings/{id}")))
        .header(SHARER, booker)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn comments_and_requests_need_text() {
    let stack = Stack::spawn().await;
    let client = reqwest::Client::new();
    let owner = create_user(&client, &stack, "owner@example.com").await;
    let item = create_item(&client, &stack, owner).await;

    let res = client
        .post(stack.url(&format!("/items/{item}/comment")))
        .header(SHARER, owner)
        .json(&json!({ "text": "  " }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = client
        .post(stack.url("/requests"))
        .header(SHARER, owner)
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = client
        .post(stack.url("/requests"))
        .header(SHARER, owner)
        .json(&json!({ "description": "Need a ladder" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["description"], "Need a ladder");
    assert_eq!(body["items"], json!([]));

    let res = client
        .get(stack.url("/requests/all?from=-5"))
        .header(SHARER, owner)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // Upstream 404 keeps its status and body.
    let res = client
        .get(stack.url("/requests/999"))
        .header(SHARER, owner)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(error_of(res).await, "request with id=999 not found");
}
