use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use jsonwebtoken::{encode, EncodingKey, Header};
use kaite_api::{app, middleware::AdminClaims, AppState};
use kaite_store::Config;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

const ADMIN_SECRET: &str = "test-admin-secret";

fn test_config() -> Config {
    let mut config = Config::default();
    config.auth.jwt_secret = ADMIN_SECRET.into();
    config
}

fn test_app() -> Router {
    let state = AppState::from_config(&test_config()).unwrap();
    app(state)
}

fn seeded(n: u128) -> Uuid {
    Uuid::from_u128(0x6b61_6974_0000 + n)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn booking(trip_id: Uuid, group_size: usize, email: &str) -> Value {
    let names: Vec<String> = (1..=group_size).map(|i| format!("Guest {}", i)).collect();
    json!({
        "trip_id": trip_id,
        "group_size": group_size,
        "guest_names": names,
        "lead_email": email,
        "lead_phone": "+39 333 1234567"
    })
}

#[tokio::test]
async fn test_health() {
    let app = test_app();
    let (status, body) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["trips"], 8);
}

#[tokio::test]
async fn test_trip_listing_and_lookup() {
    let app = test_app();

    let (status, body) = send(&app, get("/api/trips")).await;
    assert_eq!(status, StatusCode::OK);
    let trips = body.as_array().unwrap();
    assert_eq!(trips.len(), 8);
    let sold_out = trips.iter().find(|t| t["id"] == seeded(4).to_string()).unwrap();
    assert_eq!(sold_out["status"], "soldout");
    let last_spot = trips.iter().find(|t| t["id"] == seeded(2).to_string()).unwrap();
    assert_eq!(last_spot["status"], "low");

    let (_, body) = send(&app, get("/api/trips?destination=Greece")).await;
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (status, _) = send(&app, get("/api/trips?destination=atlantis")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        get("/api/trips/find?destination=caribbean&start_date=2027-01-09&end_date=2027-01-16"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], seeded(1).to_string());
    assert_eq!(body["nights"], 7);

    let (status, _) = send(
        &app,
        get("/api/trips/find?destination=caribbean&start_date=2027-01-10&end_date=2027-01-16"),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, get(&format!("/api/trips/{}", seeded(3)))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["discount_percentage"], 15);
    assert_eq!(body["discounted_price_minor"], 143_650);

    let (status, _) = send(&app, get(&format!("/api/trips/{}", Uuid::new_v4()))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_quote() {
    let app = test_app();
    let (status, body) = send(
        &app,
        post("/api/bookings/quote", json!({ "trip_id": seeded(3), "group_size": 2 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    // 1900.00 x 7 nights, 15% trip discount, no group tier
    assert_eq!(body["subtotal"], 1_330_000);
    assert_eq!(body["total"], 1_130_500);
    assert_eq!(body["line_items"].as_array().unwrap().len(), 2);

    let (status, _) = send(
        &app,
        post("/api/bookings/quote", json!({ "trip_id": seeded(3), "group_size": 9 })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_booking_flow() {
    let app = test_app();

    let (status, body) = send(&app, post("/api/bookings", booking(seeded(1), 4, "lead@example.com"))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["booking"]["party_size"], 4);
    assert_eq!(body["trip"]["available_spots"], 0);
    // 2700.00 x 7 nights - 10% group tier
    assert_eq!(body["pricing"]["total"], 1_701_000);

    let (status, _) = send(&app, post("/api/bookings", booking(seeded(1), 1, "lead@example.com"))).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = send(&app, post("/api/bookings", booking(seeded(2), 2, "lead@example.com"))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "insufficient_availability");

    let (status, body) = send(&app, post("/api/bookings", booking(seeded(3), 2, "not-an-email"))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["fields"]["lead_email"].is_array());

    let (status, body) = send(&app, post("/api/bookings", booking(Uuid::new_v4(), 2, "lead@example.com"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");
}

#[tokio::test]
async fn test_chat_session() {
    let app = test_app();

    let (status, body) = send(&app, post("/api/chat", json!({ "message": "Show me beginner spots" }))).await;
    assert_eq!(status, StatusCode::OK);
    let message = &body["message"];
    assert_eq!(message["role"], "assistant");
    assert_eq!(message["metadata"]["intent"], "beginner");
    assert!(!message["metadata"]["recommendations"].as_array().unwrap().is_empty());

    let session_id = body["session_id"].as_str().unwrap().to_string();
    let (_, body) = send(
        &app,
        post("/api/chat", json!({ "session_id": session_id, "message": "" })),
    )
    .await;
    assert_eq!(body["session_id"], session_id.as_str());
    assert_eq!(body["message"]["metadata"]["intent"], "general");

    let (status, body) = send(&app, get(&format!("/api/chat/{}", session_id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["messages"].as_array().unwrap().len(), 4);

    let (status, _) = send(&app, get(&format!("/api/chat/{}", Uuid::new_v4()))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_chat_stores_clipped_message() {
    let app = test_app();
    let long = "wave ".repeat(2_000);

    let (status, body) = send(&app, post("/api/chat", json!({ "message": long }))).await;
    assert_eq!(status, StatusCode::OK);
    let session_id = body["session_id"].as_str().unwrap().to_string();

    let (_, body) = send(&app, get(&format!("/api/chat/{}", session_id))).await;
    let stored = body["messages"][0]["content"].as_str().unwrap();
    assert_eq!(stored.chars().count(), 500);
}

#[test]
fn test_startup_requires_jwt_secret() {
    assert!(AppState::from_config(&Config::default()).is_err());

    let mut config = test_config();
    config.auth.jwt_secret = "  ".into();
    assert!(AppState::from_config(&config).is_err());
}

#[tokio::test]
async fn test_contact_and_leads() {
    let app = test_app();

    let (status, body) = send(
        &app,
        post(
            "/api/contact",
            json!({ "firstName": "Marta", "lastName": "Rossi", "email": "marta@example.com", "message": "Hi" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["fields"]["message"].is_array());

    let (status, body) = send(
        &app,
        post(
            "/api/contact",
            json!({
                "firstName": "Marta",
                "lastName": "Rossi",
                "email": "marta@example.com",
                "message": "Is the June trip good for beginners?"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true }));

    let (status, body) = send(&app, post("/api/leads", json!({ "email": "rider@example.com" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn test_shop_products() {
    let app = test_app();

    let (status, body) = send(&app, get("/api/shop/products")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["products"].as_array().unwrap().len(), 4);

    let (_, body) = send(&app, get("/api/shop/products?category=gear")).await;
    assert!(body["products"].as_array().unwrap().iter().all(|p| p["category"] == "gear"));

    let (status, body) = send(&app, get("/api/shop/products/logo-cap")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], "logo-cap");
    let (status, _) = send(&app, get("/api/shop/products/surfboard")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, get("/api/shop/products?category=boats")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_admin_requires_token() {
    let app = test_app();

    let (status, _) = send(&app, get("/api/admin/bookings")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let claims = AdminClaims {
        sub: "ops".into(),
        email: "ops@example.com".into(),
        role: "ADMIN".into(),
        exp: (chrono::Utc::now().timestamp() + 3600) as usize,
    };
    let token = encode(&Header::default(), &claims, &EncodingKey::from_secret(ADMIN_SECRET.as_bytes())).unwrap();

    send(&app, post("/api/bookings", booking(seeded(5), 2, "lead@example.com"))).await;

    let req = Request::builder()
        .uri("/api/admin/bookings")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    assert_eq!(body["bookings"][0]["lead_email"], "l***@example.com");
    assert_eq!(body["bookings"][0]["lead_phone"], "***67");

    let wrong = encode(&Header::default(), &claims, &EncodingKey::from_secret(b"other")).unwrap();
    let req = Request::builder()
        .uri("/api/admin/bookings")
        .header(header::AUTHORIZATION, format!("Bearer {}", wrong))
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_event_stream_opens() {
    let app = test_app();
    let response = app.oneshot(get("/api/trips/stream")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/event-stream");
}
