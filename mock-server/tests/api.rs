use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, COUNTRIES, DEFAULT_API_KEY, SITES};
use serde_json::{json, Value};
use tower::ServiceExt;

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

/// Offset of `"key":` in a raw body; used to check key order, which a parsed
/// `Value` would not keep.
fn key_pos(text: &str, key: &str) -> usize {
    text.find(&format!("\"{key}\":"))
        .unwrap_or_else(|| panic!("key {key} missing in {text}"))
}

fn get_request(uri: &str) -> Request<String> {
    Request::builder()
        .uri(uri)
        .header("X-API-KEY", DEFAULT_API_KEY)
        .body(String::new())
        .unwrap()
}

/// Form-encoded POST, the way the client sends writes.
fn form_request(uri: &str, fields: &[(&str, String)]) -> Request<String> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("X-API-KEY", DEFAULT_API_KEY)
        .header(http::header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(serde_html_form::to_string(fields).unwrap())
        .unwrap()
}

// --- auth ---

#[tokio::test]
async fn missing_api_key_is_forbidden() {
    let resp = app(DEFAULT_API_KEY)
        .oneshot(
            Request::builder()
                .uri("/api/v5/reference/sites")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body = body_json(resp).await;
    assert_eq!(body["success"], false);
    assert!(body["errorMsg"].as_str().unwrap().contains("apiKey"));
}

#[tokio::test]
async fn wrong_api_key_is_forbidden() {
    let resp = app("other-key")
        .oneshot(get_request("/api/credentials"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

// --- reference ---

#[tokio::test]
async fn sites_are_keyed_by_code() {
    let resp = app(DEFAULT_API_KEY)
        .oneshot(get_request("/api/v5/reference/sites"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["sites"]["main"]["name"], "Main store");
}

#[tokio::test]
async fn sites_keep_declaration_order() {
    let resp = app(DEFAULT_API_KEY)
        .oneshot(get_request("/api/v5/reference/sites"))
        .await
        .unwrap();
    let text = String::from_utf8(body_bytes(resp).await.to_vec()).unwrap();
    let positions: Vec<usize> = SITES.iter().map(|code| key_pos(&text, code)).collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]), "{text}");
}

#[tokio::test]
async fn countries_are_keyed_by_index_in_order() {
    let resp = app(DEFAULT_API_KEY)
        .oneshot(get_request("/api/v5/reference/countries"))
        .await
        .unwrap();
    let text = String::from_utf8(body_bytes(resp).await.to_vec()).unwrap();
    // "10" must follow "9", not "1".
    assert!(key_pos(&text, "9") < key_pos(&text, "10"), "{text}");
    assert!(key_pos(&text, "2") < key_pos(&text, "10"), "{text}");
    let body: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(body["countriesIso"]["10"], COUNTRIES[10]);
}

#[tokio::test]
async fn units_are_a_list() {
    let resp = app(DEFAULT_API_KEY)
        .oneshot(get_request("/api/v5/reference/units"))
        .await
        .unwrap();
    let body = body_json(resp).await;
    assert!(body["units"].is_array());
}

#[tokio::test]
async fn unknown_route_is_404() {
    let resp = app(DEFAULT_API_KEY)
        .oneshot(get_request("/api/v5/reference/nope"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- delivery types ---

#[tokio::test]
async fn delivery_type_without_name_is_rejected() {
    let resp = app(DEFAULT_API_KEY)
        .oneshot(form_request(
            "/api/v5/reference/delivery-types/c1/edit",
            &[("deliveryType", r#"{"defaultCost":100}"#.to_string())],
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_json(resp).await;
    assert_eq!(body["errors"]["name"], "This value should not be blank.");
}

#[tokio::test]
async fn delivery_type_missing_field_is_rejected() {
    let resp = app(DEFAULT_API_KEY)
        .oneshot(form_request(
            "/api/v5/reference/delivery-types/c1/edit",
            &[("somethingElse", "{}".to_string())],
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- integration modules ---

#[tokio::test]
async fn integration_module_not_found() {
    let resp = app(DEFAULT_API_KEY)
        .oneshot(get_request("/api/v5/integration-modules/missing"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(resp).await["errorMsg"], "Not found");
}

#[tokio::test]
async fn new_integration_module_needs_integration_code() {
    let resp = app(DEFAULT_API_KEY)
        .oneshot(form_request(
            "/api/v5/integration-modules/m1/edit",
            &[("integrationModule", r#"{"active":true}"#.to_string())],
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- orders ---

#[tokio::test]
async fn order_for_unknown_site_is_rejected() {
    let resp = app(DEFAULT_API_KEY)
        .oneshot(form_request(
            "/api/v5/orders/create",
            &[("site", "nowhere".to_string()), ("order", "{}".to_string())],
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_json(resp).await;
    assert_eq!(body["errorMsg"], "Order is not loaded");
    assert!(body["errors"]["site"].as_str().unwrap().contains("nowhere"));
}

#[tokio::test]
async fn bad_lookup_discriminator_is_rejected() {
    let resp = app(DEFAULT_API_KEY)
        .oneshot(get_request("/api/v5/orders/1?by=number"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- full lifecycle ---

#[tokio::test]
async fn order_and_delivery_type_lifecycle() {
    use tower::Service;

    let mut app = app(DEFAULT_API_KEY).into_service();

    // create a delivery type
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(form_request(
            "/api/v5/reference/delivery-types/c1/edit",
            &[(
                "deliveryType",
                json!({"code": "c1", "name": "Courier", "defaultCost": 100, "defaultNetCost": 80}).to_string(),
            )],
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    assert_eq!(body_json(resp).await, json!({"success": true}));

    // edit it partially
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(form_request(
            "/api/v5/reference/delivery-types/c1/edit",
            &[("deliveryType", json!({"name": "Courier", "active": false}).to_string())],
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    // list shows merged record next to the seeded one
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get_request("/api/v5/reference/delivery-types"))
        .await
        .unwrap();
    let text = String::from_utf8(body_bytes(resp).await.to_vec()).unwrap();
    // Seeded record first, new one appended after it.
    assert!(key_pos(&text, "courier") < key_pos(&text, "c1"), "{text}");
    let body: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(body["deliveryTypes"]["c1"]["defaultCost"], 100);
    assert_eq!(body["deliveryTypes"]["c1"]["active"], false);
    assert_eq!(body["deliveryTypes"]["courier"]["name"], "Courier");

    // create an order with two payments
    let order = json!({
        "externalId": "ext-1",
        "firstName": "Ann",
        "payments": [{"type": "cash", "amount": 100}, {"type": "card", "amount": 50}]
    });
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(form_request(
            "/api/v5/orders/create",
            &[("site", "main".to_string()), ("order", order.to_string())],
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body = body_json(resp).await;
    assert_eq!(body["id"], 1);
    assert_eq!(body["order"]["number"], "1A");
    assert_eq!(body["order"]["payments"]["2"]["type"], "card");

    // duplicate external id on the same site
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(form_request(
            "/api/v5/orders/create",
            &[("site", "main".to_string()), ("order", order.to_string())],
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // fetch by external id, then by internal id
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get_request("/api/v5/orders/ext-1?by=externalId&site=main"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["order"]["firstName"], "Ann");

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get_request("/api/v5/orders/1?by=id"))
        .await
        .unwrap();
    assert_eq!(body_json(resp).await["order"]["externalId"], "ext-1");

    // wrong site filter hides it
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get_request("/api/v5/orders/ext-1?by=externalId&site=outlet"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body = body_bytes(resp).await;
    assert!(!body.is_empty());
}
