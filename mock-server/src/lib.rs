//! In-memory stand-in for the CRM API.
//!
//! Speaks the same wire format as the real service: every body is a
//! `{ "success": ... }` envelope, reference collections come back as objects
//! keyed by code, writes are `application/x-www-form-urlencoded` with a JSON
//! document in one field, and every request must carry `X-API-KEY`.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};

pub const DEFAULT_API_KEY: &str = "test-key";

/// Sites orders may be created for, in the order `reference/sites` lists them.
pub const SITES: [&str; 3] = ["main", "outlet", "b2b"];

/// Contents of `reference/countries`, keyed by index on the wire.
pub const COUNTRIES: [&str; 11] = ["RU", "BY", "KZ", "UA", "AM", "AZ", "GE", "KG", "MD", "TJ", "UZ"];

type Reply = (StatusCode, Json<Value>);

/// Records keyed by code, serialized as an object in insertion order.
///
/// The real API does not sort its keyed collections, so neither does the
/// mock; `serde_json::Map` would.
#[derive(Debug, Default, Clone, PartialEq)]
struct Keyed(Vec<(String, Value)>);

impl Keyed {
    fn get(&self, code: &str) -> Option<&Value> {
        self.0.iter().find(|(k, _)| k == code).map(|(_, v)| v)
    }

    /// Insert or merge `fields` into the record `code`; returns whether it was new.
    fn upsert(&mut self, code: &str, mut fields: Map<String, Value>) -> bool {
        fields.insert("code".to_string(), Value::String(code.to_string()));
        match self.0.iter_mut().find(|(k, _)| k == code) {
            Some((_, Value::Object(existing))) => {
                existing.extend(fields);
                false
            }
            Some((_, other)) => {
                *other = Value::Object(fields);
                false
            }
            None => {
                self.0.push((code.to_string(), Value::Object(fields)));
                true
            }
        }
    }
}

impl<'a, const N: usize> From<[(&'a str, Value); N]> for Keyed {
    fn from(entries: [(&'a str, Value); N]) -> Self {
        Keyed(entries.into_iter().map(|(k, v)| (k.to_string(), v)).collect())
    }
}

impl Serialize for Keyed {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(k, v)| (k, v)))
    }
}

#[derive(Default)]
struct Db {
    delivery_types: Keyed,
    delivery_services: Keyed,
    integration_modules: Keyed,
    orders: Vec<Value>,
    next_order_id: i64,
    next_payment_id: i64,
}

struct AppState {
    api_key: String,
    db: RwLock<Db>,
}

type Shared = Arc<AppState>;

pub fn app(api_key: &str) -> Router {
    let state: Shared = Arc::new(AppState {
        api_key: api_key.to_string(),
        db: RwLock::new(seed()),
    });
    Router::new()
        .route("/api/api-versions", get(api_versions))
        .route("/api/credentials", get(credentials))
        .route("/api/v5/reference/sites", get(sites))
        .route("/api/v5/reference/units", get(units))
        .route("/api/v5/reference/countries", get(countries))
        .route("/api/v5/reference/status-groups", get(status_groups))
        .route("/api/v5/reference/statuses", get(statuses))
        .route("/api/v5/reference/order-types", get(order_types))
        .route("/api/v5/reference/payment-types", get(payment_types))
        .route("/api/v5/reference/payment-statuses", get(payment_statuses))
        .route("/api/v5/reference/product-statuses", get(product_statuses))
        .route("/api/v5/reference/stores", get(stores))
        .route("/api/v5/reference/delivery-services", get(delivery_services))
        .route(
            "/api/v5/reference/delivery-services/{code}/edit",
            post(edit_delivery_service),
        )
        .route("/api/v5/reference/delivery-types", get(delivery_types))
        .route(
            "/api/v5/reference/delivery-types/{code}/edit",
            post(edit_delivery_type),
        )
        .route("/api/v5/integration-modules/{code}", get(get_integration_module))
        .route(
            "/api/v5/integration-modules/{code}/edit",
            post(edit_integration_module),
        )
        .route("/api/v5/orders/create", post(create_order))
        .route("/api/v5/orders/{id}", get(get_order))
        .layer(middleware::from_fn_with_state(state.clone(), require_api_key))
        .with_state(state)
}

pub async fn run(listener: TcpListener, api_key: &str) -> Result<(), std::io::Error> {
    axum::serve(listener, app(api_key)).await
}

fn seed() -> Db {
    let mut db = Db {
        next_order_id: 1,
        next_payment_id: 1,
        ..Db::default()
    };
    db.delivery_types.0.push((
        "courier".to_string(),
        json!({
            "code": "courier",
            "name": "Courier",
            "active": true,
            "defaultCost": 300,
            "defaultNetCost": 150,
            "paymentTypes": ["cash"],
            "deliveryServices": [],
            "defaultForCrm": false
        }),
    ));
    db.delivery_services.0.push((
        "express".to_string(),
        json!({"code": "express", "name": "Express", "active": true}),
    ));
    db
}

fn ok(payload: Value) -> Reply {
    ok_with(StatusCode::OK, payload)
}

fn ok_with(status: StatusCode, payload: Value) -> Reply {
    let mut body = Map::new();
    body.insert("success".to_string(), Value::Bool(true));
    if let Value::Object(fields) = payload {
        body.extend(fields);
    }
    (status, Json(Value::Object(body)))
}

fn failure(status: StatusCode, message: &str) -> Reply {
    (status, Json(json!({"success": false, "errorMsg": message})))
}

fn failure_with(status: StatusCode, message: &str, errors: Value) -> Reply {
    (
        status,
        Json(json!({"success": false, "errorMsg": message, "errors": errors})),
    )
}

async fn require_api_key(State(state): State<Shared>, request: Request, next: Next) -> Response {
    let presented = request
        .headers()
        .get("x-api-key")
        .and_then(|v| v.to_str().ok());
    if presented != Some(state.api_key.as_str()) {
        tracing::debug!(path = %request.uri().path(), "rejected api key");
        return failure(StatusCode::FORBIDDEN, "Wrong \"apiKey\" value.").into_response();
    }
    next.run(request).await
}

/// Pull a JSON document out of a form field.
fn json_field(form: &HashMap<String, String>, name: &str) -> Result<Map<String, Value>, Reply> {
    let raw = form.get(name).ok_or_else(|| {
        failure(
            StatusCode::BAD_REQUEST,
            &format!("Parameter '{name}' is missing"),
        )
    })?;
    match serde_json::from_str(raw) {
        Ok(Value::Object(fields)) => Ok(fields),
        _ => Err(failure(
            StatusCode::BAD_REQUEST,
            &format!("Parameter '{name}' must be a JSON object"),
        )),
    }
}

/// `{"success": true, <field>: {...}}` with the collection in insertion order.
fn ok_keyed(field: &str, collection: &Keyed) -> Response {
    #[derive(Serialize)]
    struct Body<'a> {
        success: bool,
        #[serde(flatten)]
        payload: HashMap<&'a str, &'a Keyed>,
    }
    let body = Body {
        success: true,
        payload: HashMap::from([(field, collection)]),
    };
    (StatusCode::OK, Json(body)).into_response()
}

// --- common ---

async fn api_versions() -> Reply {
    ok(json!({"versions": ["3.0", "4.0", "5.0"]}))
}

async fn credentials() -> Reply {
    ok(json!({
        "credentials": ["/api/reference/*", "/api/orders", "/api/integration-modules"],
        "siteAccess": "access_full",
        "sitesAvailable": SITES
    }))
}

// --- reference ---

async fn sites() -> Response {
    let sites = Keyed::from([
        ("main", json!({"code": "main", "name": "Main store", "url": "https://main.shop.test", "currency": "RUB"})),
        ("outlet", json!({"code": "outlet", "name": "Outlet", "url": "https://outlet.shop.test", "currency": "RUB"})),
        ("b2b", json!({"code": "b2b", "name": "Wholesale", "url": "https://b2b.shop.test", "currency": "RUB"})),
    ]);
    ok_keyed("sites", &sites)
}

// Units come back as a list, unlike the other reference endpoints.
async fn units() -> Reply {
    ok(json!({"units": [
        {"code": "pcs", "name": "Piece", "sym": "pcs", "default": true, "active": true},
        {"code": "kg", "name": "Kilogram", "sym": "kg", "default": false, "active": true}
    ]}))
}

async fn countries() -> Response {
    let countries = Keyed(
        COUNTRIES
            .iter()
            .enumerate()
            .map(|(i, iso)| (i.to_string(), json!(iso)))
            .collect(),
    );
    ok_keyed("countriesIso", &countries)
}

async fn status_groups() -> Reply {
    ok(json!({"statusGroups": {
        "new": {"code": "new", "name": "New", "active": true, "ordering": 10, "process": false, "statuses": ["new"]},
        "complete": {"code": "complete", "name": "Complete", "active": true, "ordering": 90, "process": false, "statuses": ["complete"]}
    }}))
}

async fn statuses() -> Reply {
    ok(json!({"statuses": {
        "complete": {"code": "complete", "name": "Completed", "active": true, "ordering": 90, "group": "complete"},
        "new": {"code": "new", "name": "New", "active": true, "ordering": 10, "group": "new"}
    }}))
}

async fn order_types() -> Reply {
    ok(json!({"orderTypes": {
        "eshop-individual": {"code": "eshop-individual", "name": "Individual", "active": true, "defaultForCrm": true, "defaultForApi": true, "ordering": 1}
    }}))
}

async fn payment_types() -> Reply {
    ok(json!({"paymentTypes": {
        "card": {"code": "card", "name": "Card", "active": true, "deliveryTypes": ["courier"], "paymentStatuses": ["paid", "not-paid"]},
        "cash": {"code": "cash", "name": "Cash", "active": true, "defaultForCrm": true, "deliveryTypes": ["courier"], "paymentStatuses": ["paid", "not-paid"]}
    }}))
}

async fn payment_statuses() -> Reply {
    ok(json!({"paymentStatuses": {
        "not-paid": {"code": "not-paid", "name": "Not paid", "active": true, "paymentComplete": false, "ordering": 10, "paymentTypes": ["cash", "card"]},
        "paid": {"code": "paid", "name": "Paid", "active": true, "paymentComplete": true, "ordering": 20, "paymentTypes": ["cash", "card"]}
    }}))
}

async fn product_statuses() -> Reply {
    ok(json!({"productStatuses": {
        "in-reserve": {"code": "in-reserve", "name": "In reserve", "ordering": 10, "active": true, "cancelStatus": false}
    }}))
}

async fn stores() -> Reply {
    ok(json!({"stores": {
        "warehouse": {"code": "warehouse", "name": "Warehouse", "externalId": "wh-1", "active": true}
    }}))
}

// --- delivery ---

async fn delivery_services(State(state): State<Shared>) -> Response {
    let db = state.db.read().await;
    ok_keyed("deliveryServices", &db.delivery_services)
}

async fn edit_delivery_service(
    State(state): State<Shared>,
    Path(code): Path<String>,
    Form(form): Form<HashMap<String, String>>,
) -> Reply {
    let fields = match json_field(&form, "deliveryService") {
        Ok(fields) => fields,
        Err(reply) => return reply,
    };
    let mut db = state.db.write().await;
    let created = db.delivery_services.upsert(&code, fields);
    tracing::info!(%code, created, "delivery service saved");
    ok_with(created_status(created), json!({}))
}

async fn delivery_types(State(state): State<Shared>) -> Response {
    let db = state.db.read().await;
    ok_keyed("deliveryTypes", &db.delivery_types)
}

async fn edit_delivery_type(
    State(state): State<Shared>,
    Path(code): Path<String>,
    Form(form): Form<HashMap<String, String>>,
) -> Reply {
    let fields = match json_field(&form, "deliveryType") {
        Ok(fields) => fields,
        Err(reply) => return reply,
    };
    if !fields.get("name").is_some_and(|n| n.as_str().is_some_and(|n| !n.is_empty())) {
        return failure_with(
            StatusCode::BAD_REQUEST,
            "Errors in the entity format",
            json!({"name": "This value should not be blank."}),
        );
    }
    let mut db = state.db.write().await;
    let created = db.delivery_types.upsert(&code, fields);
    tracing::info!(%code, created, "delivery type saved");
    ok_with(created_status(created), json!({}))
}

fn created_status(created: bool) -> StatusCode {
    if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    }
}

// --- integration modules ---

async fn get_integration_module(State(state): State<Shared>, Path(code): Path<String>) -> Reply {
    let db = state.db.read().await;
    match db.integration_modules.get(&code) {
        Some(module) => ok(json!({"integrationModule": module})),
        None => failure(StatusCode::NOT_FOUND, "Not found"),
    }
}

async fn edit_integration_module(
    State(state): State<Shared>,
    Path(code): Path<String>,
    Form(form): Form<HashMap<String, String>>,
) -> Reply {
    let mut fields = match json_field(&form, "integrationModule") {
        Ok(fields) => fields,
        Err(reply) => return reply,
    };
    let mut db = state.db.write().await;
    if db.integration_modules.get(&code).is_none() {
        if !fields.contains_key("integrationCode") {
            return failure_with(
                StatusCode::BAD_REQUEST,
                "Errors in the entity format",
                json!({"integrationCode": "This value should not be blank."}),
            );
        }
        for (key, default) in [
            ("active", json!(true)),
            ("freeze", json!(false)),
            ("native", json!(false)),
        ] {
            fields.entry(key).or_insert(default);
        }
    }
    let created = db.integration_modules.upsert(&code, fields);
    tracing::info!(%code, created, "integration module saved");
    ok_with(created_status(created), json!({"info": []}))
}

// --- orders ---

#[derive(Deserialize)]
struct OrderLookup {
    by: Option<String>,
    site: Option<String>,
}

async fn get_order(
    State(state): State<Shared>,
    Path(id): Path<String>,
    Query(lookup): Query<OrderLookup>,
) -> Reply {
    let key = match lookup.by.as_deref().unwrap_or("externalId") {
        "externalId" => "externalId",
        "id" => "id",
        _ => {
            return failure(
                StatusCode::BAD_REQUEST,
                "Value of 'by' should be either 'externalId' or 'id'",
            )
        }
    };
    let db = state.db.read().await;
    let found = db.orders.iter().find(|order| {
        let matches_id = match &order[key] {
            Value::String(s) => *s == id,
            Value::Number(n) => n.to_string() == id,
            _ => false,
        };
        let matches_site = lookup
            .site
            .as_deref()
            .map_or(true, |site| order["site"] == site);
        matches_id && matches_site
    });
    match found {
        Some(order) => ok(json!({"order": order})),
        None => failure(StatusCode::NOT_FOUND, "Not found"),
    }
}

async fn create_order(
    State(state): State<Shared>,
    Form(form): Form<HashMap<String, String>>,
) -> Reply {
    let site = form.get("site").cloned().unwrap_or_default();
    if !SITES.contains(&site.as_str()) {
        return failure_with(
            StatusCode::BAD_REQUEST,
            "Order is not loaded",
            json!({"site": format!("Site '{site}' does not exist")}),
        );
    }
    let mut order = match json_field(&form, "order") {
        Ok(order) => order,
        Err(reply) => return reply,
    };

    let mut db = state.db.write().await;
    if let Some(external_id) = order.get("externalId") {
        if db.orders.iter().any(|o| o["externalId"] == *external_id && o["site"] == site.as_str()) {
            return failure(StatusCode::BAD_REQUEST, "Order already exists.");
        }
    }

    let id = db.next_order_id;
    db.next_order_id += 1;

    // Payments are stored keyed by their generated id, as the real API does.
    let mut payments = Map::new();
    if let Some(Value::Array(list)) = order.remove("payments") {
        for mut payment in list {
            let payment_id = db.next_payment_id;
            db.next_payment_id += 1;
            if let Value::Object(fields) = &mut payment {
                fields.insert("id".to_string(), json!(payment_id));
            }
            payments.insert(payment_id.to_string(), payment);
        }
    }

    order.insert("id".to_string(), json!(id));
    order.insert("site".to_string(), json!(site));
    order.insert("payments".to_string(), Value::Object(payments));
    order.entry("number").or_insert_with(|| json!(format!("{id}A")));
    order.entry("status").or_insert_with(|| json!("new"));
    order.entry("createdAt").or_insert_with(|| json!("2024-01-01 00:00:00"));
    order.entry("customFields").or_insert_with(|| json!([]));

    let order = Value::Object(order);
    db.orders.push(order.clone());
    tracing::info!(id, %site, "order created");
    ok_with(StatusCode::CREATED, json!({"id": id, "order": order}))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_wraps_payload_in_envelope() {
        let (status, Json(body)) = ok(json!({"versions": ["5.0"]}));
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"success": true, "versions": ["5.0"]}));
    }

    #[test]
    fn failure_carries_message() {
        let (status, Json(body)) = failure(StatusCode::NOT_FOUND, "Not found");
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
        assert_eq!(body["errorMsg"], "Not found");
    }

    #[test]
    fn upsert_creates_then_merges() {
        let mut collection = Keyed::default();
        let first = json!({"name": "Courier", "defaultCost": 100});
        assert!(collection.upsert("c1", first.as_object().unwrap().clone()));

        let second = json!({"defaultCost": 200});
        assert!(!collection.upsert("c1", second.as_object().unwrap().clone()));
        assert_eq!(
            collection.get("c1"),
            Some(&json!({"code": "c1", "name": "Courier", "defaultCost": 200}))
        );
    }

    #[test]
    fn keyed_serializes_in_insertion_order() {
        let mut collection = Keyed::default();
        for code in ["zeta", "10", "alpha", "2"] {
            collection.upsert(code, Map::new());
        }
        let text = serde_json::to_string(&collection).unwrap();
        assert_eq!(
            text,
            r#"{"zeta":{"code":"zeta"},"10":{"code":"10"},"alpha":{"code":"alpha"},"2":{"code":"2"}}"#
        );
    }

    #[test]
    fn json_field_rejects_missing_and_non_object() {
        let mut form = HashMap::new();
        let (status, _) = json_field(&form, "order").unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);

        form.insert("order".to_string(), "[1,2]".to_string());
        assert!(json_field(&form, "order").is_err());

        form.insert("order".to_string(), r#"{"externalId":"e"}"#.to_string());
        assert_eq!(json_field(&form, "order").unwrap()["externalId"], "e");
    }
}
