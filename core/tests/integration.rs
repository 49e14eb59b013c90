//! End-to-end tests against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives it twice: once
//! through the sans-IO `CrmApi` with requests executed by ureq, once through
//! the async `RetailCrmClient` on its default reqwest transport. Both paths
//! must agree with the server on paths, form bodies and envelopes.

use std::net::SocketAddr;

use retailcrm_core::{
    ApiError, CreateDeliveryService, CreateDeliveryType, CreateOrder, CrmApi,
    EditIntegrationModule, HttpMethod, HttpRequest, HttpResponse, LookupBy, NewOrder,
    OrderPayment, RetailCrmClient, UpdateDeliveryType,
};

/// Run the mock server on its own thread and return where it listens.
fn spawn_server() -> SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener, mock_server::DEFAULT_API_KEY).await
        })
        .unwrap();
    });

    addr
}

/// Execute an `HttpRequest` using ureq and return an `HttpResponse`.
///
/// Disables ureq's automatic status-code-as-error behavior so 4xx/5xx
/// responses are returned as data rather than `Err`, letting the core
/// handle status interpretation.
fn execute(req: HttpRequest) -> HttpResponse {
    let agent = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .new_agent();

    let mut response = match req.method {
        HttpMethod::Get => {
            let mut builder = agent.get(&req.path);
            for (name, value) in &req.headers {
                builder = builder.header(name.as_str(), value.as_str());
            }
            builder.call()
        }
        HttpMethod::Post => {
            let mut builder = agent.post(&req.path);
            for (name, value) in &req.headers {
                builder = builder.header(name.as_str(), value.as_str());
            }
            builder.send(req.body.unwrap_or_default().as_bytes())
        }
    }
    .expect("HTTP transport error");

    let status = response.status().as_u16();
    let body = response.body_mut().read_to_string().unwrap_or_default();

    HttpResponse::new(status, body)
}

fn payment(kind: &str, amount: f64) -> OrderPayment {
    OrderPayment {
        kind: Some(kind.to_string()),
        amount: Some(amount),
        ..OrderPayment::default()
    }
}

#[test]
fn sans_io_lifecycle() {
    let addr = spawn_server();
    let api = CrmApi::new(&format!("http://{addr}"), mock_server::DEFAULT_API_KEY);

    // Reference data comes back keyed by code and is flattened.
    let sites = api.parse_sites(execute(api.build_sites())).unwrap();
    let codes: Vec<&str> = sites.iter().map(|s| s.code.as_str()).collect();
    assert_eq!(codes, mock_server::SITES);

    let countries = api.parse_country_codes(execute(api.build_country_codes())).unwrap();
    // Index keys past "9" must not sort before "2".
    assert_eq!(countries, mock_server::COUNTRIES);

    let units = api.parse_units(execute(api.build_units())).unwrap();
    assert!(!units.is_empty());

    // Delivery types: create, rename, list.
    let create = CreateDeliveryType {
        code: "air".to_string(),
        name: "Air freight".to_string(),
        default_cost: 0.0,
        default_net_cost: 0.0,
        ..CreateDeliveryType::default()
    };
    let req = api.build_create_delivery_type(&create).unwrap();
    api.parse_create_delivery_type(execute(req)).unwrap();

    let update = UpdateDeliveryType {
        name: "Air cargo".to_string(),
        active: Some(false),
        ..UpdateDeliveryType::default()
    };
    let req = api.build_update_delivery_type("air", &update).unwrap();
    api.parse_update_delivery_type(execute(req)).unwrap();

    let types = api.parse_delivery_types(execute(api.build_delivery_types())).unwrap();
    let codes: Vec<&str> = types.iter().map(|t| t.code.as_str()).collect();
    assert_eq!(codes, ["courier", "air"]);
    let air = types.iter().find(|t| t.code == "air").unwrap();
    assert_eq!(air.name, "Air cargo");
    assert!(!air.active);
    assert!(types.iter().any(|t| t.code == "courier"));

    // A blank name is a validation failure with field errors.
    let blank = UpdateDeliveryType::default();
    let req = api.build_update_delivery_type("air", &blank).unwrap();
    let err = api.parse_update_delivery_type(execute(req)).unwrap_err();
    match err {
        ApiError::Http { status, message } => {
            assert_eq!(status, 400);
            let message = message.unwrap();
            assert!(message.contains("Errors in the entity format"), "{message}");
            assert!(message.contains("name"), "{message}");
        }
        other => panic!("unexpected error: {other:?}"),
    }

    // Delivery services.
    let service = CreateDeliveryService {
        code: "post".to_string(),
        name: "Post".to_string(),
        delivery_type: Some("courier".to_string()),
        active: Some(true),
    };
    let req = api.build_create_delivery_service(&service).unwrap();
    api.parse_create_delivery_service(execute(req)).unwrap();
    let services = api
        .parse_delivery_services(execute(api.build_delivery_services()))
        .unwrap();
    assert!(services.iter().any(|s| s.code == "post"));

    // Integration modules.
    let module = EditIntegrationModule {
        integration_code: Some("acme-delivery".to_string()),
        name: Some("Acme".to_string()),
        base_url: Some("https://acme.example".to_string()),
        ..EditIntegrationModule::default()
    };
    let req = api.build_create_integration_module("acme", &module).unwrap();
    let info = api.parse_create_integration_module(execute(req)).unwrap();
    assert!(info.is_empty());

    let fetched = api
        .parse_get_integration_module(execute(api.build_get_integration_module("acme")))
        .unwrap();
    assert_eq!(fetched.code, "acme");
    assert_eq!(fetched.integration_code, "acme-delivery");
    assert!(fetched.active);

    let err = api
        .parse_get_integration_module(execute(api.build_get_integration_module("missing")))
        .unwrap_err();
    assert!(err.is_not_found());

    // Orders.
    let input = CreateOrder {
        site: "main".to_string(),
        order: NewOrder {
            external_id: Some("ext-1".to_string()),
            first_name: Some("Ann".to_string()),
            payments: vec![payment("cash", 100.0), payment("card", 50.0)],
            ..NewOrder::default()
        },
    };
    let req = api.build_create_order(&input).unwrap();
    let created = api.parse_create_order(execute(req)).unwrap();
    assert_eq!(created.external_id.as_deref(), Some("ext-1"));
    assert_eq!(created.payments.len(), 2);
    assert_eq!(created.payments[1].kind.as_deref(), Some("card"));

    let req = api.build_get_order("ext-1", Some("main"), LookupBy::ExternalId).unwrap();
    let fetched = api.parse_get_order(execute(req)).unwrap();
    assert_eq!(fetched.id, created.id);
    assert_eq!(fetched.first_name.as_deref(), Some("Ann"));

    let req = api
        .build_get_order(&created.id.to_string(), None, LookupBy::Id)
        .unwrap();
    assert_eq!(api.parse_get_order(execute(req)).unwrap().number, created.number);

    let req = api.build_get_order("ext-1", Some("outlet"), LookupBy::ExternalId).unwrap();
    let err = api.parse_get_order(execute(req)).unwrap_err();
    assert!(err.is_not_found());

    // Creating the same order again is refused.
    let req = api.build_create_order(&input).unwrap();
    let err = api.parse_create_order(execute(req)).unwrap_err();
    assert_eq!(err.status(), Some(400));
}

#[tokio::test]
async fn async_client_lifecycle() {
    let addr = spawn_server();
    let client =
        RetailCrmClient::new(&format!("http://{addr}"), mock_server::DEFAULT_API_KEY).unwrap();

    let credentials = client.credentials().await.unwrap();
    assert!(!credentials.credentials.is_empty());

    let versions = client.api_versions().await.unwrap();
    assert!(versions.iter().any(|v| v.starts_with('5')));

    assert!(!client.order_statuses().await.unwrap().is_empty());
    assert!(!client.order_status_groups().await.unwrap().is_empty());
    assert!(!client.order_types().await.unwrap().is_empty());
    assert!(!client.payment_types().await.unwrap().is_empty());
    assert!(!client.payment_statuses().await.unwrap().is_empty());
    assert!(!client.product_statuses().await.unwrap().is_empty());
    assert!(!client.stores().await.unwrap().is_empty());

    let input = CreateOrder {
        site: "outlet".to_string(),
        order: NewOrder {
            external_id: Some("async-1".to_string()),
            ..NewOrder::default()
        },
    };
    let created = client.create_order(&input).await.unwrap();
    let fetched = client
        .get_order("async-1", Some("outlet"), LookupBy::ExternalId)
        .await
        .unwrap();
    assert_eq!(fetched.id, created.id);

    let unknown_site = CreateOrder {
        site: "nowhere".to_string(),
        order: NewOrder::default(),
    };
    let err = client.create_order(&unknown_site).await.unwrap_err();
    assert_eq!(err.status(), Some(400));
    assert!(err.to_string().contains("Order is not loaded"));
}

#[tokio::test]
async fn wrong_api_key_is_rejected() {
    let addr = spawn_server();
    let client = RetailCrmClient::new(&format!("http://{addr}"), "not-the-key").unwrap();

    let err = client.sites().await.unwrap_err();
    assert_eq!(err.status(), Some(403));
    assert!(err.to_string().contains("403"), "{err}");
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    // Bind and drop to get a port nobody listens on.
    let addr = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();
    let client = RetailCrmClient::new(&format!("http://{addr}"), "key").unwrap();

    let err = client.sites().await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)), "{err:?}");
}
