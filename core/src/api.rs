//! Stateless request builder and response parser for the CRM API.
//!
//! # Design
//! `CrmApi` holds the base URL, the API key and the status policy, and never
//! changes after construction. Each endpoint is split into a `build_*`
//! method that produces an `HttpRequest` and a `parse_*` method that
//! consumes an `HttpResponse`, so the core stays free of IO. `parse_*`
//! always runs the envelope check before touching the payload.

use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Serialize};

use crate::envelope::{self, StatusPolicy};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, API_KEY_HEADER, FORM_CONTENT_TYPE};
use crate::normalize::ListOrMap;
use crate::types::{
    ApiVersion, CountryCode, CreateDeliveryService, CreateDeliveryType, CreateOrder, Credentials,
    DeliveryService, DeliveryType, EditIntegrationModule, Info, IntegrationModule, LookupBy, Order,
    OrderStatus, OrderStatusGroup, OrderType, PaymentStatus, PaymentType, ProductStatus, Site,
    Store, Unit, UpdateDeliveryType,
};

#[derive(Deserialize)]
struct VersionsPayload {
    versions: Vec<ApiVersion>,
}

#[derive(Deserialize)]
struct SitesPayload {
    sites: ListOrMap<Site>,
}

#[derive(Deserialize)]
struct UnitsPayload {
    units: ListOrMap<Unit>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CountriesPayload {
    countries_iso: ListOrMap<CountryCode>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatusGroupsPayload {
    status_groups: ListOrMap<OrderStatusGroup>,
}

#[derive(Deserialize)]
struct StatusesPayload {
    statuses: ListOrMap<OrderStatus>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrderTypesPayload {
    order_types: ListOrMap<OrderType>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PaymentTypesPayload {
    payment_types: ListOrMap<PaymentType>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PaymentStatusesPayload {
    payment_statuses: ListOrMap<PaymentStatus>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeliveryServicesPayload {
    delivery_services: ListOrMap<DeliveryService>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeliveryTypesPayload {
    delivery_types: ListOrMap<DeliveryType>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductStatusesPayload {
    product_statuses: ListOrMap<ProductStatus>,
}

#[derive(Deserialize)]
struct StoresPayload {
    stores: ListOrMap<Store>,
}

#[derive(Deserialize)]
struct InfoPayload {
    #[serde(default)]
    info: ListOrMap<Info>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct IntegrationModulePayload {
    integration_module: IntegrationModule,
}

#[derive(Deserialize)]
struct OrderPayload {
    order: Order,
}

#[derive(Serialize)]
struct OrderQuery<'a> {
    by: LookupBy,
    #[serde(skip_serializing_if = "Option::is_none")]
    site: Option<&'a str>,
}

/// Synchronous, stateless request builder/parser for the CRM API.
#[derive(Debug, Clone)]
pub struct CrmApi {
    base_url: String,
    api_key: String,
    policy: StatusPolicy,
}

impl CrmApi {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            policy: StatusPolicy::default(),
        }
    }

    pub fn with_status_policy(mut self, policy: StatusPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn status_policy(&self) -> StatusPolicy {
        self.policy
    }

    // -----------------------------------------------------------------------
    // Common
    // -----------------------------------------------------------------------

    pub fn build_api_versions(&self) -> HttpRequest {
        self.get("/api/api-versions")
    }

    pub fn parse_api_versions(&self, response: HttpResponse) -> Result<Vec<ApiVersion>, ApiError> {
        Ok(self.parse::<VersionsPayload>(&response)?.versions)
    }

    pub fn build_credentials(&self) -> HttpRequest {
        self.get("/api/credentials")
    }

    pub fn parse_credentials(&self, response: HttpResponse) -> Result<Credentials, ApiError> {
        self.parse(&response)
    }

    // -----------------------------------------------------------------------
    // Reference data
    // -----------------------------------------------------------------------

    pub fn build_sites(&self) -> HttpRequest {
        self.get("/api/v5/reference/sites")
    }

    pub fn parse_sites(&self, response: HttpResponse) -> Result<Vec<Site>, ApiError> {
        Ok(self.parse::<SitesPayload>(&response)?.sites.into_vec())
    }

    pub fn build_units(&self) -> HttpRequest {
        self.get("/api/v5/reference/units")
    }

    pub fn parse_units(&self, response: HttpResponse) -> Result<Vec<Unit>, ApiError> {
        Ok(self.parse::<UnitsPayload>(&response)?.units.into_vec())
    }

    pub fn build_country_codes(&self) -> HttpRequest {
        self.get("/api/v5/reference/countries")
    }

    pub fn parse_country_codes(&self, response: HttpResponse) -> Result<Vec<CountryCode>, ApiError> {
        Ok(self.parse::<CountriesPayload>(&response)?.countries_iso.into_vec())
    }

    pub fn build_order_status_groups(&self) -> HttpRequest {
        self.get("/api/v5/reference/status-groups")
    }

    pub fn parse_order_status_groups(
        &self,
        response: HttpResponse,
    ) -> Result<Vec<OrderStatusGroup>, ApiError> {
        Ok(self.parse::<StatusGroupsPayload>(&response)?.status_groups.into_vec())
    }

    pub fn build_order_statuses(&self) -> HttpRequest {
        self.get("/api/v5/reference/statuses")
    }

    pub fn parse_order_statuses(&self, response: HttpResponse) -> Result<Vec<OrderStatus>, ApiError> {
        Ok(self.parse::<StatusesPayload>(&response)?.statuses.into_vec())
    }

    pub fn build_order_types(&self) -> HttpRequest {
        self.get("/api/v5/reference/order-types")
    }

    pub fn parse_order_types(&self, response: HttpResponse) -> Result<Vec<OrderType>, ApiError> {
        Ok(self.parse::<OrderTypesPayload>(&response)?.order_types.into_vec())
    }

    pub fn build_payment_types(&self) -> HttpRequest {
        self.get("/api/v5/reference/payment-types")
    }

    pub fn parse_payment_types(&self, response: HttpResponse) -> Result<Vec<PaymentType>, ApiError> {
        Ok(self.parse::<PaymentTypesPayload>(&response)?.payment_types.into_vec())
    }

    pub fn build_payment_statuses(&self) -> HttpRequest {
        self.get("/api/v5/reference/payment-statuses")
    }

    pub fn parse_payment_statuses(
        &self,
        response: HttpResponse,
    ) -> Result<Vec<PaymentStatus>, ApiError> {
        Ok(self.parse::<PaymentStatusesPayload>(&response)?.payment_statuses.into_vec())
    }

    pub fn build_delivery_services(&self) -> HttpRequest {
        self.get("/api/v5/reference/delivery-services")
    }

    pub fn parse_delivery_services(
        &self,
        response: HttpResponse,
    ) -> Result<Vec<DeliveryService>, ApiError> {
        Ok(self.parse::<DeliveryServicesPayload>(&response)?.delivery_services.into_vec())
    }

    pub fn build_create_delivery_service(
        &self,
        input: &CreateDeliveryService,
    ) -> Result<HttpRequest, ApiError> {
        let path = format!("/api/v5/reference/delivery-services/{}/edit", input.code);
        self.post_form(&path, &[("deliveryService", to_json(input)?)])
    }

    pub fn parse_create_delivery_service(&self, response: HttpResponse) -> Result<(), ApiError> {
        self.parse::<IgnoredAny>(&response).map(|_| ())
    }

    pub fn build_delivery_types(&self) -> HttpRequest {
        self.get("/api/v5/reference/delivery-types")
    }

    pub fn parse_delivery_types(&self, response: HttpResponse) -> Result<Vec<DeliveryType>, ApiError> {
        Ok(self.parse::<DeliveryTypesPayload>(&response)?.delivery_types.into_vec())
    }

    pub fn build_create_delivery_type(
        &self,
        input: &CreateDeliveryType,
    ) -> Result<HttpRequest, ApiError> {
        let path = format!("/api/v5/reference/delivery-types/{}/edit", input.code);
        self.post_form(&path, &[("deliveryType", to_json(input)?)])
    }

    pub fn parse_create_delivery_type(&self, response: HttpResponse) -> Result<(), ApiError> {
        self.parse::<IgnoredAny>(&response).map(|_| ())
    }

    pub fn build_update_delivery_type(
        &self,
        code: &str,
        input: &UpdateDeliveryType,
    ) -> Result<HttpRequest, ApiError> {
        let path = format!("/api/v5/reference/delivery-types/{code}/edit");
        self.post_form(&path, &[("deliveryType", to_json(input)?)])
    }

    pub fn parse_update_delivery_type(&self, response: HttpResponse) -> Result<(), ApiError> {
        self.parse::<IgnoredAny>(&response).map(|_| ())
    }

    pub fn build_product_statuses(&self) -> HttpRequest {
        self.get("/api/v5/reference/product-statuses")
    }

    pub fn parse_product_statuses(
        &self,
        response: HttpResponse,
    ) -> Result<Vec<ProductStatus>, ApiError> {
        Ok(self.parse::<ProductStatusesPayload>(&response)?.product_statuses.into_vec())
    }

    pub fn build_stores(&self) -> HttpRequest {
        self.get("/api/v5/reference/stores")
    }

    pub fn parse_stores(&self, response: HttpResponse) -> Result<Vec<Store>, ApiError> {
        Ok(self.parse::<StoresPayload>(&response)?.stores.into_vec())
    }

    // -----------------------------------------------------------------------
    // Integration modules
    // -----------------------------------------------------------------------

    pub fn build_create_integration_module(
        &self,
        code: &str,
        input: &EditIntegrationModule,
    ) -> Result<HttpRequest, ApiError> {
        let path = format!("/api/v5/integration-modules/{code}/edit");
        self.post_form(&path, &[("integrationModule", to_json(input)?)])
    }

    pub fn parse_create_integration_module(&self, response: HttpResponse) -> Result<Vec<Info>, ApiError> {
        Ok(self.parse::<InfoPayload>(&response)?.info.into_vec())
    }

    pub fn build_get_integration_module(&self, code: &str) -> HttpRequest {
        self.get(&format!("/api/v5/integration-modules/{code}"))
    }

    pub fn parse_get_integration_module(
        &self,
        response: HttpResponse,
    ) -> Result<IntegrationModule, ApiError> {
        Ok(self.parse::<IntegrationModulePayload>(&response)?.integration_module)
    }

    // -----------------------------------------------------------------------
    // Orders
    // -----------------------------------------------------------------------

    pub fn build_get_order(
        &self,
        id: &str,
        site: Option<&str>,
        by: LookupBy,
    ) -> Result<HttpRequest, ApiError> {
        let query = serde_html_form::to_string(OrderQuery { by, site })
            .map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(self.get(&format!("/api/v5/orders/{id}?{query}")))
    }

    pub fn parse_get_order(&self, response: HttpResponse) -> Result<Order, ApiError> {
        Ok(self.parse::<OrderPayload>(&response)?.order)
    }

    pub fn build_create_order(&self, input: &CreateOrder) -> Result<HttpRequest, ApiError> {
        self.post_form(
            "/api/v5/orders/create",
            &[("site", input.site.clone()), ("order", to_json(&input.order)?)],
        )
    }

    pub fn parse_create_order(&self, response: HttpResponse) -> Result<Order, ApiError> {
        Ok(self.parse::<OrderPayload>(&response)?.order)
    }

    // -----------------------------------------------------------------------
    // Plumbing
    // -----------------------------------------------------------------------

    fn get(&self, path: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}{path}", self.base_url),
            headers: vec![(API_KEY_HEADER.to_string(), self.api_key.clone())],
            body: None,
        }
    }

    fn post_form(&self, path: &str, fields: &[(&str, String)]) -> Result<HttpRequest, ApiError> {
        let body = serde_html_form::to_string(fields).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: format!("{}{path}", self.base_url),
            headers: vec![
                (API_KEY_HEADER.to_string(), self.api_key.clone()),
                ("content-type".to_string(), FORM_CONTENT_TYPE.to_string()),
            ],
            body: Some(body),
        })
    }

    fn parse<T: DeserializeOwned>(&self, response: &HttpResponse) -> Result<T, ApiError> {
        envelope::parse(response, self.policy)
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String, ApiError> {
    serde_json::to_string(value).map_err(|e| ApiError::Serialization(e.to_string()))
}
