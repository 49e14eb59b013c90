//! Async client: one method per CRM endpoint.
//!
//! Every method funnels through [`RetailCrmClient::call`], which builds the
//! request with [`CrmApi`], executes it on the transport, then validates and
//! extracts the payload. There is no retry, cache or queue; each call is a
//! single request and the client holds no per-call state, so concurrent
//! calls need no locking.

use std::time::{Duration, Instant};

use tracing::Instrument;

use crate::api::CrmApi;
use crate::envelope::StatusPolicy;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::Transport;
use crate::types::{
    ApiVersion, CountryCode, CreateDeliveryService, CreateDeliveryType, CreateOrder, Credentials,
    DeliveryService, DeliveryType, EditIntegrationModule, Info, IntegrationModule, LookupBy, Order,
    OrderStatus, OrderStatusGroup, OrderType, PaymentStatus, PaymentType, ProductStatus, Site,
    Store, Unit, UpdateDeliveryType,
};

#[cfg(feature = "reqwest")]
use crate::transport::ReqwestTransport;

/// Environment variable read by [`ClientBuilder::from_env`] for the base URL.
pub const ENV_BASE_URL: &str = "RETAILCRM_URL";
/// Environment variable read by [`ClientBuilder::from_env`] for the API key.
pub const ENV_API_KEY: &str = "RETAILCRM_API_KEY";

/// Typed client for the CRM REST API.
#[derive(Debug, Clone)]
pub struct RetailCrmClient<T> {
    api: CrmApi,
    transport: T,
}

#[cfg(feature = "reqwest")]
impl RetailCrmClient<ReqwestTransport> {
    /// Client with a default `reqwest` transport and the `2xx` status policy.
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, ApiError> {
        ClientBuilder::new().base_url(base_url).api_key(api_key).build()
    }
}

impl<T: Transport> RetailCrmClient<T> {
    pub fn with_transport(api: CrmApi, transport: T) -> Self {
        Self { api, transport }
    }

    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// The sans-IO half, for hosts that execute requests themselves.
    pub fn api(&self) -> &CrmApi {
        &self.api
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Available API versions.
    pub async fn api_versions(&self) -> Result<Vec<ApiVersion>, ApiError> {
        self.call("api_versions", Ok(self.api.build_api_versions()), CrmApi::parse_api_versions)
            .await
    }

    /// Methods and sites the API key grants access to.
    pub async fn credentials(&self) -> Result<Credentials, ApiError> {
        self.call("credentials", Ok(self.api.build_credentials()), CrmApi::parse_credentials)
            .await
    }

    pub async fn sites(&self) -> Result<Vec<Site>, ApiError> {
        self.call("sites", Ok(self.api.build_sites()), CrmApi::parse_sites).await
    }

    pub async fn units(&self) -> Result<Vec<Unit>, ApiError> {
        self.call("units", Ok(self.api.build_units()), CrmApi::parse_units).await
    }

    pub async fn country_codes(&self) -> Result<Vec<CountryCode>, ApiError> {
        self.call("country_codes", Ok(self.api.build_country_codes()), CrmApi::parse_country_codes)
            .await
    }

    pub async fn order_status_groups(&self) -> Result<Vec<OrderStatusGroup>, ApiError> {
        self.call(
            "order_status_groups",
            Ok(self.api.build_order_status_groups()),
            CrmApi::parse_order_status_groups,
        )
        .await
    }

    pub async fn order_statuses(&self) -> Result<Vec<OrderStatus>, ApiError> {
        self.call("order_statuses", Ok(self.api.build_order_statuses()), CrmApi::parse_order_statuses)
            .await
    }

    pub async fn order_types(&self) -> Result<Vec<OrderType>, ApiError> {
        self.call("order_types", Ok(self.api.build_order_types()), CrmApi::parse_order_types)
            .await
    }

    pub async fn payment_types(&self) -> Result<Vec<PaymentType>, ApiError> {
        self.call("payment_types", Ok(self.api.build_payment_types()), CrmApi::parse_payment_types)
            .await
    }

    pub async fn payment_statuses(&self) -> Result<Vec<PaymentStatus>, ApiError> {
        self.call(
            "payment_statuses",
            Ok(self.api.build_payment_statuses()),
            CrmApi::parse_payment_statuses,
        )
        .await
    }

    pub async fn delivery_services(&self) -> Result<Vec<DeliveryService>, ApiError> {
        self.call(
            "delivery_services",
            Ok(self.api.build_delivery_services()),
            CrmApi::parse_delivery_services,
        )
        .await
    }

    /// Create or overwrite the delivery service `input.code`.
    pub async fn create_delivery_service(&self, input: &CreateDeliveryService) -> Result<(), ApiError> {
        self.call(
            "create_delivery_service",
            self.api.build_create_delivery_service(input),
            CrmApi::parse_create_delivery_service,
        )
        .await
    }

    pub async fn delivery_types(&self) -> Result<Vec<DeliveryType>, ApiError> {
        self.call("delivery_types", Ok(self.api.build_delivery_types()), CrmApi::parse_delivery_types)
            .await
    }

    pub async fn create_delivery_type(&self, input: &CreateDeliveryType) -> Result<(), ApiError> {
        self.call(
            "create_delivery_type",
            self.api.build_create_delivery_type(input),
            CrmApi::parse_create_delivery_type,
        )
        .await
    }

    /// Apply a partial update to the delivery type `code`.
    pub async fn update_delivery_type(
        &self,
        code: &str,
        input: &UpdateDeliveryType,
    ) -> Result<(), ApiError> {
        self.call(
            "update_delivery_type",
            self.api.build_update_delivery_type(code, input),
            CrmApi::parse_update_delivery_type,
        )
        .await
    }

    pub async fn product_statuses(&self) -> Result<Vec<ProductStatus>, ApiError> {
        self.call(
            "product_statuses",
            Ok(self.api.build_product_statuses()),
            CrmApi::parse_product_statuses,
        )
        .await
    }

    pub async fn stores(&self) -> Result<Vec<Store>, ApiError> {
        self.call("stores", Ok(self.api.build_stores()), CrmApi::parse_stores).await
    }

    /// Create or edit the integration module `code` with a partial payload.
    pub async fn create_integration_module(
        &self,
        code: &str,
        input: &EditIntegrationModule,
    ) -> Result<Vec<Info>, ApiError> {
        self.call(
            "create_integration_module",
            self.api.build_create_integration_module(code, input),
            CrmApi::parse_create_integration_module,
        )
        .await
    }

    pub async fn get_integration_module(&self, code: &str) -> Result<IntegrationModule, ApiError> {
        self.call(
            "get_integration_module",
            Ok(self.api.build_get_integration_module(code)),
            CrmApi::parse_get_integration_module,
        )
        .await
    }

    /// Fetch one order; `site` narrows an external id lookup to one store front.
    pub async fn get_order(
        &self,
        id: &str,
        site: Option<&str>,
        by: LookupBy,
    ) -> Result<Order, ApiError> {
        self.call("get_order", self.api.build_get_order(id, site, by), CrmApi::parse_get_order)
            .await
    }

    pub async fn create_order(&self, input: &CreateOrder) -> Result<Order, ApiError> {
        self.call("create_order", self.api.build_create_order(input), CrmApi::parse_create_order)
            .await
    }

    /// Build, execute, validate, extract. Every endpoint goes through here.
    async fn call<R, P>(
        &self,
        endpoint: &'static str,
        request: Result<HttpRequest, ApiError>,
        parse: P,
    ) -> Result<R, ApiError>
    where
        P: FnOnce(&CrmApi, HttpResponse) -> Result<R, ApiError>,
    {
        let request = request?;
        let span = tracing::debug_span!(
            "crm_call",
            endpoint,
            method = request.method.as_str(),
            url = %request.url_without_query(),
        );

        async move {
            let started = Instant::now();
            let response = self.transport.execute(request).await.map_err(|e| {
                tracing::debug!(error = %e, "transport failed");
                ApiError::transport(e)
            })?;
            tracing::debug!(
                status = response.status,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "response received"
            );

            let result = parse(&self.api, response);
            if let Err(err) = &result {
                tracing::trace!(error = %err, "call rejected");
            }
            result
        }
        .instrument(span)
        .await
    }
}

/// Configures a [`RetailCrmClient`].
#[derive(Debug, Clone, Default)]
pub struct ClientBuilder {
    base_url: Option<String>,
    api_key: Option<String>,
    policy: StatusPolicy,
    timeout: Option<Duration>,
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from `RETAILCRM_URL` / `RETAILCRM_API_KEY`, when set.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            base_url: lookup(ENV_BASE_URL),
            api_key: lookup(ENV_API_KEY),
            ..Self::default()
        }
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn status_policy(mut self, policy: StatusPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Request timeout for the default transport. Ignored by
    /// [`build_with`](Self::build_with).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn build_api(&self) -> Result<CrmApi, ApiError> {
        let base_url = self
            .base_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .ok_or_else(|| ApiError::Config("base URL is not set".to_string()))?;
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ApiError::Config(format!(
                "base URL must start with http:// or https://: {base_url}"
            )));
        }
        let api_key = self
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| ApiError::Config("API key is not set".to_string()))?;
        Ok(CrmApi::new(base_url, api_key).with_status_policy(self.policy))
    }

    pub fn build_with<T: Transport>(self, transport: T) -> Result<RetailCrmClient<T>, ApiError> {
        Ok(RetailCrmClient::with_transport(self.build_api()?, transport))
    }

    #[cfg(feature = "reqwest")]
    pub fn build(self) -> Result<RetailCrmClient<ReqwestTransport>, ApiError> {
        let transport = match self.timeout {
            Some(timeout) => ReqwestTransport::with_timeout(timeout)?,
            None => ReqwestTransport::new(),
        };
        self.build_with(transport)
    }
}
