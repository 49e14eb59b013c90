//! Typed client for the RetailCRM REST API.
//!
//! # Overview
//! One method per endpoint: reference data lookups, order creation and
//! retrieval, delivery types/services and integration modules. Each call is
//! a single HTTP request whose envelope is validated before the payload is
//! decoded.
//!
//! # Design
//! - `CrmApi` is the sans-IO core: `build_*` produces an `HttpRequest`,
//!   `parse_*` consumes an `HttpResponse`. It holds only the base URL, the
//!   API key and the status policy.
//! - `RetailCrmClient` pairs a `CrmApi` with a [`Transport`] and exposes the
//!   async endpoint methods. The default transport is `reqwest`
//!   (`reqwest` feature).
//! - Collections that the CRM sends as `{code: record}` objects are
//!   normalized to `Vec`s in wire order.
//!
//! ```rust,no_run
//! use retailcrm_core::{LookupBy, RetailCrmClient};
//!
//! # async fn run() -> Result<(), retailcrm_core::ApiError> {
//! let client = RetailCrmClient::new("https://demo.retailcrm.ru", "api-key")?;
//! for site in client.sites().await? {
//!     println!("{} {}", site.code, site.name);
//! }
//! let order = client.get_order("ext-1", Some("main"), LookupBy::ExternalId).await?;
//! println!("order #{}", order.number);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod client;
pub mod envelope;
pub mod error;
pub mod http;
pub mod normalize;
pub mod transport;
pub mod types;

pub use api::CrmApi;
pub use client::{ClientBuilder, RetailCrmClient};
pub use envelope::{Envelope, StatusPolicy};
pub use error::{ApiError, BoxError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use normalize::{map_to_list, ListOrMap};
#[cfg(feature = "reqwest")]
pub use transport::ReqwestTransport;
pub use transport::Transport;
pub use types::*;
