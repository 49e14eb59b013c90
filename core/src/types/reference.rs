//! Reference data: CRM configuration lists exposed as read-only lookups.

use serde::{Deserialize, Serialize};

/// An API version string such as `"5.1"`.
pub type ApiVersion = String;

/// ISO 3166-1 alpha-2 country code.
pub type CountryCode = String;

/// Store front ("site" in CRM terms).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Site {
    pub code: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phones: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_iso: Option<CountryCode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_for_crm: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    pub code: String,
    pub name: String,
    /// Short symbol, e.g. `"pcs"`.
    #[serde(default)]
    pub sym: String,
    #[serde(default)]
    pub default: bool,
    #[serde(default)]
    pub active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderStatus {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub ordering: i64,
    /// Code of the `OrderStatusGroup` this status belongs to.
    #[serde(default)]
    pub group: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderStatusGroup {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub ordering: i64,
    #[serde(default)]
    pub process: bool,
    /// Codes of the statuses in this group.
    #[serde(default)]
    pub statuses: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderType {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub default_for_crm: bool,
    #[serde(default)]
    pub default_for_api: bool,
    #[serde(default)]
    pub ordering: i64,
}

/// Status of a single item inside an order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductStatus {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub ordering: i64,
    #[serde(default)]
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_status_by_product_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_status_for_product_status: Option<String>,
    #[serde(default)]
    pub cancel_status: bool,
}

/// Warehouse.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xml_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SiteAccess {
    #[serde(rename = "access_full")]
    Full,
    #[serde(rename = "access_selective")]
    Selective,
}

/// Methods and sites available to the API key in use.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    /// API method paths the key may call.
    #[serde(default)]
    pub credentials: Vec<String>,
    pub site_access: SiteAccess,
    #[serde(default)]
    pub sites_available: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_decode_site_access() {
        let raw = r#"{
            "credentials": ["/api/v5/orders", "/api/v5/reference/sites"],
            "siteAccess": "access_selective",
            "sitesAvailable": ["main"]
        }"#;
        let creds: Credentials = serde_json::from_str(raw).unwrap();
        assert_eq!(creds.site_access, SiteAccess::Selective);
        assert_eq!(creds.sites_available, vec!["main"]);
        assert_eq!(creds.credentials.len(), 2);
    }

    #[test]
    fn site_tolerates_missing_optional_fields() {
        let site: Site = serde_json::from_str(r#"{"code":"main","name":"Main"}"#).unwrap();
        assert_eq!(site.code, "main");
        assert!(site.url.is_none());
        let back = serde_json::to_value(&site).unwrap();
        assert_eq!(back, serde_json::json!({"code": "main", "name": "Main"}));
    }

    #[test]
    fn status_group_lists_status_codes() {
        let raw = r#"{"code":"new","name":"New","active":true,"ordering":10,"process":false,"statuses":["new","availability-confirmed"]}"#;
        let group: OrderStatusGroup = serde_json::from_str(raw).unwrap();
        assert_eq!(group.statuses, vec!["new", "availability-confirmed"]);
        assert!(group.active);
    }
}
