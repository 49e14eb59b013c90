//! Delivery services, delivery types, and the cost-calculation request the
//! CRM sends to a delivery integration module.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryService {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub active: bool,
}

/// Payload for creating or editing a delivery service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateDeliveryService {
    pub code: String,
    pub name: String,
    /// Code of the delivery type the service belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryType {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub default_cost: f64,
    #[serde(default)]
    pub default_net_cost: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub payment_types: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub integration_code: Option<String>,
    /// Codes of `DeliveryService`s; not checked client-side.
    #[serde(default)]
    pub delivery_services: Vec<String>,
    #[serde(default)]
    pub default_for_crm: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vat_rate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_tariff_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_tariff_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_tariff_name: Option<String>,
    /// The module computes the cost per order rather than using the defaults.
    #[serde(default)]
    pub is_dynamic_cost_calculation: bool,
    #[serde(default)]
    pub is_auto_cost_calculation: bool,
    #[serde(default)]
    pub is_auto_net_cost_calculation: bool,
    #[serde(default)]
    pub is_cost_depends_on_region_and_weight_and_sum: bool,
    #[serde(default)]
    pub is_cost_depends_on_date_time: bool,
}

/// Payload for creating a delivery type. `code`, `name` and both default
/// costs are mandatory.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateDeliveryType {
    pub code: String,
    pub name: String,
    pub default_cost: f64,
    pub default_net_cost: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub integration_module: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region_weight_cost_conditions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vat_rate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_tariff_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_tariff_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_tariff_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_for_crm: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub integration_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_types: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_services: Option<Vec<String>>,
}

/// Partial update of an existing delivery type. Only `name` is required;
/// unset fields are left untouched on the server.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDeliveryType {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_cost: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_net_cost: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub integration_module: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region_weight_cost_conditions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vat_rate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_tariff_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_tariff_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_tariff_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_for_crm: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub integration_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_types: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_services: Option<Vec<String>>,
}

/// Unit of measure of a packaged item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PackageItemUnit {
    pub code: String,
    pub name: String,
    pub sym: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PackageItem {
    pub offer_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xml_id: Option<String>,
    pub name: String,
    /// Declared value per unit.
    #[serde(default)]
    pub declared_value: f64,
    /// Cash on delivery per unit.
    #[serde(default)]
    pub cod: f64,
    /// `"none"` when the item is VAT exempt.
    #[serde(default)]
    pub vat_rate: String,
    pub quantity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<PackageItemUnit>,
    /// Unit cost after discounts.
    #[serde(default)]
    pub cost: f64,
    #[serde(default)]
    pub marking_codes: Vec<String>,
}

/// Dimensions are millimetres, weight is grams.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Package {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_id: Option<String>,
    pub weight: f64,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub length: f64,
    #[serde(default)]
    pub height: f64,
    #[serde(default)]
    pub items: Vec<PackageItem>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CalculateData {
    #[serde(default)]
    pub packages: Vec<Package>,
}

/// Cost-calculation request the CRM posts to a delivery module's
/// `calculate` action.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryCalculate {
    /// Client id of the module instance in the external service.
    pub client_id: String,
    pub calculate: CalculateData,
}
