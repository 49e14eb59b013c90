//! Integration module descriptors.
//!
//! Modules are created and edited through the same endpoint with partial
//! payloads, so every outgoing struct here is all-`Option` and skips unset
//! fields on the wire.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::normalize::{map_or_empty_list, optional_map_or_empty_list};

/// A registered module as the CRM reports it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IntegrationModule {
    /// Code of this module instance.
    pub code: String,
    /// Code of the module as registered in the partner cabinet.
    pub integration_code: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub freeze: bool,
    #[serde(default)]
    pub native: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(default)]
    pub base_url: String,
    /// Action name to path relative to `base_url`.
    #[serde(default, deserialize_with = "map_or_empty_list")]
    pub actions: BTreeMap<String, String>,
    #[serde(default)]
    pub available_countries: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub integrations: Option<Integrations>,
}

/// Partial create/edit payload for `integration-modules/{code}/edit`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EditIntegrationModule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub integration_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actions: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_countries: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub integrations: Option<Integrations>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Integrations {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery: Option<DeliveryIntegration>,
}

/// Capabilities of a delivery integration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryIntegration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Keys such as `calculate` or `shipmentPointList`.
    #[serde(
        default,
        deserialize_with = "optional_map_or_empty_list",
        skip_serializing_if = "Option::is_none"
    )]
    pub actions: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payer_type: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plate_print_limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate_delivery_cost: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_packages: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cod_available: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub self_shipment_available: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duplicate_order_product_supported: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_track_number: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_countries: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_fields: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_list: Option<Vec<DeliveryStatus>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plate_list: Option<Vec<Plate>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_data_field_list: Option<Vec<DataField>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipment_data_field_list: Option<Vec<DataField>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<DeliverySettings>,
}

/// A tracking status the delivery service can report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryStatus {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub is_editable: bool,
}

/// Printable form (label, waybill) the module can render.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Plate {
    #[serde(rename = "type")]
    pub kind: String,
    pub code: String,
    pub label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldChoice {
    pub value: String,
    pub label: String,
}

/// Extra field shown on the delivery or shipment form. Partial on purpose.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DataField {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiple: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<FieldChoice>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autocomplete_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affects_cost: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub editable: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SettingsPaymentType {
    pub code: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub cod: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ShipmentPoint {
    pub code: String,
    pub shipment_point_id: i64,
    #[serde(default)]
    pub shipment_point_label: String,
}

/// Maps a CRM order status to a delivery tracking status.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StatusMapping {
    pub code: String,
    pub tracking_status_code: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeliverySettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_payer_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_calculate_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub null_declared_value: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locked_by_default: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_types: Option<Vec<SettingsPaymentType>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipment_points: Option<Vec<ShipmentPoint>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statuses: Option<Vec<StatusMapping>>,
    #[serde(
        default,
        deserialize_with = "optional_map_or_empty_list",
        skip_serializing_if = "Option::is_none"
    )]
    pub delivery_extra_data: Option<BTreeMap<String, String>>,
    #[serde(
        default,
        deserialize_with = "optional_map_or_empty_list",
        skip_serializing_if = "Option::is_none"
    )]
    pub shipment_extra_data: Option<BTreeMap<String, String>>,
}

/// One entry of the `info` block returned after editing a module. Its
/// content differs per integration kind, so it stays untyped.
pub type Info = serde_json::Map<String, Value>;
