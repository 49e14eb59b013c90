use serde::{Deserialize, Serialize};

/// Integration module attached to a payment type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentModuleSummary {
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentType {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub default_for_crm: bool,
    #[serde(default)]
    pub default_for_api: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub delivery_types: Vec<String>,
    #[serde(default)]
    pub payment_statuses: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub integration_module: Option<PaymentModuleSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentStatus {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub default_for_crm: bool,
    #[serde(default)]
    pub default_for_api: bool,
    /// Whether reaching this status means the payment is settled.
    #[serde(default)]
    pub payment_complete: bool,
    #[serde(default)]
    pub ordering: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub payment_types: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_type_with_module() {
        let raw = r#"{
            "code": "card",
            "name": "Card",
            "active": true,
            "deliveryTypes": ["courier"],
            "paymentStatuses": ["paid", "not-paid"],
            "integrationModule": {"active": true, "name": "Acquiring"}
        }"#;
        let pt: PaymentType = serde_json::from_str(raw).unwrap();
        assert_eq!(pt.payment_statuses.len(), 2);
        let module = pt.integration_module.unwrap();
        assert_eq!(module.name, "Acquiring");
        assert!(module.logo.is_none());
    }
}
