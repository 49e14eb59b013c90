//! Domain DTOs for the CRM API.
//!
//! # Design
//! Incoming records tolerate missing optional fields and ignore unknown
//! ones; the CRM adds fields between versions. Outgoing create/edit payloads
//! are separate structs from the records they create, so "which fields are
//! mandatory for this operation" lives in the type rather than in docs.

pub mod delivery;
pub mod integration;
pub mod order;
pub mod payment;
pub mod reference;

pub use delivery::{
    CalculateData, CreateDeliveryService, CreateDeliveryType, DeliveryCalculate, DeliveryService,
    DeliveryType, Package, PackageItem, PackageItemUnit, UpdateDeliveryType,
};
pub use integration::{
    DataField, DeliveryIntegration, DeliverySettings, DeliveryStatus, EditIntegrationModule,
    FieldChoice, Info, IntegrationModule, Integrations, Plate, SettingsPaymentType, ShipmentPoint,
    StatusMapping,
};
pub use order::{
    CompanyRef, Contragent, CreateOrder, CustomerRef, DeliveryAddress, Enterpreneur,
    ItemExternalId, ItemProperty, LegalEntity, LookupBy, NewOrder, OfferRef, Order, OrderDelivery,
    OrderItem, OrderPayment, OrderSource, PriceTypeRef, PrivilegeType,
};
pub use payment::{PaymentModuleSummary, PaymentStatus, PaymentType};
pub use reference::{
    ApiVersion, CountryCode, Credentials, OrderStatus, OrderStatusGroup, OrderType, ProductStatus,
    Site, SiteAccess, Store, Unit,
};
