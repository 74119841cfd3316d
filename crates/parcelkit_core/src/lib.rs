//! Core domain logic for the parcelkit shipping module.
//! This crate is the single source of truth for business invariants.

pub mod catalog;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use catalog::{
    CatalogError, CatalogResult, CountryCatalog, CountryOption, InMemoryCountryCatalog,
    InMemoryProductCatalog, ProductCatalog,
};
pub use config::{
    is_module_carrier, ConfigError, ModuleConfig, ModuleSettings, ScopedModuleConfig,
    ServiceDefinition, CARRIER_CODE,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::address_extension::{AddressExtensionRecord, AddressId};
pub use model::country::{CountryCode, CountryCodeError};
pub use model::customs::{CustomsAttributeError, ProductCustomsAttributes};
pub use model::shipment::{ProductId, ShipmentContext, ShipmentItem, StoreId};
pub use model::shipping_info::{
    CustomsDeclaration, ServiceSelection, ShippingInfo, ShippingInfoError,
};
pub use repo::{
    AddressExtensionRepository, RepoError, RepoResult, SqliteAddressExtensionRepository,
};
pub use service::{
    escape_html_attr, CartAddressResolver, CartId, CartServiceError, CartServiceManagement,
    CartServiceResult, CartShippingContext, GridError, GridResult, GridTemplate,
    InMemoryCartAddressResolver, PackagingGridPresenter,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
