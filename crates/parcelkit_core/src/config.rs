//! Module configuration: carrier identity, shipper origin, service catalog.
//!
//! # Responsibility
//! - Hold per-store module settings and answer route questions against them.
//! - Gate carrier ownership of a shipping method by code prefix.
//!
//! # Invariants
//! - A store without an override always resolves to the default settings.
//! - The cross-border predicate treats two EU member countries as one
//!   customs territory.
//!
//! # See also
//! - `crate::service::packaging_grid` and `crate::service::cart_services`
//!   for the two consumers of this trait.

use crate::model::country::CountryCode;
use crate::model::shipment::StoreId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Carrier code owned by this module. Shipping method codes are prefixed
/// with it, e.g. `parcelkit_paket`.
pub const CARRIER_CODE: &str = "parcelkit";

/// EU member countries forming one customs territory, as of 2026.
const DEFAULT_EU_COUNTRIES: &[&str] = &[
    "AT", "BE", "BG", "HR", "CY", "CZ", "DK", "EE", "FI", "FR", "DE", "GR", "HU", "IE", "IT",
    "LV", "LT", "LU", "MT", "NL", "PL", "PT", "RO", "SK", "SI", "ES", "SE",
];

/// Returns true when the method code belongs to this module's carrier.
pub fn is_module_carrier(shipping_method: &str) -> bool {
    shipping_method
        .strip_prefix(CARRIER_CODE)
        .map_or(false, |rest| rest.is_empty() || rest.starts_with('_'))
}

/// One configurable carrier service, e.g. preferred day or bulky goods.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceDefinition {
    /// Stable service code, referenced by checkout selections.
    pub code: String,
    /// Merchant-facing label.
    pub label: String,
    /// Whether checkout may offer the service to customers.
    pub customer_facing: bool,
    /// Offered on routes inside the shipper's customs territory.
    pub available_domestic: bool,
    /// Offered on routes crossing a customs border.
    pub available_cross_border: bool,
}

impl ServiceDefinition {
    pub fn matches_route(&self, cross_border: bool) -> bool {
        if cross_border {
            self.available_cross_border
        } else {
            self.available_domestic
        }
    }
}

/// Settings for one configuration scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModuleSettings {
    /// Country the merchant ships from.
    pub shipper_country: CountryCode,
    /// Countries sharing the shipper's customs territory.
    pub eu_countries: Vec<CountryCode>,
    /// Carrier services enabled in this scope.
    pub services: Vec<ServiceDefinition>,
}

impl Default for ModuleSettings {
    fn default() -> Self {
        let eu_countries = DEFAULT_EU_COUNTRIES
            .iter()
            .map(|code| CountryCode::new(code).expect("default EU country list is valid"))
            .collect();
        Self {
            shipper_country: CountryCode::new("DE").expect("default shipper country is valid"),
            eu_countries,
            services: Vec::new(),
        }
    }
}

impl ModuleSettings {
    /// Validates scope-level settings invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut codes = BTreeSet::new();
        for service in &self.services {
            if service.code.trim().is_empty() {
                return Err(ConfigError::EmptyServiceCode);
            }
            if !codes.insert(service.code.as_str()) {
                return Err(ConfigError::DuplicateServiceCode(service.code.clone()));
            }
        }
        Ok(())
    }

    fn contains_eu(&self, country: &CountryCode) -> bool {
        self.eu_countries.iter().any(|member| member == country)
    }
}

/// Scope-resolution seam consumed by the grid presenter and cart services.
pub trait ModuleConfig {
    /// Shipper origin country for the store scope.
    fn shipper_country(&self, store_id: StoreId) -> CountryCode;

    /// True when shipping from the store's origin to `destination` crosses
    /// a customs border.
    fn is_cross_border_route(&self, destination: &CountryCode, store_id: StoreId) -> bool;

    /// Services enabled in the store scope.
    fn enabled_services(&self, store_id: StoreId) -> Vec<ServiceDefinition>;
}

/// Store-scoped configuration with a default fallback.
#[derive(Debug, Clone, Default)]
pub struct ScopedModuleConfig {
    default_settings: ModuleSettings,
    store_overrides: BTreeMap<StoreId, ModuleSettings>,
}

impl ScopedModuleConfig {
    pub fn new(default_settings: ModuleSettings) -> Result<Self, ConfigError> {
        default_settings.validate()?;
        Ok(Self {
            default_settings,
            store_overrides: BTreeMap::new(),
        })
    }

    /// Registers override settings for one store scope.
    pub fn with_store(
        mut self,
        store_id: StoreId,
        settings: ModuleSettings,
    ) -> Result<Self, ConfigError> {
        settings.validate()?;
        self.store_overrides.insert(store_id, settings);
        Ok(self)
    }

    fn settings_for(&self, store_id: StoreId) -> &ModuleSettings {
        self.store_overrides
            .get(&store_id)
            .unwrap_or(&self.default_settings)
    }
}

impl ModuleConfig for ScopedModuleConfig {
    fn shipper_country(&self, store_id: StoreId) -> CountryCode {
        self.settings_for(store_id).shipper_country.clone()
    }

    fn is_cross_border_route(&self, destination: &CountryCode, store_id: StoreId) -> bool {
        let settings = self.settings_for(store_id);
        if destination == &settings.shipper_country {
            return false;
        }
        if settings.contains_eu(&settings.shipper_country) && settings.contains_eu(destination) {
            return false;
        }
        true
    }

    fn enabled_services(&self, store_id: StoreId) -> Vec<ServiceDefinition> {
        self.settings_for(store_id).services.clone()
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A service definition carries a blank code.
    EmptyServiceCode,
    /// Two service definitions share one code.
    DuplicateServiceCode(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyServiceCode => write!(f, "service definition has a blank code"),
            Self::DuplicateServiceCode(code) => {
                write!(f, "service code `{code}` is defined more than once")
            }
        }
    }
}

impl Error for ConfigError {}
