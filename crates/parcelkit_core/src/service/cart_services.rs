//! Checkout service selection management for quotes.
//!
//! # Responsibility
//! - Answer which carrier services a cart may book for its route.
//! - Persist validated service selections through the address extension
//!   repository.
//!
//! # Invariants
//! - Carts whose shipping method belongs to another carrier get no
//!   services offered.
//! - Saved selections are validated against the route's service set.

use crate::config::{is_module_carrier, ModuleConfig, ServiceDefinition};
use crate::model::address_extension::{AddressExtensionRecord, AddressId};
use crate::model::country::CountryCode;
use crate::model::shipment::StoreId;
use crate::model::shipping_info::{ServiceSelection, ShippingInfo};
use crate::repo::{AddressExtensionRepository, RepoError};
use std::collections::{BTreeMap, BTreeSet};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Identifier of a checkout quote, assigned externally.
pub type CartId = i64;

/// Shipping scope of one cart: the address its selections attach to and
/// the store whose configuration applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartShippingContext {
    pub address_id: AddressId,
    pub store_id: StoreId,
}

/// Resolves carts to their shipping scope.
pub trait CartAddressResolver {
    /// Returns the shipping scope for the cart, if the cart exists and
    /// has a shipping address.
    fn shipping_context(&self, cart_id: CartId) -> Option<CartShippingContext>;
}

/// Map-backed resolver for tests and embedding hosts.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCartAddressResolver {
    contexts: BTreeMap<CartId, CartShippingContext>,
}

impl InMemoryCartAddressResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, cart_id: CartId, context: CartShippingContext) {
        self.contexts.insert(cart_id, context);
    }
}

impl CartAddressResolver for InMemoryCartAddressResolver {
    fn shipping_context(&self, cart_id: CartId) -> Option<CartShippingContext> {
        self.contexts.get(&cart_id).copied()
    }
}

pub type CartServiceResult<T> = Result<T, CartServiceError>;

/// Errors from cart service management operations.
#[derive(Debug)]
pub enum CartServiceError {
    /// The cart does not exist or has no shipping address.
    CartNotFound(CartId),
    /// A selected service is not offered on the cart's route.
    ServiceNotAvailable(String),
    /// The same service was selected more than once.
    DuplicateService(String),
    /// Persistence through the address extension repository failed.
    Repo(RepoError),
}

impl Display for CartServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CartNotFound(id) => write!(f, "cart not found: {id}"),
            Self::ServiceNotAvailable(code) => {
                write!(f, "service `{code}` is not available for this route")
            }
            Self::DuplicateService(code) => {
                write!(f, "service `{code}` is selected more than once")
            }
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CartServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for CartServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Use-case service for reading and saving cart service selections.
pub struct CartServiceManagement<M, R, A>
where
    M: ModuleConfig,
    R: AddressExtensionRepository,
    A: CartAddressResolver,
{
    config: M,
    repo: R,
    resolver: A,
}

impl<M, R, A> CartServiceManagement<M, R, A>
where
    M: ModuleConfig,
    R: AddressExtensionRepository,
    A: CartAddressResolver,
{
    pub fn new(config: M, repo: R, resolver: A) -> Self {
        Self {
            config,
            repo,
            resolver,
        }
    }

    /// Lists customer-facing services bookable on the cart's route.
    ///
    /// # Contract
    /// - Shipping methods of other carriers yield an empty list, not an
    ///   error: checkout probes every method it renders.
    pub fn available_services(
        &self,
        cart_id: CartId,
        destination: &CountryCode,
        shipping_method: &str,
    ) -> CartServiceResult<Vec<ServiceDefinition>> {
        let context = self.context(cart_id)?;

        if !is_module_carrier(shipping_method) {
            return Ok(Vec::new());
        }

        let cross_border = self
            .config
            .is_cross_border_route(destination, context.store_id);

        Ok(self
            .config
            .enabled_services(context.store_id)
            .into_iter()
            .filter(|service| service.customer_facing && service.matches_route(cross_border))
            .collect())
    }

    /// Validates and persists service selections for the cart.
    ///
    /// Existing shipping info for the address is updated in place;
    /// customs data already stored there survives the selection change.
    pub fn save_selection(
        &self,
        cart_id: CartId,
        destination: &CountryCode,
        selections: Vec<ServiceSelection>,
    ) -> CartServiceResult<AddressExtensionRecord> {
        let context = self.context(cart_id)?;
        let cross_border = self
            .config
            .is_cross_border_route(destination, context.store_id);

        let bookable: BTreeSet<String> = self
            .config
            .enabled_services(context.store_id)
            .into_iter()
            .filter(|service| service.matches_route(cross_border))
            .map(|service| service.code)
            .collect();

        let mut seen = BTreeSet::new();
        for selection in &selections {
            if !seen.insert(selection.code.clone()) {
                return Err(CartServiceError::DuplicateService(selection.code.clone()));
            }
            if !bookable.contains(&selection.code) {
                return Err(CartServiceError::ServiceNotAvailable(
                    selection.code.clone(),
                ));
            }
        }

        let mut record = match self.repo.get_by_id(context.address_id) {
            Ok(record) => record,
            Err(RepoError::NotFound(_)) => {
                AddressExtensionRecord::new(context.address_id, ShippingInfo::default())
            }
            Err(err) => return Err(err.into()),
        };

        record.shipping_info.services = selections;
        Ok(self.repo.save(&record)?)
    }

    fn context(&self, cart_id: CartId) -> CartServiceResult<CartShippingContext> {
        self.resolver
            .shipping_context(cart_id)
            .ok_or(CartServiceError::CartNotFound(cart_id))
    }
}
