//! Product attribute source for the packaging grid.

use crate::catalog::CatalogResult;
use crate::model::customs::{CustomsAttributeError, ProductCustomsAttributes};
use crate::model::shipment::{ProductId, StoreId};
use std::collections::BTreeMap;

/// Store-scoped source of per-product customs attributes.
///
/// One call resolves all requested products; callers batch their ids so a
/// grid render costs a single catalog round trip.
pub trait ProductCatalog {
    /// Resolves customs attributes for `product_ids` in the store scope.
    ///
    /// Products unknown to the catalog are absent from the returned map
    /// rather than being an error.
    fn customs_attributes(
        &self,
        store_id: StoreId,
        product_ids: &[ProductId],
    ) -> CatalogResult<BTreeMap<ProductId, ProductCustomsAttributes>>;
}

/// Map-backed catalog for tests and hosts without an attribute backend.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProductCatalog {
    attributes: BTreeMap<(StoreId, ProductId), ProductCustomsAttributes>,
}

impl InMemoryProductCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers attributes for one product in one store scope.
    pub fn insert(
        &mut self,
        store_id: StoreId,
        product_id: ProductId,
        attributes: ProductCustomsAttributes,
    ) -> Result<(), CustomsAttributeError> {
        attributes.validate()?;
        self.attributes.insert((store_id, product_id), attributes);
        Ok(())
    }
}

impl ProductCatalog for InMemoryProductCatalog {
    fn customs_attributes(
        &self,
        store_id: StoreId,
        product_ids: &[ProductId],
    ) -> CatalogResult<BTreeMap<ProductId, ProductCustomsAttributes>> {
        let mut resolved = BTreeMap::new();
        for product_id in product_ids {
            if let Some(attributes) = self.attributes.get(&(store_id, *product_id)) {
                resolved.insert(*product_id, attributes.clone());
            }
        }
        Ok(resolved)
    }
}
