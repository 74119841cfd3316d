//! Read-only shipment view handed in by the host platform.
//!
//! # Responsibility
//! - Carry the store scope, destination and line items one grid render
//!   works on.
//!
//! # Invariants
//! - Line-item order is preserved; the host decides it.
//! - `product_ids()` returns each product once, in first-occurrence order.

use crate::model::country::CountryCode;
use std::collections::BTreeSet;

/// Store scope identifier assigned by the host platform.
pub type StoreId = u32;

/// Product entity identifier assigned by the host catalog.
pub type ProductId = i64;

/// One shipment line item.
#[derive(Debug, Clone, PartialEq)]
pub struct ShipmentItem {
    /// Product referenced by this row.
    pub product_id: ProductId,
    /// Shipped quantity for this row.
    pub qty: f64,
}

impl ShipmentItem {
    pub fn new(product_id: ProductId, qty: f64) -> Self {
        Self { product_id, qty }
    }
}

/// Read-only view of one shipment for grid presentation.
#[derive(Debug, Clone, PartialEq)]
pub struct ShipmentContext {
    /// Store the shipment belongs to; scopes configuration and catalog reads.
    pub store_id: StoreId,
    /// Destination country from the shipment's shipping address.
    pub destination_country: CountryCode,
    /// Ordered line items, one grid row each.
    pub items: Vec<ShipmentItem>,
}

impl ShipmentContext {
    pub fn new(
        store_id: StoreId,
        destination_country: CountryCode,
        items: Vec<ShipmentItem>,
    ) -> Self {
        Self {
            store_id,
            destination_country,
            items,
        }
    }

    /// Returns every referenced product id once, in first-occurrence order.
    pub fn product_ids(&self) -> Vec<ProductId> {
        let mut seen = BTreeSet::new();
        self.items
            .iter()
            .map(|item| item.product_id)
            .filter(|product_id| seen.insert(*product_id))
            .collect()
    }
}
