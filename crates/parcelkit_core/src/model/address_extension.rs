//! Order-address extension record carrying shipping info.
//!
//! # Responsibility
//! - Pair an order address id with its shipping-info aggregate.
//!
//! # Invariants
//! - `address_id` is assigned by the order subsystem, never generated here.

use crate::model::shipping_info::ShippingInfo;
use serde::{Deserialize, Serialize};

/// Identifier of an order shipping address, assigned externally.
pub type AddressId = i64;

/// One row of the address extension store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AddressExtensionRecord {
    pub address_id: AddressId,
    pub shipping_info: ShippingInfo,
}

impl AddressExtensionRecord {
    pub fn new(address_id: AddressId, shipping_info: ShippingInfo) -> Self {
        Self {
            address_id,
            shipping_info,
        }
    }
}
