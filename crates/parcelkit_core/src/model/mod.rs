//! Domain model for shipment presentation and shipping-info persistence.
//!
//! # Responsibility
//! - Define the canonical data structures shared by grid presentation,
//!   checkout services and the address-extension store.
//! - Keep value-level validation next to the values it protects.
//!
//! # Invariants
//! - Identifiers (store, product, address, cart) are externally assigned by
//!   the host platform; this crate never generates them.
//! - Country codes are ISO-3166-1 alpha-2, uppercase, validated on entry.

pub mod address_extension;
pub mod country;
pub mod customs;
pub mod shipment;
pub mod shipping_info;
