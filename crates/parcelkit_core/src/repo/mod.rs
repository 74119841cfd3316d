//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts for shipping info.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository writes enforce `ShippingInfo::validate()` before persistence.
//! - Write failures surface as semantic errors (`CouldNotSave`,
//!   `CouldNotDelete`) that preserve the underlying message.

pub mod address_extension_repo;

pub use address_extension_repo::{
    AddressExtensionRepository, RepoError, RepoResult, SqliteAddressExtensionRepository,
};
