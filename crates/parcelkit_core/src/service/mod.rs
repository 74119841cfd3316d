//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate configuration, catalog and repository calls into
//!   use-case level APIs.
//! - Keep admin/checkout surfaces decoupled from storage details.

pub mod cart_services;
pub mod packaging_grid;

pub use cart_services::{
    CartAddressResolver, CartId, CartServiceError, CartServiceManagement, CartServiceResult,
    CartShippingContext, InMemoryCartAddressResolver,
};
pub use packaging_grid::{
    escape_html_attr, GridError, GridResult, GridTemplate, PackagingGridPresenter,
};
