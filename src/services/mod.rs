//! Business operations behind the HTTP routes.
//!
//! Services check who may do what, then talk to the actors through their
//! clients. They return [`AppError`](crate::error::AppError) so handlers can
//! pass failures straight through.

pub mod accounts;
pub mod catalog;
pub mod orders;

pub use accounts::{AccountService, CustomerForm, LoginRequest, LoginResponse, VendorForm};
pub use catalog::{CatalogService, MediaUploads, ProductAttrs};
pub use orders::{OrderFilters, OrderService, PlaceOrder};
