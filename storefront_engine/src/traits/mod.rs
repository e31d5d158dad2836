//! # Persistence contracts for the storefront engine.
//!
//! This module defines the interface contracts that storage backends must implement to serve the
//! storefront. The engine never talks to a database directly; everything goes through these traits,
//! and the concrete backend is injected where an API object is constructed.
//!
//! * [`PaymentGatewayDatabase`] covers the order lifecycle: idempotent order submission and the
//!   payment settlement transition.
//! * [`UserManagement`] covers user records and the role checks that gate administrative
//!   operations.
//! * [`CatalogManagement`] covers plain product reads and writes.

mod catalog_management;
mod payment_gateway_database;
mod user_management;

pub use catalog_management::{CatalogApiError, CatalogManagement};
pub use payment_gateway_database::{PaymentGatewayDatabase, PaymentGatewayError};
pub use user_management::{AuthApiError, UserManagement};
