//! # Storefront engine public API
//!
//! The `sfe_api` module exposes the programmatic API for the storefront engine. The API is
//! modular, so that clients can pick and choose the functionality they need; each API object wraps
//! a backend that implements the corresponding trait from [`crate::traits`].
//!
//! * [`order_flow_api`] is the primary API for order submission and payment reconciliation.
//! * [`auth_api`] answers role questions and performs role elevation.
//! * [`user_api`] manages user records (sign-in upserts, listings).
//! * [`catalog_api`] wraps the plain product catalog operations.
//!
//! # API usage
//!
//! The pattern for all the APIs is the same: construct the API with a backend that implements the
//! required trait.
//!
//! ```rust,ignore
//! use storefront_engine::{AuthApi, SqliteDatabase};
//! let db = SqliteDatabase::new_with_url(...).await?;
//! // SqliteDatabase implements UserManagement
//! let api = AuthApi::new(db);
//! api.require_admin("ops@example.com").await?;
//! ```

pub mod auth_api;
pub mod catalog_api;
pub mod order_flow_api;
pub mod order_objects;
pub mod payment_objects;
pub mod user_api;
