//! Storefront Engine
//!
//! The storefront engine contains the core logic for the manufacturing storefront backend:
//! accepting order submissions exactly once, issuing role decisions for administrative operations,
//! and reconciling confirmed payments against their orders. It is HTTP-framework agnostic.
//!
//! The library is divided into two main sections:
//! 1. Database management and control ([`mod@sqlite`]). You should never need to access the
//!    database directly. Instead, use the public API provided by the engine. The exception is the
//!    data types used in the database; these are defined in the [`db_types`] module and are public.
//! 2. The engine public API ([`mod@sfe_api`]). This provides the public-facing functionality of
//!    the engine: order flow, authorization, user records and the product catalog. Backends need
//!    to implement the traits in the [`traits`] module in order to serve the engine.
//!
//! The engine also provides a set of events that can be subscribed to. These events are emitted
//! when certain transitions occur - a new order was created, an order was paid - so that other
//! components (a notification sender, say) can hook in without the engine knowing about them.

pub mod db_types;
pub mod events;
mod sfe_api;
pub mod traits;

#[cfg(feature = "sqlite")]
mod sqlite;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDatabase;
pub use sfe_api::{
    auth_api::AuthApi,
    catalog_api::CatalogApi,
    order_flow_api::OrderFlowApi,
    order_objects,
    payment_objects,
    user_api::UserApi,
};
