use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use msf_common::Cents;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use thiserror::Error;

//--------------------------------------        Role          ---------------------------------------------------------
/// The authorization level attached to a user record.
///
/// Roles live on the user record, not inside access tokens; a gated request always sees the
/// current role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Role {
    Regular,
    Admin,
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Regular => write!(f, "regular"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("Invalid role: {0}")]
pub struct RoleConversionError(String);

impl FromStr for Role {
    type Err = RoleConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "regular" => Ok(Self::Regular),
            "admin" => Ok(Self::Admin),
            s => Err(RoleConversionError(s.to_string())),
        }
    }
}

//--------------------------------------        User          ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//--------------------------------------       Product        ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub price: Cents,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub price: Cents,
}

impl NewProduct {
    pub fn new<S: Into<String>>(name: S, price: Cents) -> Self {
        Self { name: name.into(), price }
    }
}

//--------------------------------------        Order         ---------------------------------------------------------
/// A stored order record.
///
/// `price` is the total the buyer saw at submission time, snapshotted so that later catalog edits
/// cannot change what an open order owes. Invariant: `transaction_id` is populated if and only if
/// `paid` is true, and only the payment reconciliation flow ever writes either field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i64,
    pub product_id: i64,
    pub buyer_email: String,
    pub quantity: i64,
    pub price: Cents,
    pub paid: bool,
    pub transaction_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//--------------------------------------       NewOrder       ---------------------------------------------------------
/// An order submission.
///
/// Two submissions are the *same* order when all four fields match exactly; resubmitting an
/// identical order (a client retry, a double-click) must not create a second record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    pub product_id: i64,
    pub buyer_email: String,
    pub quantity: i64,
    pub price: Cents,
}

impl NewOrder {
    pub fn new<S: Into<String>>(product_id: i64, buyer_email: S, quantity: i64, price: Cents) -> Self {
        Self { product_id, buyer_email: buyer_email.into(), quantity, price }
    }

    /// True when `order` is the stored record for this submission.
    pub fn matches(&self, order: &Order) -> bool {
        self.product_id == order.product_id &&
            self.buyer_email == order.buyer_email &&
            self.quantity == order.quantity &&
            self.price == order.price
    }
}

//--------------------------------------    PaymentRecord     ---------------------------------------------------------
/// The record of a confirmed payment. Written exactly once per transaction id and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecord {
    pub transaction_id: String,
    /// Minor currency units, as reported by the gateway.
    pub amount: Cents,
    pub order_id: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPaymentRecord {
    pub transaction_id: String,
    pub amount: Cents,
}

impl NewPaymentRecord {
    pub fn new<S: Into<String>>(transaction_id: S, amount: Cents) -> Self {
        Self { transaction_id: transaction_id.into(), amount }
    }
}
