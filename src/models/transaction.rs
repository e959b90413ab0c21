//! This file defines the type `Transaction`, the core type of the
//! money-tracking part of the application.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::models::{Currency, DatabaseID, UserID};

/// Whether a transaction brought money in or took money out.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionKind {
    /// Money earned. Serialized as `ENTRADA` on the wire.
    #[serde(rename = "ENTRADA")]
    Income,
    /// Money spent. Serialized as `SAIDA` on the wire.
    #[serde(rename = "SAIDA")]
    Expense,
}

impl Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionKind::Income => write!(f, "ENTRADA"),
            TransactionKind::Expense => write!(f, "SAIDA"),
        }
    }
}

/// The error returned when parsing a string that is not a transaction kind.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("the type must be 'ENTRADA' or 'SAIDA'")]
pub struct UnknownTransactionKind;

impl FromStr for TransactionKind {
    type Err = UnknownTransactionKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ENTRADA" => Ok(TransactionKind::Income),
            "SAIDA" => Ok(TransactionKind::Expense),
            _ => Err(UnknownTransactionKind),
        }
    }
}

/// An income or expense, i.e. an event where money was either earned or
/// spent.
///
/// Immutable once created. `user_id` is optional because rows created before
/// accounts were introduced are not owned by anyone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    id: DatabaseID,
    #[serde(rename = "type")]
    kind: TransactionKind,
    amount: f64,
    description: String,
    #[serde(rename = "moeda")]
    currency: Currency,
    #[serde(rename = "userId", default, skip_serializing_if = "Option::is_none")]
    user_id: Option<UserID>,
    #[serde(rename = "createdAt", with = "time::serde::rfc3339")]
    created_at: OffsetDateTime,
}

impl Transaction {
    /// Assemble a transaction from its stored parts.
    pub fn new(
        id: DatabaseID,
        kind: TransactionKind,
        amount: f64,
        description: String,
        currency: Currency,
        user_id: Option<UserID>,
        created_at: OffsetDateTime,
    ) -> Self {
        Self {
            id,
            kind,
            amount,
            description,
            currency,
            user_id,
            created_at,
        }
    }

    /// The ID of the transaction.
    pub fn id(&self) -> DatabaseID {
        self.id
    }

    /// Whether this transaction is an income or an expense.
    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    /// The amount of money earned or spent. Always positive, the sign is
    /// carried by the kind.
    pub fn amount(&self) -> f64 {
        self.amount
    }

    /// A text description of what the transaction was for.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The currency the amount is denominated in.
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// The ID of the user that owns this transaction, if any.
    pub fn user_id(&self) -> Option<UserID> {
        self.user_id
    }

    /// When the transaction was recorded.
    pub fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }
}

/// A validated transaction that has not been stored yet.
///
/// Produced by the input validation at the HTTP boundary; the store stamps
/// the ID and creation time on insert.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// Whether the new transaction is an income or an expense.
    pub kind: TransactionKind,
    /// The positive amount of money earned or spent.
    pub amount: f64,
    /// A description between 1 and 255 characters.
    pub description: String,
    /// The currency the amount is denominated in.
    pub currency: Currency,
    /// The owning user, or `None` for unscoped rows.
    pub user_id: Option<UserID>,
}
