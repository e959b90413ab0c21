//! This file defines the routes for listing and creating transactions.

use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::{
    AppState,
    models::{NewTransaction, Transaction, User, UserID},
    stores::TransactionStore,
    validation::ValidationErrors,
};

/// The request body for `POST /api/transactions`.
///
/// Every field is optional at the serde level so that missing fields produce
/// field-level validation errors instead of a deserialization failure.
/// `amount` is kept as raw JSON because clients send it both as a number and
/// as a numeric string.
#[derive(Debug, Clone, Deserialize)]
pub struct NewTransactionData {
    /// The transaction kind, `ENTRADA` or `SAIDA` in any casing.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// The positive amount, a JSON number or a numeric string.
    pub amount: Option<serde_json::Value>,
    /// A description between 1 and 255 characters.
    pub description: Option<String>,
    /// The currency code.
    pub moeda: Option<String>,
}

/// The response body for the transaction listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionListResponse {
    /// The transactions, newest first.
    pub data: Vec<Transaction>,
}

/// The response body for a created transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedTransactionResponse {
    /// The stored transaction, with its ID and creation time stamped.
    pub transaction: Transaction,
}

fn parse_amount(raw: &serde_json::Value) -> Option<f64> {
    match raw {
        serde_json::Value::Number(number) => number.as_f64(),
        serde_json::Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

/// Validate the input shape for creating a transaction owned by `user_id`.
fn validate_new_transaction(
    data: NewTransactionData,
    user_id: UserID,
) -> Result<NewTransaction, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let kind = match data.kind.as_deref() {
        None => {
            errors.push("type", "the type must be 'ENTRADA' or 'SAIDA'");
            None
        }
        Some(raw) => match raw.to_uppercase().parse() {
            Ok(kind) => Some(kind),
            Err(_) => {
                errors.push("type", "the type must be 'ENTRADA' or 'SAIDA'");
                None
            }
        },
    };

    let amount = match data.amount.as_ref().and_then(parse_amount) {
        None => {
            errors.push("amount", "the amount must be a number");
            None
        }
        Some(amount) if !amount.is_finite() || amount <= 0.0 => {
            errors.push("amount", "the amount must be greater than zero");
            None
        }
        Some(amount) => Some(amount),
    };

    let description = match data.description {
        None => {
            errors.push("description", "the description is required");
            None
        }
        Some(description) if description.is_empty() => {
            errors.push("description", "the description is required");
            None
        }
        Some(description) if description.chars().count() > 255 => {
            errors.push(
                "description",
                "the description must be at most 255 characters",
            );
            None
        }
        Some(description) => Some(description),
    };

    let currency = match data.moeda.as_deref() {
        None => {
            errors.push("moeda", "the currency must be one of 'USD', 'AOA' or 'EUR'");
            None
        }
        Some(raw) => match raw.parse() {
            Ok(currency) => Some(currency),
            Err(_) => {
                errors.push("moeda", "the currency must be one of 'USD', 'AOA' or 'EUR'");
                None
            }
        },
    };

    match (kind, amount, description, currency) {
        (Some(kind), Some(amount), Some(description), Some(currency)) => {
            errors.into_result(NewTransaction {
                kind,
                amount,
                description,
                currency,
                user_id: Some(user_id),
            })
        }
        _ => Err(errors),
    }
}

/// Handler for `GET /api/transactions`: lists the session user's
/// transactions, newest first.
pub async fn get_transactions(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Response {
    match state.transaction_store.get_by_user(user.id()) {
        Ok(data) => (StatusCode::OK, Json(TransactionListResponse { data })).into_response(),
        Err(error) => error.into_response(),
    }
}

/// Handler for `POST /api/transactions`: records a transaction owned by the
/// session user.
///
/// Responds 201 with the stored record, or 400 with field-level reasons.
pub async fn create_transaction(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(data): Json<NewTransactionData>,
) -> Response {
    let new_transaction = match validate_new_transaction(data, user.id()) {
        Ok(new_transaction) => new_transaction,
        Err(errors) => return errors.into_response(),
    };

    let mut store = state.transaction_store.clone();

    match store.create(new_transaction) {
        Ok(transaction) => (
            StatusCode::CREATED,
            Json(CreatedTransactionResponse { transaction }),
        )
            .into_response(),
        Err(error) => error.into_response(),
    }
}

/// Handler for `GET /api/legacy/transactions`: the unscoped listing kept for
/// clients that predate accounts.
///
/// Returns every transaction regardless of owner, newest first, or 204 when
/// there are none.
pub async fn get_all_transactions(State(state): State<AppState>) -> Response {
    match state.transaction_store.all() {
        Ok(data) if data.is_empty() => StatusCode::NO_CONTENT.into_response(),
        Ok(data) => (StatusCode::OK, Json(TransactionListResponse { data })).into_response(),
        Err(error) => error.into_response(),
    }
}
