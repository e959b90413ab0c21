//! Defines the transaction store trait.

use crate::{
    Error,
    models::{NewTransaction, Transaction, UserID},
};

/// Handles the creation and retrieval of transactions.
///
/// Transactions are immutable once created, so there are no update or delete
/// operations.
pub trait TransactionStore {
    /// Insert a validated transaction, stamping its ID and creation time.
    fn create(&mut self, new_transaction: NewTransaction) -> Result<Transaction, Error>;

    /// Retrieve the transactions owned by `user_id`, newest first.
    ///
    /// An empty vector is returned if the user has no transactions.
    fn get_by_user(&self, user_id: UserID) -> Result<Vec<Transaction>, Error>;

    /// Retrieve every transaction regardless of owner, newest first.
    ///
    /// Supports the unscoped listing kept for clients that predate accounts.
    fn all(&self) -> Result<Vec<Transaction>, Error>;
}
