//! SQLite backed implementations of the store traits.

mod session;
mod transaction;
mod user;

pub use session::SQLiteSessionStore;
pub use transaction::SQLiteTransactionStore;
pub use user::SQLiteUserStore;
