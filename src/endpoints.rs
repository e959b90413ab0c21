//! The API endpoint URIs.

/// The route for creating, inspecting and deleting the login session.
pub const SESSION: &str = "/api/session";
/// The route to access the session user's transactions.
pub const TRANSACTIONS: &str = "/api/transactions";
/// The route for the session user's aggregated balance.
pub const BALANCE: &str = "/api/balance";
/// The unscoped transaction listing kept for clients that predate accounts.
pub const LEGACY_TRANSACTIONS: &str = "/api/legacy/transactions";
