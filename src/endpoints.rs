//! The API endpoint URIs.

/// The route to check that the server is up.
pub const HEALTH: &str = "/api/health";
/// The route to list or create accounts.
pub const ACCOUNTS: &str = "/api/accounts";
/// The route to mark an account as the owner's default.
pub const ACCOUNT_DEFAULT: &str = "/api/accounts/{account_id}/default";
/// The route to list or create transactions.
pub const TRANSACTIONS: &str = "/api/transactions";
/// The route to access a single transaction.
pub const TRANSACTION: &str = "/api/transactions/{transaction_id}";
