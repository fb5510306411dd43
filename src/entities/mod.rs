// Entity Models
//
// Plain records shared by every engine:
// - Account: a node of the chart, keyed by code, parent held by code
// - Transaction: one debit/credit movement
// Each has a serde "record" twin used for persistence.

pub mod account;
pub mod transaction;

pub use account::{Account, AccountRecord, AccountType};
pub use transaction::{Transaction, TransactionRecord};
