pub mod account;
pub mod transaction;
pub mod user;

pub use account::{Account, AccountType};
pub use transaction::{Transaction, TransactionStatus, TransactionType};
pub use user::User;
