pub mod accounts;
pub mod ledger;
pub mod statement;
pub mod users;
