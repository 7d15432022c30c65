pub mod use_ledger;
pub mod use_session;
