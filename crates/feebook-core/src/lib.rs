//! feebook-core
//!
//! Fee accrual, ledger bookkeeping and CSV export for Feebook.
//! Depends on feebook-domain. No CLI, no terminal I/O; persistence goes through [`LedgerStorage`].

pub mod accrual_service;
pub mod error;
pub mod export_service;
pub mod format;
pub mod ledger_store;
pub mod payment_service;
pub mod query_service;
pub mod seed_service;
pub mod skipped_month_service;
pub mod storage;
pub mod student_service;
pub mod time;

pub use accrual_service::*;
pub use error::CoreError;
pub use export_service::*;
pub use format::*;
pub use ledger_store::LedgerStore;
pub use payment_service::*;
pub use query_service::*;
pub use seed_service::*;
pub use skipped_month_service::*;
pub use storage::*;
pub use student_service::*;
pub use time::*;

#[cfg(test)]
mod tests;
