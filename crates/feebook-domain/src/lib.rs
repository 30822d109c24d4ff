//! feebook-domain
//!
//! Pure domain models (Student, Payment, SkippedMonth, Ledger).
//! No I/O, no CLI, no storage. Only data types and core enums.

pub mod common;
pub mod ledger;
pub mod payment;
pub mod skipped_month;
pub mod student;

pub use common::*;
pub use ledger::*;
pub use payment::*;
pub use skipped_month::*;
pub use student::*;
