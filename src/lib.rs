#![doc(test(attr(deny(warnings))))]

//! Feebook tracks monthly student fees: who owes what, who paid, and which months were
//! excused. This crate wires the workspace libraries into the `feebook_cli` shell.

pub mod cli;
pub mod errors;
pub mod utils;

use std::sync::Once;

pub use errors::{CliError, FeebookError};

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup debug log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::debug!("Feebook tracing initialized.");
    });
}
