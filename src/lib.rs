#![doc(test(attr(deny(warnings))))]

//! Freelance Core offers the record store, derived financial metrics, and
//! persistence primitives behind a freelancer invoicing and expense dashboard.

pub mod analytics;
pub mod cli;
pub mod config;
pub mod core;
pub mod currency;
pub mod domain;
pub mod seed;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Freelance Core tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
    }
}
