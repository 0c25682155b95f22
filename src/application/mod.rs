//! Application layer orchestrating the payment acceptance flow.
//!
//! [`engine::PaymentEngine`] is the single entry point. It owns the injected
//! collaborators (directory, pricing oracle, ledger) and sequences the
//! resolve / match / persist stages, converting every business failure into
//! an [`crate::domain::outcome::Outcome`] variant.

pub mod engine;
pub mod matcher;
pub mod resolver;
