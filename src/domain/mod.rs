//! Domain types and ports for the payment acceptance engine.

pub mod account;
pub mod ledger;
pub mod outcome;
pub mod payment;
pub mod ports;
