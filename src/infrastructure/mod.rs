//! Concrete adapters behind the domain ports.

pub mod in_memory;
pub mod pricing;
#[cfg(feature = "storage-rocksdb")]
pub mod rocksdb;
