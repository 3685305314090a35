//! Field value store implementations.

pub mod memory;
pub mod postgres;

pub use memory::MemoryFieldStore;
pub use postgres::PostgresFieldStore;
