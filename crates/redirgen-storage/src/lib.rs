//! Row store implementations for the redirect table.

pub mod memory;
pub mod mysql;

pub use memory::InMemoryRepository;
pub use mysql::MySqlRepository;
pub use redirgen_core::repository::{ReadRepository, Repository, Result};
pub use redirgen_core::StorageError;
