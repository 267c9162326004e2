pub mod db;
pub mod memory;
pub mod seed;

pub use db::PgDocumentStore;
pub use memory::MemoryStore;
pub use seed::seeded_store;
