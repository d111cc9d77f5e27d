//! Storage adapters for the session blob.

mod fs_store;
mod in_memory;

pub use fs_store::FsSessionStore;
pub use in_memory::InMemorySessionStore;
