//! Key-value stores backing saved display orders.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;
