//! Repository Layer
//!
//! Data access for the item table.

mod traits;
mod memory;

pub use traits::{ItemRepository, ListOrder};
pub use memory::MemoryRepository;
