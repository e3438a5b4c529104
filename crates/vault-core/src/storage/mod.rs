//! Storage backends for item records
//!
//! This module provides two storage backends:
//! 1. One JSON file per record in a configured directory
//! 2. In-memory map (tests and ephemeral runs)

mod file;
mod memory;
mod traits;

pub use file::FileRecordStore;
pub use memory::MemoryRecordStore;
pub use traits::RecordStore;
