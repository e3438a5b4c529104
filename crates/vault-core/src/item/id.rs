//! Item identifier generation

use uuid::Uuid;

/// Source of globally unique item identifiers
pub trait IdGenerator: Send + Sync {
    fn new_id(&self) -> String;
}

/// Random UUID v4 identifiers
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn new_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}
