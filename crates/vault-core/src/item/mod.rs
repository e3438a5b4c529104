//! Items: text stored plain or encrypted under a per-item RSA key

mod id;
mod service;
mod types;

pub use id::{IdGenerator, UuidGenerator};
pub use service::ItemService;
pub use types::{InsertRequest, InsertedItem, KeySize, Protection, StoredRecord, ValidatedInsert};
