//! Transport implementations for textvault

mod http;

pub use http::{router, GetResponse, HttpTransport, InsertResponse, ITEMS_PATH};
