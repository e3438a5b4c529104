//! # vault-server
//!
//! HTTP front end for textvault: stores text items and returns them,
//! decrypting with the caller's armored private key when needed.

mod error;
mod server;
pub mod transport;

pub use error::ApiError;
pub use server::{VaultServer, DEFAULT_PORT};
pub use transport::{router, HttpTransport};
