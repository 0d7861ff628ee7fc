//! Credential provider implementations.

mod access_token;
mod service_key;

pub use access_token::AccessTokenProvider;
pub use service_key::ServiceKeyProvider;
