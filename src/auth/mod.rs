//! Authentication for the Nexla API.
//!
//! Two credential sources are supported:
//! - **Service key**: exchanged for short-lived session tokens, renewed
//!   before expiry and on 401
//! - **Access token**: a fixed bearer token supplied by the caller

mod provider;
mod providers;
mod token;

pub use provider::CredentialProvider;
pub use providers::{AccessTokenProvider, ServiceKeyProvider};
pub use token::CachedToken;
