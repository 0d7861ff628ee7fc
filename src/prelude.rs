//! Prelude module for convenient imports.
//!
//! ```rust
//! use nexla_sdk::prelude::*;
//! ```

pub use crate::Error;
pub use crate::Result;

// Client
pub use crate::{Client, ClientBuilder, RequestOptions, RetryConfig};

// Errors
pub use crate::{ApiError, ErrorKind};

// Authentication
pub use crate::CredentialProvider;

// Operations
pub use crate::client::{Operation, OperationId};
