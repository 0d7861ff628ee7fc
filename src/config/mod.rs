//! Configuration sourced from outside the program.

mod env;

pub use env::{ACCESS_TOKEN_VAR, API_URL_VAR, EnvSettings, SERVICE_KEY_VAR};
