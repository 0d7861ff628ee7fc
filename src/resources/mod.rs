//! Borrowing handles grouping the declared operations by resource.
//!
//! Handles are cheap views over a [`Client`](crate::Client); obtain them with
//! `client.flows()`, `client.sources()` and so on.

mod credentials;
mod destinations;
mod flows;
mod nexsets;
mod self_signup;
mod sources;
mod tokens;
mod users;

pub use credentials::CredentialsResource;
pub use destinations::DestinationsResource;
pub use flows::FlowsResource;
pub use nexsets::NexsetsResource;
pub use self_signup::SelfSignupResource;
pub use sources::SourcesResource;
pub use tokens::TokensResource;
pub use users::UsersResource;
