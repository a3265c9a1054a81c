//! Client credentials and redacted secret material.

pub mod credentials;
pub mod secret;

pub use credentials::*;
pub use secret::*;
