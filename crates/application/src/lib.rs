//! Application layer - Use cases and orchestration
//!
//! Contains the port definitions implemented by the infrastructure layer and
//! the services that turn a static location table into metric samples on
//! every scrape.

pub mod error;
pub mod ports;
pub mod services;

pub use error::ApplicationError;
pub use ports::*;
pub use services::*;
