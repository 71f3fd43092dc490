//! Domain layer for the OpenWeather exporter
//!
//! Contains the value objects, snapshot entities and domain errors shared by
//! every other crate. This layer performs no I/O.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;
