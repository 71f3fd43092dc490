//! OpenWeather exporter HTTP presentation layer
//!
//! Serves the Prometheus exposition endpoint and a health check, and wires
//! the application together at startup.

pub mod bootstrap;
pub mod cli;
pub mod handlers;
pub mod routes;
pub mod state;

pub use bootstrap::{build_collector, build_state};
pub use cli::Cli;
pub use routes::create_router;
pub use state::AppState;
