//! Application services - Use case implementations

mod api_call_counter;
mod collection_service;
mod location_table;
pub mod metric_registry;

pub use api_call_counter::{ApiCallCounter, CallKey};
pub use collection_service::{CollectionService, SourceBinding};
pub use location_table::LocationTable;
pub use metric_registry::{
    API_CALLS_DESCRIPTOR, Descriptor, MetricDescriptor, MetricKind, POLLUTION_METRICS, Sample,
    ULTRAVIOLET_METRICS, WEATHER_METRICS,
};
