pub mod api;
pub mod cache;
pub mod config;
pub mod load;
pub mod metrics_server;
pub mod normalize;
pub mod observability;
pub mod pipeline;
pub mod report;
pub mod scenarios;
pub mod sinks;
pub mod sources;
pub mod transform;

pub use pipeline::{Envelope, Pipeline};
