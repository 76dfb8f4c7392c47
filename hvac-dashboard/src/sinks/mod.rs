pub mod dataset;

pub use dataset::DatasetSink;
