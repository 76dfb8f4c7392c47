pub mod dataset;
pub mod domain;
pub mod query;

pub use dataset::{Column, ColumnSet, Dataset, DatasetError};
