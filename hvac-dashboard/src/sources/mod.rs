pub mod hvac_csv_file;

pub use hvac_csv_file::HvacCsvSource;
