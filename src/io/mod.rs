//! Address list input and CSV report output.

pub mod input;
pub mod report;

pub use input::{read_addresses, read_addresses_file};
pub use report::{write_report, write_report_file};
