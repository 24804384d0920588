pub mod check_path;
pub mod config;
pub mod duplicates;
pub mod scan;
pub mod sweep;
