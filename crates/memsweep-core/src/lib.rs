pub mod archive;
pub mod artifact;
pub mod blocks;
pub mod classifier;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod io;
pub mod paths;
pub mod report;
pub mod similarity;
pub mod sweep;
pub mod timestamp;
pub mod types;

pub use error::{Result, SweepError};
