pub mod aggregate;
pub mod analysis;
pub mod config;
pub mod error;
pub mod export;
pub mod metrics;
pub mod parser;
pub mod session;
pub mod sheet;
pub mod source;
pub mod stat_code;
pub mod trend;

pub use error::StatsError;
