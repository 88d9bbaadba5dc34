pub mod config;
pub mod fetch;
pub mod inflation;
pub mod plot;
pub mod series;
pub mod stats;
pub mod tidy;
