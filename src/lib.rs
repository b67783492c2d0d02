pub mod analyzers;
pub mod charts;
pub mod config;
pub mod error;
pub mod generate;
pub mod loader;
pub mod output;
pub mod parser;
pub mod timestamp;
