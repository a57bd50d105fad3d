//! CLI command handlers

pub mod bulk;
pub mod config;
pub mod generate;
pub mod item;
pub mod models;
pub mod status;
pub mod tags;
pub mod test_key;
