pub mod api;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod parser;
pub mod storage;

#[cfg(test)]
mod tests;

// Re-export commonly used items
pub use engine::QueryEngine;
pub use error::{QueryError, Result};
pub use storage::ClimateStore;
