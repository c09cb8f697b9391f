pub mod bio;
pub mod cli;
pub mod core;
pub mod utils;

pub use crate::core::engine::ClusterEngine;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MoiraError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Input error: {0}")]
    Input(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Worker error: {0}")]
    Worker(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, MoiraError>;
