//! Shared error types for the pet registry service

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SharedError {
    #[error("\"{value}\" is not a valid choice for {field}")]
    InvalidChoice { field: String, value: String },

    #[error("Invalid identifier: {input}")]
    InvalidId { input: String },

    #[error("Invalid configuration: {field} = {value}")]
    InvalidConfig { field: String, value: String },
}
