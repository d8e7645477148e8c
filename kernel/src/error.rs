use std::fmt::Display;

use error_stack::Context;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum KernelError {
    /// The targeted row does not exist (anymore).
    NotFound,
    /// A row with the same identity already exists.
    Conflict,
    /// The request is malformed or references rows that do not exist.
    Invalid,
    /// The row was modified by another writer since it was read.
    Concurrency,
    Timeout,
    Internal,
}

impl Display for KernelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KernelError::NotFound => write!(f, "Entity not found"),
            KernelError::Conflict => write!(f, "Entity already exists"),
            KernelError::Invalid => write!(f, "Invalid request"),
            KernelError::Concurrency => write!(f, "Concurrency error"),
            KernelError::Timeout => write!(f, "Process timed out"),
            KernelError::Internal => write!(f, "Internal kernel error"),
        }
    }
}

impl Context for KernelError {}
