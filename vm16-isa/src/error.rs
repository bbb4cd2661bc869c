//! # Error Types for VM16

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IsaError {
    #[error("Invalid register id: {0} (valid range: 0-17)")]
    InvalidRegister(u16),

    #[error("Invalid opcode: {0:#06x}")]
    InvalidOpcode(u16),

    #[error("Reserved opcode without a handler: {0:#06x}")]
    ReservedOpcode(u16),

    #[error("Invalid memory image size: expected {expected} bytes, found {found} bytes")]
    InvalidImageSize { expected: usize, found: usize },

    #[error("Program does not fit in memory: {words} words at {origin:#06x}")]
    ImageOverflow { origin: u16, words: usize },

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}
