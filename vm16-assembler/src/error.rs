//! Assembler errors

use thiserror::Error;
use vm16_isa::IsaError;

#[derive(Debug, Error)]
pub enum AssemblerError {
    #[error("Syntax error at line {line}, column {column}: {message}")]
    SyntaxError {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("Unknown instruction at line {line}: {mnemonic}")]
    UnknownInstruction { line: usize, mnemonic: String },

    #[error("Invalid operands for {mnemonic} at line {line}: expected {expected}")]
    InvalidOperands {
        line: usize,
        mnemonic: String,
        expected: &'static str,
    },

    #[error("Invalid immediate value at line {line}: {value} does not fit in a word")]
    InvalidImmediate { line: usize, value: i64 },

    #[error("Undefined label at line {line}: {label}")]
    UndefinedLabel { line: usize, label: String },

    #[error("Duplicate label at line {line}: {label}")]
    DuplicateLabel { line: usize, label: String },

    #[error("Invalid directive at line {line}: .{directive}")]
    InvalidDirective { line: usize, directive: String },

    #[error("Image error: {0}")]
    Image(#[from] IsaError),
}

impl AssemblerError {
    /// Source line the error refers to (1-based), when known
    pub fn line(&self) -> Option<usize> {
        match self {
            AssemblerError::SyntaxError { line, .. }
            | AssemblerError::UnknownInstruction { line, .. }
            | AssemblerError::InvalidOperands { line, .. }
            | AssemblerError::InvalidImmediate { line, .. }
            | AssemblerError::UndefinedLabel { line, .. }
            | AssemblerError::DuplicateLabel { line, .. }
            | AssemblerError::InvalidDirective { line, .. } => Some(*line),
            AssemblerError::Image(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, AssemblerError>;
