//! Disassembler errors

use thiserror::Error;
use vm16_isa::Address;

/// A word sequence in memory that is not a valid instruction
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("Unknown opcode 0x{word:04X} at 0x{address:04X}")]
    UnknownOpcode { address: Address, word: u16 },

    #[error("Reserved opcode 0x{opcode:02X} at 0x{address:04X}")]
    ReservedOpcode { address: Address, opcode: u16 },

    #[error("Invalid register id {id} in instruction at 0x{address:04X}")]
    InvalidRegister { address: Address, id: u16 },
}

impl DecodeError {
    /// Address of the offending instruction
    pub fn address(&self) -> Address {
        match self {
            DecodeError::UnknownOpcode { address, .. }
            | DecodeError::ReservedOpcode { address, .. }
            | DecodeError::InvalidRegister { address, .. } => *address,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DisassemblerError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("Truncated instruction: need {needed} words, found {found}")]
    Truncated { needed: usize, found: usize },
}

impl DisassemblerError {
    /// Address of the offending instruction, when known
    pub fn address(&self) -> Option<Address> {
        match self {
            DisassemblerError::Decode(err) => Some(err.address()),
            DisassemblerError::Truncated { .. } => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, DisassemblerError>;
