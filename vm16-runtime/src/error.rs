//! Runtime error types for VM16

use crate::state::RunState;
use std::path::PathBuf;
use thiserror::Error;
use vm16_disassembler::DecodeError;
use vm16_isa::Address;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("Failed to load memory image {}: {reason}", path.display())]
    MemoryLoad { path: PathBuf, reason: String },

    #[error("Invalid register id {id} in instruction at {address:#06x}")]
    InvalidRegister { address: Address, id: u16 },

    #[error("Invalid opcode {word:#06x} at {address:#06x}")]
    InvalidOpcode { address: Address, word: u16 },

    #[error("Unimplemented opcode {opcode:#04x} at {address:#06x}")]
    UnimplementedOpcode { address: Address, opcode: u16 },

    #[error("Step limit exceeded: {limit}")]
    StepLimitExceeded { limit: u64 },

    #[error("Machine is not ready to run (state: {state})")]
    NotReady { state: RunState },
}

impl From<DecodeError> for RuntimeError {
    fn from(err: DecodeError) -> Self {
        match err {
            DecodeError::UnknownOpcode { address, word } => {
                RuntimeError::InvalidOpcode { address, word }
            }
            DecodeError::ReservedOpcode { address, opcode } => {
                RuntimeError::UnimplementedOpcode { address, opcode }
            }
            DecodeError::InvalidRegister { address, id } => RuntimeError::InvalidRegister { address, id },
        }
    }
}

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_load_display() {
        let err = RuntimeError::MemoryLoad {
            path: PathBuf::from("prog.bin"),
            reason: "expected 131072 bytes, found 4".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to load memory image prog.bin: expected 131072 bytes, found 4"
        );
    }

    #[test]
    fn test_decode_errors_map_to_runtime_errors() {
        let err: RuntimeError = DecodeError::ReservedOpcode { address: 0x10, opcode: 0x23 }.into();
        assert!(matches!(err, RuntimeError::UnimplementedOpcode { address: 0x10, opcode: 0x23 }));

        let err: RuntimeError = DecodeError::UnknownOpcode { address: 0, word: 0x1234 }.into();
        assert_eq!(err.to_string(), "Invalid opcode 0x1234 at 0x0000");

        let err: RuntimeError = DecodeError::InvalidRegister { address: 2, id: 40 }.into();
        assert!(matches!(err, RuntimeError::InvalidRegister { address: 2, id: 40 }));
    }

    #[test]
    fn test_not_ready_display() {
        let err = RuntimeError::NotReady { state: RunState::Halted };
        assert_eq!(err.to_string(), "Machine is not ready to run (state: halted)");
    }
}
