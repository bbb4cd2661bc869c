//! # Instruction and Image Encoding
//!
//! ```text
//! word 0      word 1       word 2
//! +--------+  +---------+  +---------+
//! | opcode |  | operand |  | operand |
//! +--------+  +---------+  +---------+
//! ```
//!
//! The opcode word holds a value in 0x00..=0xFF. Each operand takes one
//! full word: a register id (0-17), an immediate, or an address.
//!
//! Conditional jumps occupy a regular grid: `0x50 + 2 * condition + imm`,
//! where `imm` is 1 when the target is an address literal.
//!
//! Memory images store words little-endian, low byte first.

use crate::{Word, WORD_BYTES};

/// Largest encoded instruction, in words
pub const MAX_INSTRUCTION_WIDTH: usize = 3;

/// First opcode of the jump grid
pub const JUMP_BASE: u8 = 0x50;

/// Number of jump conditions
pub const JUMP_CONDITIONS: u8 = 11;

/// Opcode value for a jump with the given condition index
#[inline]
pub const fn jump_opcode(condition: u8, immediate: bool) -> u8 {
    JUMP_BASE + 2 * condition + immediate as u8
}

/// Split a jump opcode into (condition index, immediate target)
pub fn split_jump_opcode(opcode: u8) -> Option<(u8, bool)> {
    let offset = opcode.checked_sub(JUMP_BASE)?;
    let condition = offset / 2;
    if condition >= JUMP_CONDITIONS {
        return None;
    }
    Some((condition, offset % 2 == 1))
}

/// Decode a little-endian word from two bytes
#[inline]
pub fn word_from_le(bytes: [u8; WORD_BYTES]) -> Word {
    Word::from_le_bytes(bytes)
}

/// Encode a word as two little-endian bytes
#[inline]
pub fn word_to_le(word: Word) -> [u8; WORD_BYTES] {
    word.to_le_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jump_grid() {
        assert_eq!(jump_opcode(0, false), 0x50);
        assert_eq!(jump_opcode(0, true), 0x51);
        assert_eq!(jump_opcode(10, true), 0x65);
        assert_eq!(split_jump_opcode(0x53), Some((1, true)));
        assert_eq!(split_jump_opcode(0x64), Some((10, false)));
        assert_eq!(split_jump_opcode(0x66), None);
        assert_eq!(split_jump_opcode(0x4F), None);
    }

    #[test]
    fn test_little_endian_words() {
        assert_eq!(word_from_le([0x34, 0x12]), 0x1234);
        assert_eq!(word_to_le(0xABCD), [0xCD, 0xAB]);
    }
}
