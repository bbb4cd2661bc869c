//! Register definitions for VM16

use crate::error::IsaError;
use crate::Word;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of general-purpose registers (r0-r15)
pub const NUM_GENERAL_REGISTERS: usize = 16;

/// Number of addressable registers (general + rip + rp)
pub const NUM_REGISTERS: usize = 18;

/// Register identifier
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Register {
    R0 = 0,
    R1 = 1,
    R2 = 2,
    R3 = 3,
    R4 = 4,
    R5 = 5,
    R6 = 6,
    R7 = 7,
    R8 = 8,
    R9 = 9,
    R10 = 10,
    R11 = 11,
    R12 = 12,
    R13 = 13,
    R14 = 14,
    R15 = 15,
    /// Instruction pointer: address of the next instruction to fetch
    Rip = 16,
    /// Auxiliary address register, usage left to program convention
    Rp = 17,
}

impl Register {
    /// All registers in id order
    pub const ALL: [Register; NUM_REGISTERS] = [
        Self::R0,
        Self::R1,
        Self::R2,
        Self::R3,
        Self::R4,
        Self::R5,
        Self::R6,
        Self::R7,
        Self::R8,
        Self::R9,
        Self::R10,
        Self::R11,
        Self::R12,
        Self::R13,
        Self::R14,
        Self::R15,
        Self::Rip,
        Self::Rp,
    ];

    #[inline]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Resolve an encoded register operand
    pub fn from_word(id: Word) -> Result<Self, IsaError> {
        Self::from_index(id as usize).ok_or(IsaError::InvalidRegister(id))
    }

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Encoded operand word
    #[inline]
    pub fn to_word(self) -> Word {
        self as Word
    }

    #[inline]
    pub fn is_general(self) -> bool {
        self.index() < NUM_GENERAL_REGISTERS
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::R0 => "r0",
            Self::R1 => "r1",
            Self::R2 => "r2",
            Self::R3 => "r3",
            Self::R4 => "r4",
            Self::R5 => "r5",
            Self::R6 => "r6",
            Self::R7 => "r7",
            Self::R8 => "r8",
            Self::R9 => "r9",
            Self::R10 => "r10",
            Self::R11 => "r11",
            Self::R12 => "r12",
            Self::R13 => "r13",
            Self::R14 => "r14",
            Self::R15 => "r15",
            Self::Rip => "rip",
            Self::Rp => "rp",
        }
    }

    /// Parse a register name (case-insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim().to_ascii_lowercase();
        Self::ALL.iter().copied().find(|reg| reg.name() == name)
    }
}

impl TryFrom<Word> for Register {
    type Error = IsaError;

    fn try_from(id: Word) -> Result<Self, Self::Error> {
        Self::from_word(id)
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_ids() {
        assert_eq!(Register::R0.to_word(), 0);
        assert_eq!(Register::R15.to_word(), 15);
        assert_eq!(Register::Rip.to_word(), 16);
        assert_eq!(Register::Rp.to_word(), 17);
    }

    #[test]
    fn test_from_word_rejects_unknown_ids() {
        assert_eq!(Register::from_word(17).unwrap(), Register::Rp);
        assert!(matches!(
            Register::from_word(18),
            Err(IsaError::InvalidRegister(18))
        ));
        assert!(Register::try_from(0xFFFF).is_err());
    }

    #[test]
    fn test_names_roundtrip() {
        for reg in Register::ALL {
            assert_eq!(Register::from_name(reg.name()), Some(reg));
        }
        assert_eq!(Register::from_name("RIP"), Some(Register::Rip));
        assert_eq!(Register::from_name("r16"), None);
    }

    #[test]
    fn test_is_general() {
        assert!(Register::R7.is_general());
        assert!(!Register::Rip.is_general());
        assert!(!Register::Rp.is_general());
    }
}
