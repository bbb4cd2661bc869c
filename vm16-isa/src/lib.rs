//! # VM16 Instruction Set
//!
//! 16-bit word-addressed virtual CPU definition.
//!
//! ## Key Features
//! - 16-bit data width; the address space is exactly one word wide (64 Ki words)
//! - 16 general-purpose registers plus `rip` (instruction pointer) and `rp`
//!   (auxiliary pointer)
//! - 5-bit flags register: carry, zero, sign, overflow, divide-by-zero
//! - One opcode word followed by one word per operand
//! - Whole-memory binary images (little-endian words)

pub mod error;
pub mod register;
pub mod flags;
pub mod opcode;
pub mod instruction;
pub mod encoding;
pub mod image;

pub use error::IsaError;
pub use register::{Register, NUM_GENERAL_REGISTERS, NUM_REGISTERS};
pub use flags::{AluResult, Flag, Flags};
pub use opcode::{InstructionFamily, Opcode, OperandKind};
pub use instruction::{Condition, Instruction, Operand, ShiftOp};
pub use image::MemoryImage;

/// Native machine word
pub type Word = u16;

/// Signed view of a word
pub type SWord = i16;

/// Memory address (every word value is a valid address)
pub type Address = u16;

/// Number of addressable words
pub const MEMORY_WORDS: usize = 0x1_0000;

/// Size of a word in bytes
pub const WORD_BYTES: usize = 2;

/// Exact size of a binary memory image in bytes
pub const IMAGE_BYTES: usize = MEMORY_WORDS * WORD_BYTES;

/// Sign bit of a word
pub const SIGN_BIT: Word = 0x8000;
