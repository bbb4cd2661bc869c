//! # VM16 Opcode Definitions
//!
//! The first word of every instruction is its opcode. Only the low byte is
//! used; any word above 0x00FF is an invalid opcode.
//!
//! ## Opcode Ranges
//!
//! Opcodes are organized by instruction family:
//! - 0x00-0x0F: Data movement (NOP, MOV, LD, ST, LDI, STI, XCHG, LFL, SFL)
//! - 0x10-0x27: Arithmetic (ADD, ADC, SUB, SBB, CMP, INC, DEC, NEG, MUL, IMUL, DIV, IDIV,
//!   ADDA, SUBA)
//! - 0x28-0x37: Logic (AND, OR, XOR, NOT, TEST, ANDA, ORA, XORA)
//! - 0x38-0x4F: Shift/rotate (SHL..RCRS)
//! - 0x50-0x6F: Control flow (JMP and the ten conditional jumps)
//! - 0x70-0x7F: Processor control (flag set/clear, HALT)
//!
//! The `*A` forms take one register and use r0 as the implicit destination.
//!
//! An unassigned value inside a family range is reserved: it decodes to
//! [`IsaError::ReservedOpcode`] rather than [`IsaError::InvalidOpcode`].

use crate::error::IsaError;
use crate::Word;
use serde::{Deserialize, Serialize};

/// Instruction opcode
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Opcode {
    // ========== Data movement (0x00-0x0F) ==========
    /// NOP
    Nop = 0x00,
    /// MOV dst, src: dst = src
    Mov = 0x01,
    /// LD dst, [addr]: dst = mem[addr]
    Ld = 0x02,
    /// ST [addr], src: mem[addr] = src
    St = 0x03,
    /// LDI dst, imm: dst = imm
    Ldi = 0x04,
    /// STI [addr], imm: mem[addr] = imm
    Sti = 0x05,
    /// XCHG a, b: swap a and b
    Xchg = 0x06,
    /// LFL dst: dst = flags
    Lfl = 0x07,
    /// SFL src: flags = src
    Sfl = 0x08,

    // ========== Arithmetic (0x10-0x27) ==========
    /// ADD dst, src
    Add = 0x10,
    /// ADD dst, imm
    AddImm = 0x11,
    /// ADC dst, src: dst = dst + src + carry
    Adc = 0x12,
    /// ADC dst, imm
    AdcImm = 0x13,
    /// SUB dst, src
    Sub = 0x14,
    /// SUB dst, imm
    SubImm = 0x15,
    /// SBB dst, src: dst = dst - src - carry
    Sbb = 0x16,
    /// SBB dst, imm
    SbbImm = 0x17,
    /// CMP a, b: flags of a - b
    Cmp = 0x18,
    /// CMP a, imm
    CmpImm = 0x19,
    /// INC dst
    Inc = 0x1A,
    /// DEC dst
    Dec = 0x1B,
    /// NEG dst
    Neg = 0x1C,
    /// MUL dst, src: unsigned, low half -> dst, high half -> src
    Mul = 0x1D,
    /// IMUL dst, src: signed, low half -> dst, high half -> src
    Imul = 0x1E,
    /// DIV dst, den: unsigned, quotient -> dst, remainder -> den
    Div = 0x1F,
    /// IDIV dst, den: signed, quotient -> dst, remainder -> den
    Idiv = 0x20,
    /// ADDA src: r0 = r0 + src
    AddAcc = 0x21,
    /// SUBA src: r0 = r0 - src
    SubAcc = 0x22,

    // ========== Logic (0x28-0x37) ==========
    /// AND dst, src
    And = 0x28,
    /// AND dst, imm
    AndImm = 0x29,
    /// OR dst, src
    Or = 0x2A,
    /// OR dst, imm
    OrImm = 0x2B,
    /// XOR dst, src
    Xor = 0x2C,
    /// XOR dst, imm
    XorImm = 0x2D,
    /// NOT dst
    Not = 0x2E,
    /// TEST a, b: flags of a & b
    Test = 0x2F,
    /// TEST a, imm
    TestImm = 0x30,
    /// ANDA src: r0 = r0 & src
    AndAcc = 0x31,
    /// ORA src: r0 = r0 | src
    OrAcc = 0x32,
    /// XORA src: r0 = r0 ^ src
    XorAcc = 0x33,

    // ========== Shift/rotate (0x38-0x4F) ==========
    Shl = 0x38,
    Sal = 0x39,
    Shr = 0x3A,
    Sar = 0x3B,
    Rol = 0x3C,
    Rols = 0x3D,
    Ror = 0x3E,
    Rors = 0x3F,
    Shlc = 0x40,
    Salc = 0x41,
    Shrc = 0x42,
    Sarc = 0x43,
    Rcl = 0x44,
    Rcls = 0x45,
    Rcr = 0x46,
    Rcrs = 0x47,

    // ========== Control flow (0x50-0x6F) ==========
    Jmp = 0x50,
    JmpImm = 0x51,
    Jz = 0x52,
    JzImm = 0x53,
    Jnz = 0x54,
    JnzImm = 0x55,
    Js = 0x56,
    JsImm = 0x57,
    Jns = 0x58,
    JnsImm = 0x59,
    Jc = 0x5A,
    JcImm = 0x5B,
    Jnc = 0x5C,
    JncImm = 0x5D,
    Jo = 0x5E,
    JoImm = 0x5F,
    Jno = 0x60,
    JnoImm = 0x61,
    Jdz = 0x62,
    JdzImm = 0x63,
    Jndz = 0x64,
    JndzImm = 0x65,

    // ========== Processor control (0x70-0x7F) ==========
    Stc = 0x70,
    Clc = 0x71,
    Sto = 0x72,
    Clo = 0x73,
    Stz = 0x74,
    Clz = 0x75,
    Stdz = 0x76,
    Cldz = 0x77,
    /// HALT src: stop with the register's value as result
    Halt = 0x78,
    /// HALT imm
    HaltImm = 0x79,
}

/// Kind of an operand word following the opcode
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperandKind {
    /// Register id (0-17)
    Register,
    /// Literal word
    Immediate,
    /// Memory address
    Address,
}

use OperandKind::{Address as A, Immediate as I, Register as R};

impl Opcode {
    /// Try to convert from u8
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            // Data movement
            0x00 => Some(Opcode::Nop),
            0x01 => Some(Opcode::Mov),
            0x02 => Some(Opcode::Ld),
            0x03 => Some(Opcode::St),
            0x04 => Some(Opcode::Ldi),
            0x05 => Some(Opcode::Sti),
            0x06 => Some(Opcode::Xchg),
            0x07 => Some(Opcode::Lfl),
            0x08 => Some(Opcode::Sfl),

            // Arithmetic
            0x10 => Some(Opcode::Add),
            0x11 => Some(Opcode::AddImm),
            0x12 => Some(Opcode::Adc),
            0x13 => Some(Opcode::AdcImm),
            0x14 => Some(Opcode::Sub),
            0x15 => Some(Opcode::SubImm),
            0x16 => Some(Opcode::Sbb),
            0x17 => Some(Opcode::SbbImm),
            0x18 => Some(Opcode::Cmp),
            0x19 => Some(Opcode::CmpImm),
            0x1A => Some(Opcode::Inc),
            0x1B => Some(Opcode::Dec),
            0x1C => Some(Opcode::Neg),
            0x1D => Some(Opcode::Mul),
            0x1E => Some(Opcode::Imul),
            0x1F => Some(Opcode::Div),
            0x20 => Some(Opcode::Idiv),
            0x21 => Some(Opcode::AddAcc),
            0x22 => Some(Opcode::SubAcc),

            // Logic
            0x28 => Some(Opcode::And),
            0x29 => Some(Opcode::AndImm),
            0x2A => Some(Opcode::Or),
            0x2B => Some(Opcode::OrImm),
            0x2C => Some(Opcode::Xor),
            0x2D => Some(Opcode::XorImm),
            0x2E => Some(Opcode::Not),
            0x2F => Some(Opcode::Test),
            0x30 => Some(Opcode::TestImm),
            0x31 => Some(Opcode::AndAcc),
            0x32 => Some(Opcode::OrAcc),
            0x33 => Some(Opcode::XorAcc),

            // Shift/rotate
            0x38 => Some(Opcode::Shl),
            0x39 => Some(Opcode::Sal),
            0x3A => Some(Opcode::Shr),
            0x3B => Some(Opcode::Sar),
            0x3C => Some(Opcode::Rol),
            0x3D => Some(Opcode::Rols),
            0x3E => Some(Opcode::Ror),
            0x3F => Some(Opcode::Rors),
            0x40 => Some(Opcode::Shlc),
            0x41 => Some(Opcode::Salc),
            0x42 => Some(Opcode::Shrc),
            0x43 => Some(Opcode::Sarc),
            0x44 => Some(Opcode::Rcl),
            0x45 => Some(Opcode::Rcls),
            0x46 => Some(Opcode::Rcr),
            0x47 => Some(Opcode::Rcrs),

            // Control flow
            0x50 => Some(Opcode::Jmp),
            0x51 => Some(Opcode::JmpImm),
            0x52 => Some(Opcode::Jz),
            0x53 => Some(Opcode::JzImm),
            0x54 => Some(Opcode::Jnz),
            0x55 => Some(Opcode::JnzImm),
            0x56 => Some(Opcode::Js),
            0x57 => Some(Opcode::JsImm),
            0x58 => Some(Opcode::Jns),
            0x59 => Some(Opcode::JnsImm),
            0x5A => Some(Opcode::Jc),
            0x5B => Some(Opcode::JcImm),
            0x5C => Some(Opcode::Jnc),
            0x5D => Some(Opcode::JncImm),
            0x5E => Some(Opcode::Jo),
            0x5F => Some(Opcode::JoImm),
            0x60 => Some(Opcode::Jno),
            0x61 => Some(Opcode::JnoImm),
            0x62 => Some(Opcode::Jdz),
            0x63 => Some(Opcode::JdzImm),
            0x64 => Some(Opcode::Jndz),
            0x65 => Some(Opcode::JndzImm),

            // Processor control
            0x70 => Some(Opcode::Stc),
            0x71 => Some(Opcode::Clc),
            0x72 => Some(Opcode::Sto),
            0x73 => Some(Opcode::Clo),
            0x74 => Some(Opcode::Stz),
            0x75 => Some(Opcode::Clz),
            0x76 => Some(Opcode::Stdz),
            0x77 => Some(Opcode::Cldz),
            0x78 => Some(Opcode::Halt),
            0x79 => Some(Opcode::HaltImm),

            _ => None,
        }
    }

    /// Decode an opcode word, distinguishing reserved slots from garbage
    pub fn from_word(word: Word) -> Result<Self, IsaError> {
        if word > u8::MAX as Word {
            return Err(IsaError::InvalidOpcode(word));
        }
        match Self::from_u8(word as u8) {
            Some(opcode) => Ok(opcode),
            None if InstructionFamily::of_raw(word as u8).is_some() => {
                Err(IsaError::ReservedOpcode(word))
            }
            None => Err(IsaError::InvalidOpcode(word)),
        }
    }

    /// Convert to u8
    #[inline]
    pub const fn to_u8(self) -> u8 {
        self as u8
    }

    /// Encoded opcode word
    #[inline]
    pub const fn to_word(self) -> Word {
        self as u8 as Word
    }

    /// Kinds of the operand words that follow the opcode, in encoding order
    pub const fn operands(self) -> &'static [OperandKind] {
        match self {
            Opcode::Nop => &[],
            Opcode::Mov | Opcode::Xchg => &[R, R],
            Opcode::Ld => &[R, A],
            Opcode::St => &[A, R],
            Opcode::Ldi => &[R, I],
            Opcode::Sti => &[A, I],
            Opcode::Lfl | Opcode::Sfl => &[R],

            Opcode::Add
            | Opcode::Adc
            | Opcode::Sub
            | Opcode::Sbb
            | Opcode::Cmp
            | Opcode::Mul
            | Opcode::Imul
            | Opcode::Div
            | Opcode::Idiv
            | Opcode::And
            | Opcode::Or
            | Opcode::Xor
            | Opcode::Test => &[R, R],

            Opcode::AddImm
            | Opcode::AdcImm
            | Opcode::SubImm
            | Opcode::SbbImm
            | Opcode::CmpImm
            | Opcode::AndImm
            | Opcode::OrImm
            | Opcode::XorImm
            | Opcode::TestImm => &[R, I],

            Opcode::Inc | Opcode::Dec | Opcode::Neg | Opcode::Not => &[R],

            Opcode::AddAcc
            | Opcode::SubAcc
            | Opcode::AndAcc
            | Opcode::OrAcc
            | Opcode::XorAcc => &[R],

            Opcode::Shl
            | Opcode::Sal
            | Opcode::Shr
            | Opcode::Sar
            | Opcode::Rol
            | Opcode::Rols
            | Opcode::Ror
            | Opcode::Rors
            | Opcode::Shlc
            | Opcode::Salc
            | Opcode::Shrc
            | Opcode::Sarc
            | Opcode::Rcl
            | Opcode::Rcls
            | Opcode::Rcr
            | Opcode::Rcrs => &[R, I],

            Opcode::Jmp
            | Opcode::Jz
            | Opcode::Jnz
            | Opcode::Js
            | Opcode::Jns
            | Opcode::Jc
            | Opcode::Jnc
            | Opcode::Jo
            | Opcode::Jno
            | Opcode::Jdz
            | Opcode::Jndz
            | Opcode::Halt => &[R],

            Opcode::JmpImm
            | Opcode::JzImm
            | Opcode::JnzImm
            | Opcode::JsImm
            | Opcode::JnsImm
            | Opcode::JcImm
            | Opcode::JncImm
            | Opcode::JoImm
            | Opcode::JnoImm
            | Opcode::JdzImm
            | Opcode::JndzImm => &[A],

            Opcode::HaltImm => &[I],

            Opcode::Stc
            | Opcode::Clc
            | Opcode::Sto
            | Opcode::Clo
            | Opcode::Stz
            | Opcode::Clz
            | Opcode::Stdz
            | Opcode::Cldz => &[],
        }
    }

    /// Encoded size in words
    #[inline]
    pub const fn width(self) -> usize {
        1 + self.operands().len()
    }

    /// Get the instruction family
    #[inline]
    pub fn family(self) -> InstructionFamily {
        InstructionFamily::of_raw(self.to_u8()).unwrap_or(InstructionFamily::Control)
    }

    /// Check if this is a control-flow opcode
    #[inline]
    pub fn is_jump(self) -> bool {
        self.family() == InstructionFamily::ControlFlow
    }

    /// Assembly mnemonic (register and immediate forms share one)
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Opcode::Nop => "nop",
            Opcode::Mov => "mov",
            Opcode::Ld => "ld",
            Opcode::St => "st",
            Opcode::Ldi => "ldi",
            Opcode::Sti => "sti",
            Opcode::Xchg => "xchg",
            Opcode::Lfl => "lfl",
            Opcode::Sfl => "sfl",
            Opcode::Add | Opcode::AddImm => "add",
            Opcode::Adc | Opcode::AdcImm => "adc",
            Opcode::Sub | Opcode::SubImm => "sub",
            Opcode::Sbb | Opcode::SbbImm => "sbb",
            Opcode::Cmp | Opcode::CmpImm => "cmp",
            Opcode::Inc => "inc",
            Opcode::Dec => "dec",
            Opcode::Neg => "neg",
            Opcode::Mul => "mul",
            Opcode::Imul => "imul",
            Opcode::Div => "div",
            Opcode::Idiv => "idiv",
            Opcode::AddAcc => "adda",
            Opcode::SubAcc => "suba",
            Opcode::And | Opcode::AndImm => "and",
            Opcode::Or | Opcode::OrImm => "or",
            Opcode::Xor | Opcode::XorImm => "xor",
            Opcode::Not => "not",
            Opcode::Test | Opcode::TestImm => "test",
            Opcode::AndAcc => "anda",
            Opcode::OrAcc => "ora",
            Opcode::XorAcc => "xora",
            Opcode::Shl => "shl",
            Opcode::Sal => "sal",
            Opcode::Shr => "shr",
            Opcode::Sar => "sar",
            Opcode::Rol => "rol",
            Opcode::Rols => "rols",
            Opcode::Ror => "ror",
            Opcode::Rors => "rors",
            Opcode::Shlc => "shlc",
            Opcode::Salc => "salc",
            Opcode::Shrc => "shrc",
            Opcode::Sarc => "sarc",
            Opcode::Rcl => "rcl",
            Opcode::Rcls => "rcls",
            Opcode::Rcr => "rcr",
            Opcode::Rcrs => "rcrs",
            Opcode::Jmp | Opcode::JmpImm => "jmp",
            Opcode::Jz | Opcode::JzImm => "jz",
            Opcode::Jnz | Opcode::JnzImm => "jnz",
            Opcode::Js | Opcode::JsImm => "js",
            Opcode::Jns | Opcode::JnsImm => "jns",
            Opcode::Jc | Opcode::JcImm => "jc",
            Opcode::Jnc | Opcode::JncImm => "jnc",
            Opcode::Jo | Opcode::JoImm => "jo",
            Opcode::Jno | Opcode::JnoImm => "jno",
            Opcode::Jdz | Opcode::JdzImm => "jdz",
            Opcode::Jndz | Opcode::JndzImm => "jndz",
            Opcode::Stc => "stc",
            Opcode::Clc => "clc",
            Opcode::Sto => "sto",
            Opcode::Clo => "clo",
            Opcode::Stz => "stz",
            Opcode::Clz => "clz",
            Opcode::Stdz => "stdz",
            Opcode::Cldz => "cldz",
            Opcode::Halt | Opcode::HaltImm => "halt",
        }
    }
}

impl std::fmt::Display for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.mnemonic())
    }
}

/// Instruction family, one opcode range each
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InstructionFamily {
    /// NOP, MOV, LD, ST, LDI, STI, XCHG, LFL, SFL
    DataMovement = 0,
    /// ADD, ADC, SUB, SBB, CMP, INC, DEC, NEG, MUL, IMUL, DIV, IDIV, ADDA, SUBA
    Arithmetic = 1,
    /// AND, OR, XOR, NOT, TEST, ANDA, ORA, XORA
    Logic = 2,
    /// Shifts and rotates
    Shift = 3,
    /// JMP and conditional jumps
    ControlFlow = 4,
    /// Flag set/clear, HALT
    Control = 5,
}

impl InstructionFamily {
    /// Total number of instruction families
    pub const COUNT: usize = 6;

    /// Family whose opcode range contains `opcode`, assigned or reserved
    pub fn of_raw(opcode: u8) -> Option<Self> {
        match opcode {
            0x00..=0x0F => Some(InstructionFamily::DataMovement),
            0x10..=0x27 => Some(InstructionFamily::Arithmetic),
            0x28..=0x37 => Some(InstructionFamily::Logic),
            0x38..=0x4F => Some(InstructionFamily::Shift),
            0x50..=0x6F => Some(InstructionFamily::ControlFlow),
            0x70..=0x7F => Some(InstructionFamily::Control),
            _ => None,
        }
    }

    /// Whether instructions of this family write the flags register
    pub const fn affects_flags(self) -> bool {
        matches!(
            self,
            InstructionFamily::Arithmetic | InstructionFamily::Logic | InstructionFamily::Shift
        )
    }
}

impl std::fmt::Display for InstructionFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            InstructionFamily::DataMovement => "data-movement",
            InstructionFamily::Arithmetic => "arithmetic",
            InstructionFamily::Logic => "logic",
            InstructionFamily::Shift => "shift",
            InstructionFamily::ControlFlow => "control-flow",
            InstructionFamily::Control => "control",
        };
        write!(f, "{}", name)
    }
}
