//! Register file
//!
//! Sixteen general-purpose words plus `rip` and `rp`, each in its own store.
//! Every access resolves the register through [`Slot::of`], which maps a
//! register id onto exactly one of them.

use crate::error::{Result, RuntimeError};
use vm16_isa::{Register, Word, NUM_GENERAL_REGISTERS, NUM_REGISTERS};

/// Backing store of a register
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    General(usize),
    Rip,
    Rp,
}

impl Slot {
    #[inline]
    fn of(reg: Register) -> Self {
        match reg {
            Register::Rip => Slot::Rip,
            Register::Rp => Slot::Rp,
            general => Slot::General(general.index()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterFile {
    general: [Word; NUM_GENERAL_REGISTERS],
    rip: Word,
    rp: Word,
}

impl RegisterFile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mutable slot backing `reg`
    #[inline]
    pub fn get(&mut self, reg: Register) -> &mut Word {
        match Slot::of(reg) {
            Slot::General(index) => &mut self.general[index],
            Slot::Rip => &mut self.rip,
            Slot::Rp => &mut self.rp,
        }
    }

    /// Resolve a raw register id, as found in an operand word
    pub fn get_by_id(&mut self, id: Word) -> Result<&mut Word> {
        let reg = Register::from_word(id)
            .map_err(|_| RuntimeError::InvalidRegister { address: self.rip, id })?;
        Ok(self.get(reg))
    }

    #[inline]
    pub fn read(&self, reg: Register) -> Word {
        match Slot::of(reg) {
            Slot::General(index) => self.general[index],
            Slot::Rip => self.rip,
            Slot::Rp => self.rp,
        }
    }

    #[inline]
    pub fn write(&mut self, reg: Register, value: Word) {
        *self.get(reg) = value;
    }

    /// Instruction pointer
    #[inline]
    pub fn rip(&self) -> Word {
        self.rip
    }

    /// All registers in id order
    pub fn snapshot(&self) -> [Word; NUM_REGISTERS] {
        let mut out = [0; NUM_REGISTERS];
        for reg in Register::ALL {
            out[reg.index()] = self.read(reg);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_initialized() {
        let regs = RegisterFile::new();
        assert!(regs.snapshot().iter().all(|&w| w == 0));
    }

    #[test]
    fn test_get_resolves_three_stores() {
        let mut regs = RegisterFile::new();
        *regs.get(Register::R15) = 1;
        *regs.get(Register::Rip) = 2;
        *regs.get(Register::Rp) = 3;

        let snapshot = regs.snapshot();
        assert_eq!(snapshot[15], 1);
        assert_eq!(snapshot[16], 2);
        assert_eq!(snapshot[17], 3);
        assert_eq!(regs.rip(), 2);
    }

    #[test]
    fn test_every_register_has_its_own_slot() {
        let slots: Vec<Slot> = Register::ALL.iter().map(|&reg| Slot::of(reg)).collect();
        for (i, slot) in slots.iter().enumerate() {
            assert!(!slots[i + 1..].contains(slot), "{:?} shared", slot);
        }
        assert_eq!(Slot::of(Register::R0), Slot::General(0));
        assert_eq!(Slot::of(Register::Rip), Slot::Rip);
    }

    #[test]
    fn test_read_and_get_agree() {
        let mut regs = RegisterFile::new();
        for (i, &reg) in Register::ALL.iter().enumerate() {
            *regs.get(reg) = 0x100 + i as Word;
        }
        for (i, &reg) in Register::ALL.iter().enumerate() {
            let slot = *regs.get(reg);
            assert_eq!(regs.read(reg), 0x100 + i as Word);
            assert_eq!(slot, regs.read(reg));
        }
    }

    #[test]
    fn test_get_by_id() {
        let mut regs = RegisterFile::new();
        *regs.get_by_id(17).unwrap() = 0xABCD;
        assert_eq!(regs.read(Register::Rp), 0xABCD);

        regs.write(Register::Rip, 0x40);
        let err = regs.get_by_id(18).unwrap_err();
        assert!(matches!(err, RuntimeError::InvalidRegister { address: 0x40, id: 18 }));
    }
}
