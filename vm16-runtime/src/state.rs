//! VM state for VM16

use crate::registers::RegisterFile;
use std::fmt;
use vm16_isa::{Flags, Word};

/// Lifecycle of a machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Constructed or loaded, not started
    Ready,
    /// Executing instructions
    Running,
    /// Stopped by a halt instruction; the result is valid
    Halted,
    /// Stopped by a fatal error
    Faulted,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunState::Ready => "ready",
            RunState::Running => "running",
            RunState::Halted => "halted",
            RunState::Faulted => "faulted",
        };
        write!(f, "{}", name)
    }
}

/// CPU state: everything but memory
#[derive(Debug, Clone)]
pub struct VMState {
    /// r0-r15, rip, rp
    pub regs: RegisterFile,

    /// Flags register
    pub flags: Flags,

    /// Lifecycle state
    pub run_state: RunState,

    /// Halt result, meaningful once halted
    pub result: Word,

    /// Instructions executed
    pub steps: u64,
}

impl VMState {
    pub fn new() -> Self {
        VMState {
            regs: RegisterFile::new(),
            flags: Flags::EMPTY,
            run_state: RunState::Ready,
            result: 0,
            steps: 0,
        }
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.run_state == RunState::Running
    }

    #[inline]
    pub fn is_halted(&self) -> bool {
        self.run_state == RunState::Halted
    }

    /// Record the result and leave `Running`
    pub fn halt(&mut self, result: Word) {
        self.result = result;
        self.run_state = RunState::Halted;
    }

    #[inline]
    pub fn inc_steps(&mut self) {
        self.steps += 1;
    }
}

impl Default for VMState {
    fn default() -> Self {
        Self::new()
    }
}
