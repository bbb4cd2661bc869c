//! Virtual Machine for VM16

use crate::error::{Result, RuntimeError};
use crate::execute::execute;
use crate::memory::Memory;
use crate::registers::RegisterFile;
use crate::state::{RunState, VMState};
use std::path::Path;
use tracing::{debug, trace, warn};
use vm16_disassembler::decode_at;
use vm16_isa::{Address, Flags, Instruction, MemoryImage, Register, Word, NUM_REGISTERS};

/// VM configuration
#[derive(Debug, Clone, Default)]
pub struct VMConfig {
    /// Maximum number of instructions before giving up; `None` runs until halt
    pub max_steps: Option<u64>,

    /// Log every executed instruction at trace level
    pub trace: bool,
}

impl VMConfig {
    pub fn with_max_steps(mut self, limit: u64) -> Self {
        self.max_steps = Some(limit);
        self
    }

    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }
}

/// Execution result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    /// Word passed to halt
    pub result: Word,

    /// Number of instructions executed, including the halt
    pub steps: u64,

    /// Flags at halt
    pub flags: Flags,

    /// Registers at halt, in id order
    pub registers: [Word; NUM_REGISTERS],
}

/// VM16 Virtual Machine
pub struct Machine {
    /// CPU state (registers, flags, lifecycle)
    state: VMState,

    /// Memory subsystem
    memory: Memory,

    /// Configuration
    config: VMConfig,
}

impl Machine {
    /// Create a machine with zeroed memory and registers
    pub fn new(config: VMConfig) -> Self {
        Self { state: VMState::new(), memory: Memory::new(), config }
    }

    /// Create a machine whose memory holds `image`
    pub fn with_image(image: &MemoryImage, config: VMConfig) -> Self {
        let mut machine = Self::new(config);
        machine.memory.load_image(image);
        debug!(digest = %image.digest(), "loaded memory image");
        machine
    }

    /// Create a machine from an image file
    pub fn from_path(path: impl AsRef<Path>, config: VMConfig) -> Result<Self> {
        let mut machine = Self::new(config);
        machine.memory.load_from_path(path)?;
        Ok(machine)
    }

    /// Bulk-load an image file into memory
    pub fn load_from_path(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.memory.load_from_path(path)
    }

    /// Start execution at `addr` instead of 0
    pub fn set_entry(&mut self, addr: Address) {
        self.state.regs.write(Register::Rip, addr);
    }

    /// Run until halt and return the result word.
    ///
    /// Continues a machine that was started with [`Machine::step`].
    pub fn run(&mut self) -> Result<Word> {
        match self.state.run_state {
            RunState::Ready | RunState::Running => self.state.run_state = RunState::Running,
            state => return Err(RuntimeError::NotReady { state }),
        }
        debug!(entry = self.state.regs.rip(), "run");

        while self.state.is_running() {
            if let Some(limit) = self.config.max_steps {
                if self.state.steps >= limit {
                    return Err(self.fault(RuntimeError::StepLimitExceeded { limit }));
                }
            }
            if let Err(err) = self.step_once() {
                return Err(self.fault(err));
            }
        }

        Ok(self.state.result)
    }

    /// Run until halt and report the final machine state
    pub fn run_to_completion(&mut self) -> Result<ExecutionResult> {
        let result = self.run()?;
        Ok(ExecutionResult {
            result,
            steps: self.state.steps,
            flags: self.state.flags,
            registers: self.state.regs.snapshot(),
        })
    }

    /// Execute exactly one instruction and return the state afterwards
    pub fn step(&mut self) -> Result<RunState> {
        match self.state.run_state {
            RunState::Ready => self.state.run_state = RunState::Running,
            RunState::Running => {}
            state => return Err(RuntimeError::NotReady { state }),
        }
        if let Err(err) = self.step_once() {
            return Err(self.fault(err));
        }
        Ok(self.state.run_state)
    }

    /// Fetch, decode, advance `rip`, dispatch
    fn step_once(&mut self) -> Result<()> {
        let addr = self.state.regs.rip();
        let inst = self.fetch_and_decode(addr)?;

        if self.config.trace {
            trace!(
                step = self.state.steps,
                rip = addr,
                flags = %self.state.flags,
                "{}",
                vm16_disassembler::format(&inst)
            );
        }

        self.state.regs.write(Register::Rip, addr.wrapping_add(inst.width() as Word));
        execute(&inst, &mut self.state, &mut self.memory);
        self.state.inc_steps();
        Ok(())
    }

    /// Fetch and decode instruction from memory
    fn fetch_and_decode(&self, addr: Address) -> Result<Instruction> {
        let memory = &self.memory;
        Ok(decode_at(addr, |a| memory.read(a))?)
    }

    fn fault(&mut self, err: RuntimeError) -> RuntimeError {
        warn!(rip = self.state.regs.rip(), steps = self.state.steps, "fault: {}", err);
        self.state.run_state = RunState::Faulted;
        err
    }

    /// Get current lifecycle state
    pub fn run_state(&self) -> RunState {
        self.state.run_state
    }

    /// Get current CPU state (for debugging)
    pub fn state(&self) -> &VMState {
        &self.state
    }

    pub fn registers(&self) -> &RegisterFile {
        &self.state.regs
    }

    pub fn registers_mut(&mut self) -> &mut RegisterFile {
        &mut self.state.regs
    }

    pub fn flags(&self) -> Flags {
        self.state.flags
    }

    pub fn set_flags(&mut self, flags: Flags) {
        self.state.flags = flags;
    }

    /// Get memory (for debugging)
    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut Memory {
        &mut self.memory
    }

    /// Instructions executed so far
    pub fn steps(&self) -> u64 {
        self.state.steps
    }
}
