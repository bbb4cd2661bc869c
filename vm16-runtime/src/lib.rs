//! # VM16 Runtime
//!
//! Execute VM16 memory images.
//!
//! The machine has 16 general registers plus `rip` and `rp`, a five-bit flags
//! register and 65,536 words of memory that hold both code and data.
//!
//! ## Features
//!
//! - **Fetch/decode/execute loop**: `rip` is advanced before dispatch
//! - **Full instruction set**: data movement, arithmetic, logic, shifts, jumps
//! - **Image loading**: exact 128 KiB little-endian images
//! - **Step limits and tracing**: via [`VMConfig`]
//!
//! ## Example
//!
//! ```rust,no_run
//! use vm16_runtime::{Machine, VMConfig};
//!
//! let mut vm = Machine::from_path("program.bin", VMConfig::default()).unwrap();
//! let result = vm.run().unwrap();
//! println!("Result: {}", result);
//! ```

pub mod error;
pub mod registers;
pub mod memory;
pub mod state;
pub mod shift;
pub mod execute;
pub mod vm;

pub use error::{Result, RuntimeError};
pub use execute::execute;
pub use memory::Memory;
pub use registers::RegisterFile;
pub use shift::shift;
pub use state::{RunState, VMState};
pub use vm::{ExecutionResult, Machine, VMConfig};

use vm16_isa::MemoryImage;

/// Run an image from address 0 until it halts
pub fn run_image(image: &MemoryImage, config: VMConfig) -> Result<ExecutionResult> {
    Machine::with_image(image, config).run_to_completion()
}
