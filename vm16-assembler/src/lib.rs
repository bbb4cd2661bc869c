//! VM16 Assembler
//!
//! Assemble VM16 assembly language into whole-memory images.
//!
//! ## Example
//!
//! ```rust
//! use vm16_assembler::assemble;
//!
//! let source = r#"
//!         ldi r0, 3
//!     loop:
//!         dec r0
//!         jnz loop
//!         halt r0
//! "#;
//!
//! let image = assemble(source).unwrap();
//! assert_eq!(image.word(0), 0x04);
//! ```

pub mod error;
pub mod lexer;
pub mod parser;
pub mod encoder;
pub mod assembler;

pub use error::{AssemblerError, Result};
pub use assembler::{assemble, assemble_with_symbols, Assembly};
pub use parser::{parse_instruction, parse_register};
pub use encoder::encode;
