//! Main assembler logic
//!
//! Two passes over the parsed source: the first assigns an address to every
//! label, the second resolves operands and writes words into the image.

use crate::encoder::encode;
use crate::error::{AssemblerError, Result};
use crate::parser::{build_instruction, parse_line, word_from_i64, Arg, Resolved, Statement, Value};
use std::collections::BTreeMap;
use vm16_isa::{Address, MemoryImage, Word, MEMORY_WORDS};

/// Assembled program with its symbol table
#[derive(Debug, Clone)]
pub struct Assembly {
    pub image: MemoryImage,
    pub symbols: BTreeMap<String, Address>,
    /// Number of words emitted
    pub words: usize,
}

/// Assemble source code into a memory image
pub fn assemble(source: &str) -> Result<MemoryImage> {
    Ok(assemble_with_symbols(source)?.image)
}

/// Assemble source code, keeping the label addresses
pub fn assemble_with_symbols(source: &str) -> Result<Assembly> {
    let mut lines = Vec::new();
    for (index, text) in source.lines().enumerate() {
        let line = index + 1;
        let statements = parse_line(text, line)?;
        if !statements.is_empty() {
            lines.push((line, statements));
        }
    }

    let symbols = collect_symbols(&lines)?;

    let mut image = MemoryImage::zeroed();
    let mut cursor: usize = 0;
    let mut words = 0;

    for (line, statements) in &lines {
        let line = *line;
        for statement in statements {
            let emitted = match statement {
                Statement::Label(_) => continue,
                Statement::Org(origin) => {
                    cursor = resolve(origin, &symbols, line)? as usize;
                    continue;
                }
                Statement::Words(values) => values
                    .iter()
                    .map(|value| resolve(value, &symbols, line))
                    .collect::<Result<Vec<Word>>>()?,
                Statement::Instruction { mnemonic, args } => {
                    let resolved = args
                        .iter()
                        .map(|arg| resolve_arg(arg, &symbols, line))
                        .collect::<Result<Vec<_>>>()?;
                    encode(&build_instruction(mnemonic, &resolved, line)?)
                }
            };

            image.write_at(origin_of(cursor, emitted.len())?, &emitted)?;
            cursor += emitted.len();
            words += emitted.len();
        }
    }

    Ok(Assembly { image, symbols, words })
}

/// First pass: walk the location counter and record labels
fn collect_symbols(lines: &[(usize, Vec<Statement>)]) -> Result<BTreeMap<String, Address>> {
    let mut symbols = BTreeMap::new();
    let mut cursor: usize = 0;

    for (line, statements) in lines {
        let line = *line;
        for statement in statements {
            match statement {
                Statement::Label(name) => {
                    let addr = origin_of(cursor, 0)?;
                    if symbols.insert(name.clone(), addr).is_some() {
                        return Err(AssemblerError::DuplicateLabel { line, label: name.clone() });
                    }
                }
                Statement::Org(origin) => {
                    // Labels used by .org must already be defined
                    cursor = resolve(origin, &symbols, line)? as usize;
                }
                Statement::Words(values) => cursor += values.len(),
                Statement::Instruction { mnemonic, args } => {
                    // Widths depend only on operand kinds, so labels size as zero
                    let placeholder = args.iter().map(placeholder_of).collect::<Vec<_>>();
                    cursor += build_instruction(mnemonic, &placeholder, line)?.width();
                }
            }
        }
    }

    Ok(symbols)
}

fn placeholder_of(arg: &Arg) -> Resolved {
    match arg {
        Arg::Reg(reg) => Resolved::Reg(*reg),
        Arg::Value(_) => Resolved::Imm(0),
        Arg::Mem(_) => Resolved::Mem(0),
    }
}

fn origin_of(cursor: usize, len: usize) -> Result<Address> {
    if cursor + len > MEMORY_WORDS || cursor >= MEMORY_WORDS {
        return Err(vm16_isa::IsaError::ImageOverflow {
            origin: cursor.min(Address::MAX as usize) as Address,
            words: len,
        }
        .into());
    }
    Ok(cursor as Address)
}

fn resolve(value: &Value, symbols: &BTreeMap<String, Address>, line: usize) -> Result<Word> {
    match value {
        Value::Number(n) => word_from_i64(*n, line),
        Value::Label(label) => symbols
            .get(label)
            .copied()
            .ok_or_else(|| AssemblerError::UndefinedLabel { line, label: label.clone() }),
    }
}

fn resolve_arg(arg: &Arg, symbols: &BTreeMap<String, Address>, line: usize) -> Result<Resolved> {
    Ok(match arg {
        Arg::Reg(reg) => Resolved::Reg(*reg),
        Arg::Value(value) => Resolved::Imm(resolve(value, symbols, line)?),
        Arg::Mem(value) => Resolved::Mem(resolve(value, symbols, line)?),
    })
}
