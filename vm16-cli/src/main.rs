//! VM16 command-line tool.
//!
//! # Usage
//! ```text
//! vm16 asm program.asm -o program.bin
//! vm16 disasm program.bin --start 0x0000 --count 32
//! vm16 run program.bin --max-steps 1000000
//! ```
//!
//! Logging goes to stderr and is controlled by `-v` or `RUST_LOG`.

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;
use vm16_isa::{Address, MemoryImage, Register, Word, MEMORY_WORDS};
use vm16_runtime::{ExecutionResult, Machine, VMConfig};

#[derive(Parser, Debug)]
#[command(name = "vm16")]
#[command(about = "Assemble, disassemble and run VM16 memory images", long_about = None)]
struct Args {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a memory image until it halts
    Run {
        /// Image file (exactly 131072 bytes), or assembly source with --asm
        input: PathBuf,

        /// Treat the input as assembly source
        #[arg(long, action = ArgAction::SetTrue)]
        asm: bool,

        /// Address of the first instruction
        #[arg(long, default_value = "0", value_parser = parse_word)]
        entry: Word,

        /// Give up after this many instructions
        #[arg(long)]
        max_steps: Option<u64>,

        /// Log every executed instruction (needs -vv)
        #[arg(long, action = ArgAction::SetTrue)]
        trace: bool,

        /// Print registers and flags after the run
        #[arg(long, action = ArgAction::SetTrue)]
        dump: bool,
    },

    /// Assemble source into a memory image
    Asm {
        input: PathBuf,

        /// Output path (defaults to `<input>.bin`)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the symbol table
        #[arg(long, action = ArgAction::SetTrue)]
        symbols: bool,
    },

    /// Disassemble part of a memory image
    Disasm {
        input: PathBuf,

        /// First address to decode
        #[arg(long, default_value = "0", value_parser = parse_word)]
        start: Word,

        /// Number of instructions to decode
        #[arg(long, default_value_t = 32)]
        count: usize,
    },
}

fn parse_word(text: &str) -> std::result::Result<Word, String> {
    let text = text.trim();
    let parsed = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => u16::from_str_radix(hex, 16),
        None => text.parse::<u16>(),
    };
    parsed.map_err(|e| format!("invalid word '{text}': {e}"))
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    match args.command {
        Command::Run { input, asm, entry, max_steps, trace, dump } => {
            let config = VMConfig { max_steps, trace };
            let result = run(&input, asm, entry, config)?;
            println!("Result: {} ({:#06x})", result.result, result.result);
            if dump {
                print!("{}", dump_state(&result));
            }
        }
        Command::Asm { input, output, symbols } => {
            let output = output.unwrap_or_else(|| input.with_extension("bin"));
            let assembly = assemble_file(&input, &output)?;
            println!(
                "Assembled {} words into {} ({})",
                assembly.words,
                output.display(),
                assembly.image.digest()
            );
            if symbols {
                for (name, addr) in &assembly.symbols {
                    println!("{:#06x}  {}", addr, name);
                }
            }
        }
        Command::Disasm { input, start, count } => {
            let image = MemoryImage::read_from(&input)
                .with_context(|| format!("failed to read image {}", input.display()))?;
            print!("{}", vm16_disassembler::disassemble(&image, start, count));
        }
    }

    Ok(())
}

fn run(input: &Path, asm: bool, entry: Address, config: VMConfig) -> Result<ExecutionResult> {
    let mut machine = if asm {
        let source = fs::read_to_string(input)
            .with_context(|| format!("failed to read {}", input.display()))?;
        let image = vm16_assembler::assemble(&source)
            .with_context(|| format!("failed to assemble {}", input.display()))?;
        Machine::with_image(&image, config)
    } else {
        Machine::from_path(input, config)?
    };
    machine.set_entry(entry);

    let result = machine.run_to_completion().with_context(|| {
        format!("execution failed after {} steps", machine.steps())
    })?;
    info!(result = result.result, steps = result.steps, "halted");
    Ok(result)
}

fn assemble_file(input: &Path, output: &Path) -> Result<vm16_assembler::Assembly> {
    if input == output {
        bail!("refusing to overwrite the source file {}", input.display());
    }
    let source = fs::read_to_string(input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let assembly = vm16_assembler::assemble_with_symbols(&source)
        .with_context(|| format!("failed to assemble {}", input.display()))?;
    assembly
        .image
        .write_to(output)
        .with_context(|| format!("failed to write {}", output.display()))?;
    info!(words = assembly.words, free = MEMORY_WORDS.saturating_sub(assembly.words), "assembled");
    Ok(assembly)
}

fn dump_state(result: &ExecutionResult) -> String {
    let mut out = String::new();
    for (i, reg) in Register::ALL.iter().enumerate() {
        out.push_str(&format!("{:>4} = {:#06x}", reg.name(), result.registers[reg.index()]));
        out.push(if i % 6 == 5 { '\n' } else { ' ' });
    }
    if !out.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(&format!("flags = {}  steps = {}\n", result.flags, result.steps));
    out
}
