//! Stress tests for VM16
//!
//! Tests with large programs, many iterations, and edge cases of the address
//! space.

use vm16_assembler::{assemble, assemble_with_symbols, encode};
use vm16_isa::{Instruction, MemoryImage, Operand, Register, Word, MEMORY_WORDS};
use vm16_runtime::{run_image, Machine, RunState, RuntimeError, VMConfig};

fn image_from_instructions(instructions: &[Instruction]) -> MemoryImage {
    let code: Vec<Word> = instructions.iter().flat_map(encode).collect();
    MemoryImage::from_words(&code).unwrap()
}

// ============================================================================
// Large Program Tests
// ============================================================================

#[test]
fn test_1000_instructions() {
    let mut instructions = vec![Instruction::LoadImm { dst: Register::R0, value: 1 }];

    // Generate 1000 add instructions
    for _ in 0..1000 {
        instructions.push(Instruction::Add {
            dst: Register::R1,
            src: Operand::Reg(Register::R0),
        });
    }
    instructions.push(Instruction::Halt { result: Operand::Reg(Register::R1) });

    let image = image_from_instructions(&instructions);
    let result = run_image(&image, VMConfig::default()).unwrap();

    assert_eq!(result.result, 1000);
    assert_eq!(result.steps, 1002);
}

#[test]
fn test_many_labels_program() {
    let mut source = String::new();

    // Generate program with 100 labels
    for i in 0..100 {
        source.push_str(&format!("label{}:\n", i));
        source.push_str("    inc r1\n");
    }
    source.push_str("    halt r1\n");

    let assembly = assemble_with_symbols(&source).unwrap();
    assert_eq!(assembly.words, 100 * 2 + 2);
    assert_eq!(assembly.symbols.len(), 100);
    assert_eq!(assembly.symbols["label99"], 198);

    let result = run_image(&assembly.image, VMConfig::default()).unwrap();
    assert_eq!(result.result, 100);
}

#[test]
fn test_program_filling_memory() {
    // Every word but the last two is a nop; the final halt sits at 0xFFFE
    let mut image = MemoryImage::zeroed();
    image.write_at(0xFFFE, &[0x0079, 0x0042]).unwrap();

    let result = run_image(&image, VMConfig::default()).unwrap();
    assert_eq!(result.result, 0x42);
    assert_eq!(result.steps, MEMORY_WORDS as u64 - 1);
    assert_eq!(result.registers[Register::Rip.index()], 0x0000);
}

// ============================================================================
// Long Running Tests
// ============================================================================

#[test]
fn test_tight_loop_many_iterations() {
    let source = r#"
        ldi r1, 0
    loop:
        inc r0
        jnz loop
        halt r0
    "#;
    let image = assemble(source).unwrap();
    let result = run_image(&image, VMConfig::default()).unwrap();

    // r0 wraps back to zero after 65536 increments
    assert_eq!(result.result, 0);
    assert_eq!(result.steps, 1 + 65536 * 2 + 1);
    assert!(result.flags.zero());
}

#[test]
fn test_nested_loops_with_32_bit_counter() {
    // 300 * 1000 iterations counted in r3:r2
    let source = r#"
        ldi r0, 300
    outer:
        ldi r1, 1000
    inner:
        add r2, 1
        adc r3, 0
        dec r1
        jnz inner
        dec r0
        jnz outer
        halt r3
    "#;
    let image = assemble(source).unwrap();
    let result = run_image(&image, VMConfig::default()).unwrap();

    let total = (result.result as u32) << 16 | result.registers[Register::R2.index()] as u32;
    assert_eq!(total, 300_000);
}

#[test]
fn test_execution_wraps_around_memory() {
    // An all-nop image runs forever, wrapping rip past 0xFFFF
    let image = MemoryImage::zeroed();
    let mut vm = Machine::with_image(&image, VMConfig::default().with_max_steps(200_000));

    let err = vm.run().unwrap_err();
    assert!(matches!(err, RuntimeError::StepLimitExceeded { limit: 200_000 }));
    assert_eq!(vm.registers().rip(), (200_000 % MEMORY_WORDS) as Word);
    assert_eq!(vm.run_state(), RunState::Faulted);
}
