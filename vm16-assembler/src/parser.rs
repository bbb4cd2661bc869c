//! Assembly parser
//!
//! Each source line holds any number of `label:` definitions followed by at
//! most one instruction or directive. Operands are separated by commas:
//!
//! ```text
//! start:  ldi r0, 10        ; register, immediate
//!         ld  r1, [table]   ; memory operand, label or number
//!         jnz start         ; immediate jump target
//!         .word 1, 2, start
//! ```

use crate::error::{AssemblerError, Result};
use crate::lexer::Token;
use logos::Logos;
use vm16_isa::{Condition, Instruction, Operand, Register, ShiftOp, SWord, Word};

/// Literal or symbolic value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Number(i64),
    Label(String),
}

/// Parsed operand
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arg {
    Reg(Register),
    Value(Value),
    Mem(Value),
}

/// Operand with every label resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolved {
    Reg(Register),
    Imm(Word),
    Mem(Word),
}

/// One element of a source line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Label(String),
    Org(Value),
    Words(Vec<Value>),
    Instruction { mnemonic: String, args: Vec<Arg> },
}

/// Convert a literal to a word; negative values are two's complement
pub fn word_from_i64(value: i64, line: usize) -> Result<Word> {
    if (SWord::MIN as i64..=Word::MAX as i64).contains(&value) {
        Ok(value as Word)
    } else {
        Err(AssemblerError::InvalidImmediate { line, value })
    }
}

/// Parse register name
pub fn parse_register(name: &str) -> Option<Register> {
    Register::from_name(name)
}

/// Split one source line into statements
pub fn parse_line(text: &str, line: usize) -> Result<Vec<Statement>> {
    let mut tokens = Vec::new();
    let mut lexer = Token::lexer(text);
    while let Some(token) = lexer.next() {
        match token {
            Ok(Token::Newline) => {}
            Ok(token) => tokens.push(token),
            Err(()) => {
                return Err(AssemblerError::SyntaxError {
                    line,
                    column: lexer.span().start + 1,
                    message: format!("unexpected input '{}'", lexer.slice()),
                })
            }
        }
    }

    let mut statements = Vec::new();
    let mut rest = tokens.as_slice();

    // Leading labels
    while let [Token::Identifier(name), Token::Colon, tail @ ..] = rest {
        statements.push(Statement::Label(name.clone()));
        rest = tail;
    }

    match rest {
        [] => {}
        [Token::Directive(name), args @ ..] => {
            statements.push(parse_directive(name, args, line)?);
        }
        [Token::Identifier(mnemonic), args @ ..] => {
            let args = split_args(args)
                .into_iter()
                .map(|arg| parse_arg(arg, line))
                .collect::<Result<Vec<_>>>()?;
            statements.push(Statement::Instruction { mnemonic: mnemonic.to_ascii_lowercase(), args });
        }
        [other, ..] => {
            return Err(AssemblerError::SyntaxError {
                line,
                column: 0,
                message: format!("unexpected token {:?}", other),
            })
        }
    }

    Ok(statements)
}

fn parse_directive(name: &str, args: &[Token], line: usize) -> Result<Statement> {
    let values = split_args(args)
        .into_iter()
        .map(|arg| parse_value(arg, line))
        .collect::<Result<Vec<_>>>()?;

    match name.to_ascii_lowercase().as_str() {
        "org" => match <[Value; 1]>::try_from(values) {
            Ok([origin]) => Ok(Statement::Org(origin)),
            Err(_) => Err(AssemblerError::SyntaxError {
                line,
                column: 0,
                message: ".org takes exactly one address".to_string(),
            }),
        },
        "word" if !values.is_empty() => Ok(Statement::Words(values)),
        _ => Err(AssemblerError::InvalidDirective { line, directive: name.to_string() }),
    }
}

fn split_args(tokens: &[Token]) -> Vec<&[Token]> {
    if tokens.is_empty() {
        return Vec::new();
    }
    tokens.split(|token| *token == Token::Comma).collect()
}

fn parse_value(tokens: &[Token], line: usize) -> Result<Value> {
    if let [token] = tokens {
        if let Token::Identifier(name) = token {
            return Ok(Value::Label(name.clone()));
        }
        if let Some(n) = token.number() {
            return Ok(Value::Number(n));
        }
    }
    Err(AssemblerError::SyntaxError {
        line,
        column: 0,
        message: format!("expected a number or label, found {:?}", tokens),
    })
}

fn parse_arg(tokens: &[Token], line: usize) -> Result<Arg> {
    match tokens {
        [Token::Identifier(name)] => Ok(match parse_register(name) {
            Some(reg) => Arg::Reg(reg),
            None => Arg::Value(Value::Label(name.clone())),
        }),
        [Token::LBracket, inner @ .., Token::RBracket] => Ok(Arg::Mem(parse_value(inner, line)?)),
        _ => Ok(Arg::Value(parse_value(tokens, line)?)),
    }
}

/// Operand shape accepted by a mnemonic, `None` if the mnemonic is unknown
fn expected_operands(mnemonic: &str) -> Option<&'static str> {
    let shape = match mnemonic {
        "nop" | "stc" | "clc" | "sto" | "clo" | "stz" | "clz" | "stdz" | "cldz" => "no operands",
        "mov" | "xchg" | "mul" | "imul" | "div" | "idiv" => "reg, reg",
        "ld" => "reg, [addr]",
        "st" => "[addr], reg",
        "ldi" => "reg, imm",
        "sti" => "[addr], imm",
        "lfl" | "sfl" | "inc" | "dec" | "neg" | "not" => "reg",
        "adda" | "suba" | "anda" | "ora" | "xora" => "reg",
        "add" | "adc" | "sub" | "sbb" | "cmp" | "and" | "or" | "xor" | "test" => "reg, reg|imm",
        "halt" => "reg|imm",
        m if shift_op(m).is_some() => "reg, count",
        m if condition(m).is_some() => "reg|addr",
        _ => return None,
    };
    Some(shape)
}

fn shift_op(mnemonic: &str) -> Option<ShiftOp> {
    ShiftOp::ALL.iter().copied().find(|op| op.mnemonic() == mnemonic)
}

fn condition(mnemonic: &str) -> Option<Condition> {
    Condition::ALL.iter().copied().find(|cond| cond.mnemonic() == mnemonic)
}

/// Build an instruction from a mnemonic and resolved operands
pub fn build_instruction(mnemonic: &str, args: &[Resolved], line: usize) -> Result<Instruction> {
    use Resolved::{Imm, Mem, Reg};

    let expected = expected_operands(mnemonic).ok_or_else(|| AssemblerError::UnknownInstruction {
        line,
        mnemonic: mnemonic.to_string(),
    })?;

    let operand = |arg: &Resolved| match *arg {
        Reg(reg) => Some(Operand::Reg(reg)),
        Imm(value) => Some(Operand::Imm(value)),
        Mem(_) => None,
    };

    let instr = match (mnemonic, args) {
        // Data movement
        ("nop", []) => Some(Instruction::Nop),
        ("mov", [Reg(dst), Reg(src)]) => Some(Instruction::Mov { dst: *dst, src: *src }),
        ("ld", [Reg(dst), Mem(addr)]) => Some(Instruction::Load { dst: *dst, addr: *addr }),
        ("st", [Mem(addr), Reg(src)]) => Some(Instruction::Store { addr: *addr, src: *src }),
        ("ldi", [Reg(dst), Imm(value)]) => Some(Instruction::LoadImm { dst: *dst, value: *value }),
        ("sti", [Mem(addr), Imm(value)]) => {
            Some(Instruction::StoreImm { addr: *addr, value: *value })
        }
        ("xchg", [Reg(a), Reg(b)]) => Some(Instruction::Exchange { a: *a, b: *b }),
        ("lfl", [Reg(dst)]) => Some(Instruction::LoadFlags { dst: *dst }),
        ("sfl", [Reg(src)]) => Some(Instruction::StoreFlags { src: *src }),

        // Arithmetic and logic with a register-or-immediate source
        (m, [Reg(dst), src]) if expected == "reg, reg|imm" => {
            operand(src).map(|src| alu_instruction(m, *dst, src))
        }
        ("inc", [Reg(dst)]) => Some(Instruction::Inc { dst: *dst }),
        ("dec", [Reg(dst)]) => Some(Instruction::Dec { dst: *dst }),
        ("neg", [Reg(dst)]) => Some(Instruction::Neg { dst: *dst }),
        ("not", [Reg(dst)]) => Some(Instruction::Not { dst: *dst }),
        ("mul", [Reg(dst), Reg(src)]) => Some(Instruction::Mul { dst: *dst, src: *src }),
        ("imul", [Reg(dst), Reg(src)]) => Some(Instruction::Imul { dst: *dst, src: *src }),
        ("div", [Reg(dst), Reg(den)]) => Some(Instruction::Div { dst: *dst, den: *den }),
        ("idiv", [Reg(dst), Reg(den)]) => Some(Instruction::Idiv { dst: *dst, den: *den }),

        // Accumulator forms, r0 is the destination
        ("adda", [Reg(src)]) => Some(Instruction::AddAcc { src: *src }),
        ("suba", [Reg(src)]) => Some(Instruction::SubAcc { src: *src }),
        ("anda", [Reg(src)]) => Some(Instruction::AndAcc { src: *src }),
        ("ora", [Reg(src)]) => Some(Instruction::OrAcc { src: *src }),
        ("xora", [Reg(src)]) => Some(Instruction::XorAcc { src: *src }),

        // Shift/rotate
        (m, [Reg(dst), Imm(count)]) if shift_op(m).is_some() => shift_op(m)
            .map(|op| Instruction::Shift { op, dst: *dst, count: *count }),

        // Control flow
        (m, [target]) if condition(m).is_some() => match (condition(m), operand(target)) {
            (Some(cond), Some(target)) => Some(Instruction::Jump { cond, target }),
            _ => None,
        },

        // Processor control
        ("stc", []) => Some(Instruction::Stc),
        ("clc", []) => Some(Instruction::Clc),
        ("sto", []) => Some(Instruction::Sto),
        ("clo", []) => Some(Instruction::Clo),
        ("stz", []) => Some(Instruction::Stz),
        ("clz", []) => Some(Instruction::Clz),
        ("stdz", []) => Some(Instruction::Stdz),
        ("cldz", []) => Some(Instruction::Cldz),
        ("halt", []) => Some(Instruction::Halt { result: Operand::Imm(0) }),
        ("halt", [result]) => operand(result).map(|result| Instruction::Halt { result }),

        _ => None,
    };

    instr.ok_or_else(|| AssemblerError::InvalidOperands {
        line,
        mnemonic: mnemonic.to_string(),
        expected,
    })
}

fn alu_instruction(mnemonic: &str, dst: Register, src: Operand) -> Instruction {
    match mnemonic {
        "add" => Instruction::Add { dst, src },
        "adc" => Instruction::Adc { dst, src },
        "sub" => Instruction::Sub { dst, src },
        "sbb" => Instruction::Sbb { dst, src },
        "cmp" => Instruction::Cmp { lhs: dst, rhs: src },
        "and" => Instruction::And { dst, src },
        "or" => Instruction::Or { dst, src },
        "xor" => Instruction::Xor { dst, src },
        _ => Instruction::Test { lhs: dst, rhs: src },
    }
}

/// Resolve an operand without a symbol table; labels are errors
fn resolve_literal(arg: &Arg, line: usize) -> Result<Resolved> {
    let literal = |value: &Value| match value {
        Value::Number(n) => word_from_i64(*n, line),
        Value::Label(label) => {
            Err(AssemblerError::UndefinedLabel { line, label: label.clone() })
        }
    };
    Ok(match arg {
        Arg::Reg(reg) => Resolved::Reg(*reg),
        Arg::Value(value) => Resolved::Imm(literal(value)?),
        Arg::Mem(value) => Resolved::Mem(literal(value)?),
    })
}

/// Parse a single instruction from assembly text
pub fn parse_instruction(text: &str) -> Result<Instruction> {
    let statements = parse_line(text, 1)?;
    match statements.as_slice() {
        [Statement::Instruction { mnemonic, args }] => {
            let resolved = args
                .iter()
                .map(|arg| resolve_literal(arg, 1))
                .collect::<Result<Vec<_>>>()?;
            build_instruction(mnemonic, &resolved, 1)
        }
        _ => Err(AssemblerError::SyntaxError {
            line: 1,
            column: 0,
            message: "expected a single instruction".to_string(),
        }),
    }
}
