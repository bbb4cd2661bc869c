//! # Lexer for VM16 Assembly Language

use logos::Logos;

/// Tokens for VM16 assembly
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r]+")] // Skip whitespace (not newlines)
#[logos(skip r"[;#][^\n]*")] // Skip comments
pub enum Token {
    /// Identifier (mnemonics, register names, labels)
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Identifier(String),

    /// Decimal number
    #[regex(r"-?[0-9]+", |lex| lex.slice().parse().ok())]
    Number(i64),

    /// Hexadecimal number
    #[regex(r"0[xX][0-9a-fA-F]+", |lex| i64::from_str_radix(&lex.slice()[2..], 16).ok())]
    Hex(i64),

    /// Binary number
    #[regex(r"0[bB][01]+", |lex| i64::from_str_radix(&lex.slice()[2..], 2).ok())]
    Binary(i64),

    /// Directive (.org, .word)
    #[regex(r"\.[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice()[1..].to_string())]
    Directive(String),

    /// Comma
    #[token(",")]
    Comma,

    /// Colon (for labels)
    #[token(":")]
    Colon,

    /// Left bracket (memory operand)
    #[token("[")]
    LBracket,

    /// Right bracket
    #[token("]")]
    RBracket,

    /// Newline
    #[regex(r"\n")]
    Newline,
}

impl Token {
    /// Numeric value of a literal token
    pub fn number(&self) -> Option<i64> {
        match self {
            Token::Number(n) | Token::Hex(n) | Token::Binary(n) => Some(*n),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lexer_numbers() {
        let mut lex = Token::lexer("42 -10 0x1A 0b1010");
        assert_eq!(lex.next(), Some(Ok(Token::Number(42))));
        assert_eq!(lex.next(), Some(Ok(Token::Number(-10))));
        assert_eq!(lex.next(), Some(Ok(Token::Hex(0x1A))));
        assert_eq!(lex.next(), Some(Ok(Token::Binary(0b1010))));
    }

    #[test]
    fn test_lexer_directive() {
        let mut lex = Token::lexer(".org .word");
        assert_eq!(lex.next(), Some(Ok(Token::Directive("org".to_string()))));
        assert_eq!(lex.next(), Some(Ok(Token::Directive("word".to_string()))));
    }

    #[test]
    fn test_lexer_instruction() {
        let mut lex = Token::lexer("ld r1, [0x10] ; load");
        assert_eq!(lex.next(), Some(Ok(Token::Identifier("ld".to_string()))));
        assert_eq!(lex.next(), Some(Ok(Token::Identifier("r1".to_string()))));
        assert_eq!(lex.next(), Some(Ok(Token::Comma)));
        assert_eq!(lex.next(), Some(Ok(Token::LBracket)));
        assert_eq!(lex.next(), Some(Ok(Token::Hex(0x10))));
        assert_eq!(lex.next(), Some(Ok(Token::RBracket)));
        assert_eq!(lex.next(), None);
    }

    #[test]
    fn test_lexer_label_and_comment() {
        let mut lex = Token::lexer("loop: # spin\n");
        assert_eq!(lex.next(), Some(Ok(Token::Identifier("loop".to_string()))));
        assert_eq!(lex.next(), Some(Ok(Token::Colon)));
        assert_eq!(lex.next(), Some(Ok(Token::Newline)));
    }

    #[test]
    fn test_lexer_rejects_stray_characters() {
        let mut lex = Token::lexer("@");
        assert_eq!(lex.next(), Some(Err(())));
    }
}
