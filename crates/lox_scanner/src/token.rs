//! Tokens produced by the scanner.

use std::fmt;

use lox_core::text::TextSpan;

/// The syntactic category of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenType {
    // Single-character tokens.
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    Comma,
    Dot,
    Minus,
    Plus,
    Semicolon,
    Slash,
    Star,

    // One or two character tokens.
    Bang,
    BangEqual,
    Equal,
    EqualEqual,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,

    // Literals.
    Identifier,
    String,
    Number,

    // Keywords.
    And,
    Class,
    Else,
    False,
    Fun,
    For,
    If,
    Nil,
    Or,
    Print,
    Return,
    Super,
    This,
    True,
    Var,
    While,

    Eof,
}

impl TokenType {
    /// Resolve a keyword from the full text of an identifier.
    pub fn from_keyword(text: &str) -> Option<TokenType> {
        match text {
            "and" => Some(TokenType::And),
            "class" => Some(TokenType::Class),
            "else" => Some(TokenType::Else),
            "false" => Some(TokenType::False),
            "for" => Some(TokenType::For),
            "fun" => Some(TokenType::Fun),
            "if" => Some(TokenType::If),
            "nil" => Some(TokenType::Nil),
            "or" => Some(TokenType::Or),
            "print" => Some(TokenType::Print),
            "return" => Some(TokenType::Return),
            "super" => Some(TokenType::Super),
            "this" => Some(TokenType::This),
            "true" => Some(TokenType::True),
            "var" => Some(TokenType::Var),
            "while" => Some(TokenType::While),
            _ => None,
        }
    }

    /// The upper-snake-case name used when printing tokens.
    pub fn name(self) -> &'static str {
        match self {
            TokenType::LeftParen => "LEFT_PAREN",
            TokenType::RightParen => "RIGHT_PAREN",
            TokenType::LeftBrace => "LEFT_BRACE",
            TokenType::RightBrace => "RIGHT_BRACE",
            TokenType::Comma => "COMMA",
            TokenType::Dot => "DOT",
            TokenType::Minus => "MINUS",
            TokenType::Plus => "PLUS",
            TokenType::Semicolon => "SEMICOLON",
            TokenType::Slash => "SLASH",
            TokenType::Star => "STAR",
            TokenType::Bang => "BANG",
            TokenType::BangEqual => "BANG_EQUAL",
            TokenType::Equal => "EQUAL",
            TokenType::EqualEqual => "EQUAL_EQUAL",
            TokenType::Greater => "GREATER",
            TokenType::GreaterEqual => "GREATER_EQUAL",
            TokenType::Less => "LESS",
            TokenType::LessEqual => "LESS_EQUAL",
            TokenType::Identifier => "IDENTIFIER",
            TokenType::String => "STRING",
            TokenType::Number => "NUMBER",
            TokenType::And => "AND",
            TokenType::Class => "CLASS",
            TokenType::Else => "ELSE",
            TokenType::False => "FALSE",
            TokenType::Fun => "FUN",
            TokenType::For => "FOR",
            TokenType::If => "IF",
            TokenType::Nil => "NIL",
            TokenType::Or => "OR",
            TokenType::Print => "PRINT",
            TokenType::Return => "RETURN",
            TokenType::Super => "SUPER",
            TokenType::This => "THIS",
            TokenType::True => "TRUE",
            TokenType::Var => "VAR",
            TokenType::While => "WHILE",
            TokenType::Eof => "EOF",
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The value carried by `NUMBER` and `STRING` tokens.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Number(f64),
    String(String),
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Number(value) if value.is_nan() => f.write_str("NaN"),
            Literal::Number(value) if value.is_infinite() => {
                f.write_str(if *value > 0.0 { "Infinity" } else { "-Infinity" })
            }
            // `{:?}` keeps the fractional part: 123.0 rather than 123.
            Literal::Number(value) => write!(f, "{:?}", value),
            Literal::String(value) => f.write_str(value),
        }
    }
}

/// A scanned token.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub token_type: TokenType,
    /// The exact source text of the token. Empty for `EOF`.
    pub lexeme: String,
    pub literal: Option<Literal>,
    /// 1-based line the token starts on. A string spanning several lines
    /// carries its opening line, not the line of its closing quote.
    pub line: u32,
    /// 0-based column of the token's first character.
    pub start_column: u32,
    /// Character offsets of the lexeme in the source.
    pub span: TextSpan,
}

impl Token {
    pub fn new(token_type: TokenType, lexeme: String, line: u32, start_column: u32, span: TextSpan) -> Self {
        Self {
            token_type,
            lexeme,
            literal: None,
            line,
            start_column,
            span,
        }
    }

    pub fn with_literal(mut self, literal: Literal) -> Self {
        self.literal = Some(literal);
        self
    }

    pub fn is_eof(&self) -> bool {
        self.token_type == TokenType::Eof
    }
}

/// Prints `<TYPE> <lexeme> <literal>`, with `null` for a missing literal.
impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ", self.token_type, self.lexeme)?;
        match &self.literal {
            Some(literal) => write!(f, "{}", literal),
            None => f.write_str("null"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_keyword_is_exact() {
        assert_eq!(TokenType::from_keyword("if"), Some(TokenType::If));
        assert_eq!(TokenType::from_keyword("while"), Some(TokenType::While));
        assert_eq!(TokenType::from_keyword("iffy"), None);
        assert_eq!(TokenType::from_keyword("If"), None);
        assert_eq!(TokenType::from_keyword(""), None);
    }

    #[test]
    fn test_keywords_round_trip_through_names() {
        for text in [
            "and", "class", "else", "false", "for", "fun", "if", "nil", "or", "print", "return",
            "super", "this", "true", "var", "while",
        ] {
            let kind = TokenType::from_keyword(text).unwrap();
            assert_eq!(kind.name(), text.to_ascii_uppercase());
        }
    }

    #[test]
    fn test_token_display() {
        let token = Token::new(TokenType::Number, "123".to_string(), 1, 0, TextSpan::new(0, 3))
            .with_literal(Literal::Number(123.0));
        assert_eq!(token.to_string(), "NUMBER 123 123.0");

        let token = Token::new(TokenType::String, "\"hi\"".to_string(), 1, 0, TextSpan::new(0, 4))
            .with_literal(Literal::String("hi".to_string()));
        assert_eq!(token.to_string(), "STRING \"hi\" hi");

        let token = Token::new(TokenType::BangEqual, "!=".to_string(), 1, 0, TextSpan::new(0, 2));
        assert_eq!(token.to_string(), "BANG_EQUAL != null");

        let token = Token::new(TokenType::Eof, String::new(), 1, 0, TextSpan::new(0, 0));
        assert_eq!(token.to_string(), "EOF  null");
    }

    #[test]
    fn test_number_literal_keeps_fraction() {
        assert_eq!(Literal::Number(3.25).to_string(), "3.25");
        assert_eq!(Literal::Number(7.0).to_string(), "7.0");
    }

    #[test]
    fn test_number_literal_out_of_range() {
        assert_eq!(Literal::Number(f64::INFINITY).to_string(), "Infinity");
        assert_eq!(Literal::Number(f64::NEG_INFINITY).to_string(), "-Infinity");
        assert_eq!(Literal::Number(f64::NAN).to_string(), "NaN");
    }
}
