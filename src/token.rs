use std::{fmt, str::FromStr};

use calculator_proc_macro::OperatorTable;

use crate::ParseTokenError;

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Token {
    Number(f64),
    Operator(Operator),
    OpenParen,
    CloseParen,
    /// The result of the most recent successful evaluation.
    Answer,
}

/// Binary operators. Higher precedence binds tighter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, OperatorTable)]
pub enum Operator {
    #[operator(symbol = '+', precedence = 1)]
    Add,
    #[operator(symbol = '-', precedence = 1)]
    Subtract,
    #[operator(symbol = '*', precedence = 2)]
    Multiply,
    #[operator(symbol = '/', precedence = 2)]
    Divide,
    #[operator(symbol = '^', precedence = 3)]
    Exponentiate,
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(n) => write_number(f, *n),
            Token::Operator(op) => write!(f, "{op}"),
            Token::OpenParen => f.write_str("("),
            Token::CloseParen => f.write_str(")"),
            Token::Answer => f.write_str("Ans"),
        }
    }
}

// Plain decimal in the usual range, exponent form outside it, so huge and tiny
// magnitudes stay short.
fn write_number(f: &mut fmt::Formatter<'_>, n: f64) -> fmt::Result {
    let magnitude = n.abs();
    if n.is_finite() && n != 0.0 && !(1e-5..1e16).contains(&magnitude) {
        write!(f, "{n:e}")
    } else {
        write!(f, "{n}")
    }
}

/// Parses one lexeme in the form `Display` writes it. Splitting a line into
/// lexemes is up to the caller.
impl FromStr for Token {
    type Err = ParseTokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "(" => return Ok(Token::OpenParen),
            ")" => return Ok(Token::CloseParen),
            _ if s.eq_ignore_ascii_case("ans") => return Ok(Token::Answer),
            _ => {}
        }

        let mut chars = s.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            if let Some(op) = Operator::from_symbol(c) {
                return Ok(Token::Operator(op));
            }
        }

        s.parse::<f64>()
            .map(Token::Number)
            .map_err(|_| ParseTokenError::UnknownToken(s.to_string()))
    }
}

/// Splits a line on whitespace and parses each lexeme.
pub fn tokenise(line: &str) -> Result<Vec<Token>, ParseTokenError> {
    line.split_whitespace().map(str::parse::<Token>).collect()
}

/// Renders a token sequence the way a calculator display echoes input.
pub fn join(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}
