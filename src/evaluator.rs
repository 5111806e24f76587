use thiserror::Error;
use tracing::{debug, debug_span, trace, trace_span};

use crate::{
    history::History,
    scanner::Scanner,
    token::{Operator, Token},
};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvaluationError {
    #[error("{}", describe_unexpected(.0))]
    UnexpectedToken(Option<Token>),

    #[error("Division by zero: `{0} / 0`")]
    DivisionByZero(f64),

    #[error("No previous answer available")]
    NoAnswerAvailable,
}

fn describe_unexpected(token: &Option<Token>) -> String {
    match token {
        Some(token) => format!("Unexpected token: `{token}`"),
        None => "Unexpected end of input".to_string(),
    }
}

/// Evaluates token sequences and keeps the history `Token::Answer` reads from.
#[derive(Debug, Default)]
pub struct Evaluator {
    history: History,
}

impl Evaluator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Evaluates `tokens` and records the result. On error the history is left
    /// untouched.
    ///
    /// Operators of equal precedence group to the right, so `8 - 4 - 2` is
    /// `8 - (4 - 2)`. Tokens left over after a complete expression are ignored.
    pub fn evaluate(&mut self, tokens: &[Token]) -> Result<f64, EvaluationError> {
        let _span = debug_span!("evaluate", tokens = tokens.len()).entered();

        let mut evaluation = Evaluation {
            scanner: Scanner::new(tokens),
            history: &self.history,
        };

        let result = evaluation.expression(0);
        let consumed = evaluation.scanner.position();

        match result {
            Ok(value) => {
                if consumed < tokens.len() {
                    trace!(ignored = tokens.len() - consumed, "trailing tokens");
                }
                self.history.push(tokens, value);
                debug!(result = value, history_len = self.history.len(), "evaluated");
                Ok(value)
            }
            Err(error) => {
                debug!(%error, "evaluation failed");
                Err(error)
            }
        }
    }
}

const STACK_RED_ZONE: usize = 64 * 1024;
const STACK_SEGMENT: usize = 1024 * 1024;

struct Evaluation<'a> {
    scanner: Scanner<'a>,
    history: &'a History,
}

impl Evaluation<'_> {
    fn value(&mut self) -> Result<f64, EvaluationError> {
        let _span = trace_span!("evaluate_value").entered();

        let token = self
            .scanner
            .scan()
            .ok_or(EvaluationError::UnexpectedToken(None))?;

        match token {
            Token::OpenParen => {
                let inner = self.expression(0)?;

                match self.scanner.current() {
                    Some(Token::CloseParen) => {
                        self.scanner.scan();
                        Ok(inner)
                    }
                    other => Err(EvaluationError::UnexpectedToken(other)),
                }
            }
            Token::Number(n) => Ok(n),
            Token::Answer => self
                .history
                .latest()
                .ok_or(EvaluationError::NoAnswerAvailable),
            Token::Operator(_) | Token::CloseParen => {
                Err(EvaluationError::UnexpectedToken(Some(token)))
            }
        }
    }

    // Depth follows paren nesting and operator chains, so the recursion runs
    // on a stack that grows on demand rather than overflowing.
    fn expression(&mut self, min_precedence: u8) -> Result<f64, EvaluationError> {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_SEGMENT, || self.climb(min_precedence))
    }

    // The right operand is parsed with the operator's own precedence as its
    // floor, which makes every operator right-associative.
    fn climb(&mut self, min_precedence: u8) -> Result<f64, EvaluationError> {
        let mut lhs = self.value()?;

        while let Some(Token::Operator(op)) = self.scanner.current() {
            if op.precedence() < min_precedence {
                break;
            }
            self.scanner.scan();

            let rhs = self.expression(op.precedence())?;
            lhs = apply(op, lhs, rhs)?;
        }

        Ok(lhs)
    }
}

/// Applies a binary operator with IEEE semantics, except that a right operand
/// exactly equal to zero fails division.
pub fn apply(op: Operator, lhs: f64, rhs: f64) -> Result<f64, EvaluationError> {
    Ok(match op {
        Operator::Add => lhs + rhs,
        Operator::Subtract => lhs - rhs,
        Operator::Multiply => lhs * rhs,
        Operator::Divide => {
            if rhs == 0.0 {
                return Err(EvaluationError::DivisionByZero(lhs));
            }
            lhs / rhs
        }
        Operator::Exponentiate => lhs.powf(rhs),
    })
}

#[cfg(test)]
mod test {
    use crate::{
        evaluator::{apply, EvaluationError, Evaluator},
        token::{Operator, Token},
    };

    fn n(v: f64) -> Token {
        Token::Number(v)
    }

    fn op(symbol: char) -> Token {
        Token::Operator(Operator::from_symbol(symbol).unwrap())
    }

    #[test]
    fn apply_operators() {
        assert_eq!(apply(Operator::Add, 2.0, 3.0), Ok(5.0));
        assert_eq!(apply(Operator::Subtract, 2.0, 3.0), Ok(-1.0));
        assert_eq!(apply(Operator::Multiply, 2.0, 3.0), Ok(6.0));
        assert_eq!(apply(Operator::Divide, 3.0, 2.0), Ok(1.5));
        assert_eq!(apply(Operator::Exponentiate, 2.0, 10.0), Ok(1024.0));
    }

    #[test]
    fn apply_divide_by_zero() {
        assert_eq!(
            apply(Operator::Divide, 7.0, 0.0),
            Err(EvaluationError::DivisionByZero(7.0))
        );
        assert_eq!(
            apply(Operator::Divide, 7.0, -0.0),
            Err(EvaluationError::DivisionByZero(7.0))
        );
        assert!(apply(Operator::Divide, 1.0, f64::MIN_POSITIVE).is_ok());
    }

    #[test]
    fn apply_overflow_is_unchecked() {
        assert_eq!(apply(Operator::Multiply, f64::MAX, 2.0), Ok(f64::INFINITY));
        assert_eq!(apply(Operator::Exponentiate, 10.0, 400.0), Ok(f64::INFINITY));
    }

    #[test]
    fn single_number() {
        let mut evaluator = Evaluator::new();
        assert_eq!(evaluator.evaluate(&[n(42.0)]), Ok(42.0));
    }

    #[test]
    fn nested_parentheses() {
        let mut evaluator = Evaluator::new();
        let tokens = [
            Token::OpenParen,
            Token::OpenParen,
            n(1.0),
            op('+'),
            n(2.0),
            Token::CloseParen,
            op('^'),
            n(2.0),
            Token::CloseParen,
            op('/'),
            n(3.0),
        ];
        assert_eq!(evaluator.evaluate(&tokens), Ok(3.0));
    }

    #[test]
    fn lower_precedence_ends_subexpression() {
        let mut evaluator = Evaluator::new();
        // 2 * 3 + 4
        assert_eq!(
            evaluator.evaluate(&[n(2.0), op('*'), n(3.0), op('+'), n(4.0)]),
            Ok(10.0)
        );
        // 2 ^ 3 * 2
        assert_eq!(
            evaluator.evaluate(&[n(2.0), op('^'), n(3.0), op('*'), n(2.0)]),
            Ok(16.0)
        );
    }

    #[test]
    fn division_groups_right() {
        let mut evaluator = Evaluator::new();
        // 16 / 4 / 2 == 16 / (4 / 2)
        assert_eq!(
            evaluator.evaluate(&[n(16.0), op('/'), n(4.0), op('/'), n(2.0)]),
            Ok(8.0)
        );
    }

    #[test]
    fn unexpected_tokens() {
        let mut evaluator = Evaluator::new();

        assert_eq!(
            evaluator.evaluate(&[]),
            Err(EvaluationError::UnexpectedToken(None))
        );
        assert_eq!(
            evaluator.evaluate(&[op('*'), n(2.0)]),
            Err(EvaluationError::UnexpectedToken(Some(op('*'))))
        );
        assert_eq!(
            evaluator.evaluate(&[Token::CloseParen]),
            Err(EvaluationError::UnexpectedToken(Some(Token::CloseParen)))
        );
        assert_eq!(
            evaluator.evaluate(&[n(1.0), op('+')]),
            Err(EvaluationError::UnexpectedToken(None))
        );
        assert_eq!(
            evaluator.evaluate(&[Token::OpenParen, n(1.0), n(2.0)]),
            Err(EvaluationError::UnexpectedToken(Some(n(2.0))))
        );
        assert!(evaluator.history().is_empty());
    }

    #[test]
    fn zero_divisor_from_subexpression() {
        let mut evaluator = Evaluator::new();
        let tokens = [
            n(1.0),
            op('+'),
            n(6.0),
            op('/'),
            Token::OpenParen,
            n(2.0),
            op('-'),
            n(2.0),
            Token::CloseParen,
        ];
        assert_eq!(
            evaluator.evaluate(&tokens),
            Err(EvaluationError::DivisionByZero(6.0))
        );
    }

    #[test]
    fn error_messages() {
        assert_eq!(
            EvaluationError::UnexpectedToken(Some(Token::CloseParen)).to_string(),
            "Unexpected token: `)`"
        );
        assert_eq!(
            EvaluationError::UnexpectedToken(None).to_string(),
            "Unexpected end of input"
        );
        assert_eq!(
            EvaluationError::DivisionByZero(5.0).to_string(),
            "Division by zero: `5 / 0`"
        );
        assert_eq!(
            EvaluationError::NoAnswerAvailable.to_string(),
            "No previous answer available"
        );
    }

    #[test]
    fn records_input_tokens() {
        let mut evaluator = Evaluator::new();
        let tokens = [n(2.0), op('+'), n(2.0)];
        evaluator.evaluate(&tokens).unwrap();

        let entry = evaluator.history().last().unwrap();
        assert_eq!(entry.tokens(), &tokens);
        assert_eq!(entry.result(), 4.0);
    }

    #[test]
    fn deeply_nested_parentheses() {
        let depth = 100_000;
        let mut tokens = vec![Token::OpenParen; depth];
        tokens.push(n(1.0));
        tokens.extend(std::iter::repeat(Token::CloseParen).take(depth));

        let mut evaluator = Evaluator::new();
        assert_eq!(evaluator.evaluate(&tokens), Ok(1.0));
    }

    #[test]
    fn deeply_nested_unbalanced() {
        let mut tokens = vec![Token::OpenParen; 100_000];
        tokens.push(n(1.0));

        let mut evaluator = Evaluator::new();
        assert_eq!(
            evaluator.evaluate(&tokens),
            Err(EvaluationError::UnexpectedToken(None))
        );
        assert!(evaluator.history().is_empty());
    }

    #[test]
    fn long_operator_chain() {
        // Right grouping recurses once per operator.
        let mut tokens = vec![n(1.0)];
        for _ in 0..100_000 {
            tokens.push(op('+'));
            tokens.push(n(1.0));
        }

        let mut evaluator = Evaluator::new();
        assert_eq!(evaluator.evaluate(&tokens), Ok(100_001.0));
    }
}
