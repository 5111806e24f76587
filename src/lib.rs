mod evaluator;
mod history;
mod scanner;
mod shared;
mod token;

pub use evaluator::{apply, EvaluationError, Evaluator};
pub use history::{History, HistoryEntry};
pub use shared::SharedEvaluator;
pub use token::{join, tokenise, Operator, Token};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseTokenError {
    #[error("Unknown token: `{0}`")]
    UnknownToken(String),
}
