use calculator::{join, tokenise, Evaluator, Token};
use wasm_bindgen::prelude::wasm_bindgen;

#[wasm_bindgen]
pub struct Session {
    evaluator: Evaluator,
}

#[wasm_bindgen]
pub fn setup() -> Session {
    console_error_panic_hook::set_once();

    Session {
        evaluator: Evaluator::new(),
    }
}

/// Evaluates whitespace-separated tokens, returning the value or the error text.
#[wasm_bindgen]
pub fn run(code: &str, session: &mut Session) -> String {
    match tokenise(code) {
        Ok(tokens) => match session.evaluator.evaluate(&tokens) {
            Ok(value) => Token::Number(value).to_string(),
            Err(error) => error.to_string(),
        },
        Err(error) => error.to_string(),
    }
}

#[wasm_bindgen]
pub fn history(session: &Session) -> String {
    session
        .evaluator
        .history()
        .iter()
        .map(|entry| {
            format!(
                "{} = {}",
                join(entry.tokens()),
                Token::Number(entry.result())
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
