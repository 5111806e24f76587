use crate::token::Token;

/// Forward-only cursor over one token sequence. Lives for a single evaluation.
pub struct Scanner<'a> {
    tokens: &'a [Token],
    position: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            position: 0,
        }
    }

    /// Consumes and returns the token under the cursor.
    pub fn scan(&mut self) -> Option<Token> {
        let token = self.current()?;
        self.position += 1;
        Some(token)
    }

    pub fn current(&self) -> Option<Token> {
        self.tokens.get(self.position).copied()
    }

    pub fn position(&self) -> usize {
        self.position
    }
}
