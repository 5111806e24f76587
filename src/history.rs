use crate::token::Token;

/// A successful evaluation: the exact input and what it produced.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    tokens: Vec<Token>,
    result: f64,
}

impl HistoryEntry {
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn result(&self) -> f64 {
        self.result
    }
}

/// Append-only record of results, oldest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct History {
    entries: Vec<HistoryEntry>,
}

impl History {
    pub(crate) fn push(&mut self, tokens: &[Token], result: f64) {
        self.entries.push(HistoryEntry {
            tokens: tokens.to_vec(),
            result,
        });
    }

    /// The value `Token::Answer` resolves to.
    pub fn latest(&self) -> Option<f64> {
        self.last().map(HistoryEntry::result)
    }

    pub fn last(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    pub fn all(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HistoryEntry> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a History {
    type Item = &'a HistoryEntry;
    type IntoIter = std::slice::Iter<'a, HistoryEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
