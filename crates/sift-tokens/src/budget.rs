use sift_core::traits::ITokenizer;

/// Running token budget over any [`ITokenizer`].
///
/// Items are charged in order and joined by `separator`; every item after the
/// first is also charged the separator's tokens, so `used()` covers the joined
/// text.
pub struct TokenBudget<'a> {
    tokenizer: &'a dyn ITokenizer,
    limit: usize,
    used: usize,
    items: usize,
    separator_tokens: usize,
}

impl<'a> TokenBudget<'a> {
    pub fn new(tokenizer: &'a dyn ITokenizer, limit: usize, separator: &str) -> Self {
        let separator_tokens = if separator.is_empty() {
            0
        } else {
            tokenizer.count(separator)
        };
        Self {
            tokenizer,
            limit,
            used: 0,
            items: 0,
            separator_tokens,
        }
    }

    pub fn used(&self) -> usize {
        self.used
    }

    pub fn remaining(&self) -> usize {
        self.limit.saturating_sub(self.used)
    }

    /// Charge `text`, plus a separator unless it is the first item. Charges
    /// nothing and returns false when it would overflow.
    pub fn try_charge(&mut self, text: &str) -> bool {
        let separator = if self.items == 0 { 0 } else { self.separator_tokens };
        let cost = self.tokenizer.count(text) + separator;
        if cost > self.remaining() {
            return false;
        }
        self.used += cost;
        self.items += 1;
        true
    }
}
