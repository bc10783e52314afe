use std::fmt;

/// Width of the token window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NGramOrder {
    Monogram = 1,
    Bigram = 2,
    Trigram = 3,
}

impl NGramOrder {
    pub const ALL: [NGramOrder; 3] = [NGramOrder::Monogram, NGramOrder::Bigram, NGramOrder::Trigram];

    pub fn width(self) -> usize {
        self as usize
    }

    /// Label used for report sheets and the `N-Gram Type` column.
    pub fn label(self) -> &'static str {
        match self {
            NGramOrder::Monogram => "Monograms",
            NGramOrder::Bigram => "Bigrams",
            NGramOrder::Trigram => "Trigrams",
        }
    }

    pub fn from_width(width: usize) -> Option<Self> {
        match width {
            1 => Some(NGramOrder::Monogram),
            2 => Some(NGramOrder::Bigram),
            3 => Some(NGramOrder::Trigram),
            _ => None,
        }
    }
}

impl fmt::Display for NGramOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Ordered tuple of tokens. Ordering is lexicographic over the tokens.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NGram(Vec<String>);

impl NGram {
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(tokens.into_iter().map(Into::into).collect())
    }

    pub fn tokens(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for NGram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(" "))
    }
}

/// Contiguous windows of `order.width()` tokens, stepping by one.
pub fn extract(tokens: &[String], order: NGramOrder) -> Vec<NGram> {
    tokens
        .windows(order.width())
        .map(|window| NGram(window.to_vec()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn monograms_are_single_tokens() {
        let grams = extract(&tokens(&["red", "shoe", "red"]), NGramOrder::Monogram);
        assert_eq!(
            grams,
            vec![NGram::new(["red"]), NGram::new(["shoe"]), NGram::new(["red"])]
        );
    }

    #[test]
    fn windows_preserve_adjacency() {
        let words = tokens(&["women", "running", "shoe", "size"]);
        let bigrams = extract(&words, NGramOrder::Bigram);
        assert_eq!(bigrams.len(), 3);
        assert_eq!(bigrams[1], NGram::new(["running", "shoe"]));
        let trigrams = extract(&words, NGramOrder::Trigram);
        assert_eq!(trigrams.len(), 2);
        assert_eq!(trigrams[1].to_string(), "running shoe size");
    }

    #[test]
    fn short_sequences_yield_nothing() {
        assert!(extract(&tokens(&["shoe", "red"]), NGramOrder::Trigram).is_empty());
        assert!(extract(&[], NGramOrder::Monogram).is_empty());
    }

    #[test]
    fn order_labels_and_widths() {
        assert_eq!(NGramOrder::Bigram.width(), 2);
        assert_eq!(NGramOrder::Trigram.label(), "Trigrams");
        assert_eq!(NGramOrder::from_width(1), Some(NGramOrder::Monogram));
        assert_eq!(NGramOrder::from_width(4), None);
    }

    #[test]
    fn ngram_order_is_lexicographic() {
        assert!(NGram::new(["a", "z"]) < NGram::new(["b", "a"]));
        assert!(NGram::new(["shoe"]) < NGram::new(["shoe", "red"]));
    }
}
