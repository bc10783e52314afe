use once_cell::sync::Lazy;
use regex::Regex;

use crate::lexicon::Lexicon;

static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w+\b").expect("valid regex"));

/// Splits a search term into lowercase, alphabetic, lemmatized tokens with stop
/// words removed, in their original order.
///
/// Candidates containing digits or underscores are dropped before
/// lemmatization. A token is a stop word if either its surface form or its
/// lemma is in the lexicon's stop-word set.
pub fn normalize(text: &str, lexicon: &Lexicon) -> Vec<String> {
    let lowered = text.to_lowercase();
    WORD_RE
        .find_iter(&lowered)
        .map(|m| m.as_str())
        .filter(|word| is_alphabetic(word) && !lexicon.is_stop_word(word))
        .filter_map(|word| {
            let lemma = lexicon.lemmatize(word);
            if is_alphabetic(&lemma) && !lexicon.is_stop_word(&lemma) {
                Some(lemma.into_owned())
            } else {
                None
            }
        })
        .collect()
}

fn is_alphabetic(word: &str) -> bool {
    !word.is_empty() && word.chars().all(char::is_alphabetic)
}
