//! Stop words and lemmatization, loaded once per process and shared read-only
//! by every analysis run.

use std::borrow::Cow;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::Result;

/// Standard English stop-word list.
pub const ENGLISH_STOP_WORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're", "you've",
    "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he", "him", "his", "himself",
    "she", "she's", "her", "hers", "herself", "it", "it's", "its", "itself", "they", "them",
    "their", "theirs", "themselves", "what", "which", "who", "whom", "this", "that", "that'll",
    "these", "those", "am", "is", "are", "was", "were", "be", "been", "being", "have", "has",
    "had", "having", "do", "does", "did", "doing", "a", "an", "the", "and", "but", "if", "or",
    "because", "as", "until", "while", "of", "at", "by", "for", "with", "about", "against",
    "between", "into", "through", "during", "before", "after", "above", "below", "to", "from",
    "up", "down", "in", "out", "on", "off", "over", "under", "again", "further", "then", "once",
    "here", "there", "when", "where", "why", "how", "all", "any", "both", "each", "few", "more",
    "most", "other", "some", "such", "no", "nor", "not", "only", "own", "same", "so", "than",
    "too", "very", "s", "t", "can", "will", "just", "don", "don't", "should", "should've", "now",
    "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren", "aren't", "couldn", "couldn't", "didn",
    "didn't", "doesn", "doesn't", "hadn", "hadn't", "hasn", "hasn't", "haven", "haven't", "isn",
    "isn't", "ma", "mightn", "mightn't", "mustn", "mustn't", "needn", "needn't", "shan", "shan't",
    "shouldn", "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't", "wouldn",
    "wouldn't",
];

/// Marketplace-specific additions on top of the English list.
pub const ADDITIONAL_STOP_WORDS: &[&str] =
    &["in", "for", "the", "of", "if", "when", "and", "de", "para"];

/// Irregular and suffix-ambiguous noun plurals.
const NOUN_EXCEPTIONS: &[(&str, &str)] = &[
    ("men", "man"),
    ("women", "woman"),
    ("children", "child"),
    ("feet", "foot"),
    ("teeth", "tooth"),
    ("geese", "goose"),
    ("mice", "mouse"),
    ("lice", "louse"),
    ("oxen", "ox"),
    ("dice", "die"),
    ("knives", "knife"),
    ("wives", "wife"),
    ("lives", "life"),
    ("leaves", "leaf"),
    ("loaves", "loaf"),
    ("halves", "half"),
    ("shelves", "shelf"),
    ("wolves", "wolf"),
    ("calves", "calf"),
    ("thieves", "thief"),
    ("scarves", "scarf"),
    ("hooves", "hoof"),
    ("potatoes", "potato"),
    ("tomatoes", "tomato"),
    ("heroes", "hero"),
    ("echoes", "echo"),
    ("cookies", "cookie"),
    ("movies", "movie"),
    ("ties", "tie"),
    ("pies", "pie"),
    ("lies", "lie"),
    ("hoodies", "hoodie"),
    ("smoothies", "smoothie"),
    ("brownies", "brownie"),
    ("beanies", "beanie"),
    ("booties", "bootie"),
    ("onesies", "onesie"),
    ("calories", "calorie"),
    ("zombies", "zombie"),
    ("selfies", "selfie"),
    ("veggies", "veggie"),
    ("goodies", "goodie"),
    ("niches", "niche"),
    ("caches", "cache"),
    ("headaches", "headache"),
    ("mustaches", "mustache"),
    ("avalanches", "avalanche"),
    ("news", "news"),
    ("series", "series"),
    ("species", "species"),
    ("lens", "lens"),
    ("chaos", "chaos"),
    ("gas", "gas"),
    ("clothes", "clothes"),
    ("christmas", "christmas"),
    ("xmas", "xmas"),
    ("canvas", "canvas"),
    ("bias", "bias"),
    ("atlas", "atlas"),
    ("texas", "texas"),
];

/// Detachment rules applied to noun endings, WordNet style.
const NOUN_SUFFIX_RULES: &[(&str, &str)] = &[
    ("s", ""),
    ("ses", "s"),
    ("ves", "f"),
    ("xes", "x"),
    ("zes", "z"),
    ("ches", "ch"),
    ("shes", "sh"),
    ("men", "man"),
    ("ies", "y"),
];

/// Rule order used when there is no vocabulary to validate candidates against.
const OPEN_SUFFIX_RULES: &[(&str, &str)] = &[
    ("ies", "y"),
    ("sses", "ss"),
    ("xes", "x"),
    ("zes", "z"),
    ("ches", "ch"),
    ("shes", "sh"),
    ("s", ""),
];

/// Reduces a lowercase word to its dictionary base form.
///
/// Implementations must never fail: a word without a known lemma is returned
/// unchanged.
pub trait Lemmatizer: Send + Sync {
    fn lemmatize<'a>(&self, word: &'a str) -> Cow<'a, str>;
}

/// Leaves every word as it is.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThrough;

impl Lemmatizer for PassThrough {
    fn lemmatize<'a>(&self, word: &'a str) -> Cow<'a, str> {
        Cow::Borrowed(word)
    }
}

/// Noun lemmatizer built from an exception table, suffix rules and an optional
/// vocabulary of known base forms.
#[derive(Debug, Clone, Default)]
pub struct NounLemmatizer {
    exceptions: HashMap<String, String>,
    vocabulary: Option<HashSet<String>>,
}

impl NounLemmatizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Built-in English exceptions, no vocabulary.
    pub fn english() -> Self {
        Self::new().with_exceptions(
            NOUN_EXCEPTIONS
                .iter()
                .map(|(word, lemma)| (word.to_string(), lemma.to_string())),
        )
    }

    pub fn with_exceptions<I>(mut self, exceptions: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        self.exceptions.extend(
            exceptions
                .into_iter()
                .map(|(word, lemma)| (word.to_lowercase(), lemma.to_lowercase())),
        );
        self
    }

    /// Restricts rule output to known base forms.
    pub fn with_vocabulary<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.vocabulary
            .get_or_insert_with(HashSet::new)
            .extend(words.into_iter().map(|w| w.as_ref().to_lowercase()));
        self
    }

    fn lemmatize_with_vocabulary<'a>(
        &self,
        word: &'a str,
        vocabulary: &HashSet<String>,
    ) -> Cow<'a, str> {
        let mut candidates: Vec<Cow<'a, str>> = Vec::new();
        if vocabulary.contains(word) {
            candidates.push(Cow::Borrowed(word));
        }
        for (suffix, replacement) in NOUN_SUFFIX_RULES {
            if let Some(stem) = word.strip_suffix(suffix) {
                let candidate = format!("{stem}{replacement}");
                if !candidate.is_empty() && vocabulary.contains(&candidate) {
                    candidates.push(Cow::Owned(candidate));
                }
            }
        }
        candidates
            .into_iter()
            .min_by_key(|candidate| candidate.len())
            .unwrap_or(Cow::Borrowed(word))
    }

    fn lemmatize_open<'a>(&self, word: &'a str) -> Cow<'a, str> {
        if word.len() < 4 || ["ss", "us", "is", "as"].iter().any(|end| word.ends_with(end)) {
            return Cow::Borrowed(word);
        }
        for (suffix, replacement) in OPEN_SUFFIX_RULES {
            if let Some(stem) = word.strip_suffix(suffix) {
                if stem.len() < 2 {
                    break;
                }
                return Cow::Owned(format!("{stem}{replacement}"));
            }
        }
        Cow::Borrowed(word)
    }
}

impl Lemmatizer for NounLemmatizer {
    fn lemmatize<'a>(&self, word: &'a str) -> Cow<'a, str> {
        if let Some(lemma) = self.exceptions.get(word) {
            return Cow::Owned(lemma.clone());
        }
        match &self.vocabulary {
            Some(vocabulary) => self.lemmatize_with_vocabulary(word, vocabulary),
            None => self.lemmatize_open(word),
        }
    }
}

/// Stop-word set plus lemmatizer.
pub struct Lexicon {
    stop_words: HashSet<String>,
    lemmatizer: Box<dyn Lemmatizer>,
}

impl fmt::Debug for Lexicon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lexicon")
            .field("stop_words", &self.stop_words.len())
            .finish_non_exhaustive()
    }
}

impl Lexicon {
    pub fn new<I, S, L>(stop_words: I, lemmatizer: L) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        L: Lemmatizer + 'static,
    {
        Self {
            stop_words: stop_words
                .into_iter()
                .map(|w| w.as_ref().trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect(),
            lemmatizer: Box::new(lemmatizer),
        }
    }

    /// English stop words, the marketplace additions and the built-in noun
    /// lemmatizer.
    pub fn english() -> Self {
        Self::english_with(NounLemmatizer::english())
    }

    pub fn english_with<L: Lemmatizer + 'static>(lemmatizer: L) -> Self {
        Self::new(
            ENGLISH_STOP_WORDS.iter().chain(ADDITIONAL_STOP_WORDS),
            lemmatizer,
        )
    }

    pub fn with_stop_words<I, S>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.stop_words.extend(
            extra
                .into_iter()
                .map(|w| w.as_ref().trim().to_lowercase())
                .filter(|w| !w.is_empty()),
        );
        self
    }

    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(word)
    }

    pub fn stop_words(&self) -> &HashSet<String> {
        &self.stop_words
    }

    pub fn lemmatize<'a>(&self, word: &'a str) -> Cow<'a, str> {
        self.lemmatizer.lemmatize(word)
    }
}

/// One entry per line; blank lines and `#` comments are skipped.
pub fn load_word_list(path: &Path) -> Result<Vec<String>> {
    let raw = fs::read_to_string(path)?;
    let words: Vec<String> = parse_lines(&raw).map(str::to_lowercase).collect();
    debug!(path = %path.display(), words = words.len(), "word list loaded");
    Ok(words)
}

/// `inflected<TAB>lemma` per line. Lines without a tab are ignored.
pub fn load_exceptions(path: &Path) -> Result<Vec<(String, String)>> {
    let raw = fs::read_to_string(path)?;
    let pairs: Vec<(String, String)> = parse_lines(&raw)
        .filter_map(|line| line.split_once('\t'))
        .map(|(word, lemma)| (word.trim().to_lowercase(), lemma.trim().to_lowercase()))
        .filter(|(word, lemma)| !word.is_empty() && !lemma.is_empty())
        .collect();
    debug!(path = %path.display(), entries = pairs.len(), "lemma exceptions loaded");
    Ok(pairs)
}

fn parse_lines(raw: &str) -> impl Iterator<Item = &str> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
}
