//! # Sentence Tokenizers
//!
//! The [`Tokenizer`] trait is the seam between the corpus and whatever
//! splits a document into sentences. [`RegexTokenizer`] is the built-in
//! implementation; anything else (an external parser, a closure) can be
//! plugged in instead, including as `Box<dyn Tokenizer>` when the choice
//! is made at runtime.

use regex::Regex;
use tracing::warn;

use crate::error::Result;
use crate::types::Sentence;

/// Splits a document string into sentences of offset-annotated tokens.
///
/// Implementations must be deterministic and return token offsets as
/// character offsets into `text`. Token text need not equal the source
/// substring.
pub trait Tokenizer {
    fn tokenize(&self, text: &str) -> Vec<Sentence>;
}

impl<F> Tokenizer for F
where
    F: Fn(&str) -> Vec<Sentence>,
{
    fn tokenize(&self, text: &str) -> Vec<Sentence> {
        self(text)
    }
}

impl Tokenizer for Box<dyn Tokenizer + '_> {
    fn tokenize(&self, text: &str) -> Vec<Sentence> {
        (**self).tokenize(text)
    }
}

impl Tokenizer for &(dyn Tokenizer + '_) {
    fn tokenize(&self, text: &str) -> Vec<Sentence> {
        (**self).tokenize(text)
    }
}

/// Appends a sentence built from `tokens` and `offsets`. Empty input is
/// ignored; input that breaks the sentence invariants is logged and dropped.
fn push_sentence(sentences: &mut Vec<Sentence>, tokens: Vec<String>, offsets: Vec<usize>) {
    if tokens.is_empty() {
        return;
    }
    match Sentence::new(tokens, offsets) {
        Ok(sentence) => sentences.push(sentence),
        Err(e) => warn!(position = sentences.len(), "dropping tokenizer output: {e}"),
    }
}

/// Tokens that close a sentence.
const TERMINATORS: &[&str] = &[".", "!", "?"];

/// Penn Treebank escapes for bracket characters.
const PTB_ESCAPES: &[(&str, &str)] = &[
    ("(", "-LRB-"),
    (")", "-RRB-"),
    ("[", "-LSB-"),
    ("]", "-RSB-"),
    ("{", "-LCB-"),
    ("}", "-RCB-"),
];

/// Replaces PTB bracket escapes with the bracket they stand for.
pub fn unescape_ptb(token: &str) -> &str {
    PTB_ESCAPES
        .iter()
        .find(|(_, escaped)| *escaped == token)
        .map_or(token, |&(raw, _)| raw)
}

/// Configuration for [`RegexTokenizer`].
#[derive(Debug, Clone)]
pub struct TokenizerConfig {
    /// Emit `-LRB-`/`-RRB-` style tokens for brackets.
    pub ptb_escapes: bool,
    /// Lowercase every token.
    pub lowercase: bool,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            ptb_escapes: true,
            lowercase: false,
        }
    }
}

impl TokenizerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable PTB bracket escaping.
    pub fn with_ptb_escapes(mut self, enabled: bool) -> Self {
        self.ptb_escapes = enabled;
        self
    }

    /// Enable or disable lowercasing.
    pub fn with_lowercase(mut self, enabled: bool) -> Self {
        self.lowercase = enabled;
        self
    }
}

/// Rule-based tokenizer: word runs and single punctuation characters,
/// with sentences closed by `.`, `!` or `?`.
#[derive(Debug, Clone)]
pub struct RegexTokenizer {
    config: TokenizerConfig,
    re_token: Regex,
}

impl RegexTokenizer {
    /// Create a tokenizer with the default configuration.
    ///
    /// # Errors
    ///
    /// Only fails if the static token pattern does not compile.
    pub fn new() -> Result<Self> {
        Self::with_config(TokenizerConfig::default())
    }

    /// Create a tokenizer with the given configuration.
    pub fn with_config(config: TokenizerConfig) -> Result<Self> {
        Ok(Self {
            config,
            re_token: Regex::new(r"\w+|[^\w\s]")?,
        })
    }

    pub fn config(&self) -> &TokenizerConfig {
        &self.config
    }

    /// Splits `text` into sentences.
    ///
    /// # Examples
    /// ```
    /// use mentalign_core::tokenizer::RegexTokenizer;
    ///
    /// let tokenizer = RegexTokenizer::new().unwrap();
    /// let sentences = tokenizer.split("BRCA1 mutation increases risk. Second one.");
    /// assert_eq!(sentences.len(), 2);
    /// assert_eq!(sentences[1].token_offsets()[0], 31);
    /// ```
    pub fn split(&self, text: &str) -> Vec<Sentence> {
        let mut sentences = Vec::new();
        let mut tokens = Vec::new();
        let mut offsets = Vec::new();

        // Byte offsets from the regex are converted to character offsets
        // incrementally, since matches come in order.
        let mut byte_cursor = 0;
        let mut char_cursor = 0;

        for m in self.re_token.find_iter(text) {
            char_cursor += text[byte_cursor..m.start()].chars().count();
            byte_cursor = m.start();

            let raw = m.as_str();
            tokens.push(self.normalize(raw));
            offsets.push(char_cursor);

            if TERMINATORS.contains(&raw) {
                self.flush(&mut sentences, &mut tokens, &mut offsets);
            }
        }
        self.flush(&mut sentences, &mut tokens, &mut offsets);

        sentences
    }

    fn flush(
        &self,
        sentences: &mut Vec<Sentence>,
        tokens: &mut Vec<String>,
        offsets: &mut Vec<usize>,
    ) {
        push_sentence(sentences, std::mem::take(tokens), std::mem::take(offsets));
    }

    fn normalize(&self, raw: &str) -> String {
        if self.config.ptb_escapes {
            if let Some((_, escaped)) = PTB_ESCAPES.iter().find(|(bracket, _)| *bracket == raw) {
                return (*escaped).to_string();
            }
        }
        if self.config.lowercase {
            raw.to_lowercase()
        } else {
            raw.to_string()
        }
    }
}

impl Tokenizer for RegexTokenizer {
    fn tokenize(&self, text: &str) -> Vec<Sentence> {
        self.split(text)
    }
}

impl Tokenizer for &RegexTokenizer {
    fn tokenize(&self, text: &str) -> Vec<Sentence> {
        self.split(text)
    }
}

/// Splits on whitespace only; a standalone `.`, `!` or `?` token closes a
/// sentence. Useful for text that is already tokenized.
#[derive(Debug, Clone, Copy, Default)]
pub struct WhitespaceTokenizer;

impl WhitespaceTokenizer {
    pub fn new() -> Self {
        Self
    }
}

impl Tokenizer for WhitespaceTokenizer {
    fn tokenize(&self, text: &str) -> Vec<Sentence> {
        let mut sentences = Vec::new();
        let mut tokens: Vec<String> = Vec::new();
        let mut offsets = Vec::new();
        let mut current: Option<usize> = None;

        let chars = text.chars().chain(std::iter::once(' ')).enumerate();
        let mut buf = String::new();
        for (idx, c) in chars {
            if c.is_whitespace() {
                if let Some(start) = current.take() {
                    let closes = TERMINATORS.contains(&buf.as_str());
                    tokens.push(std::mem::take(&mut buf));
                    offsets.push(start);
                    if closes {
                        push_sentence(
                            &mut sentences,
                            std::mem::take(&mut tokens),
                            std::mem::take(&mut offsets),
                        );
                    }
                }
            } else {
                current.get_or_insert(idx);
                buf.push(c);
            }
        }
        push_sentence(&mut sentences, tokens, offsets);
        sentences
    }
}

impl Tokenizer for &WhitespaceTokenizer {
    fn tokenize(&self, text: &str) -> Vec<Sentence> {
        (**self).tokenize(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(sentence: &Sentence) -> Vec<&str> {
        sentence.tokens().iter().map(String::as_str).collect()
    }

    #[test]
    fn test_split_sentences() {
        let tokenizer = RegexTokenizer::new().unwrap();
        let sentences = tokenizer.split("Ataxia is rare. It is inherited!");

        assert_eq!(sentences.len(), 2);
        assert_eq!(texts(&sentences[0]), vec!["Ataxia", "is", "rare", "."]);
        assert_eq!(sentences[0].token_offsets(), &[0, 7, 10, 14]);
        assert_eq!(sentences[1].token_offsets()[0], 16);
    }

    #[test]
    fn test_trailing_sentence_without_terminator() {
        let tokenizer = RegexTokenizer::new().unwrap();
        let sentences = tokenizer.split("First. no terminator here");
        assert_eq!(sentences.len(), 2);
        assert_eq!(texts(&sentences[1]), vec!["no", "terminator", "here"]);
    }

    #[test]
    fn test_ptb_escapes() {
        let tokenizer = RegexTokenizer::new().unwrap();
        let sentences = tokenizer.split("Fragile X (FRAX) syndrome.");
        assert_eq!(
            texts(&sentences[0]),
            vec!["Fragile", "X", "-LRB-", "FRAX", "-RRB-", "syndrome", "."]
        );
        // Offsets still point at the bracket characters.
        assert_eq!(sentences[0].token_offsets()[2], 10);
        assert_eq!(sentences[0].token_offsets()[4], 15);
    }

    #[test]
    fn test_escapes_disabled_and_lowercase() {
        let config = TokenizerConfig::new().with_ptb_escapes(false).with_lowercase(true);
        let tokenizer = RegexTokenizer::with_config(config).unwrap();
        let sentences = tokenizer.split("Fragile X (FRAX)");
        assert_eq!(texts(&sentences[0]), vec!["fragile", "x", "(", "frax", ")"]);
    }

    #[test]
    fn test_character_offsets_with_multibyte_text() {
        let tokenizer = RegexTokenizer::new().unwrap();
        let sentences = tokenizer.split("Sjögren syndrome.");
        assert_eq!(sentences[0].token_offsets(), &[0, 8, 16]);
    }

    #[test]
    fn test_empty_and_whitespace_input() {
        let tokenizer = RegexTokenizer::new().unwrap();
        assert!(tokenizer.split("").is_empty());
        assert!(tokenizer.split("   \n\t").is_empty());
    }

    #[test]
    fn test_unescape_ptb() {
        assert_eq!(unescape_ptb("-LRB-"), "(");
        assert_eq!(unescape_ptb("-RCB-"), "}");
        assert_eq!(unescape_ptb("cancer"), "cancer");
    }

    #[test]
    fn test_whitespace_tokenizer() {
        let text = "BRCA1 mutation increases cancer risk . Second sentence here .";
        let sentences = WhitespaceTokenizer::new().tokenize(text);
        assert_eq!(sentences.len(), 2);
        assert_eq!(sentences[0].token_offsets(), &[0, 6, 15, 25, 32, 37]);
        assert_eq!(texts(&sentences[1]), vec!["Second", "sentence", "here", "."]);
        assert_eq!(sentences[1].first_offset(), Some(39));
    }

    #[test]
    fn test_closure_tokenizer() {
        let tokenizer = |text: &str| vec![Sentence::from_pairs([(text, 0)]).unwrap()];
        let sentences = tokenizer.tokenize("whole");
        assert_eq!(sentences.len(), 1);
        assert_eq!(sentences[0].tokens()[0], "whole");
    }

    fn run<T: Tokenizer>(tokenizer: T, text: &str) -> Vec<Sentence> {
        tokenizer.tokenize(text)
    }

    #[test]
    fn test_boxed_and_borrowed_tokenizers() {
        let text = "Ataxia is rare. It is inherited!";
        let regex = RegexTokenizer::new().unwrap();
        let expected = regex.split(text);

        let boxed: Box<dyn Tokenizer> = Box::new(regex.clone());
        assert_eq!(run(boxed, text), expected);

        let dynamic: &dyn Tokenizer = &regex;
        assert_eq!(run(dynamic, text), expected);
        assert_eq!(run(&regex, text), expected);

        let whitespace = WhitespaceTokenizer::new();
        assert_eq!(run(&whitespace, "a b .").len(), 1);
    }

    #[test]
    fn test_push_sentence_skips_invalid_input() {
        let mut sentences = Vec::new();
        push_sentence(&mut sentences, Vec::new(), Vec::new());
        push_sentence(&mut sentences, vec!["a".into(), "b".into()], vec![3, 3]);
        assert!(sentences.is_empty());

        push_sentence(&mut sentences, vec!["a".into(), "b".into()], vec![0, 2]);
        assert_eq!(sentences.len(), 1);
    }
}
