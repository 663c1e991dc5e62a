// Copyright 2023 Xayn AG
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as
// published by the Free Software Foundation, version 3.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use std::collections::HashMap;

use displaydoc::Display;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

use crate::vector::TermVector;

/// Splits a text into lowercase word tokens.
///
/// Words are maximal runs of ascii word characters, everything else separates them.
pub fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9A-Za-z_]+").unwrap());

    WORD.find_iter(text)
        .map(|word| word.as_str().to_ascii_lowercase())
}

fn is_valid_token(token: &str) -> bool {
    static TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9a-z_]+$").unwrap());
    TOKEN.is_match(token)
}

#[derive(Debug, Display, Error)]
pub enum InvalidVocabulary {
    /// Duplicate vocabulary token `{0}`
    DuplicateToken(String),
    /// Vocabulary token `{0:?}` is not a lowercase word
    InvalidToken(String),
}

/// An ordered set of lowercase word tokens.
///
/// The position of a token is its dimension in every [`TermVector`] built from this
/// vocabulary, so it must never change while such vectors are in use.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(try_from = "Vec<String>")]
pub struct Vocabulary {
    tokens: Vec<String>,
    indices: HashMap<String, usize>,
}

impl Vocabulary {
    /// Creates a vocabulary from unique lowercase word tokens.
    pub fn new(tokens: Vec<String>) -> Result<Self, InvalidVocabulary> {
        let mut indices = HashMap::with_capacity(tokens.len());
        for (index, token) in tokens.iter().enumerate() {
            if !is_valid_token(token) {
                return Err(InvalidVocabulary::InvalidToken(token.clone()));
            }
            if indices.insert(token.clone(), index).is_some() {
                return Err(InvalidVocabulary::DuplicateToken(token.clone()));
            }
        }

        Ok(Self { tokens, indices })
    }

    /// Collects the tokens of all texts in order of their first occurrence.
    pub fn from_corpus<'a>(texts: impl IntoIterator<Item = &'a str>) -> Self {
        let mut vocabulary = Self::default();
        for token in texts.into_iter().flat_map(tokenize) {
            if !vocabulary.indices.contains_key(&token) {
                vocabulary
                    .indices
                    .insert(token.clone(), vocabulary.tokens.len());
                vocabulary.tokens.push(token);
            }
        }

        vocabulary
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn index_of(&self, token: &str) -> Option<usize> {
        self.indices.get(token).copied()
    }

    /// Counts the occurrences of the vocabulary tokens in the text.
    ///
    /// Unknown tokens are ignored, the vocabulary never grows. The vector always has the length
    /// of the vocabulary.
    pub fn vectorize(&self, text: &str) -> TermVector {
        let mut vector = TermVector::zeros(self.len());
        for token in tokenize(text) {
            if let Some(index) = self.index_of(&token) {
                vector.increment(index);
            }
        }

        vector
    }
}

impl TryFrom<Vec<String>> for Vocabulary {
    type Error = InvalidVocabulary;

    fn try_from(tokens: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(tokens)
    }
}

impl Serialize for Vocabulary {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.tokens.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use xayn_test_utils::assert_approx_eq;

    use super::*;

    fn vocabulary(tokens: &[&str]) -> Vocabulary {
        Vocabulary::new(tokens.iter().map(ToString::to_string).collect()).unwrap()
    }

    #[test]
    fn test_tokenize() {
        assert_eq!(
            tokenize("Intro to C++, Data-Structures & snake_case 101!").collect::<Vec<_>>(),
            ["intro", "to", "c", "data", "structures", "snake_case", "101"],
        );
        assert_eq!(tokenize("").count(), 0);
        assert_eq!(tokenize(" ,.;!? -- ").count(), 0);
    }

    #[test]
    fn test_new_rejects_invalid_tokens() {
        assert!(matches!(
            Vocabulary::new(vec!["word".into(), "word".into()]),
            Err(InvalidVocabulary::DuplicateToken(token)) if token == "word",
        ));
        assert!(matches!(
            Vocabulary::new(vec!["Word".into()]),
            Err(InvalidVocabulary::InvalidToken(_)),
        ));
        assert!(matches!(
            Vocabulary::new(vec![String::new()]),
            Err(InvalidVocabulary::InvalidToken(_)),
        ));
        assert!(matches!(
            Vocabulary::new(vec!["two words".into()]),
            Err(InvalidVocabulary::InvalidToken(_)),
        ));
    }

    #[test]
    fn test_from_corpus_keeps_first_occurrence_order() {
        let vocabulary = Vocabulary::from_corpus([
            "Software design and testing.",
            "Design of software SYSTEMS",
            "",
        ]);
        assert_eq!(
            vocabulary.tokens(),
            ["software", "design", "and", "testing", "of", "systems"],
        );
        assert_eq!(vocabulary.index_of("design"), Some(1));
        assert_eq!(vocabulary.index_of("Design"), None);
    }

    #[test]
    fn test_vectorize_counts_terms() {
        let vocabulary = vocabulary(&["word1", "word2", "word3"]);
        let vector = vocabulary.vectorize("word1 word3 word3");
        assert_approx_eq!(f32, *vector, [1., 0., 2.]);
        let vector = vocabulary.vectorize("WORD2, Word2; word2 and unknown words");
        assert_approx_eq!(f32, *vector, [0., 3., 0.]);
    }

    #[test]
    fn test_vectorize_without_known_tokens_is_zero() {
        let vocabulary = vocabulary(&["word1", "word2", "word3"]);
        for text in ["", "   ", "?!.,", "nothing known here"] {
            let vector = vocabulary.vectorize(text);
            assert_eq!(vector.len(), vocabulary.len());
            assert!(vector.is_zero());
        }
        assert_eq!(vocabulary.len(), 3);
    }

    #[test]
    fn test_vectorize_with_empty_vocabulary() {
        assert!(Vocabulary::default().vectorize("any text").is_empty());
    }

    #[test]
    fn test_serde_as_token_list() {
        let vocabulary = vocabulary(&["b", "a"]);
        let serialized = serde_json::to_string(&vocabulary).unwrap();
        assert_eq!(serialized, r#"["b","a"]"#);
        let deserialized = serde_json::from_str::<Vocabulary>(&serialized).unwrap();
        assert_eq!(deserialized.index_of("a"), Some(1));
        assert!(serde_json::from_str::<Vocabulary>(r#"["a","a"]"#).is_err());
    }
}
