//! Vocabulary construction from the tokenized corpus.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

/// An ordered list of distinct tokens eligible for dictionary ids
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct Vocabulary {
    tokens: Vec<String>,
    members: HashSet<String>,
}

impl Vocabulary {
    /// Build from tokens in order; later duplicates are ignored
    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut vocab = Self::default();
        for token in tokens {
            let token = token.into();
            if vocab.members.insert(token.clone()) {
                vocab.tokens.push(token);
            }
        }
        vocab
    }

    pub fn contains(&self, token: &str) -> bool {
        self.members.contains(token)
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl From<Vec<String>> for Vocabulary {
    fn from(tokens: Vec<String>) -> Self {
        Self::from_tokens(tokens)
    }
}

impl From<Vocabulary> for Vec<String> {
    fn from(vocab: Vocabulary) -> Self {
        vocab.tokens
    }
}

/// Word, tag and label vocabularies of one corpus pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabularies {
    pub words: Vocabulary,
    pub tags: Vocabulary,
    pub labels: Vocabulary,
}

/// Occurrence counts that remember first-seen order for tie breaking
#[derive(Debug, Default)]
pub struct TokenCounter<'a> {
    counts: HashMap<&'a str, (usize, usize)>,
}

impl<'a> TokenCounter<'a> {
    pub fn add(&mut self, token: &'a str) {
        let next_rank = self.counts.len();
        self.counts.entry(token).or_insert((0, next_rank)).0 += 1;
    }

    pub fn count(&self, token: &str) -> usize {
        self.counts.get(token).map_or(0, |(count, _)| *count)
    }

    /// Tokens by descending count, ties in first-seen order, at most `limit`
    pub fn most_common(&self, limit: usize) -> Vec<&'a str> {
        let mut ranked: Vec<(&'a str, usize, usize)> = self
            .counts
            .iter()
            .map(|(token, (count, first_seen))| (*token, *count, *first_seen))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
        ranked.into_iter().take(limit).map(|(token, _, _)| token).collect()
    }
}

/// Builds the capped word vocabulary and the full tag and label vocabularies
#[derive(Debug, Clone, Copy)]
pub struct VocabularyBuilder {
    word_cap: usize,
}

impl VocabularyBuilder {
    pub fn new(word_cap: usize) -> Self {
        Self { word_cap }
    }

    pub fn build<S: AsRef<[String]>>(&self, words: &[S], tags: &[S], labels: &[S]) -> Vocabularies {
        let mut counter = TokenCounter::default();
        let mut tag_order = Vec::new();
        let mut label_order = Vec::new();

        for ((sent_words, sent_tags), sent_labels) in words.iter().zip(tags).zip(labels) {
            for word in sent_words.as_ref() {
                counter.add(word);
            }
            tag_order.extend(sent_tags.as_ref().iter().map(String::as_str));
            label_order.extend(sent_labels.as_ref().iter().map(String::as_str));
        }

        let vocabularies = Vocabularies {
            words: Vocabulary::from_tokens(counter.most_common(self.word_cap)),
            tags: Vocabulary::from_tokens(tag_order),
            labels: Vocabulary::from_tokens(label_order),
        };
        log::info!(
            "Built vocabularies: {} words (cap {}), {} tags, {} labels",
            vocabularies.words.len(),
            self.word_cap,
            vocabularies.tags.len(),
            vocabularies.labels.len()
        );
        vocabularies
    }
}
