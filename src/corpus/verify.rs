//! Dimension verification across the parallel word/tag/label files.

use crate::errors::CorpusError;

/// True when every sentence has equally long word, tag and label sequences
/// and the three files hold the same number of sentences.
pub fn verify_dimensions<S: AsRef<[String]>>(words: &[S], tags: &[S], labels: &[S]) -> bool {
    check_dimensions(words, tags, labels).is_ok()
}

/// Like [`verify_dimensions`] but names the first offending sentence
pub fn check_dimensions<S: AsRef<[String]>>(words: &[S], tags: &[S], labels: &[S]) -> Result<(), CorpusError> {
    if words.len() != tags.len() || words.len() != labels.len() {
        return Err(CorpusError::SentenceCountMismatch {
            words: words.len(),
            tags: tags.len(),
            labels: labels.len(),
        });
    }

    for (sentence, ((w, t), l)) in words.iter().zip(tags).zip(labels).enumerate() {
        let (w, t, l) = (w.as_ref().len(), t.as_ref().len(), l.as_ref().len());
        if w != t || w != l {
            return Err(CorpusError::DimensionMismatch {
                sentence,
                words: w,
                tags: t,
                labels: l,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seq(line: &str) -> Vec<String> {
        line.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn test_matching_dimensions() {
        let words = vec![seq("<bos> the cat <eos>"), seq("<bos> hi <eos>")];
        let tags = vec![seq("<bos> det nn <eos>"), seq("<bos> uh <eos>")];
        let labels = vec![seq("<bos> det nsubj <eos>"), seq("<bos> root <eos>")];
        assert!(verify_dimensions(&words, &tags, &labels));
    }

    #[test]
    fn test_mismatch_is_reported_with_sentence_index() {
        let words = vec![seq("<bos> a <eos>"), seq("<bos> the cat <eos>")];
        let tags = vec![seq("<bos> det <eos>"), seq("<bos> det nn <eos>")];
        let labels = vec![seq("<bos> det <eos>"), seq("<bos> det <eos>")];

        assert!(!verify_dimensions(&words, &tags, &labels));
        match check_dimensions(&words, &tags, &labels) {
            Err(CorpusError::DimensionMismatch { sentence, words, tags, labels }) => {
                assert_eq!((sentence, words, tags, labels), (1, 4, 4, 3));
            }
            other => panic!("Expected DimensionMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_sentence_count_mismatch() {
        let words = vec![seq("<bos> a <eos>"), seq("<bos> b <eos>")];
        let tags = vec![seq("<bos> x <eos>")];
        let labels = vec![seq("<bos> y <eos>")];
        assert!(!verify_dimensions(&words, &tags, &labels));
        assert!(matches!(
            check_dimensions(&words, &tags, &labels),
            Err(CorpusError::SentenceCountMismatch { words: 2, tags: 1, labels: 1 })
        ));
    }
}
