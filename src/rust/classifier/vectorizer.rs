use std::collections::{HashMap, HashSet};

use log::debug;
use ndarray::Array1;

use super::text::{normalize, terms};
use super::utils::normalize_vector;

/// TF-IDF vectorizer over unigrams and bigrams of normalized text.
///
/// The vocabulary is capped at `max_features` terms, chosen by document
/// frequency with ties broken by first appearance in the corpus. A term's
/// position in the vocabulary is its rank in that ordering.
#[derive(Debug, Clone, PartialEq)]
pub struct TfidfVectorizer {
    vocabulary: Vec<String>,
    index: HashMap<String, usize>,
    idf: Array1<f64>,
}

impl TfidfVectorizer {
    /// Learns the vocabulary and IDF weights from raw training documents.
    pub fn fit<S: AsRef<str>>(corpus: &[S], max_features: usize) -> Self {
        let n_docs = corpus.len();
        let mut doc_freq: HashMap<String, usize> = HashMap::new();
        let mut first_seen: Vec<String> = Vec::new();

        for doc in corpus {
            let normalized = normalize(doc.as_ref());
            let mut seen_here = HashSet::new();
            for term in terms(&normalized) {
                if !seen_here.insert(term.clone()) {
                    continue;
                }
                let count = doc_freq.entry(term.clone()).or_insert(0);
                if *count == 0 {
                    first_seen.push(term);
                }
                *count += 1;
            }
        }

        // Stable sort keeps first-seen order among equal document frequencies.
        let mut ranked: Vec<(usize, String)> = first_seen
            .into_iter()
            .map(|t| (doc_freq[&t], t))
            .collect();
        ranked.sort_by(|a, b| b.0.cmp(&a.0));
        ranked.truncate(max_features);

        let idf = ranked
            .iter()
            .map(|(df, _)| smoothed_idf(n_docs, *df))
            .collect::<Array1<f64>>();
        let vocabulary: Vec<String> = ranked.into_iter().map(|(_, t)| t).collect();

        debug!(
            "Fitted vectorizer on {} documents: {} candidate terms, kept {}",
            n_docs,
            doc_freq.len(),
            vocabulary.len()
        );

        Self::from_parts_unchecked(vocabulary, idf)
    }

    /// Rebuilds a vectorizer from a stored vocabulary and IDF weights.
    ///
    /// Returns `None` when the lengths differ or a term is duplicated.
    pub(crate) fn from_parts(vocabulary: Vec<String>, idf: Vec<f64>) -> Option<Self> {
        if vocabulary.len() != idf.len() {
            return None;
        }
        let unique: HashSet<&String> = vocabulary.iter().collect();
        if unique.len() != vocabulary.len() {
            return None;
        }
        Some(Self::from_parts_unchecked(vocabulary, Array1::from(idf)))
    }

    fn from_parts_unchecked(vocabulary: Vec<String>, idf: Array1<f64>) -> Self {
        let index = vocabulary
            .iter()
            .enumerate()
            .map(|(i, t)| (t.clone(), i))
            .collect();
        Self { vocabulary, index, idf }
    }

    /// Maps text to an L2-normalized TF-IDF vector of length `len()`.
    ///
    /// Out-of-vocabulary terms are ignored; text with no known terms maps to
    /// the zero vector.
    pub fn transform(&self, text: &str) -> Array1<f64> {
        let mut tf = Array1::<f64>::zeros(self.vocabulary.len());
        for term in terms(&normalize(text)) {
            if let Some(&i) = self.index.get(&term) {
                tf[i] += 1.0;
            }
        }
        normalize_vector(&(tf * &self.idf))
    }

    /// Number of in-vocabulary term occurrences in `text`.
    pub fn count_known_terms(&self, text: &str) -> usize {
        terms(&normalize(text))
            .iter()
            .filter(|t| self.index.contains_key(*t))
            .count()
    }

    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    pub fn idf(&self) -> &Array1<f64> {
        &self.idf
    }

    pub fn len(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vocabulary.is_empty()
    }
}

/// `ln((1 + n) / (1 + df)) + 1`
fn smoothed_idf(n_docs: usize, df: usize) -> f64 {
    ((1.0 + n_docs as f64) / (1.0 + df as f64)).ln() + 1.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus() -> Vec<&'static str> {
        vec![
            "Uber ride 300",
            "Uber moto 60",
            "Metro card recharge 500",
            "Swiggy order 450",
        ]
    }

    #[test]
    fn test_vocabulary_ranked_by_document_frequency() {
        let v = TfidfVectorizer::fit(&corpus(), 100);
        assert_eq!(v.vocabulary()[0], "uber");
        // "ride" is the first term seen among those with df == 1
        assert_eq!(v.vocabulary()[1], "ride");
        let unique: HashSet<_> = v.vocabulary().iter().collect();
        assert_eq!(unique.len(), v.len());
    }

    #[test]
    fn test_max_features_bound() {
        let v = TfidfVectorizer::fit(&corpus(), 3);
        assert_eq!(v.len(), 3);
        assert_eq!(v.vocabulary(), &["uber", "ride", "uber ride"]);
    }

    #[test]
    fn test_idf_values() {
        let v = TfidfVectorizer::fit(&corpus(), 100);
        // uber appears in 2 of 4 documents
        let expected = (5.0f64 / 3.0).ln() + 1.0;
        assert!((v.idf()[0] - expected).abs() < 1e-12);
        assert!(v.idf().iter().all(|&w| w >= 1.0));
    }

    #[test]
    fn test_transform_is_unit_length() {
        let v = TfidfVectorizer::fit(&corpus(), 100);
        let x = v.transform("uber ride to the airport");
        assert_eq!(x.len(), v.len());
        let norm = x.dot(&x).sqrt();
        assert!((norm - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_transform_unknown_text_is_zero() {
        let v = TfidfVectorizer::fit(&corpus(), 100);
        for text in ["", "completely unrelated words", "12345"] {
            let x = v.transform(text);
            assert_eq!(x.len(), v.len());
            assert!(x.iter().all(|&w| w == 0.0));
            assert_eq!(v.count_known_terms(text), 0);
        }
    }

    #[test]
    fn test_fit_is_deterministic() {
        let a = TfidfVectorizer::fit(&corpus(), 100);
        let b = TfidfVectorizer::fit(&corpus(), 100);
        assert_eq!(a, b);
        assert_eq!(a.transform("uber ride"), b.transform("uber ride"));
    }

    #[test]
    fn test_from_parts_rejects_duplicates() {
        let dup = vec!["uber".to_string(), "uber".to_string()];
        assert!(TfidfVectorizer::from_parts(dup, vec![1.0, 1.0]).is_none());
        assert!(TfidfVectorizer::from_parts(vec!["uber".into()], vec![]).is_none());
    }
}
