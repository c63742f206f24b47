//! TF-IDF vector space over a catalog of item descriptions.
//!
//! Vocabulary is the `max_features` terms with the highest document
//! frequency (ties by term order). Columns are numbered in alphabetical order
//! of the kept terms. Weights are `tf * idf` with the smoothed
//! `idf = ln((1 + n) / (1 + df)) + 1`, and every document vector is scaled to
//! unit L2 norm, so a dot product between two vectors is their cosine.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::debug;

/// Sparse document vector: `(column, weight)` pairs sorted by column
pub type SparseVector = Vec<(usize, f64)>;

/// English stop words dropped before counting terms
pub const STOP_WORDS: &[&str] = &[
    "a", "about", "above", "across", "after", "afterwards", "again", "against", "all", "almost",
    "alone", "along", "already", "also", "although", "always", "am", "among", "amongst",
    "amoungst", "amount", "an", "and", "another", "any", "anyhow", "anyone", "anything", "anyway",
    "anywhere", "are", "around", "as", "at", "back", "be", "became", "because", "become",
    "becomes", "becoming", "been", "before", "beforehand", "behind", "being", "below", "beside",
    "besides", "between", "beyond", "bill", "both", "bottom", "but", "by", "call", "can",
    "cannot", "cant", "co", "con", "could", "couldnt", "cry", "de", "describe", "detail", "do",
    "done", "down", "due", "during", "each", "eg", "eight", "either", "eleven", "else",
    "elsewhere", "empty", "enough", "etc", "even", "ever", "every", "everyone", "everything",
    "everywhere", "except", "few", "fifteen", "fifty", "fill", "find", "fire", "first", "five",
    "for", "former", "formerly", "forty", "found", "four", "from", "front", "full", "further",
    "get", "give", "go", "had", "has", "hasnt", "have", "he", "hence", "her", "here",
    "hereafter", "hereby", "herein", "hereupon", "hers", "herself", "him", "himself", "his",
    "how", "however", "hundred", "i", "ie", "if", "in", "inc", "indeed", "interest", "into",
    "is", "it", "its", "itself", "keep", "last", "latter", "latterly", "least", "less", "ltd",
    "made", "many", "may", "me", "meanwhile", "might", "mill", "mine", "more", "moreover",
    "most", "mostly", "move", "much", "must", "my", "myself", "name", "namely", "neither",
    "never", "nevertheless", "next", "nine", "no", "nobody", "none", "noone", "nor", "not",
    "nothing", "now", "nowhere", "of", "off", "often", "on", "once", "one", "only", "onto", "or",
    "other", "others", "otherwise", "our", "ours", "ourselves", "out", "over", "own", "part",
    "per", "perhaps", "please", "put", "rather", "re", "same", "see", "seem", "seemed",
    "seeming", "seems", "serious", "several", "she", "should", "show", "side", "since",
    "sincere", "six", "sixty", "so", "some", "somehow", "someone", "something", "sometime",
    "sometimes", "somewhere", "still", "such", "system", "take", "ten", "than", "that", "the",
    "their", "them", "themselves", "then", "thence", "there", "thereafter", "thereby",
    "therefore", "therein", "thereupon", "these", "they", "thick", "thin", "third", "this",
    "those", "though", "three", "through", "throughout", "thru", "thus", "to", "together", "too",
    "top", "toward", "towards", "twelve", "twenty", "two", "un", "under", "until", "up", "upon",
    "us", "very", "via", "was", "we", "well", "were", "what", "whatever", "when", "whence",
    "whenever", "where", "whereafter", "whereas", "whereby", "wherein", "whereupon", "wherever",
    "whether", "which", "while", "whither", "who", "whoever", "whole", "whom", "whose", "why",
    "will", "with", "within", "without", "would", "yet", "you", "your", "yours", "yourself",
    "yourselves",
];

/// Lowercase, split on anything that is not a word character, keep tokens of
/// two or more characters that are not stop words.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|token| token.chars().count() >= 2)
        .filter(|token| !STOP_WORDS.contains(token))
        .map(str::to_string)
        .collect()
}

/// Fitted vocabulary and idf weights for one catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    max_features: usize,
    /// term -> column
    vocabulary: BTreeMap<String, usize>,
    /// idf weight per column
    idf: Vec<f64>,
}

impl TfidfVectorizer {
    /// Learn vocabulary and idf weights from the catalog texts
    pub fn fit<S: AsRef<str>>(documents: &[S], max_features: usize) -> Self {
        let n = documents.len();

        let mut doc_freq: HashMap<String, usize> = HashMap::new();
        for doc in documents {
            let unique: HashSet<String> = tokenize(doc.as_ref()).into_iter().collect();
            for term in unique {
                *doc_freq.entry(term).or_insert(0) += 1;
            }
        }

        // Most frequent first, alphabetical among equals
        let mut ranked: Vec<(String, usize)> = doc_freq.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(max_features);
        ranked.sort_by(|a, b| a.0.cmp(&b.0));

        let mut vocabulary = BTreeMap::new();
        let mut idf = Vec::with_capacity(ranked.len());
        for (column, (term, df)) in ranked.into_iter().enumerate() {
            idf.push(((1.0 + n as f64) / (1.0 + df as f64)).ln() + 1.0);
            vocabulary.insert(term, column);
        }

        debug!(
            "Fitted TF-IDF over {} documents, {} terms (cap {})",
            n,
            vocabulary.len(),
            max_features
        );

        Self {
            max_features,
            vocabulary,
            idf,
        }
    }

    /// Weight one document in the fitted space. Terms outside the vocabulary
    /// are ignored; a document with no known terms is the zero vector.
    pub fn transform(&self, document: &str) -> SparseVector {
        let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
        for token in tokenize(document) {
            if let Some(&column) = self.vocabulary.get(&token) {
                *counts.entry(column).or_insert(0.0) += 1.0;
            }
        }

        let mut vector: SparseVector = counts
            .into_iter()
            .map(|(column, tf)| (column, tf * self.idf[column]))
            .collect();

        let norm = vector.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for (_, weight) in vector.iter_mut() {
                *weight /= norm;
            }
        }
        vector
    }

    /// Fit on the catalog and return the vector of every document, in order
    pub fn fit_transform<S: AsRef<str>>(
        documents: &[S],
        max_features: usize,
    ) -> (Self, Vec<SparseVector>) {
        let vectorizer = Self::fit(documents, max_features);
        let vectors = documents
            .iter()
            .map(|doc| vectorizer.transform(doc.as_ref()))
            .collect();
        (vectorizer, vectors)
    }

    pub fn vocabulary(&self) -> &BTreeMap<String, usize> {
        &self.vocabulary
    }

    pub fn idf(&self) -> &[f64] {
        &self.idf
    }

    pub fn max_features(&self) -> usize {
        self.max_features
    }

    /// Number of columns in the fitted space
    pub fn dims(&self) -> usize {
        self.idf.len()
    }
}

/// Dot product of two column-sorted sparse vectors
pub fn sparse_dot(a: &[(usize, f64)], b: &[(usize, f64)]) -> f64 {
    let (mut i, mut j) = (0, 0);
    let mut sum = 0.0;
    while i < a.len() && j < b.len() {
        match a[i].0.cmp(&b[j].0) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                sum += a[i].1 * b[j].1;
                i += 1;
                j += 1;
            }
        }
    }
    sum
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_drops_stop_words_and_short_tokens() {
        let tokens = tokenize("The Greek-Yogurt bowl, with a 2x protein boost!");
        assert_eq!(tokens, ["greek", "yogurt", "bowl", "2x", "protein", "boost"]);
    }

    #[test]
    fn test_vocabulary_capped_by_document_frequency() {
        let docs = ["chicken rice", "chicken salad", "chicken wrap rice"];
        let vectorizer = TfidfVectorizer::fit(&docs, 2);

        // chicken (df 3) and rice (df 2) survive the cap
        let terms: Vec<&str> = vectorizer.vocabulary().keys().map(String::as_str).collect();
        assert_eq!(terms, ["chicken", "rice"]);
        assert_eq!(vectorizer.vocabulary()["chicken"], 0);
        assert_eq!(vectorizer.dims(), 2);
    }

    #[test]
    fn test_idf_is_smoothed() {
        let docs = ["oats", "oats berries"];
        let vectorizer = TfidfVectorizer::fit(&docs, 10);
        let berries = vectorizer.vocabulary()["berries"];
        let oats = vectorizer.vocabulary()["oats"];

        assert!((vectorizer.idf()[oats] - 1.0).abs() < 1e-12);
        assert!((vectorizer.idf()[berries] - ((3.0f64 / 2.0).ln() + 1.0)).abs() < 1e-12);
    }

    #[test]
    fn test_vectors_are_unit_length() {
        let docs = ["squat legs barbell", "plank core bodyweight", "lunge legs dumbbell"];
        let (_, vectors) = TfidfVectorizer::fit_transform(&docs, 500);

        for vector in &vectors {
            let norm: f64 = vector.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
            assert!((norm - 1.0).abs() < 1e-12);
        }
        assert!(sparse_dot(&vectors[0], &vectors[2]) > 0.0);
        assert_eq!(sparse_dot(&vectors[0], &vectors[1]), 0.0);
    }

    #[test]
    fn test_unknown_terms_give_zero_vector() {
        let vectorizer = TfidfVectorizer::fit(&["salmon quinoa"], 10);
        assert!(vectorizer.transform("the and of").is_empty());
        assert!(vectorizer.transform("pizza").is_empty());
    }
}
