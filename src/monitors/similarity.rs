//! Bag-of-words cosine similarity over lowercased word tokens.

use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\w+\b").expect("static regex"));

pub type TermFrequency = HashMap<String, u32>;

pub fn tokenize(text: &str) -> Vec<String> {
    WORD.find_iter(&text.to_lowercase())
        .map(|m| m.as_str().to_string())
        .collect()
}

pub fn term_frequency(text: &str) -> TermFrequency {
    let mut tf = TermFrequency::new();
    for token in tokenize(text) {
        *tf.entry(token).or_insert(0) += 1;
    }
    tf
}

/// Zero when either vector is empty or nothing is shared.
pub fn cosine(a: &TermFrequency, b: &TermFrequency) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let dot: f64 = a
        .iter()
        .filter_map(|(term, &x)| b.get(term).map(|&y| f64::from(x) * f64::from(y)))
        .sum();
    if dot == 0.0 {
        return 0.0;
    }
    let norm = |v: &TermFrequency| v.values().map(|&x| f64::from(x).powi(2)).sum::<f64>().sqrt();
    dot / (norm(a) * norm(b))
}

/// Mean cosine over every unordered pair. Zero with fewer than two vectors.
#[allow(clippy::cast_precision_loss)]
pub fn average_pairwise(vectors: &[TermFrequency]) -> f64 {
    let mut total = 0.0;
    let mut pairs = 0usize;
    for (i, a) in vectors.iter().enumerate() {
        for b in &vectors[i + 1..] {
            total += cosine(a, b);
            pairs += 1;
        }
    }
    if pairs == 0 { 0.0 } else { total / pairs as f64 }
}

/// Mean cosine over every `(left, right)` combination.
#[allow(clippy::cast_precision_loss)]
pub fn average_cross(left: &[TermFrequency], right: &[TermFrequency]) -> f64 {
    let pairs = left.len() * right.len();
    if pairs == 0 {
        return 0.0;
    }
    let total: f64 = left
        .iter()
        .flat_map(|a| right.iter().map(move |b| cosine(a, b)))
        .sum();
    total / pairs as f64
}
