//! TF-IDF over unigrams and bigrams.
//!
//! Tokens are runs of two or more word characters. English stopwords are
//! dropped before bigrams are formed, so a bigram joins the surviving
//! neighbours. Weights are raw counts times smoothed idf
//! `ln((1 + n) / (1 + df)) + 1`, and every vector is L2-normalized.

use crate::error::IndexBuildError;
use crate::TermId;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::{BTreeSet, HashMap};

lazy_static! {
    static ref TOKEN: Regex = Regex::new(r"(?u)\b\w\w+\b").expect("valid regex");
    static ref ENGLISH_STOPWORDS: std::collections::HashSet<&'static str> = {
        let words: &[&str] = &[
            "a","about","above","across","after","afterwards","again","against","all","almost","alone","along",
            "already","also","although","always","am","among","amongst","amoungst","amount","an","and","another",
            "any","anyhow","anyone","anything","anyway","anywhere","are","around","as","at",
            "back","be","became","because","become","becomes","becoming","been","before","beforehand","behind",
            "being","below","beside","besides","between","beyond","bill","both","bottom","but","by",
            "call","can","cannot","cant","co","con","could","couldnt","cry",
            "de","describe","detail","do","done","down","due","during",
            "each","eg","eight","either","eleven","else","elsewhere","empty","enough","etc","even","ever","every",
            "everyone","everything","everywhere","except",
            "few","fifteen","fifty","fill","find","fire","first","five","for","former","formerly","forty","found",
            "four","from","front","full","further",
            "get","give","go",
            "had","has","hasnt","have","he","hence","her","here","hereafter","hereby","herein","hereupon","hers",
            "herself","him","himself","his","how","however","hundred",
            "i","ie","if","in","inc","indeed","interest","into","is","it","its","itself",
            "keep","last","latter","latterly","least","less","ltd",
            "made","many","may","me","meanwhile","might","mill","mine","more","moreover","most","mostly","move",
            "much","must","my","myself",
            "name","namely","neither","never","nevertheless","next","nine","no","nobody","none","noone","nor",
            "not","nothing","now","nowhere",
            "of","off","often","on","once","one","only","onto","or","other","others","otherwise","our","ours",
            "ourselves","out","over","own",
            "part","per","perhaps","please","put",
            "rather","re",
            "same","see","seem","seemed","seeming","seems","serious","several","she","should","show","side",
            "since","sincere","six","sixty","so","some","somehow","someone","something","sometime","sometimes",
            "somewhere","still","such","system",
            "take","ten","than","that","the","their","them","themselves","then","thence","there","thereafter",
            "thereby","therefore","therein","thereupon","these","they","thick","thin","third","this","those",
            "though","three","through","throughout","thru","thus","to","together","too","top","toward","towards",
            "twelve","twenty","two",
            "un","under","until","up","upon","us",
            "very","via",
            "was","we","well","were","what","whatever","when","whence","whenever","where","whereafter","whereas",
            "whereby","wherein","whereupon","wherever","whether","which","while","whither","who","whoever",
            "whole","whom","whose","why","will","with","within","without","would",
            "yet","you","your","yours","yourself","yourselves",
        ];
        words.iter().copied().collect()
    };
}

fn is_english_stopword(token: &str) -> bool { ENGLISH_STOPWORDS.contains(token) }

/// Split text into vocabulary units: unigrams followed by bigrams.
pub fn analyze(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let tokens: Vec<&str> = TOKEN
        .find_iter(&lowered)
        .map(|m| m.as_str())
        .filter(|t| !is_english_stopword(t))
        .collect();
    let mut units: Vec<String> = tokens.iter().map(|t| t.to_string()).collect();
    units.extend(tokens.windows(2).map(|pair| format!("{} {}", pair[0], pair[1])));
    units
}

/// Sparse vector with entries sorted by term id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    entries: Vec<(TermId, f32)>,
}

impl SparseVector {
    fn from_counts(counts: HashMap<TermId, u32>, idf: &[f32]) -> Self {
        let mut entries: Vec<(TermId, f32)> = counts
            .into_iter()
            .map(|(tid, tf)| (tid, tf as f32 * idf[tid as usize]))
            .collect();
        entries.sort_by_key(|(tid, _)| *tid);
        let mut v = Self { entries };
        v.l2_normalize();
        v
    }

    fn l2_normalize(&mut self) {
        let norm = self.norm();
        if norm == 0.0 { return; }
        for (_, w) in self.entries.iter_mut() { *w /= norm; }
    }

    pub fn entries(&self) -> &[(TermId, f32)] { &self.entries }

    pub fn is_zero(&self) -> bool { self.entries.is_empty() }

    pub fn norm(&self) -> f32 {
        self.entries.iter().map(|(_, w)| w * w).sum::<f32>().sqrt()
    }

    pub fn dot(&self, other: &SparseVector) -> f32 {
        let (mut i, mut j, mut acc) = (0, 0, 0.0f32);
        while i < self.entries.len() && j < other.entries.len() {
            let (a, wa) = self.entries[i];
            let (b, wb) = other.entries[j];
            match a.cmp(&b) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    acc += wa * wb;
                    i += 1;
                    j += 1;
                }
            }
        }
        acc
    }
}

/// Cosine similarity; 0 when either vector has zero magnitude.
pub fn cosine_similarity(a: &SparseVector, b: &SparseVector) -> f32 {
    let denom = a.norm() * b.norm();
    if denom == 0.0 { return 0.0; }
    (a.dot(b) / denom).clamp(0.0, 1.0)
}

/// Fitted vocabulary and idf weights. Queries must be embedded with the same
/// model the corpus was fitted with.
#[derive(Debug, Clone)]
pub struct TfidfModel {
    vocabulary: HashMap<String, TermId>,
    idf: Vec<f32>,
}

impl TfidfModel {
    /// Fit over the corpus and return the model with one vector per document.
    pub fn fit<S: AsRef<str>>(docs: &[S]) -> Result<(Self, Vec<SparseVector>), IndexBuildError> {
        if docs.is_empty() { return Err(IndexBuildError::EmptyCorpus); }
        let analyzed: Vec<Vec<String>> = docs.iter().map(|d| analyze(d.as_ref())).collect();

        let terms: BTreeSet<&str> = analyzed.iter().flatten().map(String::as_str).collect();
        if terms.is_empty() { return Err(IndexBuildError::EmptyVocabulary); }
        let vocabulary: HashMap<String, TermId> = terms
            .into_iter()
            .enumerate()
            .map(|(i, t)| (t.to_string(), i as TermId))
            .collect();

        let mut df = vec![0u32; vocabulary.len()];
        let mut counts_per_doc: Vec<HashMap<TermId, u32>> = Vec::with_capacity(analyzed.len());
        for units in &analyzed {
            let mut counts: HashMap<TermId, u32> = HashMap::new();
            for unit in units {
                *counts.entry(vocabulary[unit.as_str()]).or_insert(0) += 1;
            }
            for tid in counts.keys() { df[*tid as usize] += 1; }
            counts_per_doc.push(counts);
        }

        let n = docs.len() as f32;
        let idf: Vec<f32> = df
            .iter()
            .map(|&df_t| ((1.0 + n) / (1.0 + df_t as f32)).ln() + 1.0)
            .collect();

        let vectors = counts_per_doc
            .into_iter()
            .map(|counts| SparseVector::from_counts(counts, &idf))
            .collect();
        Ok((Self { vocabulary, idf }, vectors))
    }

    /// Embed text into the fitted space; unknown units carry no weight.
    pub fn transform(&self, text: &str) -> SparseVector {
        let mut counts: HashMap<TermId, u32> = HashMap::new();
        for unit in analyze(text) {
            if let Some(&tid) = self.vocabulary.get(&unit) {
                *counts.entry(tid).or_insert(0) += 1;
            }
        }
        SparseVector::from_counts(counts, &self.idf)
    }

    pub fn vocabulary_len(&self) -> usize { self.vocabulary.len() }

    pub fn term_id(&self, unit: &str) -> Option<TermId> { self.vocabulary.get(unit).copied() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bigrams_skip_english_stopwords() {
        let units = analyze("Python for Data Analysis");
        assert_eq!(units, vec!["python", "data", "analysis", "python data", "data analysis"]);
    }

    #[test]
    fn single_character_tokens_are_dropped() {
        assert_eq!(analyze("c r programming"), vec!["programming"]);
    }

    #[test]
    fn vocabulary_ids_are_lexicographic() {
        let (model, _) = TfidfModel::fit(&["sql server", "java"]).unwrap();
        assert_eq!(model.term_id("java"), Some(0));
        assert_eq!(model.term_id("server"), Some(1));
        assert_eq!(model.term_id("sql"), Some(2));
        assert_eq!(model.term_id("sql server"), Some(3));
        assert_eq!(model.vocabulary_len(), 4);
    }

    #[test]
    fn vectors_are_unit_length() {
        let (_, vectors) = TfidfModel::fit(&["sql server database", "java programming", ""]).unwrap();
        assert!((vectors[0].norm() - 1.0).abs() < 1e-6);
        assert!((vectors[1].norm() - 1.0).abs() < 1e-6);
        assert!(vectors[2].is_zero());
    }

    #[test]
    fn idf_matches_smoothed_formula() {
        // "java" appears in 1 of 2 docs, "programming" in both.
        let (model, vectors) = TfidfModel::fit(&["java programming", "python programming"]).unwrap();
        let idf_rare = (3.0f32 / 2.0).ln() + 1.0;
        let idf_common = 1.0f32;
        let norm = (idf_rare * idf_rare * 2.0 + idf_common * idf_common).sqrt();
        let java = model.term_id("java").unwrap();
        let w = vectors[0].entries().iter().find(|(t, _)| *t == java).unwrap().1;
        assert!((w - idf_rare / norm).abs() < 1e-6);
    }

    #[test]
    fn degenerate_corpora_fail() {
        let empty: [&str; 0] = [];
        assert_eq!(TfidfModel::fit(&empty).unwrap_err(), IndexBuildError::EmptyCorpus);
        assert_eq!(TfidfModel::fit(&["", "the a an"]).unwrap_err(), IndexBuildError::EmptyVocabulary);
    }

    #[test]
    fn cosine_of_disjoint_and_zero_vectors() {
        let (model, vectors) = TfidfModel::fit(&["sql server", "java"]).unwrap();
        assert_eq!(cosine_similarity(&vectors[0], &vectors[1]), 0.0);
        assert_eq!(cosine_similarity(&model.transform("unseen words"), &vectors[0]), 0.0);
        assert!((cosine_similarity(&vectors[0], &vectors[0]) - 1.0).abs() < 1e-6);
    }
}
