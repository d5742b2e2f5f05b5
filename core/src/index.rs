use crate::error::IndexBuildError;
use crate::record::{CourseRecord, CourseRow};
use crate::vectorizer::{SparseVector, TfidfModel};
use crate::{DocId, TermId};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Posting {
    pub doc_id: DocId,
    pub weight: f32, // normalized tf-idf weight
}

/// Every record plus the fitted model and per-record vectors. Built once,
/// read-only afterwards; scores are comparable only within one instance.
#[derive(Debug)]
pub struct CorpusIndex {
    records: Vec<CourseRecord>,
    model: TfidfModel,
    vectors: Vec<SparseVector>,
    norms: Vec<f32>,
    postings: HashMap<TermId, Vec<Posting>>, // postings sorted by doc_id
}

impl CorpusIndex {
    pub fn build(rows: Vec<CourseRow>) -> Result<Self, IndexBuildError> {
        let records: Vec<CourseRecord> = rows.into_iter().map(CourseRecord::from).collect();
        Self::from_records(records)
    }

    /// Build from records whose `normalized_text` is already set.
    pub fn from_records(records: Vec<CourseRecord>) -> Result<Self, IndexBuildError> {
        if records.is_empty() { return Err(IndexBuildError::EmptyCorpus); }
        if records.iter().all(|r| r.normalized_text.trim().is_empty()) {
            return Err(IndexBuildError::EmptyVocabulary);
        }

        let texts: Vec<&str> = records.iter().map(|r| r.normalized_text.as_str()).collect();
        let (model, vectors) = TfidfModel::fit(&texts)?;

        let mut postings: HashMap<TermId, Vec<Posting>> = HashMap::new();
        for (doc_id, vector) in vectors.iter().enumerate() {
            for &(tid, weight) in vector.entries() {
                postings.entry(tid).or_default().push(Posting { doc_id: doc_id as DocId, weight });
            }
        }
        let norms = vectors.iter().map(SparseVector::norm).collect();

        tracing::info!(
            num_records = records.len(),
            num_terms = model.vocabulary_len(),
            "corpus index built"
        );
        Ok(Self { records, model, vectors, norms, postings })
    }

    pub fn records(&self) -> &[CourseRecord] { &self.records }

    pub fn record(&self, doc_id: DocId) -> Option<&CourseRecord> { self.records.get(doc_id as usize) }

    pub fn len(&self) -> usize { self.records.len() }

    pub fn is_empty(&self) -> bool { self.records.is_empty() }

    pub fn model(&self) -> &TfidfModel { &self.model }

    pub fn vector(&self, doc_id: DocId) -> Option<&SparseVector> { self.vectors.get(doc_id as usize) }

    pub fn norms(&self) -> &[f32] { &self.norms }

    pub fn postings(&self, term_id: TermId) -> Option<&[Posting]> {
        self.postings.get(&term_id).map(Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(title: &str, text: &str) -> CourseRow {
        CourseRow { title: Some(title.into()), text_for_tfidf: Some(text.into()), ..Default::default() }
    }

    #[test]
    fn builds_postings_in_doc_order() {
        let index = CorpusIndex::build(vec![
            row("A", "sql server"),
            row("B", "java"),
            row("C", "sql basics tuning"),
        ])
        .unwrap();
        assert_eq!(index.len(), 3);
        let sql = index.model().term_id("sql").unwrap();
        let docs: Vec<DocId> = index.postings(sql).unwrap().iter().map(|p| p.doc_id).collect();
        assert_eq!(docs, vec![0, 2]);
        assert_eq!(index.record(2).unwrap().normalized_text, "sql tuning");
    }

    #[test]
    fn empty_corpus_is_rejected() {
        assert_eq!(CorpusIndex::build(vec![]).unwrap_err(), IndexBuildError::EmptyCorpus);
    }

    #[test]
    fn stopword_only_corpus_is_rejected() {
        let err = CorpusIndex::build(vec![row("A", "online course"), row("B", "")]).unwrap_err();
        assert_eq!(err, IndexBuildError::EmptyVocabulary);
    }
}
