use crate::record::CourseRecord;
use crate::DocId;
use serde::Serialize;
use std::cmp::Ordering;

/// A ranked record. Borrows from the index it was scored against.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ScoredResult<'a> {
    pub doc_id: DocId,
    pub course_record: &'a CourseRecord,
    pub similarity_score: f32,
}

/// Sort by score descending and keep the first `top_n`.
///
/// The sort is stable: equal scores keep corpus order.
pub fn rank<'a>(records: &'a [CourseRecord], scores: &[f32], top_n: usize) -> Vec<ScoredResult<'a>> {
    if top_n == 0 { return Vec::new(); }
    let mut scored: Vec<ScoredResult<'a>> = records
        .iter()
        .zip(scores)
        .enumerate()
        .map(|(i, (course_record, &similarity_score))| ScoredResult {
            doc_id: i as DocId,
            course_record,
            similarity_score,
        })
        .collect();
    scored.sort_by(|a, b| b.similarity_score.partial_cmp(&a.similarity_score).unwrap_or(Ordering::Equal));
    scored.truncate(top_n);
    scored
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::CourseRow;

    fn records(n: usize) -> Vec<CourseRecord> {
        (0..n)
            .map(|i| CourseRecord::from(CourseRow { title: Some(format!("course {i}")), ..Default::default() }))
            .collect()
    }

    #[test]
    fn sorts_descending_with_stable_ties() {
        let recs = records(5);
        let out = rank(&recs, &[0.2, 0.9, 0.2, 1.1, 0.0], 10);
        let ids: Vec<DocId> = out.iter().map(|r| r.doc_id).collect();
        assert_eq!(ids, vec![3, 1, 0, 2, 4]);
        assert_eq!(out[2].course_record.title.as_deref(), Some("course 0"));
    }

    #[test]
    fn truncates_to_top_n() {
        let recs = records(4);
        assert_eq!(rank(&recs, &[0.1, 0.2, 0.3, 0.4], 2).len(), 2);
        assert_eq!(rank(&recs, &[0.1, 0.2, 0.3, 0.4], 9).len(), 4);
        assert!(rank(&recs, &[0.1, 0.2, 0.3, 0.4], 0).is_empty());
    }
}
