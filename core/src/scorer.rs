use crate::index::CorpusIndex;
use crate::normalizer::normalize;

/// Cosine similarity of the query against every record, in corpus order.
///
/// A query that normalizes to nothing is embedded from its raw lowercased text.
pub fn score(index: &CorpusIndex, query_text: &str) -> Vec<f32> {
    let mut input = normalize(query_text);
    if input.trim().is_empty() {
        input = query_text.to_lowercase();
    }
    let query = index.model().transform(&input);

    let mut dots = vec![0.0f32; index.len()];
    let q_norm = query.norm();
    if q_norm == 0.0 { return dots; }

    for &(tid, q_w) in query.entries() {
        if let Some(postings) = index.postings(tid) {
            for p in postings {
                dots[p.doc_id as usize] += p.weight * q_w;
            }
        }
    }

    dots.iter()
        .zip(index.norms())
        .map(|(dot, d_norm)| {
            if *d_norm == 0.0 { 0.0 } else { (dot / (q_norm * d_norm)).clamp(0.0, 1.0) }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::CourseRow;
    use crate::vectorizer::cosine_similarity;

    fn index(texts: &[&str]) -> CorpusIndex {
        let rows = texts
            .iter()
            .map(|t| CourseRow { text_for_tfidf: Some(t.to_string()), ..Default::default() })
            .collect();
        CorpusIndex::build(rows).unwrap()
    }

    #[test]
    fn postings_scores_match_direct_cosine() {
        let idx = index(&["sql server database management", "java programming", "sql tuning for server"]);
        let scores = score(&idx, "SQL Server");
        let query = idx.model().transform("sql server");
        for (doc_id, s) in scores.iter().enumerate() {
            let direct = cosine_similarity(&query, idx.vector(doc_id as u32).unwrap());
            assert!((s - direct).abs() < 1e-6);
        }
        assert!(scores[0] > scores[2]);
        assert_eq!(scores[1], 0.0);
    }

    #[test]
    fn no_overlap_scores_zero() {
        let idx = index(&["sql server", "java"]);
        assert_eq!(score(&idx, "haskell monads"), vec![0.0, 0.0]);
    }

    #[test]
    fn domain_stopword_query_falls_back_to_raw_text() {
        let idx = index(&["online course catalog", "java"]);
        let scores = score(&idx, "Online Course Catalog");
        assert!(scores[0] > 0.0);
        // Corpus text is normalized too, so domain stopwords never enter the vocabulary.
        let fallback = score(&idx, "Online Course");
        assert_eq!(fallback.len(), 2);
        assert!(fallback.iter().all(|s| *s == 0.0));
    }
}
