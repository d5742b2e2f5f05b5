use crate::record::CourseRecord;
use regex::{Regex, RegexBuilder};

pub const DEFAULT_BOOST_FACTOR: f32 = 1.3;

/// Whole-word matcher for the trimmed, lowercased query phrase. `None` when
/// the phrase is empty.
pub fn phrase_matcher(raw_query: &str) -> Option<Regex> {
    let phrase = raw_query.trim().to_lowercase();
    if phrase.is_empty() { return None; }
    match RegexBuilder::new(&format!(r"\b{}\b", regex::escape(&phrase)))
        .case_insensitive(true)
        .build()
    {
        Ok(re) => Some(re),
        Err(err) => {
            tracing::warn!(%err, "phrase pattern rejected; skipping boost");
            None
        }
    }
}

/// Multiply the score of every record whose normalized text contains the raw
/// query phrase as a whole word sequence. Returns new scores; boosted values
/// may exceed 1.0.
pub fn boost(records: &[CourseRecord], scores: &[f32], raw_query: &str, factor: f32) -> Vec<f32> {
    let Some(re) = phrase_matcher(raw_query) else { return scores.to_vec() };
    records
        .iter()
        .zip(scores)
        .map(|(record, &s)| if re.is_match(&record.normalized_text) { s * factor } else { s })
        .collect()
}
