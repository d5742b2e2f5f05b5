use crate::booster::{boost, DEFAULT_BOOST_FACTOR};
use crate::index::CorpusIndex;
use crate::ranker::{rank, ScoredResult};
use crate::scorer::score;

pub const DEFAULT_TOP_N: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankingConfig {
    /// Multiplier for records containing the literal query phrase.
    pub boost_factor: f32,
    /// Result count when the caller does not ask for one.
    pub top_n: usize,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self { boost_factor: DEFAULT_BOOST_FACTOR, top_n: DEFAULT_TOP_N }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub raw_text: String,
    pub requested_count: usize,
}

impl Query {
    pub fn new(raw_text: impl Into<String>, requested_count: usize) -> Self {
        Self { raw_text: raw_text.into(), requested_count }
    }
}

/// Owns the index for the process lifetime and answers queries against it.
/// Safe to share across threads; nothing is mutated after construction.
#[derive(Debug)]
pub struct Recommender {
    index: CorpusIndex,
    config: RankingConfig,
}

impl Recommender {
    pub fn new(index: CorpusIndex, config: RankingConfig) -> Self { Self { index, config } }

    pub fn index(&self) -> &CorpusIndex { &self.index }

    pub fn config(&self) -> &RankingConfig { &self.config }

    /// Query with the configured default count.
    pub fn query(&self, raw_text: impl Into<String>) -> Query { Query::new(raw_text, self.config.top_n) }

    pub fn recommend(&self, query: &Query) -> Vec<ScoredResult<'_>> {
        let records = self.index.records();
        let similarities = score(&self.index, &query.raw_text);
        let boosted = boost(records, &similarities, &query.raw_text, self.config.boost_factor);
        let ranked = rank(records, &boosted, query.requested_count);
        tracing::debug!(query = %query.raw_text, returned = ranked.len(), "recommendation computed");
        ranked
    }
}
