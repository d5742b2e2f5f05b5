pub mod booster;
pub mod error;
pub mod feedback;
pub mod index;
pub mod normalizer;
pub mod nullable;
pub mod ranker;
pub mod recommend;
pub mod record;
pub mod scorer;
pub mod source;
pub mod vectorizer;

pub type TermId = u32;
pub type DocId = u32;

pub use error::{IndexBuildError, SchemaError, SourceError};
pub use index::{CorpusIndex, Posting};
pub use ranker::ScoredResult;
pub use recommend::{Query, RankingConfig, Recommender};
pub use record::{CourseRecord, CourseRow};
