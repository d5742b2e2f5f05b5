use anyhow::Result;
use axum::{extract::{Path, Query, State}, http::StatusCode, routing::{get, post}, Json, Router};
use course_core::feedback::{FeedbackEntry, FeedbackStore};
use course_core::source::load_rows;
use course_core::{CorpusIndex, CourseRecord, RankingConfig, Recommender, ScoredResult};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub const DEFAULT_DISPLAY_LIMIT: usize = 10;

pub struct Settings {
    pub corpus: PathBuf,
    pub feedback: PathBuf,
    pub ranking: RankingConfig,
    pub display_limit: usize,
}

#[derive(Deserialize)]
pub struct RecommendParams {
    #[serde(default)]
    pub q: String,
    pub k: Option<i64>,
    pub level: Option<String>,
}

#[derive(Serialize)]
pub struct RecommendResponse {
    pub query: String,
    pub level: Option<String>,
    pub took_ms: u128,
    pub took_s: f64,
    pub total_hits: usize,
    pub results: Vec<CourseCard>,
}

/// Presentation view of a ranked course. Missing values stay null.
#[derive(Serialize)]
pub struct CourseCard {
    pub doc_id: u32,
    pub similarity: f32,
    pub title: String,
    pub course_id: Option<String>,
    pub url: Option<String>,
    pub provider: Option<String>,
    pub level: Option<String>,
    pub duration: Option<f64>,
    pub rating: Option<f64>,
    pub price: &'static str,
    pub subscribers: Option<u64>,
    pub reviews: Option<u64>,
    pub lectures: Option<u64>,
    pub subject: Option<String>,
}

impl From<&ScoredResult<'_>> for CourseCard {
    fn from(hit: &ScoredResult<'_>) -> Self {
        let c = hit.course_record;
        Self {
            doc_id: hit.doc_id,
            similarity: hit.similarity_score,
            title: c.title.clone().unwrap_or_else(|| "Untitled".to_string()),
            course_id: c.course_id.clone(),
            url: c.url.clone(),
            provider: c.provider.clone(),
            level: c.level.clone(),
            duration: c.duration,
            rating: c.rating,
            price: if c.is_paid == Some(true) { "Paid" } else { "Free" },
            subscribers: c.subscribers,
            reviews: c.reviews,
            lectures: c.lectures,
            subject: c.subject.clone(),
        }
    }
}

#[derive(Deserialize)]
pub struct FeedbackRequest {
    pub course_title: String,
    pub rating: i64,
    #[serde(default)]
    pub comment: String,
}

#[derive(Clone)]
pub struct AppState {
    pub recommender: Arc<Recommender>,
    pub feedback: Arc<FeedbackStore>,
    pub display_limit: usize,
}

/// Build the index once and wire the routes around it.
pub fn build_app(settings: Settings) -> Result<Router> {
    let rows = load_rows(&settings.corpus)?;
    let index = CorpusIndex::build(rows)?;
    let feedback = FeedbackStore::open(&settings.feedback)?;
    let state = AppState {
        recommender: Arc::new(Recommender::new(index, settings.ranking)),
        feedback: Arc::new(feedback),
        display_limit: settings.display_limit,
    };
    Ok(router(state))
}

pub fn router(state: AppState) -> Router {
    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/recommend", get(recommend_handler))
        .route("/course/:doc_id", get(course_handler))
        .route("/feedback", post(feedback_handler))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

fn level_matches(record: &CourseRecord, level: Option<&str>) -> bool {
    match level.map(str::trim) {
        None | Some("") => true,
        Some(l) if l.eq_ignore_ascii_case("any") => true,
        Some(l) => record.level.as_deref().is_some_and(|r| r.trim().to_lowercase() == l.to_lowercase()),
    }
}

pub async fn recommend_handler(State(state): State<AppState>, Query(params): Query<RecommendParams>) -> Json<RecommendResponse> {
    let start = std::time::Instant::now();
    let query_text = if params.q.trim().is_empty() { "all".to_string() } else { params.q.clone() };
    let mut query = state.recommender.query(query_text);
    if let Some(k) = params.k {
        query.requested_count = k.max(0) as usize;
    }

    let ranked = state.recommender.recommend(&query);
    let total_hits = ranked.len();
    let results: Vec<CourseCard> = ranked
        .iter()
        .filter(|hit| level_matches(hit.course_record, params.level.as_deref()))
        .take(state.display_limit)
        .map(CourseCard::from)
        .collect();

    let elapsed = start.elapsed();
    Json(RecommendResponse {
        query: query.raw_text,
        level: params.level,
        took_ms: elapsed.as_millis(),
        took_s: elapsed.as_secs_f64(),
        total_hits,
        results,
    })
}

pub async fn course_handler(State(state): State<AppState>, Path(doc_id): Path<u32>) -> Result<Json<CourseRecord>, StatusCode> {
    state
        .recommender
        .index()
        .record(doc_id)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

pub async fn feedback_handler(State(state): State<AppState>, Json(req): Json<FeedbackRequest>) -> Result<StatusCode, (StatusCode, String)> {
    if req.course_title.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "course_title is required".into()));
    }
    if !(1..=5).contains(&req.rating) {
        return Err((StatusCode::BAD_REQUEST, "rating must be between 1 and 5".into()));
    }
    FeedbackEntry::new(req.course_title.trim(), req.rating as u8, req.comment)
        .and_then(|entry| state.feedback.append(&entry))
        .map_err(|e| {
            tracing::error!(error = %e, "failed to store feedback");
            (StatusCode::INTERNAL_SERVER_ERROR, "failed to store feedback".to_string())
        })?;
    Ok(StatusCode::CREATED)
}
